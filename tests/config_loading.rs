//! Engine configuration loading

use std::io::Write;

use contract_patterns::pattern::StringPattern;
use contract_patterns::{EngineConfig, PatternOps, Value};

#[test]
fn test_load_from_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[matching]
mock_mode = true

[generation]
string_min_length = 8
"#
    )
    .unwrap();

    let config = EngineConfig::load_from(Some(file.path())).unwrap();

    assert!(config.matching.mock_mode);
    assert_eq!(config.generation.string_min_length, 8);
    assert_eq!(config.generation.max_list_items, 3);
    assert!(config.negative.with_data_type_negatives);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(EngineConfig::load_from(Some(missing.as_path())).is_err());
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract-patterns.toml");
    let mut config = EngineConfig::default();
    config.generation.max_list_items = 7;
    config.negative.with_data_type_negatives = false;

    config.save(&path).unwrap();
    let loaded = EngineConfig::load_from(Some(path.as_path())).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_resolver_uses_generation_limits() {
    let mut config = EngineConfig::default();
    config.generation.string_min_length = 12;
    let resolver = config.resolver();

    match StringPattern::new().generate(&resolver) {
        Value::String(text) => assert_eq!(text.len(), 12),
        other => panic!("Expected string, got {:?}", other),
    }
}
