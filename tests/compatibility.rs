//! Backward-compatibility checks across schema revisions

use std::collections::BTreeMap;

use contract_patterns::compatibility::ChangeType;
use contract_patterns::pattern::{
    AnyPattern, DeferredPattern, ListPattern, NullPattern, NumberPattern, ObjectPattern, StringPattern,
};
use contract_patterns::{CompatibilityChecker, Pattern};

fn types(entries: Vec<(&str, Pattern)>) -> BTreeMap<String, Pattern> {
    entries.into_iter().map(|(name, pattern)| (name.to_string(), pattern)).collect()
}

fn order(fields: Vec<(&str, Pattern)>) -> BTreeMap<String, Pattern> {
    types(vec![("(Order)", ObjectPattern::new(fields).into())])
}

#[test]
fn test_widening_to_nullable_is_compatible() {
    let old = order(vec![("note", StringPattern::new().into())]);
    let new = order(vec![(
        "note",
        AnyPattern::new(vec![StringPattern::new().into(), NullPattern.into()])
            .unwrap()
            .into(),
    )]);

    let result = CompatibilityChecker::new().check(&old, &new);

    assert!(result.is_compatible);
    assert_eq!(result.changes[0].change_type, ChangeType::TypeChanged);
}

#[test]
fn test_narrowing_from_nullable_is_breaking() {
    let old = order(vec![(
        "note",
        AnyPattern::new(vec![StringPattern::new().into(), NullPattern.into()])
            .unwrap()
            .into(),
    )]);
    let new = order(vec![("note", StringPattern::new().into())]);

    let result = CompatibilityChecker::new().check(&old, &new);

    assert!(result.is_breaking);
    assert_eq!(result.breaking_changes().count(), 1);
}

#[test]
fn test_list_element_change_is_breaking() {
    let old = order(vec![("items", ListPattern::new(NumberPattern::integer()).into())]);
    let new = order(vec![("items", ListPattern::new(StringPattern::new()).into())]);

    let result = CompatibilityChecker::new().check(&old, &new);

    assert!(!result.is_compatible);
    assert!(result.changes[0].description.contains("Expected string, got number"));
}

#[test]
fn test_required_field_made_optional_is_breaking() {
    let old = order(vec![("id?", NumberPattern::integer().into())]);
    let new = order(vec![("id", NumberPattern::integer().into())]);

    let result = CompatibilityChecker::new().check(&old, &new);

    assert!(result.is_breaking);
}

#[test]
fn test_recursive_types_are_compared() {
    let old = types(vec![(
        "(Node)",
        ObjectPattern::new([
            ("value", Pattern::from(NumberPattern::integer())),
            ("next?", Pattern::from(DeferredPattern::new("(Node)"))),
        ])
        .into(),
    )]);
    let new = types(vec![(
        "(Node)",
        ObjectPattern::new([
            ("value", Pattern::from(NumberPattern::double())),
            ("next?", Pattern::from(DeferredPattern::new("(Node)"))),
        ])
        .into(),
    )]);

    let forward = CompatibilityChecker::new().check(&old, &new);
    let backward = CompatibilityChecker::new().check(&new, &old);

    assert!(forward.is_compatible);
    assert!(backward.is_breaking);
}

#[test]
fn test_bounding_a_recursive_type_is_breaking() {
    let old = types(vec![(
        "(Node)",
        ObjectPattern::new([
            ("value", Pattern::from(NumberPattern::integer())),
            ("next?", Pattern::from(DeferredPattern::new("(Node)"))),
        ])
        .into(),
    )]);
    let new = types(vec![(
        "(Node)",
        ObjectPattern::new([
            ("value", Pattern::from(NumberPattern::integer())),
            (
                "next?",
                Pattern::from(ObjectPattern::new([("value", Pattern::from(NumberPattern::integer()))])),
            ),
        ])
        .into(),
    )]);

    let result = CompatibilityChecker::new().check(&old, &new);

    assert!(result.is_breaking);
    assert_eq!(result.changes[0].path, "(Node).next.next");
}
