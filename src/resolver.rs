//! Resolution context
//!
//! A `Resolver` carries everything a pattern needs beyond its own definition:
//! named patterns for deferred references, mismatch phrasing, generation
//! policy and the current lookup path. It is cheap to clone; "with" methods
//! return modified copies so a resolver can be shared across threads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{ContractError, Result};
use crate::mismatch::{DefaultMismatchMessages, MismatchMessages};
use crate::pattern::{builtin_pattern, with_pattern_delimiters, Pattern, PatternOps};
use crate::value::Value;

/// Default minimum length of generated strings
pub const DEFAULT_STRING_MIN_LENGTH: usize = 5;

/// Default upper bound on generated list length
pub const DEFAULT_MAX_LIST_ITEMS: usize = 3;

// =============================================================================
// Example policy
// =============================================================================

/// Decides whether declared schema examples are used during generation
pub trait DefaultExampleResolver: fmt::Debug + Send + Sync {
    fn resolve_example(&self, example: Option<&str>, pattern: &Pattern, resolver: &Resolver) -> Option<Value>;

    fn has_example(&self, example: Option<&str>) -> bool;
}

/// Generate declared examples when they parse as the pattern's type
#[derive(Debug, Clone, Copy, Default)]
pub struct UseDefaultExample;

impl DefaultExampleResolver for UseDefaultExample {
    fn resolve_example(&self, example: Option<&str>, pattern: &Pattern, resolver: &Resolver) -> Option<Value> {
        let example = example?;
        match pattern.parse(example, resolver) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    example = %example,
                    pattern = %pattern.type_name(),
                    error = %e,
                    "Ignoring example that does not parse as its pattern"
                );
                None
            }
        }
    }

    fn has_example(&self, example: Option<&str>) -> bool {
        example.is_some()
    }
}

/// Ignore declared examples
#[derive(Debug, Clone, Copy, Default)]
pub struct DoNotUseDefaultExample;

impl DefaultExampleResolver for DoNotUseDefaultExample {
    fn resolve_example(&self, _example: Option<&str>, _pattern: &Pattern, _resolver: &Resolver) -> Option<Value> {
        None
    }

    fn has_example(&self, _example: Option<&str>) -> bool {
        false
    }
}

/// Supplies string values for patterns (URLs, free text) when configured
pub trait StringProvider: fmt::Debug + Send + Sync {
    fn provide_string(&self, pattern: &Pattern) -> Option<String>;
}

// =============================================================================
// Resolver
// =============================================================================

#[derive(Debug, Clone)]
pub struct Resolver {
    pub mismatch_messages: Arc<dyn MismatchMessages>,
    /// Relax required-key failures when matching stub data
    pub mock_mode: bool,
    /// Parse and generate toward invalid instances
    pub is_negative: bool,
    pub default_example_resolver: Arc<dyn DefaultExampleResolver>,
    pub string_min_length: usize,
    pub max_list_items: usize,
    patterns: Arc<BTreeMap<String, Pattern>>,
    dictionary: Arc<BTreeMap<String, Value>>,
    lookup_path: Vec<String>,
    /// Named patterns being expanded on the current generation path
    expanding: Vec<String>,
    string_provider: Option<Arc<dyn StringProvider>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            mismatch_messages: Arc::new(DefaultMismatchMessages),
            mock_mode: false,
            is_negative: false,
            default_example_resolver: Arc::new(DoNotUseDefaultExample),
            string_min_length: DEFAULT_STRING_MIN_LENGTH,
            max_list_items: DEFAULT_MAX_LIST_ITEMS,
            patterns: Arc::new(BTreeMap::new()),
            dictionary: Arc::new(BTreeMap::new()),
            lookup_path: Vec::new(),
            expanding: Vec::new(),
            string_provider: None,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register named patterns. Names are stored in `(Name)` form.
    pub fn with_patterns<I, K>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = (K, Pattern)>,
        K: AsRef<str>,
    {
        let mut registry = (*self.patterns).clone();
        for (name, pattern) in patterns {
            registry.insert(with_pattern_delimiters(name.as_ref()), pattern);
        }
        self.patterns = Arc::new(registry);
        self
    }

    /// Values keyed by dotted lookup path, preferred during generation
    pub fn with_dictionary<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut dictionary = (*self.dictionary).clone();
        dictionary.extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self.dictionary = Arc::new(dictionary);
        self
    }

    pub fn with_mock_mode(&self, mock_mode: bool) -> Self {
        Self {
            mock_mode,
            ..self.clone()
        }
    }

    pub fn with_negative(&self, is_negative: bool) -> Self {
        Self {
            is_negative,
            ..self.clone()
        }
    }

    pub fn with_default_examples(&self, policy: Arc<dyn DefaultExampleResolver>) -> Self {
        Self {
            default_example_resolver: policy,
            ..self.clone()
        }
    }

    pub fn with_mismatch_messages(&self, messages: Arc<dyn MismatchMessages>) -> Self {
        Self {
            mismatch_messages: messages,
            ..self.clone()
        }
    }

    pub fn with_string_provider(&self, provider: Arc<dyn StringProvider>) -> Self {
        Self {
            string_provider: Some(provider),
            ..self.clone()
        }
    }

    pub fn with_generation_limits(&self, string_min_length: usize, max_list_items: usize) -> Self {
        Self {
            string_min_length,
            max_list_items: max_list_items.max(1),
            ..self.clone()
        }
    }

    /// Named patterns registered on this resolver
    pub fn patterns(&self) -> &BTreeMap<String, Pattern> {
        &self.patterns
    }

    /// Look up a `(Name)` reference: registered patterns first, then built-ins
    pub fn get_pattern(&self, name: &str) -> Result<Pattern> {
        let name = with_pattern_delimiters(name);
        if let Some(pattern) = self.patterns.get(&name) {
            trace!(name = %name, "Resolved registered pattern");
            return Ok(pattern.clone());
        }
        builtin_pattern(&name).ok_or(ContractError::UnknownType(name))
    }

    pub fn resolve_example(&self, example: Option<&str>, pattern: &Pattern) -> Option<Value> {
        self.default_example_resolver.resolve_example(example, pattern, self)
    }

    pub fn has_example(&self, example: Option<&str>) -> bool {
        self.default_example_resolver.has_example(example)
    }

    pub fn provide_string(&self, pattern: &Pattern) -> Option<String> {
        self.string_provider.as_ref()?.provide_string(pattern)
    }

    /// Start a fresh lookup path rooted at a parameter name
    pub fn update_lookup_for_param(&self, param: &str) -> Self {
        Self {
            lookup_path: vec![param.to_string()],
            ..self.clone()
        }
    }

    /// Descend one key deeper
    pub fn update_lookup_path(&self, key: &str) -> Self {
        let mut lookup_path = self.lookup_path.clone();
        lookup_path.push(key.to_string());
        Self {
            lookup_path,
            ..self.clone()
        }
    }

    pub fn lookup_path(&self) -> String {
        self.lookup_path.join(".")
    }

    pub fn is_expanding(&self, name: &str) -> bool {
        self.expanding.iter().any(|n| n == name)
    }

    /// Mark `name` as being expanded; `None` when it already is, which
    /// means generation has come back around a recursive type.
    pub fn enter_pattern(&self, name: &str) -> Option<Self> {
        if self.is_expanding(name) {
            trace!(name = %name, "Cycle detected during generation");
            return None;
        }
        let mut expanding = self.expanding.clone();
        expanding.push(name.to_string());
        Some(Self {
            expanding,
            ..self.clone()
        })
    }

    /// Generate the value for `key`, preferring a dictionary entry that
    /// still matches the pattern
    pub fn generate(&self, key: &str, pattern: &Pattern) -> Value {
        let nested = self.update_lookup_path(key);
        if let Some(value) = self.dictionary.get(&nested.lookup_path()) {
            if pattern.matches(value, &nested).is_success() {
                trace!(path = %nested.lookup_path(), "Using dictionary value");
                return value.clone();
            }
            warn!(
                path = %nested.lookup_path(),
                "Dictionary value does not match its pattern, generating instead"
            );
        }
        pattern.generate(&nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{NumberPattern, ObjectPattern, StringPattern};

    #[test]
    fn test_registered_patterns_shadow_builtins() {
        let resolver = Resolver::new().with_patterns([("Id", Pattern::from(NumberPattern::default()))]);
        assert_eq!(resolver.get_pattern("(Id)").unwrap(), NumberPattern::default().into());
        assert_eq!(resolver.get_pattern("Id").unwrap(), NumberPattern::default().into());
        assert_eq!(resolver.get_pattern("(string)").unwrap(), StringPattern::default().into());
    }

    #[test]
    fn test_unknown_pattern_is_an_error() {
        let err = Resolver::new().get_pattern("(Missing)").unwrap_err();
        assert!(matches!(err, ContractError::UnknownType(ref name) if name == "(Missing)"));
    }

    #[test]
    fn test_with_methods_copy() {
        let resolver = Resolver::new();
        let mock = resolver.with_mock_mode(true);
        assert!(!resolver.mock_mode);
        assert!(mock.mock_mode);
    }

    #[test]
    fn test_lookup_path() {
        let resolver = Resolver::new().update_lookup_for_param("body").update_lookup_path("id");
        assert_eq!(resolver.lookup_path(), "body.id");
        assert_eq!(resolver.update_lookup_for_param("query").lookup_path(), "query");
    }

    #[test]
    fn test_enter_pattern_detects_cycles() {
        let resolver = Resolver::new();
        let inside = resolver.enter_pattern("(Person)").unwrap();
        assert!(inside.is_expanding("(Person)"));
        assert!(inside.enter_pattern("(Person)").is_none());
        assert!(inside.enter_pattern("(Address)").is_some());
        assert!(!resolver.is_expanding("(Person)"));
    }

    #[test]
    fn test_dictionary_values_are_preferred() {
        let resolver = Resolver::new().with_dictionary([("id", Value::from(42)), ("name", Value::from(true))]);
        assert_eq!(resolver.generate("id", &NumberPattern::default().into()), Value::from(42));

        // A dictionary entry of the wrong type is ignored.
        let object: Pattern = ObjectPattern::new([
            ("id", Pattern::from(NumberPattern::default())),
            ("name", Pattern::from(StringPattern::default())),
        ])
        .into();
        match object.generate(&resolver) {
            Value::Object(fields) => {
                assert_eq!(fields.get("id"), Some(&Value::from(42)));
                assert!(matches!(fields.get("name"), Some(Value::String(_))));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_example_policies() {
        let pattern: Pattern = NumberPattern::default().into();
        let use_examples = Resolver::new().with_default_examples(Arc::new(UseDefaultExample));
        assert_eq!(use_examples.resolve_example(Some("10"), &pattern), Some(Value::from(10)));
        assert_eq!(use_examples.resolve_example(Some("ten"), &pattern), None);
        assert_eq!(Resolver::new().resolve_example(Some("10"), &pattern), None);
    }
}
