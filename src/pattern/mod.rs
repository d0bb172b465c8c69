//! Patterns
//!
//! Every schema construct is a `Pattern`. The capability set lives in the
//! `PatternOps` trait; `Pattern` is the closed sum of the built-in variants
//! plus a `Custom` arm for user-supplied implementations of the same trait.
//! Dispatch on `Pattern` forwards explicitly to the variant.

pub mod any;
pub mod binary;
pub mod boolean;
pub mod deferred;
pub mod exact;
pub mod list;
pub mod lookup_row;
pub mod no_body;
pub mod null;
pub mod number;
pub mod object;
pub mod optional_body;
pub mod string;
pub mod time;
pub mod url;
pub mod uuid;

pub use any::{extract_combined_extensions, AnyPattern};
pub use binary::BinaryPattern;
pub use boolean::{random_boolean, BooleanPattern};
pub use deferred::DeferredPattern;
pub use exact::ExactValuePattern;
pub use list::ListPattern;
pub use lookup_row::LookupRowPattern;
pub use no_body::NoBodyPattern;
pub use null::NullPattern;
pub use number::NumberPattern;
pub use object::ObjectPattern;
pub use optional_body::OptionalBodyPattern;
pub use string::StringPattern;
pub use time::TimePattern;
pub use url::{UrlPattern, UrlScheme};
pub use uuid::UuidPattern;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::encompass::TypeStack;
use crate::error::Result;
use crate::negative::NegativePatternConfiguration;
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

// =============================================================================
// Capability set
// =============================================================================

/// Operations every schema construct supports.
///
/// Implementations are immutable: every operation is a pure function of
/// `self`, its inputs and the resolver, apart from random value selection
/// during generation.
pub trait PatternOps: fmt::Debug + Send + Sync {
    /// Structural acceptance test
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult;

    /// One representative valid value
    fn generate(&self, resolver: &Resolver) -> Value;

    /// Read literal text as a value of this type
    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value>;

    /// Can a consumer expecting `self` accept data shaped like `other`?
    fn encompasses(
        &self,
        other: &Pattern,
        this_resolver: &Resolver,
        other_resolver: &Resolver,
        type_stack: &TypeStack,
    ) -> MatchResult;

    /// Specialisations driven by an example row
    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>>;

    /// Schema-only specialisations
    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern>;

    /// Wrong-typed alternatives for negative testing
    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>>;

    /// Wrap values in this type family's list representation
    fn list_of(&self, values: Vec<Value>, _resolver: &Resolver) -> Value {
        Value::Array(values)
    }

    fn type_name(&self) -> String;

    /// Textual form such as `(boolean)`
    fn canonical_form(&self) -> String;

    fn type_alias(&self) -> Option<&str> {
        None
    }

    /// Free-form `x-` extension fields attached by the schema loader
    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        BTreeMap::new()
    }
}

// =============================================================================
// Custom patterns
// =============================================================================

/// A user-supplied pattern. Two custom patterns are equal only when they are
/// the same instance.
#[derive(Clone)]
pub struct CustomPattern(pub Arc<dyn PatternOps>);

impl CustomPattern {
    pub fn new(pattern: impl PatternOps + 'static) -> Self {
        Self(Arc::new(pattern))
    }
}

impl fmt::Debug for CustomPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for CustomPattern {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PatternOps for CustomPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        self.0.matches(sample, resolver)
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        self.0.generate(resolver)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        self.0.parse(text, resolver)
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        self.0.encompasses(other, tr, or, stack)
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        self.0.new_based_on_row(row, resolver)
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        self.0.new_based_on(resolver)
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        self.0.negative_based_on(row, resolver, config)
    }

    fn list_of(&self, values: Vec<Value>, resolver: &Resolver) -> Value {
        self.0.list_of(values, resolver)
    }

    fn type_name(&self) -> String {
        self.0.type_name()
    }

    fn canonical_form(&self) -> String {
        self.0.canonical_form()
    }

    fn type_alias(&self) -> Option<&str> {
        self.0.type_alias()
    }

    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        self.0.extensions()
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// A schema construct
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    String(StringPattern),
    Number(NumberPattern),
    Boolean(BooleanPattern),
    Null(NullPattern),
    Binary(BinaryPattern),
    Time(TimePattern),
    Url(UrlPattern),
    Uuid(UuidPattern),
    ExactValue(ExactValuePattern),
    Deferred(DeferredPattern),
    NoBody(NoBodyPattern),
    Any(AnyPattern),
    OptionalBody(OptionalBodyPattern),
    LookupRow(LookupRowPattern),
    Object(ObjectPattern),
    List(ListPattern),
    Custom(CustomPattern),
}

macro_rules! dispatch {
    ($pattern:expr, $p:ident => $body:expr) => {
        match $pattern {
            Pattern::String($p) => $body,
            Pattern::Number($p) => $body,
            Pattern::Boolean($p) => $body,
            Pattern::Null($p) => $body,
            Pattern::Binary($p) => $body,
            Pattern::Time($p) => $body,
            Pattern::Url($p) => $body,
            Pattern::Uuid($p) => $body,
            Pattern::ExactValue($p) => $body,
            Pattern::Deferred($p) => $body,
            Pattern::NoBody($p) => $body,
            Pattern::Any($p) => $body,
            Pattern::OptionalBody($p) => $body,
            Pattern::LookupRow($p) => $body,
            Pattern::Object($p) => $body,
            Pattern::List($p) => $body,
            Pattern::Custom($p) => $body,
        }
    };
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Pattern {
                fn from(pattern: $ty) -> Self {
                    Pattern::$variant(pattern)
                }
            }
        )*
    };
}

impl_from_variant!(
    String(StringPattern),
    Number(NumberPattern),
    Boolean(BooleanPattern),
    Null(NullPattern),
    Binary(BinaryPattern),
    Time(TimePattern),
    Url(UrlPattern),
    Uuid(UuidPattern),
    ExactValue(ExactValuePattern),
    Deferred(DeferredPattern),
    NoBody(NoBodyPattern),
    Any(AnyPattern),
    OptionalBody(OptionalBodyPattern),
    LookupRow(LookupRowPattern),
    Object(ObjectPattern),
    List(ListPattern),
    Custom(CustomPattern),
);

impl PatternOps for Pattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        dispatch!(self, p => p.matches(sample, resolver))
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        dispatch!(self, p => p.generate(resolver))
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        dispatch!(self, p => p.parse(text, resolver))
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        dispatch!(self, p => p.encompasses(other, tr, or, stack))
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        dispatch!(self, p => p.new_based_on_row(row, resolver))
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        dispatch!(self, p => p.new_based_on(resolver))
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        dispatch!(self, p => p.negative_based_on(row, resolver, config))
    }

    fn list_of(&self, values: Vec<Value>, resolver: &Resolver) -> Value {
        dispatch!(self, p => p.list_of(values, resolver))
    }

    fn type_name(&self) -> String {
        dispatch!(self, p => p.type_name())
    }

    fn canonical_form(&self) -> String {
        dispatch!(self, p => p.canonical_form())
    }

    fn type_alias(&self) -> Option<&str> {
        dispatch!(self, p => p.type_alias())
    }

    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        dispatch!(self, p => p.extensions())
    }
}

impl Pattern {
    /// Top-level compatibility check with a fresh recursion guard
    pub fn check_encompasses(&self, other: &Pattern, this_resolver: &Resolver, other_resolver: &Resolver) -> MatchResult {
        self.encompasses(other, this_resolver, other_resolver, &TypeStack::new())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Pattern::String(_)
                | Pattern::Number(_)
                | Pattern::Boolean(_)
                | Pattern::Null(_)
                | Pattern::Binary(_)
                | Pattern::Time(_)
                | Pattern::Url(_)
                | Pattern::Uuid(_)
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_form())
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// `(name)` form of a type name
pub fn with_pattern_delimiters(name: &str) -> String {
    let name = name.trim();
    if is_pattern_token(name) {
        name.to_string()
    } else {
        format!("({})", name)
    }
}

pub fn without_pattern_delimiters(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix('(')
        .and_then(|n| n.strip_suffix(')'))
        .unwrap_or(name)
}

pub fn is_pattern_token(text: &str) -> bool {
    let text = text.trim();
    text.len() > 2 && text.starts_with('(') && text.ends_with(')')
}

/// Built-in type for a `(name)` reference
pub fn builtin_pattern(name: &str) -> Option<Pattern> {
    let pattern = match with_pattern_delimiters(name).as_str() {
        "(string)" => StringPattern::default().into(),
        "(number)" => NumberPattern::default().into(),
        "(boolean)" => BooleanPattern::default().into(),
        "(null)" => NullPattern.into(),
        "(binary)" => BinaryPattern::default().into(),
        "(time)" => TimePattern.into(),
        "(uuid)" => UuidPattern.into(),
        "(url)" => UrlPattern::default().into(),
        _ => return None,
    };
    Some(pattern)
}

/// Scalars with no row binding specialise only to themselves
pub(crate) fn row_variation_of_self(pattern: Pattern) -> Variations<ReturnValue<Pattern>> {
    Variations::single(ReturnValue::has_value(pattern))
}

pub(crate) fn variation_of_self(pattern: Pattern) -> Variations<Pattern> {
    Variations::single(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin_pattern("(string)"), Some(Pattern::String(StringPattern::default())));
        assert_eq!(builtin_pattern("number"), Some(Pattern::Number(NumberPattern::default())));
        assert_eq!(builtin_pattern("(Person)"), None);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(with_pattern_delimiters("Person"), "(Person)");
        assert_eq!(with_pattern_delimiters("(Person)"), "(Person)");
        assert_eq!(without_pattern_delimiters("(Person)"), "Person");
        assert!(!is_pattern_token("()"));
    }

    #[derive(Debug)]
    struct EvenNumber;

    impl PatternOps for EvenNumber {
        fn matches(&self, sample: &Value, _resolver: &Resolver) -> MatchResult {
            match sample.as_number().and_then(|n| n.as_i64()) {
                Some(n) if n % 2 == 0 => MatchResult::Success,
                _ => MatchResult::failure("Expected an even number"),
            }
        }

        fn generate(&self, _resolver: &Resolver) -> Value {
            Value::from(2)
        }

        fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
            NumberPattern::default().parse(text, resolver)
        }

        fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
            crate::encompass::encompasses(&Pattern::Custom(CustomPattern::new(EvenNumber)), other, tr, or, stack)
        }

        fn new_based_on_row(&self, _row: &Row, _resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
            Variations::empty()
        }

        fn new_based_on(&self, _resolver: &Resolver) -> Variations<Pattern> {
            Variations::empty()
        }

        fn negative_based_on(
            &self,
            _row: &Row,
            _resolver: &Resolver,
            _config: &NegativePatternConfiguration,
        ) -> Variations<ReturnValue<Pattern>> {
            Variations::empty()
        }

        fn type_name(&self) -> String {
            "even number".to_string()
        }

        fn canonical_form(&self) -> String {
            "(even number)".to_string()
        }
    }

    #[test]
    fn test_custom_pattern_dispatch() {
        let pattern = Pattern::Custom(CustomPattern::new(EvenNumber));
        let resolver = Resolver::new();
        assert!(pattern.matches(&Value::from(4), &resolver).is_success());
        assert!(pattern.matches(&Value::from(3), &resolver).is_failure());
        assert!(pattern.matches(&pattern.generate(&resolver), &resolver).is_success());
        assert_eq!(pattern.to_string(), "(even number)");
        assert_eq!(pattern, pattern.clone());
        assert_ne!(pattern, Pattern::Custom(CustomPattern::new(EvenNumber)));
    }

    #[test]
    fn test_custom_patterns_compare_by_type_name() {
        let resolver = Resolver::new();
        let a = Pattern::Custom(CustomPattern::new(EvenNumber));
        let b = Pattern::Custom(CustomPattern::new(EvenNumber));
        assert!(a.check_encompasses(&b, &resolver, &resolver).is_success());
        assert!(a
            .check_encompasses(&NumberPattern::default().into(), &resolver, &resolver)
            .is_failure());
    }
}
