//! A body that may be absent

use std::collections::BTreeMap;

use crate::encompass::TypeStack;
use crate::error::Result;
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{AnyPattern, NoBodyPattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// Union of a body pattern and `NoBodyPattern`.
///
/// Matching reports the body's failure rather than the union's, since "no
/// body" is rarely what the caller meant to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalBodyPattern {
    pub pattern: AnyPattern,
    pub body_pattern: Box<Pattern>,
}

impl OptionalBodyPattern {
    pub fn from_pattern(body: impl Into<Pattern>) -> Self {
        let body = body.into();
        Self {
            pattern: AnyPattern::from_members(vec![body.clone(), NoBodyPattern.into()]),
            body_pattern: Box::new(body),
        }
    }
}

impl PatternOps for OptionalBodyPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        let body_result = self.body_pattern.matches(sample, resolver);
        if body_result.is_success() || NoBodyPattern.matches(sample, resolver).is_success() {
            return MatchResult::Success;
        }
        body_result
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        self.pattern.generate(resolver)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        self.pattern.parse(text, resolver)
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        if let Pattern::OptionalBody(other) = other {
            if other == self {
                return MatchResult::Success;
            }
        }
        self.pattern.encompasses(other, tr, or, stack)
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        self.pattern.new_based_on_row(row, resolver)
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        self.pattern.new_based_on(resolver)
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        self.pattern.negative_based_on(row, resolver, config)
    }

    fn list_of(&self, values: Vec<Value>, resolver: &Resolver) -> Value {
        self.pattern.list_of(values, resolver)
    }

    fn type_name(&self) -> String {
        self.pattern.type_name()
    }

    fn canonical_form(&self) -> String {
        self.pattern.canonical_form()
    }

    fn type_alias(&self) -> Option<&str> {
        self.pattern.type_alias()
    }

    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        self.pattern.extensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{NumberPattern, StringPattern};

    #[test]
    fn test_accepts_body_or_nothing() {
        let resolver = Resolver::new();
        let pattern = OptionalBodyPattern::from_pattern(NumberPattern::default());
        assert!(pattern.matches(&Value::from(10), &resolver).is_success());
        assert!(pattern.matches(&Value::from(""), &resolver).is_success());
    }

    #[test]
    fn test_reports_body_failure() {
        let resolver = Resolver::new();
        let pattern = OptionalBodyPattern::from_pattern(NumberPattern::default());
        let sample = Value::from("abc");
        let expected = NumberPattern::default().matches(&sample, &resolver);
        assert_eq!(pattern.matches(&sample, &resolver), expected);
    }

    #[test]
    fn test_union_has_body_then_no_body() {
        let pattern = OptionalBodyPattern::from_pattern(StringPattern::default());
        assert_eq!(
            pattern.pattern.patterns,
            vec![Pattern::from(StringPattern::default()), Pattern::from(NoBodyPattern)]
        );
        assert_eq!(pattern.type_name(), "(string or no body)");
    }
}
