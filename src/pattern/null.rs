//! `(null)`

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::mismatch_result;
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{row_variation_of_self, variation_of_self, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// Matches `null`, and the empty string that stands for an absent value in
/// form and header data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullPattern;

pub const NULL_TOKEN: &str = "(null)";

impl PatternOps for NullPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::Null => MatchResult::Success,
            Value::String(s) if s.is_empty() => MatchResult::Success,
            other => mismatch_result("null", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        Value::Null
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        let trimmed = text.trim();
        if resolver.is_negative || trimmed.is_empty() || trimmed == NULL_TOKEN {
            Ok(Value::Null)
        } else {
            Err(ContractError::parse(text, "it is not null"))
        }
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        encompass::encompasses(&(*self).into(), other, tr, or, stack)
    }

    fn new_based_on_row(&self, _row: &Row, _resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        row_variation_of_self((*self).into())
    }

    fn new_based_on(&self, _resolver: &Resolver) -> Variations<Pattern> {
        variation_of_self((*self).into())
    }

    /// Every other value is a negative for null; there is no single wrong
    /// type to substitute, so none is produced.
    fn negative_based_on(
        &self,
        _row: &Row,
        _resolver: &Resolver,
        _config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        Variations::empty()
    }

    fn type_name(&self) -> String {
        "null".to_string()
    }

    fn canonical_form(&self) -> String {
        NULL_TOKEN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_null_and_empty_string() {
        let resolver = Resolver::new();
        assert!(NullPattern.matches(&Value::Null, &resolver).is_success());
        assert!(NullPattern.matches(&Value::from(""), &resolver).is_success());
        assert!(NullPattern.matches(&Value::from("x"), &resolver).is_failure());
        assert!(NullPattern.matches(&Value::from(0), &resolver).is_failure());
    }

    #[test]
    fn test_parse() {
        let resolver = Resolver::new();
        assert_eq!(NullPattern.parse(" (null) ", &resolver).unwrap(), Value::Null);
        assert_eq!(NullPattern.parse("", &resolver).unwrap(), Value::Null);
        assert!(NullPattern.parse("value", &resolver).is_err());
        assert_eq!(NullPattern.parse("value", &resolver.with_negative(true)).unwrap(), Value::Null);
    }

    #[test]
    fn test_no_negatives() {
        let negatives =
            NullPattern.negative_based_on(&Row::empty(), &Resolver::new(), &NegativePatternConfiguration::default());
        assert!(negatives.to_vec().is_empty());
    }
}
