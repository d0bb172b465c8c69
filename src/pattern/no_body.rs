//! The absence of a body

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{row_variation_of_self, variation_of_self, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// Matches only an empty body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoBodyPattern;

impl PatternOps for NoBodyPattern {
    fn matches(&self, sample: &Value, _resolver: &Resolver) -> MatchResult {
        match sample {
            Value::String(s) if s.is_empty() => MatchResult::Success,
            other => MatchResult::failure(format!("Expected no body, but found {}", other.display_value())),
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        Value::String(String::new())
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        if text.trim().is_empty() {
            Ok(Value::String(String::new()))
        } else {
            Err(ContractError::parse(text, "a body was found where none is expected"))
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

    fn negative_based_on(
        &self,
        _row: &Row,
        _resolver: &Resolver,
        _config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        Variations::empty()
    }

    fn type_name(&self) -> String {
        "no body".to_string()
    }

    fn canonical_form(&self) -> String {
        "(no body)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_empty_body_matches() {
        let resolver = Resolver::new();
        assert!(NoBodyPattern.matches(&Value::from(""), &resolver).is_success());
        assert!(NoBodyPattern.matches(&Value::from("x"), &resolver).is_failure());
        assert!(NoBodyPattern.matches(&Value::Null, &resolver).is_failure());
        assert!(NoBodyPattern.parse("  ", &resolver).is_ok());
        assert!(NoBodyPattern.parse("{}", &resolver).is_err());
    }
}
