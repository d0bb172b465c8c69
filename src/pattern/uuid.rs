//! `(uuid)`

use uuid::Uuid;

use crate::encompass::{self, TypeStack};
use crate::error::{result_of, ContractError, Result};
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{row_variation_of_self, variation_of_self, NullPattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidPattern;

impl PatternOps for UuidPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::String(text) => result_of(|| {
                self.parse(text, resolver)?;
                Ok(MatchResult::Success)
            }),
            _ => MatchResult::failure("UUID types can only be represented using strings"),
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        Value::String(Uuid::new_v4().to_string())
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        Uuid::parse_str(text)
            .map(|_| Value::String(text.to_string()))
            .map_err(|e| ContractError::parse(text, e.to_string()))
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
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        scalar_annotation(&(*self).into(), vec![NullPattern.into()], row, resolver, config)
    }

    fn type_name(&self) -> String {
        "uuid".to_string()
    }

    fn canonical_form(&self) -> String {
        "(uuid)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_uuid_strings() {
        let resolver = Resolver::new();
        let value = Value::from("6f1c2f5e-8a7e-4d2b-9a55-0b6c6a0c8f11");
        assert!(UuidPattern.matches(&value, &resolver).is_success());
        assert!(UuidPattern.matches(&Value::from("not-a-uuid"), &resolver).is_failure());
        assert!(UuidPattern.matches(&Value::from(1), &resolver).is_failure());
    }

    #[test]
    fn test_generated_uuid_parses() {
        let resolver = Resolver::new();
        let generated = UuidPattern.generate(&resolver);
        assert!(UuidPattern.matches(&generated, &resolver).is_success());
    }
}
