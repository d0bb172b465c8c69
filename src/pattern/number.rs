//! `(number)`: integers by default, doubles when declared

use rand::Rng;
use serde_json::Number;

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::{mismatch_result, mismatch_text_failure};
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{
    variation_of_self, BooleanPattern, ExactValuePattern, NullPattern, Pattern, PatternOps, StringPattern,
};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::{parse_number, Value};
use crate::variations::Variations;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberPattern {
    pub type_alias: Option<String>,
    pub is_double: bool,
    pub example: Option<String>,
}

impl NumberPattern {
    pub fn integer() -> Self {
        Self::default()
    }

    pub fn double() -> Self {
        Self {
            is_double: true,
            ..Self::default()
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    fn kind(&self) -> &'static str {
        if self.is_double {
            "number"
        } else {
            "integer"
        }
    }
}

fn is_integral(number: &Number) -> bool {
    number.is_i64() || number.is_u64()
}

/// Extremes of the 32-bit signed range, used as boundary test values
pub fn boundary_values() -> [Value; 2] {
    [Value::from(i32::MAX), Value::from(i32::MIN)]
}

impl PatternOps for NumberPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::Number(number) if self.is_double || is_integral(number) => MatchResult::Success,
            Value::Number(_) => mismatch_result(self.kind(), sample, resolver.mismatch_messages.as_ref()),
            other => mismatch_result("number", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        if let Some(example) = resolver.resolve_example(self.example.as_deref(), &self.clone().into()) {
            return example;
        }
        let mut rng = rand::thread_rng();
        if self.is_double {
            let value = (rng.gen_range(1.0..1000.0_f64) * 100.0).round() / 100.0;
            if let Some(number) = Number::from_f64(value) {
                return Value::Number(number);
            }
        }
        Value::Number(Number::from(rng.gen_range(1..1000_i64)))
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        parse_number(text.trim())
            .map(Value::Number)
            .ok_or_else(|| {
                ContractError::Mismatch(mismatch_text_failure("number", text, resolver.mismatch_messages.as_ref()))
            })
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        if let Some(result) = encompass::encompasses_wrapped(&this, other, tr, or, stack) {
            return result;
        }
        match other {
            Pattern::Number(other) if self.is_double || !other.is_double => MatchResult::Success,
            Pattern::Number(_) => MatchResult::failure("Expected integer, got number"),
            _ => encompass::type_mismatch(&this, other),
        }
    }

    /// The pattern itself, followed by the 32-bit boundary values
    fn new_based_on_row(&self, _row: &Row, _resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        let mut variations = vec![ReturnValue::has_value(Pattern::from(self.clone()))];
        variations.extend(
            boundary_values()
                .into_iter()
                .map(|value| ReturnValue::has_value(ExactValuePattern::new(value).into())),
        );
        Variations::from_vec(variations)
    }

    fn new_based_on(&self, _resolver: &Resolver) -> Variations<Pattern> {
        variation_of_self(self.clone().into())
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        scalar_annotation(
            &self.clone().into(),
            vec![
                NullPattern.into(),
                BooleanPattern::default().into(),
                StringPattern::default().into(),
            ],
            row,
            resolver,
            config,
        )
    }

    fn type_name(&self) -> String {
        "number".to_string()
    }

    fn canonical_form(&self) -> String {
        "(number)".to_string()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rejects_fractions() {
        let resolver = Resolver::new();
        let fraction = NumberPattern::double().parse("2.5", &resolver).unwrap();
        assert!(NumberPattern::integer().matches(&fraction, &resolver).is_failure());
        assert!(NumberPattern::double().matches(&fraction, &resolver).is_success());
        assert!(NumberPattern::double().matches(&Value::from(2), &resolver).is_success());
    }

    #[test]
    fn test_parse() {
        let resolver = Resolver::new();
        assert_eq!(NumberPattern::integer().parse("10", &resolver).unwrap(), Value::from(10));
        assert!(NumberPattern::integer().parse("ten", &resolver).is_err());
    }

    #[test]
    fn test_row_variations_include_boundaries() {
        let values: Vec<Pattern> = NumberPattern::integer()
            .new_based_on_row(&Row::empty(), &Resolver::new())
            .iter()
            .filter_map(ReturnValue::into_value)
            .collect();
        assert_eq!(
            values,
            vec![
                Pattern::from(NumberPattern::integer()),
                ExactValuePattern::new(Value::from(i32::MAX)).into(),
                ExactValuePattern::new(Value::from(i32::MIN)).into(),
            ]
        );
    }

    #[test]
    fn test_double_encompasses_integer_only_one_way() {
        let resolver = Resolver::new();
        let double: Pattern = NumberPattern::double().into();
        let integer: Pattern = NumberPattern::integer().into();
        assert!(double.check_encompasses(&integer, &resolver, &resolver).is_success());
        assert!(integer.check_encompasses(&double, &resolver, &resolver).is_failure());
    }

    #[test]
    fn test_generated_values_match() {
        let resolver = Resolver::new();
        for pattern in [NumberPattern::integer(), NumberPattern::double()] {
            assert!(pattern.matches(&pattern.generate(&resolver), &resolver).is_success());
        }
    }
}
