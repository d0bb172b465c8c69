//! Literal values used as patterns

use crate::encompass::{self, TypeStack};
use crate::error::Result;
use crate::mismatch::mismatch_result;
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{
    row_variation_of_self, variation_of_self, BinaryPattern, BooleanPattern, NullPattern, NumberPattern, Pattern,
    PatternOps, StringPattern,
};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// Matches exactly one value
#[derive(Debug, Clone, PartialEq)]
pub struct ExactValuePattern {
    pub value: Value,
    pub type_alias: Option<String>,
}

impl ExactValuePattern {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            type_alias: None,
        }
    }

    /// The general type a literal belongs to
    fn natural_pattern(&self) -> Pattern {
        match &self.value {
            Value::Number(n) if !(n.is_i64() || n.is_u64()) => NumberPattern::double().into(),
            Value::Number(_) => NumberPattern::integer().into(),
            Value::Boolean(_) => BooleanPattern::default().into(),
            Value::Null => NullPattern.into(),
            Value::Binary(_) => BinaryPattern::default().into(),
            _ => StringPattern::default().into(),
        }
    }
}

/// Numbers compare by value, so `10` and `10.0` are the same literal.
fn same_value(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

impl PatternOps for ExactValuePattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        if same_value(&self.value, sample) {
            MatchResult::Success
        } else {
            mismatch_result(&self.value.display_value(), sample, resolver.mismatch_messages.as_ref())
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        self.value.clone()
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        match &self.value {
            Value::Array(_) | Value::Object(_) => Value::from_json_str(text),
            _ => self.natural_pattern().parse(text, resolver),
        }
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        encompass::encompasses_wrapped(&this, other, tr, or, stack)
            .unwrap_or_else(|| encompass::type_mismatch(&this, other))
    }

    fn new_based_on_row(&self, _row: &Row, _resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        row_variation_of_self(self.clone().into())
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
        let candidate: Pattern = if self.value.is_null() {
            StringPattern::default().into()
        } else {
            NullPattern.into()
        };
        scalar_annotation(&self.clone().into(), vec![candidate], row, resolver, config)
    }

    fn type_name(&self) -> String {
        self.value.display_value()
    }

    fn canonical_form(&self) -> String {
        self.value.display_value()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_only_its_value() {
        let resolver = Resolver::new();
        let pattern = ExactValuePattern::new("active");
        assert!(pattern.matches(&Value::from("active"), &resolver).is_success());
        assert!(pattern.matches(&Value::from("inactive"), &resolver).is_failure());
        assert_eq!(pattern.generate(&resolver), Value::from("active"));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let resolver = Resolver::new();
        let pattern = ExactValuePattern::new(10);
        let ten = NumberPattern::double().parse("10.0", &resolver).unwrap();
        assert!(pattern.matches(&ten, &resolver).is_success());
    }

    #[test]
    fn test_parse_uses_the_literal_type() {
        let resolver = Resolver::new();
        assert_eq!(ExactValuePattern::new(1).parse("42", &resolver).unwrap(), Value::from(42));
        assert!(ExactValuePattern::new(true).parse("nope", &resolver).is_err());
    }

    #[test]
    fn test_negatives_are_disjoint() {
        let resolver = Resolver::new();
        for pattern in [ExactValuePattern::new("x"), ExactValuePattern::new(Value::Null)] {
            let negatives = pattern
                .negative_based_on(&Row::empty(), &resolver, &NegativePatternConfiguration::default())
                .to_vec();
            assert_eq!(negatives.len(), 1);
            for negative in negatives.iter().filter_map(ReturnValue::value) {
                assert!(pattern.matches(&negative.generate(&resolver), &resolver).is_failure());
            }
        }
    }
}
