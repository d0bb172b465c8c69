//! `(string)`, with optional length bounds

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::encompass::{self, TypeStack};
use crate::error::Result;
use crate::mismatch::mismatch_result;
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{
    row_variation_of_self, variation_of_self, BooleanPattern, ExactValuePattern, NullPattern, NumberPattern,
    Pattern, PatternOps,
};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringPattern {
    pub type_alias: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub example: Option<String>,
}

impl StringPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self {
            min_length,
            max_length,
            ..Self::default()
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    fn generated_length(&self, resolver: &Resolver) -> usize {
        let length = self.min_length.unwrap_or(0).max(resolver.string_min_length);
        match self.max_length {
            Some(max) => length.min(max),
            None => length,
        }
    }

    fn length_violation(&self, text: &str) -> Option<String> {
        let length = text.chars().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            return Some(format!(
                "Expected string with minLength {}, actual was \"{}\" of length {}",
                min, text, length
            ));
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            return Some(format!(
                "Expected string with maxLength {}, actual was \"{}\" of length {}",
                max, text, length
            ));
        }
        None
    }
}

pub(crate) fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

impl PatternOps for StringPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::String(text) => match self.length_violation(text) {
                Some(message) => MatchResult::failure(message),
                None => MatchResult::Success,
            },
            other => mismatch_result("string", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        let this: Pattern = self.clone().into();
        if let Some(example) = resolver.resolve_example(self.example.as_deref(), &this) {
            return example;
        }
        if let Some(text) = resolver.provide_string(&this) {
            if self.length_violation(&text).is_none() {
                return Value::String(text);
            }
        }
        Value::String(random_string(self.generated_length(resolver)))
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        Ok(Value::String(text.to_string()))
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        if let Some(result) = encompass::encompasses_wrapped(&this, other, tr, or, stack) {
            return result;
        }
        match other {
            Pattern::String(other) => {
                let min_ok = self.min_length.unwrap_or(0) <= other.min_length.unwrap_or(0);
                let max_ok = match (self.max_length, other.max_length) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(this_max), Some(other_max)) => this_max >= other_max,
                };
                if min_ok && max_ok {
                    MatchResult::Success
                } else {
                    MatchResult::failure("Expected string length bounds to include the other string's bounds")
                }
            }
            _ => encompass::type_mismatch(&this, other),
        }
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
        let this: Pattern = self.clone().into();
        let data_types = scalar_annotation(
            &this,
            vec![
                NullPattern.into(),
                NumberPattern::default().into(),
                BooleanPattern::default().into(),
            ],
            row,
            resolver,
            config,
        );

        let mut bounds = Vec::new();
        if let Some(min) = self.min_length.filter(|min| *min > 0) {
            bounds.push(
                ReturnValue::has_value(ExactValuePattern::new(Value::String(random_string(min - 1))).into())
                    .add_details(&format!("string shorter than minLength {}", min), ""),
            );
        }
        if let Some(max) = self.max_length {
            bounds.push(
                ReturnValue::has_value(ExactValuePattern::new(Value::String(random_string(max + 1))).into())
                    .add_details(&format!("string longer than maxLength {}", max), ""),
            );
        }
        data_types.chain(Variations::from_vec(bounds))
    }

    fn type_name(&self) -> String {
        "string".to_string()
    }

    fn canonical_form(&self) -> String {
        "(string)".to_string()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_strings_only() {
        let resolver = Resolver::new();
        let pattern = StringPattern::new();
        assert!(pattern.matches(&Value::from("hello"), &resolver).is_success());
        assert!(pattern.matches(&Value::from(10), &resolver).is_failure());
        assert!(pattern.matches(&Value::Null, &resolver).is_failure());
    }

    #[test]
    fn test_length_bounds() {
        let resolver = Resolver::new();
        let pattern = StringPattern::with_bounds(Some(2), Some(4));
        assert!(pattern.matches(&Value::from("abc"), &resolver).is_success());
        assert!(pattern.matches(&Value::from("a"), &resolver).is_failure());
        assert!(pattern.matches(&Value::from("abcde"), &resolver).is_failure());
        assert!(pattern.matches(&pattern.generate(&resolver), &resolver).is_success());
    }

    #[test]
    fn test_generated_length_uses_configured_minimum() {
        let resolver = Resolver::new().with_generation_limits(8, 3);
        match StringPattern::new().generate(&resolver) {
            Value::String(text) => assert_eq!(text.len(), 8),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_bounded_negatives_violate_bounds() {
        let resolver = Resolver::new();
        let pattern = StringPattern::with_bounds(Some(3), Some(5));
        let negatives = pattern
            .negative_based_on(&Row::empty(), &resolver, &NegativePatternConfiguration::default())
            .to_vec();
        assert!(negatives.len() >= 5);
        for negative in negatives.iter().filter_map(ReturnValue::value) {
            assert!(pattern.matches(&negative.generate(&resolver), &resolver).is_failure());
        }
    }

    #[test]
    fn test_wider_bounds_encompass_narrower() {
        let resolver = Resolver::new();
        let wide: Pattern = StringPattern::with_bounds(Some(1), Some(10)).into();
        let narrow: Pattern = StringPattern::with_bounds(Some(2), Some(5)).into();
        assert!(wide.check_encompasses(&narrow, &resolver, &resolver).is_success());
        assert!(narrow.check_encompasses(&wide, &resolver, &resolver).is_failure());
    }
}
