//! `(time)`: ISO-8601 time of day, optionally with an offset

use chrono::{NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

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

static TIME_WITH_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<time>\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)(?P<offset>Z|[+-]\d{2}:?\d{2})?$").expect("valid regex"));

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimePattern;

fn validated_time(text: &str) -> Result<String> {
    let invalid = || ContractError::parse(text, "it is not a valid ISO 8601 time");
    let captures = TIME_WITH_OFFSET.captures(text).ok_or_else(invalid)?;
    let time = captures.name("time").map(|m| m.as_str()).ok_or_else(invalid)?;
    if TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(time, format).is_ok())
    {
        Ok(text.to_string())
    } else {
        Err(invalid())
    }
}

impl PatternOps for TimePattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::String(text) => result_of(|| {
                self.parse(text, resolver)?;
                Ok(MatchResult::Success)
            }),
            _ => MatchResult::failure("Time types can only be represented using strings"),
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        Value::String(Utc::now().format("%H:%M:%SZ").to_string())
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        validated_time(text).map(Value::String)
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
        "time".to_string()
    }

    fn canonical_form(&self) -> String {
        "(time)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_iso_times() {
        let resolver = Resolver::new();
        for text in ["10:05:59", "10:05", "10:05:59.123", "10:05:59Z", "10:05:59+05:30"] {
            assert!(
                TimePattern.matches(&Value::from(text), &resolver).is_success(),
                "{} should be a time",
                text
            );
        }
    }

    #[test]
    fn test_rejects_malformed_times() {
        let resolver = Resolver::new();
        for text in ["25:00:00", "10:61", "noon", "10:05:59 PM"] {
            assert!(TimePattern.matches(&Value::from(text), &resolver).is_failure(), "{}", text);
        }
        let result = TimePattern.matches(&Value::from(10), &resolver);
        assert_eq!(
            result.as_failure().map(|f| f.messages.clone()),
            Some(vec!["Time types can only be represented using strings".to_string()])
        );
    }

    #[test]
    fn test_generated_time_matches() {
        let resolver = Resolver::new();
        assert!(TimePattern.matches(&TimePattern.generate(&resolver), &resolver).is_success());
    }
}
