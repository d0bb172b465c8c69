//! Unions: a value matches when any member matches

use std::collections::BTreeMap;

use tracing::debug;

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::mismatch_failure;
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{ExactValuePattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::{Failure, MatchResult};
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, PartialEq)]
pub struct AnyPattern {
    /// Never empty
    pub patterns: Vec<Pattern>,
    /// Row column that, when bound, pins the union to a literal
    pub key: Option<String>,
    pub type_alias: Option<String>,
    pub example: Option<String>,
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// Merge the extensions of several patterns; the first declaration of a key wins
pub fn extract_combined_extensions(patterns: &[Pattern]) -> BTreeMap<String, serde_json::Value> {
    let mut combined = BTreeMap::new();
    for pattern in patterns {
        for (key, value) in pattern.extensions() {
            combined.entry(key).or_insert(value);
        }
    }
    combined
}

impl AnyPattern {
    pub fn new(patterns: Vec<Pattern>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(ContractError::EmptyUnion);
        }
        Ok(Self::from_members(patterns))
    }

    /// Callers guarantee at least one member
    pub(crate) fn from_members(patterns: Vec<Pattern>) -> Self {
        let extensions = extract_combined_extensions(&patterns);
        Self {
            patterns,
            key: None,
            type_alias: None,
            example: None,
            extensions,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_type_alias(mut self, alias: impl Into<String>) -> Self {
        self.type_alias = Some(alias.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Add extensions declared on the union itself; these take precedence
    pub fn with_extensions(mut self, extensions: BTreeMap<String, serde_json::Value>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.patterns.iter().any(|p| matches!(p, Pattern::Null(_)))
    }

    /// Failure explaining why no member accepted `sample`
    pub(crate) fn member_failures(&self, sample: &Value, resolver: &Resolver) -> Option<Failure> {
        let mut causes = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            match pattern.matches(sample, resolver) {
                MatchResult::Success => return None,
                MatchResult::Failure(failure) => causes.push(failure),
            }
        }
        let summary = mismatch_failure(&self.type_name(), sample, resolver.mismatch_messages.as_ref());
        Some(Failure::with_causes(summary.messages.into_iter().next(), causes))
    }
}

impl PatternOps for AnyPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match self.member_failures(sample, resolver) {
            None => MatchResult::Success,
            Some(failure) => {
                debug!(union = %self.type_name(), "No union member matched");
                MatchResult::Failure(failure)
            }
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        if let Some(example) = resolver.resolve_example(self.example.as_deref(), &self.clone().into()) {
            return example;
        }
        self.patterns
            .iter()
            .find(|p| !matches!(p, Pattern::Null(_)))
            .or_else(|| self.patterns.first())
            .map(|p| p.generate(resolver))
            .unwrap_or(Value::Null)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        let mut causes = Vec::new();
        for pattern in &self.patterns {
            match pattern.parse(text, resolver) {
                Ok(value) => return Ok(value),
                Err(e) => causes.push(e.to_failure()),
            }
        }
        Err(ContractError::Mismatch(Failure::with_causes(
            Some(format!("Failed to parse \"{}\" as {}", text, self.type_name())),
            causes,
        )))
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        if let Some(result) = encompass::encompasses_wrapped(&this, other, tr, or, stack) {
            return result;
        }

        let mut causes = Vec::new();
        for pattern in &self.patterns {
            match pattern.encompasses(other, tr, or, stack) {
                MatchResult::Success => return MatchResult::Success,
                MatchResult::Failure(failure) => causes.push(failure),
            }
        }
        MatchResult::Failure(Failure::with_causes(
            Some(format!("Expected {}, got {}", self.type_name(), other.type_name())),
            causes,
        ))
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        if let Some(text) = self.key.as_deref().and_then(|key| row.get_field(key)) {
            let parsed = self.parse(text, resolver).map(|value| ExactValuePattern::new(value).into());
            return Variations::single(ReturnValue::from_result(parsed));
        }
        Variations::concat(
            self.patterns
                .iter()
                .map(|pattern| pattern.new_based_on_row(row, resolver))
                .collect(),
        )
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        Variations::concat(self.patterns.iter().map(|pattern| pattern.new_based_on(resolver)).collect())
    }

    /// Member negatives that no other member would accept
    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        let this = self.clone();
        let check_resolver = resolver.clone();
        Variations::concat(
            self.patterns
                .iter()
                .map(|pattern| pattern.negative_based_on(row, resolver, config))
                .collect(),
        )
        .filter(move |negative| match negative.value() {
            Some(pattern) => this
                .matches(&pattern.generate(&check_resolver), &check_resolver)
                .is_failure(),
            None => true,
        })
    }

    fn type_name(&self) -> String {
        let names: Vec<String> = self.patterns.iter().map(|p| p.type_name()).collect();
        format!("({})", names.join(" or "))
    }

    fn canonical_form(&self) -> String {
        self.type_name()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }

    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        self.extensions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{NullPattern, NumberPattern, ObjectPattern, StringPattern};
    use serde_json::json;

    fn string_or_number() -> AnyPattern {
        AnyPattern::new(vec![StringPattern::default().into(), NumberPattern::default().into()]).unwrap()
    }

    #[test]
    fn test_empty_union_is_rejected() {
        assert!(matches!(AnyPattern::new(vec![]), Err(ContractError::EmptyUnion)));
    }

    #[test]
    fn test_matches_any_member() {
        let resolver = Resolver::new();
        let union = string_or_number();
        assert!(union.matches(&Value::from("x"), &resolver).is_success());
        assert!(union.matches(&Value::from(1), &resolver).is_success());
    }

    #[test]
    fn test_failure_lists_every_member() {
        let resolver = Resolver::new();
        let result = string_or_number().matches(&Value::Boolean(true), &resolver);
        let failure = result.as_failure().cloned().unwrap_or_default();
        assert_eq!(failure.causes.len(), 2);
        assert_eq!(failure.details().len(), 2);
    }

    #[test]
    fn test_nullable_generation_prefers_a_value() {
        let resolver = Resolver::new();
        let nullable = AnyPattern::new(vec![NullPattern.into(), StringPattern::default().into()]).unwrap();
        assert!(nullable.is_nullable());
        assert!(matches!(nullable.generate(&resolver), Value::String(_)));
    }

    #[test]
    fn test_parse_tries_members_in_order() {
        let resolver = Resolver::new();
        let union = AnyPattern::new(vec![NumberPattern::default().into(), StringPattern::default().into()]).unwrap();
        assert_eq!(union.parse("10", &resolver).unwrap(), Value::from(10));
        assert_eq!(union.parse("ten", &resolver).unwrap(), Value::from("ten"));
    }

    #[test]
    fn test_negatives_exclude_values_other_members_accept() {
        let resolver = Resolver::new();
        let union = string_or_number();
        let negatives = union
            .negative_based_on(&Row::empty(), &resolver, &NegativePatternConfiguration::default())
            .to_vec();
        assert!(!negatives.is_empty());
        for negative in negatives.iter().filter_map(ReturnValue::value) {
            assert!(union.matches(&negative.generate(&resolver), &resolver).is_failure());
        }
    }

    #[test]
    fn test_row_key_pins_the_union() {
        let resolver = Resolver::new();
        let union = string_or_number().with_key("id");
        let variations = union
            .new_based_on_row(&Row::new(["id"], ["10"]), &resolver)
            .to_vec();
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].value(), Some(&Pattern::from(ExactValuePattern::new(10))));
    }

    #[test]
    fn test_extensions_are_merged() {
        let mut first = ObjectPattern::new([("a", Pattern::from(StringPattern::default()))]);
        first.extensions.insert("x-owner".to_string(), json!("billing"));
        let mut second = ObjectPattern::new([("b", Pattern::from(StringPattern::default()))]);
        second.extensions.insert("x-owner".to_string(), json!("orders"));
        second.extensions.insert("x-tier".to_string(), json!(1));

        let union = AnyPattern::new(vec![first.into(), second.into()]).unwrap();
        let extensions = union.extensions();
        assert_eq!(extensions.get("x-owner"), Some(&json!("billing")));
        assert_eq!(extensions.get("x-tier"), Some(&json!(1)));
    }

    #[test]
    fn test_union_encompasses_union() {
        let resolver = Resolver::new();
        let wide: Pattern = AnyPattern::new(vec![
            StringPattern::default().into(),
            NumberPattern::default().into(),
            NullPattern.into(),
        ])
        .unwrap()
        .into();
        let narrow: Pattern = string_or_number().into();
        assert!(wide.check_encompasses(&narrow, &resolver, &resolver).is_success());
        assert!(narrow.check_encompasses(&wide, &resolver, &resolver).is_failure());
    }
}
