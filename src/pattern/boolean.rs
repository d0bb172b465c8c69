//! `(boolean)`

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::{mismatch_result, mismatch_text_failure};
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{row_variation_of_self, variation_of_self, NullPattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanPattern {
    pub example: Option<String>,
}

impl BooleanPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_example(example: impl Into<String>) -> Self {
        Self {
            example: Some(example.into()),
        }
    }
}

/// A uniformly random boolean
pub fn random_boolean() -> Value {
    Value::Boolean(rand::random())
}

impl PatternOps for BooleanPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::Boolean(_) => MatchResult::Success,
            other => mismatch_result("boolean", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        resolver
            .resolve_example(self.example.as_deref(), &self.clone().into())
            .unwrap_or_else(random_boolean)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        match text.trim().to_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(ContractError::Mismatch(mismatch_text_failure(
                "boolean",
                text,
                resolver.mismatch_messages.as_ref(),
            ))),
        }
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        encompass::encompasses(&self.clone().into(), other, tr, or, stack)
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
        scalar_annotation(&self.clone().into(), vec![NullPattern.into()], row, resolver, config)
    }

    fn type_name(&self) -> String {
        "boolean".to_string()
    }

    fn canonical_form(&self) -> String {
        "(boolean)".to_string()
    }
}
