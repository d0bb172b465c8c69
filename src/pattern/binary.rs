//! `(binary)`: opaque byte content

use rand::rngs::OsRng;
use rand::RngCore;

use crate::encompass::{self, TypeStack};
use crate::error::Result;
use crate::mismatch::mismatch_result;
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{
    row_variation_of_self, variation_of_self, BooleanPattern, NullPattern, NumberPattern, Pattern, PatternOps,
};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

const GENERATED_BYTES: usize = 20;

/// Bytes travel as strings on the wire, so strings are accepted too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryPattern {
    pub type_alias: Option<String>,
}

impl PatternOps for BinaryPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::String(_) | Value::Binary(_) => MatchResult::Success,
            other => mismatch_result("binary", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, _resolver: &Resolver) -> Value {
        let mut bytes = vec![0u8; GENERATED_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Value::Binary(bytes)
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        Ok(Value::String(text.to_string()))
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
        scalar_annotation(
            &self.clone().into(),
            vec![
                NullPattern.into(),
                NumberPattern::default().into(),
                BooleanPattern::default().into(),
            ],
            row,
            resolver,
            config,
        )
    }

    fn type_name(&self) -> String {
        "binary".to_string()
    }

    fn canonical_form(&self) -> String {
        "(binary)".to_string()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}
