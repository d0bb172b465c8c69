//! Patterns bound to a column of an example row

use tracing::trace;

use crate::encompass::TypeStack;
use crate::error::Result;
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{ExactValuePattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// Behaves as `pattern`, except that a row carrying `key` pins it to the
/// literal in that column.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRowPattern {
    pub pattern: Box<Pattern>,
    pub key: String,
}

impl LookupRowPattern {
    pub fn new(pattern: impl Into<Pattern>, key: impl Into<String>) -> Self {
        Self {
            pattern: Box::new(pattern.into()),
            key: key.into(),
        }
    }
}

impl PatternOps for LookupRowPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        self.pattern.matches(sample, resolver)
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        self.pattern.generate(resolver)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        self.pattern.parse(text, resolver)
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let base = match self.pattern.as_ref() {
            Pattern::Deferred(deferred) => match deferred.resolve(tr) {
                Ok(resolved) => resolved,
                Err(e) => return MatchResult::Failure(e.to_failure()),
            },
            base => base.clone(),
        };
        base.encompasses(other, tr, or, stack)
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        match row.get_field(&self.key) {
            Some(text) => {
                trace!(key = %self.key, value = %text, "Pinning pattern to row value");
                let exact = self
                    .pattern
                    .parse(text, resolver)
                    .map(|value| Pattern::from(ExactValuePattern::new(value)));
                Variations::single(ReturnValue::from_result(exact))
            }
            None => self.pattern.new_based_on_row(row, resolver),
        }
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        self.pattern.new_based_on(resolver)
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        self.pattern.negative_based_on(row, resolver, config)
    }

    fn list_of(&self, values: Vec<Value>, resolver: &Resolver) -> Value {
        self.pattern.list_of(values, resolver)
    }

    fn type_name(&self) -> String {
        self.pattern.type_name()
    }

    fn canonical_form(&self) -> String {
        self.pattern.canonical_form()
    }

    fn type_alias(&self) -> Option<&str> {
        self.pattern.type_alias()
    }
}
