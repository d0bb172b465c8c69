//! Named references, resolved lazily through the resolver

use tracing::warn;

use crate::encompass::{self, TypeStack};
use crate::error::Result;
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{with_pattern_delimiters, without_pattern_delimiters, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

/// A reference such as `(Person)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredPattern {
    /// Always in `(Name)` form
    pub pattern_name: String,
}

impl DeferredPattern {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            pattern_name: with_pattern_delimiters(name.as_ref()),
        }
    }

    pub fn resolve(&self, resolver: &Resolver) -> Result<Pattern> {
        resolver.get_pattern(&self.pattern_name)
    }
}

impl PatternOps for DeferredPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match self.resolve(resolver) {
            Ok(pattern) => pattern.matches(sample, resolver),
            Err(e) => MatchResult::Failure(e.to_failure()),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        let Some(inner) = resolver.enter_pattern(&self.pattern_name) else {
            warn!(pattern = %self.pattern_name, "Cannot generate a value for a type that requires itself");
            return Value::Null;
        };
        match self.resolve(resolver) {
            Ok(pattern) => pattern.generate(&inner),
            Err(e) => {
                warn!(pattern = %self.pattern_name, error = %e, "Cannot generate a value for an unknown type");
                Value::Null
            }
        }
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        self.resolve(resolver)?.parse(text, resolver)
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        if let Pattern::Deferred(other) = other {
            if other.pattern_name == self.pattern_name && tr.patterns().get(&self.pattern_name) == or.patterns().get(&other.pattern_name) {
                return MatchResult::Success;
            }
            if stack.contains(&self.pattern_name, &other.pattern_name) {
                return MatchResult::Success;
            }
        }

        let this = match self.resolve(tr) {
            Ok(pattern) => pattern,
            Err(e) => return MatchResult::Failure(e.to_failure()),
        };

        match other {
            Pattern::Deferred(other_ref) => {
                let stack = stack.push(&self.pattern_name, &other_ref.pattern_name);
                match other_ref.resolve(or) {
                    Ok(resolved) => this.encompasses(&resolved, tr, or, &stack),
                    Err(e) => MatchResult::Failure(e.to_failure()),
                }
            }
            _ => encompass::encompasses_wrapped(&self.clone().into(), other, tr, or, stack)
                .unwrap_or_else(|| this.encompasses(other, tr, or, stack)),
        }
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        let Some(inner) = resolver.enter_pattern(&self.pattern_name) else {
            return Variations::empty();
        };
        match self.resolve(resolver) {
            Ok(pattern) => pattern.new_based_on_row(row, &inner),
            Err(e) => Variations::single(ReturnValue::has_failure(e.to_failure())),
        }
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        let Some(inner) = resolver.enter_pattern(&self.pattern_name) else {
            return Variations::empty();
        };
        match self.resolve(resolver) {
            Ok(pattern) => pattern.new_based_on(&inner),
            Err(e) => {
                warn!(pattern = %self.pattern_name, error = %e, "No variations for an unknown type");
                Variations::empty()
            }
        }
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        let Some(inner) = resolver.enter_pattern(&self.pattern_name) else {
            return Variations::empty();
        };
        match self.resolve(resolver) {
            Ok(pattern) => pattern.negative_based_on(row, &inner, config),
            Err(e) => Variations::single(ReturnValue::has_failure(e.to_failure())),
        }
    }

    fn list_of(&self, values: Vec<Value>, resolver: &Resolver) -> Value {
        match self.resolve(resolver) {
            Ok(pattern) => pattern.list_of(values, resolver),
            Err(_) => Value::Array(values),
        }
    }

    fn type_name(&self) -> String {
        without_pattern_delimiters(&self.pattern_name).to_string()
    }

    fn canonical_form(&self) -> String {
        self.pattern_name.clone()
    }
}
