//! Homogeneous JSON arrays

use rand::Rng;

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::{mismatch_result, mismatch_text_failure};
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{NullPattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, PartialEq)]
pub struct ListPattern {
    pub pattern: Box<Pattern>,
    pub type_alias: Option<String>,
}

impl ListPattern {
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: Box::new(pattern.into()),
            type_alias: None,
        }
    }
}

fn index_crumb(index: usize) -> String {
    format!("[{}]", index)
}

impl PatternOps for ListPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::Array(items) => MatchResult::all(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.pattern.matches(item, resolver).breadcrumb(index_crumb(i))),
            ),
            other => mismatch_result("list", other, resolver.mismatch_messages.as_ref()),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        let count = rand::thread_rng().gen_range(1..=resolver.max_list_items.max(1));
        let items = (0..count).map(|_| self.pattern.generate(resolver)).collect();
        self.pattern.list_of(items, resolver)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        match Value::from_json_str(text)? {
            value @ Value::Array(_) => Ok(value),
            _ => Err(ContractError::Mismatch(mismatch_text_failure(
                "list",
                text,
                resolver.mismatch_messages.as_ref(),
            ))),
        }
    }

    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        if let Some(result) = encompass::encompasses_wrapped(&this, other, tr, or, stack) {
            return result;
        }
        match other {
            Pattern::List(other) => self
                .pattern
                .encompasses(&other.pattern, tr, or, stack)
                .breadcrumb("[]"),
            _ => encompass::type_mismatch(&this, other),
        }
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        let alias = self.type_alias.clone();
        self.pattern.new_based_on_row(row, resolver).map(move |variation| {
            let alias = alias.clone();
            variation.map(|pattern| {
                Pattern::List(ListPattern {
                    pattern: Box::new(pattern),
                    type_alias: alias,
                })
            })
        })
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        let alias = self.type_alias.clone();
        self.pattern.new_based_on(resolver).map(move |pattern| {
            Pattern::List(ListPattern {
                pattern: Box::new(pattern),
                type_alias: alias.clone(),
            })
        })
    }

    /// Null, then lists whose items are all negatives of the item type
    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        let null = scalar_annotation(&self.clone().into(), vec![NullPattern.into()], row, resolver, config);
        let items = self
            .pattern
            .negative_based_on(row, resolver, config)
            .map(|negative| negative.map(|pattern| ListPattern::new(pattern).into()).add_details("", "[]"));
        null.chain(items)
    }

    fn type_name(&self) -> String {
        format!("list of {}", self.pattern.type_name())
    }

    fn canonical_form(&self) -> String {
        format!("(list of {})", self.pattern.type_name())
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{BooleanPattern, NumberPattern, StringPattern};

    #[test]
    fn test_items_are_checked_with_index_breadcrumbs() {
        let resolver = Resolver::new();
        let pattern = ListPattern::new(NumberPattern::default());
        let sample = Value::from_json_str(r#"[1, "two", 3]"#).unwrap();
        let result = pattern.matches(&sample, &resolver);
        let details = result.as_failure().map(|f| f.details()).unwrap_or_default();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].breadcrumbs(), "[1]");
    }

    #[test]
    fn test_generated_list_is_bounded() {
        let resolver = Resolver::new().with_generation_limits(5, 2);
        let pattern = ListPattern::new(StringPattern::default());
        for _ in 0..10 {
            match pattern.generate(&resolver) {
                Value::Array(items) => assert!((1..=2).contains(&items.len())),
                other => panic!("expected list, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negatives_are_null_then_wrapped_item_negatives() {
        let resolver = Resolver::new();
        let pattern = ListPattern::new(NumberPattern::default());
        let negatives: Vec<Pattern> = pattern
            .negative_based_on(&Row::empty(), &resolver, &NegativePatternConfiguration::default())
            .iter()
            .filter_map(ReturnValue::into_value)
            .collect();
        assert_eq!(negatives.first(), Some(&Pattern::from(NullPattern)));
        assert!(negatives.contains(&ListPattern::new(BooleanPattern::default()).into()));
        for negative in &negatives {
            assert!(pattern.matches(&negative.generate(&resolver), &resolver).is_failure());
        }
    }

    #[test]
    fn test_templates_are_accepted() {
        let resolver = Resolver::new();
        let pattern = ListPattern::new(NumberPattern::default());
        assert!(pattern.matches(&Value::from("$(items)"), &resolver).is_success());
        assert!(pattern.matches(&Value::from("items"), &resolver).is_failure());
    }

    #[test]
    fn test_list_encompassment_follows_items() {
        let resolver = Resolver::new();
        let numbers: Pattern = ListPattern::new(NumberPattern::double()).into();
        let integers: Pattern = ListPattern::new(NumberPattern::integer()).into();
        assert!(numbers.check_encompasses(&integers, &resolver, &resolver).is_success());
        assert!(integers.check_encompasses(&numbers, &resolver, &resolver).is_failure());
    }
}
