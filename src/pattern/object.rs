//! JSON objects with named fields
//!
//! A key ending in `?` is optional; the `?` is not part of the key on the
//! wire.

use std::collections::BTreeMap;

use tracing::debug;

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::mismatch::{mismatch_result, mismatch_text_failure};
use crate::negative::NegativePatternConfiguration;
use crate::pattern::{ExactValuePattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPattern {
    pub fields: BTreeMap<String, Pattern>,
    pub type_alias: Option<String>,
    pub extensions: BTreeMap<String, serde_json::Value>,
}

pub fn is_optional(key: &str) -> bool {
    key.ends_with('?')
}

/// Key as it appears in data
pub fn key_name(key: &str) -> &str {
    key.strip_suffix('?').unwrap_or(key)
}

impl ObjectPattern {
    pub fn new<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Pattern)>,
        K: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, p)| (k.into(), p)).collect(),
            ..Self::default()
        }
    }

    pub fn with_type_alias(mut self, alias: impl Into<String>) -> Self {
        self.type_alias = Some(alias.into());
        self
    }

    /// Declared key and pattern for a data key
    pub fn field(&self, name: &str) -> Option<(&String, &Pattern)> {
        self.fields
            .get_key_value(name)
            .or_else(|| self.fields.get_key_value(&format!("{}?", name)))
    }

    fn has_optional_keys(&self) -> bool {
        self.fields.keys().any(|k| is_optional(k))
    }

    fn with_fields(&self, fields: BTreeMap<String, Pattern>) -> Pattern {
        ObjectPattern {
            fields,
            type_alias: self.type_alias.clone(),
            extensions: self.extensions.clone(),
        }
        .into()
    }

    /// Row-driven options for one field
    fn field_options(&self, key: &str, pattern: &Pattern, row: &Row, resolver: &Resolver) -> Vec<ReturnValue<Pattern>> {
        let name = key_name(key);
        match row.get_field(name) {
            Some(text) if !matches!(pattern, Pattern::Object(_) | Pattern::List(_)) => {
                let exact = pattern
                    .parse(text, resolver)
                    .map(|value| Pattern::from(ExactValuePattern::new(value)));
                vec![ReturnValue::from_result(exact)]
            }
            _ => pattern
                .new_based_on_row(row, &resolver.update_lookup_path(name))
                .to_vec(),
        }
    }

    /// Which optional keys to include: all of them, and none of them unless
    /// the row binds one.
    fn key_sets(&self, row: &Row) -> Vec<bool> {
        let row_binds_optional = self
            .fields
            .keys()
            .any(|k| is_optional(k) && row.contains_field(key_name(k)));
        if self.has_optional_keys() && !row_binds_optional {
            vec![true, false]
        } else {
            vec![true]
        }
    }

    /// First positive variation of every required field
    fn required_baseline(&self, row: &Row, resolver: &Resolver) -> BTreeMap<String, Pattern> {
        self.fields
            .iter()
            .filter(|(key, _)| !is_optional(key))
            .map(|(key, pattern)| {
                let chosen = self
                    .field_options(key, pattern, row, resolver)
                    .into_iter()
                    .find_map(ReturnValue::into_value)
                    .unwrap_or_else(|| pattern.clone());
                (key.clone(), chosen)
            })
            .collect()
    }
}

// =============================================================================
// Cartesian product of field options
// =============================================================================

struct Product<T> {
    columns: Vec<(String, Vec<T>)>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<T> Product<T> {
    fn new(columns: Vec<(String, Vec<T>)>) -> Self {
        let exhausted = columns.iter().any(|(_, options)| options.is_empty());
        let indices = vec![0; columns.len()];
        Self {
            columns,
            indices,
            exhausted,
        }
    }
}

impl<T: Clone> Iterator for Product<T> {
    type Item = Vec<(String, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = self
            .columns
            .iter()
            .zip(&self.indices)
            .map(|((name, options), i)| (name.clone(), options[*i].clone()))
            .collect();

        self.exhausted = true;
        for (position, (_, options)) in self.columns.iter().enumerate().rev() {
            self.indices[position] += 1;
            if self.indices[position] < options.len() {
                self.exhausted = false;
                break;
            }
            self.indices[position] = 0;
        }
        Some(item)
    }
}

/// Fold one combination of field outcomes into a single object outcome
fn combine(this: &ObjectPattern, combination: Vec<(String, ReturnValue<Pattern>)>) -> ReturnValue<Pattern> {
    let mut fields = BTreeMap::new();
    let mut details = Vec::new();
    for (key, outcome) in combination {
        let name = key_name(&key).to_string();
        match outcome {
            ReturnValue::HasValue { value, details: field_details } => {
                details.extend(field_details.iter().map(|d| d.add_details("", &name)));
                fields.insert(name, value);
            }
            ReturnValue::HasFailure(failure) => return ReturnValue::HasFailure(failure.breadcrumb(name)),
        }
    }
    ReturnValue::HasValue {
        value: this.with_fields(fields),
        details,
    }
}

impl PatternOps for ObjectPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        let map = match sample {
            Value::Object(map) => map,
            other => return mismatch_result("json object", other, resolver.mismatch_messages.as_ref()),
        };
        let messages = resolver.mismatch_messages.as_ref();

        let mut results = Vec::new();
        for (key, pattern) in &self.fields {
            let name = key_name(key);
            let result = match map.get(name) {
                Some(value) => pattern.matches(value, &resolver.update_lookup_path(name)),
                None if is_optional(key) || resolver.mock_mode => MatchResult::Success,
                None => MatchResult::failure(messages.expected_key_was_missing("key", name)),
            };
            results.push(result.breadcrumb(name));
        }
        for key in map.keys().filter(|k| self.field(k).is_none()) {
            results.push(MatchResult::failure(messages.unexpected_key("key", key)).breadcrumb(key.as_str()));
        }
        MatchResult::all(results)
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        let fields = self
            .fields
            .iter()
            .filter(|(key, pattern)| {
                !(is_optional(key) && matches!(pattern, Pattern::Deferred(d) if resolver.is_expanding(&d.pattern_name)))
            })
            .map(|(key, pattern)| {
                let name = key_name(key);
                (name.to_string(), resolver.generate(name, pattern))
            })
            .collect();
        Value::Object(fields)
    }

    fn parse(&self, text: &str, resolver: &Resolver) -> Result<Value> {
        match Value::from_json_str(text)? {
            value @ Value::Object(_) => Ok(value),
            _ => Err(ContractError::Mismatch(mismatch_text_failure(
                "json object",
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
        let other = match other {
            Pattern::Object(other) => other,
            other => return encompass::type_mismatch(&this, other),
        };

        let messages = tr.mismatch_messages.as_ref();
        let mut results = Vec::new();
        for (key, this_field) in &self.fields {
            let name = key_name(key);
            let result = match other.field(name) {
                Some((other_key, _)) if !is_optional(key) && is_optional(other_key) => MatchResult::failure(format!(
                    "Expected key named \"{}\" to be mandatory, but it is optional",
                    name
                )),
                Some((_, other_field)) => this_field.encompasses(other_field, tr, or, stack),
                None if is_optional(key) => MatchResult::Success,
                None => MatchResult::failure(messages.expected_key_was_missing("key", name)),
            };
            results.push(result.breadcrumb(name));
        }
        for other_key in other.fields.keys() {
            let name = key_name(other_key);
            if self.field(name).is_none() {
                results.push(MatchResult::failure(messages.unexpected_key("key", name)).breadcrumb(name));
            }
        }
        MatchResult::all(results)
    }

    fn new_based_on_row(&self, row: &Row, resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        let this = self.clone();
        let row = row.clone();
        let resolver = resolver.clone();
        Variations::new(move || {
            let this = this.clone();
            let columns_for = |include_optional: bool| -> Vec<(String, Vec<ReturnValue<Pattern>>)> {
                this.fields
                    .iter()
                    .filter(|(key, _)| include_optional || !is_optional(key))
                    .map(|(key, pattern)| (key.clone(), this.field_options(key, pattern, &row, &resolver)))
                    .collect()
            };
            let products: Vec<Product<ReturnValue<Pattern>>> =
                this.key_sets(&row).into_iter().map(|set| Product::new(columns_for(set))).collect();
            products
                .into_iter()
                .flatten()
                .map(move |combination| combine(&this, combination))
        })
    }

    fn new_based_on(&self, resolver: &Resolver) -> Variations<Pattern> {
        let this = self.clone();
        let resolver = resolver.clone();
        Variations::new(move || {
            let this = this.clone();
            let columns_for = |include_optional: bool| -> Vec<(String, Vec<Pattern>)> {
                this.fields
                    .iter()
                    .filter(|(key, _)| include_optional || !is_optional(key))
                    .map(|(key, pattern)| {
                        let name = key_name(key);
                        (name.to_string(), pattern.new_based_on(&resolver.update_lookup_path(name)).to_vec())
                    })
                    .collect()
            };
            let products: Vec<Product<Pattern>> = this
                .key_sets(&Row::empty())
                .into_iter()
                .map(|set| Product::new(columns_for(set)))
                .collect();
            products
                .into_iter()
                .flatten()
                .map(move |combination| this.with_fields(combination.into_iter().collect()))
        })
    }

    /// One field mutated at a time; each required key also dropped once
    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        let baseline = self.required_baseline(row, resolver);
        let mut parts = Vec::new();

        for (key, pattern) in &self.fields {
            let name = key_name(key).to_string();
            let this = self.clone();
            let with_negative = baseline.clone();
            let crumb = name.clone();
            let mutated = pattern
                .negative_based_on(row, &resolver.update_lookup_path(&name), config)
                .map(move |negative| {
                    let mut fields = with_negative.clone();
                    negative
                        .map(|pattern| {
                            fields.insert(crumb.clone(), pattern);
                            this.with_fields(fields)
                        })
                        .add_details("", &crumb)
                });
            parts.push(mutated);

            if !is_optional(key) {
                let mut fields = baseline.clone();
                fields.remove(key);
                debug!(key = %name, "Negative variation without required key");
                let missing = ReturnValue::has_value(self.with_fields(fields))
                    .add_details(&format!("mandatory key \"{}\" omitted", name), &name);
                parts.push(Variations::single(missing));
            }
        }
        Variations::concat(parts)
    }

    fn type_name(&self) -> String {
        "json object".to_string()
    }

    fn canonical_form(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(key, pattern)| format!("{}: {}", key, pattern.canonical_form()))
            .collect();
        format!("{{{}}}", fields.join(", "))
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
    use crate::pattern::{BooleanPattern, NullPattern, NumberPattern, StringPattern};

    fn person() -> ObjectPattern {
        ObjectPattern::new([
            ("id", Pattern::from(NumberPattern::default())),
            ("name", Pattern::from(StringPattern::default())),
            ("nickname?", Pattern::from(StringPattern::default())),
        ])
    }

    fn json(text: &str) -> Value {
        Value::from_json_str(text).unwrap()
    }

    #[test]
    fn test_matches_with_and_without_optional_keys() {
        let resolver = Resolver::new();
        assert!(person().matches(&json(r#"{"id": 1, "name": "Jane"}"#), &resolver).is_success());
        assert!(person()
            .matches(&json(r#"{"id": 1, "name": "Jane", "nickname": "J"}"#), &resolver)
            .is_success());
    }

    #[test]
    fn test_missing_and_unexpected_keys() {
        let resolver = Resolver::new();
        let result = person().matches(&json(r#"{"id": 1, "extra": true}"#), &resolver);
        let report = result.to_report();
        assert!(report.contains(r#"Expected key named "name" was missing"#), "{}", report);
        assert!(report.contains(r#"Key named "extra" was unexpected"#), "{}", report);
        assert!(report.contains(">> name"), "{}", report);
    }

    #[test]
    fn test_mock_mode_relaxes_missing_keys() {
        let resolver = Resolver::new().with_mock_mode(true);
        assert!(person().matches(&json(r#"{"id": 1}"#), &resolver).is_success());
    }

    #[test]
    fn test_nested_failure_breadcrumbs() {
        let resolver = Resolver::new();
        let outer = ObjectPattern::new([("person", Pattern::from(person()))]);
        let result = outer.matches(&json(r#"{"person": {"id": "x", "name": "Jane"}}"#), &resolver);
        let details = result.as_failure().map(|f| f.details()).unwrap_or_default();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].breadcrumbs(), "person.id");
    }

    #[test]
    fn test_generated_object_matches() {
        let resolver = Resolver::new();
        let value = person().generate(&resolver);
        assert!(person().matches(&value, &resolver).is_success());
    }

    #[test]
    fn test_row_values_become_exact() {
        let resolver = Resolver::new();
        let variations = person()
            .new_based_on_row(&Row::new(["id"], ["10"]), &resolver)
            .to_vec();
        // Both with and without the optional key
        assert_eq!(variations.len(), 2);
        for variation in &variations {
            match variation.value() {
                Some(Pattern::Object(object)) => {
                    assert_eq!(object.fields.get("id"), Some(&Pattern::from(ExactValuePattern::new(10))));
                    assert!(object.fields.keys().all(|k| !is_optional(k)));
                }
                other => panic!("unexpected variation {:?}", other),
            }
        }
    }

    #[test]
    fn test_row_value_that_does_not_parse_is_reported() {
        let resolver = Resolver::new();
        let variations = person()
            .new_based_on_row(&Row::new(["id"], ["ten"]), &resolver)
            .to_vec();
        assert!(variations.iter().all(ReturnValue::is_failure));
    }

    #[test]
    fn test_variations_are_cartesian() {
        let resolver = Resolver::new();
        let pattern = ObjectPattern::new([
            ("a", Pattern::from(NumberPattern::default())),
            ("b", Pattern::from(NumberPattern::default())),
        ]);
        // Three options per number field
        assert_eq!(pattern.new_based_on_row(&Row::empty(), &resolver).to_vec().len(), 9);
        assert_eq!(pattern.new_based_on(&resolver).to_vec().len(), 1);
    }

    #[test]
    fn test_negatives_are_rejected() {
        let resolver = Resolver::new();
        let pattern = ObjectPattern::new([
            ("id", Pattern::from(NumberPattern::default())),
            ("active", Pattern::from(BooleanPattern::default())),
            ("note?", Pattern::from(NullPattern)),
        ]);
        let negatives = pattern
            .negative_based_on(&Row::empty(), &resolver, &NegativePatternConfiguration::default())
            .to_vec();
        assert!(!negatives.is_empty());
        for negative in negatives.iter().filter_map(ReturnValue::value) {
            let value = negative.generate(&resolver);
            assert!(pattern.matches(&value, &resolver).is_failure(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_encompasses_fields() {
        let resolver = Resolver::new();
        let this: Pattern = person().into();
        let stricter: Pattern = ObjectPattern::new([
            ("id", Pattern::from(NumberPattern::default())),
            ("name", Pattern::from(StringPattern::default())),
        ])
        .into();
        assert!(this.check_encompasses(&stricter, &resolver, &resolver).is_success());

        let optional_name: Pattern = ObjectPattern::new([
            ("id", Pattern::from(NumberPattern::default())),
            ("name?", Pattern::from(StringPattern::default())),
        ])
        .into();
        assert!(this.check_encompasses(&optional_name, &resolver, &resolver).is_failure());

        let wrong_type: Pattern = ObjectPattern::new([
            ("id", Pattern::from(StringPattern::default())),
            ("name", Pattern::from(StringPattern::default())),
        ])
        .into();
        let result = this.check_encompasses(&wrong_type, &resolver, &resolver);
        let details = result.as_failure().map(|f| f.details()).unwrap_or_default();
        assert_eq!(details[0].breadcrumbs(), "id");
    }
}
