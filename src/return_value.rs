//! Generation outcomes
//!
//! Variation pipelines produce patterns that may themselves be invalid (an
//! example literal that does not parse, for instance). `ReturnValue` keeps
//! the reason alongside the branch instead of aborting the enumeration.

use crate::error::Result;
use crate::report::ValueDetails;
use crate::result::Failure;

/// A produced value with its provenance, or the reason it could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue<T> {
    HasValue { value: T, details: Vec<ValueDetails> },
    HasFailure(Failure),
}

impl<T> ReturnValue<T> {
    pub fn has_value(value: T) -> Self {
        Self::HasValue {
            value,
            details: Vec::new(),
        }
    }

    pub fn has_failure(failure: Failure) -> Self {
        Self::HasFailure(failure)
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::has_value(value),
            Err(e) => Self::HasFailure(e.to_failure()),
        }
    }

    /// Record why this branch exists (or why it failed) at `breadcrumb`
    pub fn add_details(self, message: &str, breadcrumb: &str) -> Self {
        match self {
            Self::HasValue { value, details } => {
                let details = if details.is_empty() {
                    vec![ValueDetails::default().add_details(message, breadcrumb)]
                } else {
                    details.iter().map(|d| d.add_details(message, breadcrumb)).collect()
                };
                Self::HasValue { value, details }
            }
            Self::HasFailure(failure) => {
                let failure = if message.trim().is_empty() {
                    failure
                } else {
                    Failure::with_causes(Some(message.to_string()), vec![failure])
                };
                Self::HasFailure(failure.breadcrumb(breadcrumb))
            }
        }
    }

    pub fn map<U, F>(self, f: F) -> ReturnValue<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::HasValue { value, details } => ReturnValue::HasValue {
                value: f(value),
                details,
            },
            Self::HasFailure(failure) => ReturnValue::HasFailure(failure),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::HasValue { value, .. } => Some(value),
            Self::HasFailure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::HasValue { value, .. } => Some(value),
            Self::HasFailure(_) => None,
        }
    }

    pub fn details(&self) -> &[ValueDetails] {
        match self {
            Self::HasValue { details, .. } => details,
            Self::HasFailure(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::HasFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;

    #[test]
    fn test_add_details_accumulates_outward() {
        let value = ReturnValue::has_value(1)
            .add_details("boolean mutated to null", "")
            .add_details("", "enabled")
            .add_details("", "settings");
        assert_eq!(value.details().len(), 1);
        assert_eq!(value.details()[0].breadcrumbs(), "settings.enabled");
        assert_eq!(value.details()[0].messages, vec!["boolean mutated to null"]);
    }

    #[test]
    fn test_failure_keeps_reason_and_path() {
        let value: ReturnValue<i32> = ReturnValue::from_result(Err(ContractError::parse("abc", "not a number")))
            .add_details("", "customerId");
        let ReturnValue::HasFailure(failure) = value else {
            panic!("Expected failure");
        };
        assert_eq!(failure.breadcrumb, vec!["customerId"]);
        assert!(failure.details()[0].messages[0].contains("not a number"));
    }

    #[test]
    fn test_map_preserves_details() {
        let value = ReturnValue::has_value(2).add_details("doubled", "").map(|n| n * 2);
        assert_eq!(value.value(), Some(&4));
        assert_eq!(value.details()[0].messages, vec!["doubled"]);
    }
}
