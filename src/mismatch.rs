//! Mismatch message formatting
//!
//! Failure text is pluggable so that callers (request matching, response
//! matching, stub loading) can phrase the same mismatch for their audience.

use std::fmt;

use crate::result::{Failure, MatchResult};
use crate::value::Value;

/// Formatter for failure text
pub trait MismatchMessages: fmt::Debug + Send + Sync {
    fn mismatch_message(&self, expected: &str, actual: &str) -> String {
        format!("Expected {}, actual was {}", expected, actual)
    }

    fn unexpected_key(&self, key_label: &str, key_name: &str) -> String {
        format!("{} named \"{}\" was unexpected", capitalize(key_label), key_name)
    }

    fn expected_key_was_missing(&self, key_label: &str, key_name: &str) -> String {
        format!("Expected {} named \"{}\" was missing", key_label.to_lowercase(), key_name)
    }
}

/// Default phrasing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMismatchMessages;

impl MismatchMessages for DefaultMismatchMessages {}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Failure for a value that is not of the expected type
pub fn mismatch_failure(expected: &str, actual: &Value, messages: &dyn MismatchMessages) -> Failure {
    Failure::new(messages.mismatch_message(expected, &describe_actual(actual)))
}

pub fn mismatch_result(expected: &str, actual: &Value, messages: &dyn MismatchMessages) -> MatchResult {
    MatchResult::Failure(mismatch_failure(expected, actual, messages))
}

/// Failure for literal text that could not be read as the expected type
pub fn mismatch_text_failure(expected: &str, text: &str, messages: &dyn MismatchMessages) -> Failure {
    Failure::new(messages.mismatch_message(expected, &format!("\"{}\"", text)))
}

fn describe_actual(actual: &Value) -> String {
    match actual {
        Value::Null => "null".to_string(),
        other => format!("{} {}", other.type_name(), other.display_value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages() {
        let messages = DefaultMismatchMessages;
        assert_eq!(messages.mismatch_message("boolean", "\"maybe\""), "Expected boolean, actual was \"maybe\"");
        assert_eq!(messages.unexpected_key("key", "extra"), "Key named \"extra\" was unexpected");
        assert_eq!(
            messages.expected_key_was_missing("Header", "Authorization"),
            "Expected header named \"Authorization\" was missing"
        );
    }

    #[test]
    fn test_mismatch_failure_describes_actual() {
        let failure = mismatch_failure("number", &Value::from("ten"), &DefaultMismatchMessages);
        assert_eq!(failure.messages, vec!["Expected number, actual was string \"ten\""]);

        let failure = mismatch_failure("string", &Value::Null, &DefaultMismatchMessages);
        assert_eq!(failure.messages, vec!["Expected string, actual was null"]);
    }
}
