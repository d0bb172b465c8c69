//! Failure reports
//!
//! `ValueDetails` accumulates messages and breadcrumbs as a check unwinds:
//! the innermost step adds its segment first, each caller adds its own on
//! return. Rendering reverses the stack so paths read outer → inner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Messages and breadcrumbs gathered for one failing location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDetails {
    pub messages: Vec<String>,
    breadcrumb_data: Vec<String>,
}

impl ValueDetails {
    /// Returns a new accumulator with the message and segment appended.
    /// Blank entries are dropped.
    pub fn add_details(&self, message: &str, breadcrumb: &str) -> ValueDetails {
        ValueDetails {
            messages: add_non_blank(&self.messages, message),
            breadcrumb_data: add_non_blank(&self.breadcrumb_data, breadcrumb),
        }
    }

    /// Dot-joined path, outermost first; list indices attach without a dot
    pub fn breadcrumbs(&self) -> String {
        self.breadcrumb_data
            .iter()
            .rev()
            .cloned()
            .collect::<Vec<_>>()
            .join(".")
            .replace(".[", "[")
    }

    /// Multi-line block: `>> path`, a blank line, then the indented messages
    pub fn comments(&self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }

        let body = self.messages.join("\n");
        let breadcrumbs = self.breadcrumbs();
        if breadcrumbs.is_empty() {
            return Some(body);
        }

        Some(format!(">> {}\n\n   {}", breadcrumbs, body))
    }
}

fn add_non_blank(list: &[String], item: &str) -> Vec<String> {
    let mut out = list.to_vec();
    if !item.trim().is_empty() {
        out.push(item.to_string());
    }
    out
}

/// `path message AND path message ...` on one line
pub fn single_line_description(details: &[ValueDetails]) -> String {
    details
        .iter()
        .filter_map(|d| {
            let message = d.messages.join(" ").trim().to_string();
            if message.is_empty() {
                None
            } else {
                Some(format!("{} {}", d.breadcrumbs(), message).trim().to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Rendered form of a failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub entries: Vec<ValueDetails>,
}

impl FailureReport {
    pub fn new(entries: Vec<ValueDetails>) -> Self {
        Self { entries }
    }

    pub fn single_line(&self) -> String {
        single_line_description(&self.entries)
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks: Vec<String> = self.entries.iter().filter_map(ValueDetails::comments).collect();
        write!(f, "{}", blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumbs_reverse_accumulation_order() {
        let details = ValueDetails::default()
            .add_details("Expected number", "age")
            .add_details("", "person");
        assert_eq!(details.breadcrumbs(), "person.age");
    }

    #[test]
    fn test_list_indices_attach_to_parent() {
        let details = ValueDetails::default()
            .add_details("Expected number", "[1]")
            .add_details("", "items");
        assert_eq!(details.breadcrumbs(), "items[1]");
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let details = ValueDetails::default().add_details("  ", "").add_details("", " ");
        assert!(details.messages.is_empty());
        assert_eq!(details.breadcrumbs(), "");
        assert_eq!(details.comments(), None);
    }

    #[test]
    fn test_comments_layout() {
        let details = ValueDetails::default()
            .add_details("Expected boolean, actual was \"maybe\"", "enabled")
            .add_details("", "settings");
        assert_eq!(
            details.comments().unwrap(),
            ">> settings.enabled\n\n   Expected boolean, actual was \"maybe\""
        );
    }

    #[test]
    fn test_single_line_description() {
        let a = ValueDetails::default().add_details("is mutated to null", "id");
        let b = ValueDetails::default().add_details("is missing", "name");
        let c = ValueDetails::default();
        assert_eq!(
            single_line_description(&[a, b, c]),
            "id is mutated to null AND name is missing"
        );
    }
}
