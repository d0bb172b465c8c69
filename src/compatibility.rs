//! Contract compatibility checking
//!
//! Validates that a new set of named types still accepts everything the old
//! set accepted, and reports the breaking changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encompass::TypeStack;
use crate::pattern::{Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;

/// Result of a compatibility check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// Whether the new types accept everything the old ones did
    pub is_compatible: bool,
    /// Whether this is a breaking change
    pub is_breaking: bool,
    /// List of changes detected
    pub changes: Vec<SchemaChange>,
    /// Summary of the compatibility check
    pub summary: String,
}

impl CompatibilityResult {
    /// Create a compatible result
    pub fn compatible(changes: Vec<SchemaChange>) -> Self {
        let summary = if changes.is_empty() {
            "No changes detected".to_string()
        } else {
            format!("{} compatible changes detected", changes.len())
        };
        Self {
            is_compatible: true,
            is_breaking: false,
            changes,
            summary,
        }
    }

    /// Create an incompatible result
    pub fn incompatible(changes: Vec<SchemaChange>, reason: impl Into<String>) -> Self {
        Self {
            is_compatible: false,
            is_breaking: true,
            changes,
            summary: reason.into(),
        }
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &SchemaChange> {
        self.changes.iter().filter(|c| c.is_breaking)
    }
}

/// A detected change between two versions of a named type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaChange {
    /// Type of change
    pub change_type: ChangeType,
    /// Type name, followed by the breadcrumb of the first failure for
    /// incompatible changes (e.g. "(Person).address.city")
    pub path: String,
    /// Old canonical form (if applicable)
    pub old_value: Option<String>,
    /// New canonical form (if applicable)
    pub new_value: Option<String>,
    /// Whether this change is breaking
    pub is_breaking: bool,
    /// Human-readable description
    pub description: String,
}

/// Type of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// A new named type was added
    TypeAdded,
    /// A named type was removed
    TypeRemoved,
    /// A named type's definition changed
    TypeChanged,
}

impl ChangeType {
    /// Check if this change type is typically breaking
    pub fn is_typically_breaking(&self) -> bool {
        matches!(self, ChangeType::TypeRemoved)
    }
}

/// Compatibility checker for sets of named types
#[derive(Debug, Clone)]
pub struct CompatibilityChecker {
    /// Strict mode - any change is considered breaking
    strict_mode: bool,
    /// Settings shared by both sides (mismatch messages, mock mode)
    base_resolver: Resolver,
}

impl CompatibilityChecker {
    /// Create a new compatibility checker
    pub fn new() -> Self {
        Self {
            strict_mode: false,
            base_resolver: Resolver::new(),
        }
    }

    /// Enable strict mode
    pub fn strict(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.base_resolver = resolver;
        self
    }

    /// Check that every type in `old` is still accepted by its counterpart in `new`
    pub fn check(&self, old: &BTreeMap<String, Pattern>, new: &BTreeMap<String, Pattern>) -> CompatibilityResult {
        let changes = self.detect_changes(old, new);
        let breaking_count = changes.iter().filter(|c| c.is_breaking).count();

        if self.strict_mode && !changes.is_empty() {
            CompatibilityResult::incompatible(changes, format!("Strict mode: {} breaking changes detected", breaking_count))
        } else if breaking_count > 0 {
            CompatibilityResult::incompatible(changes, format!("{} breaking changes detected", breaking_count))
        } else {
            CompatibilityResult::compatible(changes)
        }
    }

    /// Compare a single pair of patterns, each resolved against its own registry
    pub fn check_pattern(
        &self,
        old: &Pattern,
        new: &Pattern,
        old_types: &BTreeMap<String, Pattern>,
        new_types: &BTreeMap<String, Pattern>,
    ) -> MatchResult {
        let old_resolver = self.base_resolver.clone().with_patterns(old_types.clone());
        let new_resolver = self.base_resolver.clone().with_patterns(new_types.clone());
        new.encompasses(old, &new_resolver, &old_resolver, &TypeStack::new())
    }

    fn detect_changes(&self, old: &BTreeMap<String, Pattern>, new: &BTreeMap<String, Pattern>) -> Vec<SchemaChange> {
        let mut changes = Vec::new();

        // Check for removed types
        for (name, old_pattern) in old {
            if !new.contains_key(name) {
                warn!(type_name = %name, "Type was removed");
                changes.push(SchemaChange {
                    change_type: ChangeType::TypeRemoved,
                    path: name.clone(),
                    old_value: Some(old_pattern.canonical_form()),
                    new_value: None,
                    is_breaking: true,
                    description: format!("Type '{}' was removed", name),
                });
            }
        }

        // Check for added types
        for (name, new_pattern) in new {
            if !old.contains_key(name) {
                changes.push(SchemaChange {
                    change_type: ChangeType::TypeAdded,
                    path: name.clone(),
                    old_value: None,
                    new_value: Some(new_pattern.canonical_form()),
                    is_breaking: false,
                    description: format!("Type '{}' was added", name),
                });
            }
        }

        // Check changed types
        for (name, old_pattern) in old {
            let Some(new_pattern) = new.get(name) else {
                continue;
            };
            if old_pattern == new_pattern {
                continue;
            }

            debug!(type_name = %name, "Comparing changed type");
            let change = match self.check_pattern(old_pattern, new_pattern, old, new) {
                MatchResult::Success => SchemaChange {
                    change_type: ChangeType::TypeChanged,
                    path: name.clone(),
                    old_value: Some(old_pattern.canonical_form()),
                    new_value: Some(new_pattern.canonical_form()),
                    is_breaking: false,
                    description: format!("Type '{}' changed compatibly", name),
                },
                MatchResult::Failure(failure) => {
                    let details = failure.details();
                    let path = match details.first().map(|d| d.breadcrumbs()) {
                        Some(crumbs) if !crumbs.is_empty() => format!("{}.{}", name, crumbs),
                        _ => name.clone(),
                    };
                    let reason = failure.report().single_line();
                    warn!(type_name = %name, reason = %reason, "Breaking change");
                    SchemaChange {
                        change_type: ChangeType::TypeChanged,
                        path,
                        old_value: Some(old_pattern.canonical_form()),
                        new_value: Some(new_pattern.canonical_form()),
                        is_breaking: true,
                        description: format!("Type '{}' no longer accepts all old data: {}", name, reason),
                    }
                }
            };
            changes.push(change);
        }

        changes
    }
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::new()
    }
}
