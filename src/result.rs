//! Match outcomes
//!
//! `MatchResult` is the value every `matches`/`encompasses` call returns.
//! Failures carry the breadcrumb path to the offending field and compose
//! under AND so that sub-results can be aggregated without losing detail.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::{FailureReport, ValueDetails};

// =============================================================================
// Breadcrumbs
// =============================================================================

/// Well-known top-level breadcrumb segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreadCrumb {
    Request,
    Response,
    Header,
    Query,
    Path,
    Body,
    Parameters,
}

impl BreadCrumb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Response => "RESPONSE",
            Self::Header => "HEADER",
            Self::Query => "QUERY",
            Self::Path => "PATH",
            Self::Body => "BODY",
            Self::Parameters => "PARAMETERS",
        }
    }

    /// Breadcrumb for a named item under this segment, e.g. `HEADER.Authorization`
    pub fn with(&self, key: &str) -> String {
        format!("{}.{}", self.as_str(), key)
    }
}

impl fmt::Display for BreadCrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Failure
// =============================================================================

/// A failed match: messages, the path to where it happened, and any
/// sub-failures that explain it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable reasons, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Path segments relative to the parent failure, outer → inner
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumb: Vec<String>,
    /// Nested failures (union members, object fields, AND-combined results)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<Failure>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            messages: if message.is_empty() { Vec::new() } else { vec![message] },
            breadcrumb: Vec::new(),
            causes: Vec::new(),
        }
    }

    /// A failure explained entirely by its causes
    pub fn with_causes(message: Option<String>, causes: Vec<Failure>) -> Self {
        Self {
            messages: message.into_iter().collect(),
            breadcrumb: Vec::new(),
            causes,
        }
    }

    /// Prefix the path with an outer segment. Blank segments are ignored.
    pub fn breadcrumb(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if !segment.trim().is_empty() {
            self.breadcrumb.insert(0, segment);
        }
        self
    }

    /// AND-combine two failures; both paths are kept side by side.
    pub fn and(self, other: Failure) -> Failure {
        let mut causes = Vec::new();
        for failure in [self, other] {
            if failure.is_aggregate() {
                causes.extend(failure.causes);
            } else {
                causes.push(failure);
            }
        }
        Failure::with_causes(None, causes)
    }

    fn is_aggregate(&self) -> bool {
        self.messages.is_empty() && self.breadcrumb.is_empty() && !self.causes.is_empty()
    }

    /// One `ValueDetails` per leaf, with messages inherited from ancestors
    pub fn details(&self) -> Vec<ValueDetails> {
        let mut out = Vec::new();
        self.collect_details(&[], &[], &mut out);
        out
    }

    fn collect_details(&self, path: &[String], messages: &[String], out: &mut Vec<ValueDetails>) {
        let path: Vec<String> = path.iter().chain(self.breadcrumb.iter()).cloned().collect();
        let messages: Vec<String> = messages.iter().chain(self.messages.iter()).cloned().collect();

        if self.causes.is_empty() {
            let mut details = ValueDetails::default();
            for segment in path.iter().rev() {
                details = details.add_details("", segment);
            }
            for message in &messages {
                details = details.add_details(message, "");
            }
            out.push(details);
            return;
        }

        for cause in &self.causes {
            cause.collect_details(&path, &messages, out);
        }
    }

    pub fn report(&self) -> FailureReport {
        FailureReport::new(self.details())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report())
    }
}

// =============================================================================
// MatchResult
// =============================================================================

/// Outcome of a structural check
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Success,
    Failure(Failure),
}

impl MatchResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// AND semantics: a failure on either side wins, both failures are kept.
    pub fn and(self, other: MatchResult) -> MatchResult {
        match (self, other) {
            (Self::Success, other) => other,
            (failure, Self::Success) => failure,
            (Self::Failure(a), Self::Failure(b)) => Self::Failure(a.and(b)),
        }
    }

    /// AND over any number of results
    pub fn all<I>(results: I) -> MatchResult
    where
        I: IntoIterator<Item = MatchResult>,
    {
        results.into_iter().fold(Self::Success, MatchResult::and)
    }

    /// Prefix a failure's path with an outer segment
    pub fn breadcrumb(self, segment: impl Into<String>) -> MatchResult {
        match self {
            Self::Success => Self::Success,
            Self::Failure(f) => Self::Failure(f.breadcrumb(segment)),
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(f) => Some(f),
            Self::Success => None,
        }
    }

    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Self::Failure(f) => Some(f),
            Self::Success => None,
        }
    }

    /// Human-readable report; empty for success
    pub fn to_report(&self) -> String {
        match self {
            Self::Success => String::new(),
            Self::Failure(f) => f.report().to_string(),
        }
    }
}
