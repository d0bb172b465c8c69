//! Error types for the pattern engine
//!
//! Matching and encompassing never fail with an error: expected invalidity is
//! data (`MatchResult::Failure`). `ContractError` is reserved for literal text
//! that cannot be parsed, malformed construction, and configuration problems.

use thiserror::Error;

use crate::result::{Failure, MatchResult};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ContractError>;

/// Pattern engine errors
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{}", .0.report())]
    Mismatch(Failure),

    #[error("Failed to parse {value}: {reason}")]
    Parse { value: String, reason: String },

    #[error("Invalid URL {value}: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Type {0} does not exist")]
    UnknownType(String),

    #[error("A union must contain at least one pattern")]
    EmptyUnion,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl ContractError {
    /// Shorthand for a parse error
    pub fn parse(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Convert this error into a match failure, keeping breadcrumbs when the
    /// error already carries one.
    pub fn to_failure(&self) -> Failure {
        match self {
            Self::Mismatch(failure) => failure.clone(),
            other => Failure::new(other.to_string()),
        }
    }
}

impl From<Failure> for ContractError {
    fn from(failure: Failure) -> Self {
        Self::Mismatch(failure)
    }
}

/// Run a fallible check and report any error as a match failure.
///
/// This is the boundary where parse errors stop propagating.
pub fn result_of<F>(check: F) -> MatchResult
where
    F: FnOnce() -> Result<MatchResult>,
{
    match check() {
        Ok(result) => result,
        Err(e) => MatchResult::Failure(e.to_failure()),
    }
}
