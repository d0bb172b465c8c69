//! Contract Patterns
//!
//! A structural pattern type system for API contract testing. Patterns describe
//! the shape of request and response data and can:
//!
//! - **Match** concrete values, producing breadcrumbed failure reports
//! - **Generate** sample values that satisfy them
//! - **Parse** literal text into typed values
//! - **Encompass** other patterns, deciding backward compatibility
//! - **Vary** into test variations driven by example rows
//! - **Negate** into values that must be rejected
//!
//! ## Architecture
//!
//! ```text
//! Pattern ──► Resolver ──► registry of named types ("(Person)")
//!    │            │
//!    │            └─► dictionary, example policy, generation limits
//!    │
//!    ├─► MatchResult / Failure ──► FailureReport
//!    ├─► Variations<Pattern> (positive, driven by Row)
//!    └─► Variations<Pattern> (negative, via NegativePatternConfiguration)
//! ```

pub mod compatibility;
pub mod config;
pub mod encompass;
pub mod error;
pub mod mismatch;
pub mod negative;
pub mod pattern;
pub mod report;
pub mod resolver;
pub mod result;
pub mod return_value;
pub mod row;
pub mod security;
pub mod value;
pub mod variations;

pub use compatibility::{CompatibilityChecker, CompatibilityResult};
pub use config::EngineConfig;
pub use encompass::TypeStack;
pub use error::{ContractError, Result};
pub use mismatch::{DefaultMismatchMessages, MismatchMessages};
pub use negative::NegativePatternConfiguration;
pub use pattern::{Pattern, PatternOps};
pub use report::FailureReport;
pub use resolver::Resolver;
pub use result::{BreadCrumb, Failure, MatchResult};
pub use return_value::ReturnValue;
pub use row::Row;
pub use security::{HttpRequest, SecurityScheme};
pub use value::Value;
pub use variations::Variations;
