//! Security schemes
//!
//! Request-level authentication requirements (bearer tokens, API keys). They
//! share the pattern engine's `MatchResult`/`Resolver` vocabulary and are
//! invoked by the HTTP layer around body and header matching.

pub mod api_key;
pub mod bearer;

pub use api_key::{ApiKeyLocation, ApiKeySecurityScheme};
pub use bearer::BearerSecurityScheme;

use std::collections::BTreeMap;
use std::fmt;

use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::row::Row;
use crate::value::Value;

/// The parts of an HTTP request security schemes inspect
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Value,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: Value::String(String::new()),
        }
    }
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Header lookup; header names are case-insensitive
    pub fn header(&self, name: &str) -> Option<(&str, &str)> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self
    }

    /// Replace any existing header of the same name
    pub fn with_security_header(self, name: &str, value: impl Into<String>) -> Self {
        self.without_header(name).with_header(name, value)
    }
}

/// An authentication requirement on a request
pub trait SecurityScheme: fmt::Debug + Send + Sync {
    fn matches(&self, request: &HttpRequest, resolver: &Resolver) -> MatchResult;

    /// Add the credential, generating one if none is configured
    fn add_to(&self, request: HttpRequest, resolver: &Resolver) -> HttpRequest;

    fn remove_param(&self, request: HttpRequest) -> HttpRequest;

    /// Does an example row supply the credential?
    fn is_in_row(&self, row: &Row) -> bool;

    fn is_in_request(&self, request: &HttpRequest) -> bool;

    /// Carry the credential from `original` over to `new`
    fn copy_from_to(&self, original: &HttpRequest, new: HttpRequest) -> HttpRequest;

    fn header_key(&self) -> Option<&str>;
}
