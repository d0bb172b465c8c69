//! API keys carried in a header or query parameter

use serde::{Deserialize, Serialize};

use crate::pattern::{Pattern, StringPattern};
use crate::resolver::Resolver;
use crate::result::{BreadCrumb, MatchResult};
use crate::row::Row;
use crate::security::{HttpRequest, SecurityScheme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

impl ApiKeyLocation {
    fn breadcrumb(&self) -> BreadCrumb {
        match self {
            Self::Header => BreadCrumb::Header,
            Self::Query => BreadCrumb::Query,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Query => "Query param",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeySecurityScheme {
    pub location: ApiKeyLocation,
    pub name: String,
    pub configured_key: Option<String>,
}

impl ApiKeySecurityScheme {
    pub fn header(name: impl Into<String>) -> Self {
        Self {
            location: ApiKeyLocation::Header,
            name: name.into(),
            configured_key: None,
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self {
            location: ApiKeyLocation::Query,
            name: name.into(),
            configured_key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.configured_key = Some(key.into());
        self
    }

    fn value_in<'a>(&self, request: &'a HttpRequest) -> Option<&'a str> {
        match self.location {
            ApiKeyLocation::Header => request.header(&self.name).map(|(_, value)| value),
            ApiKeyLocation::Query => request.query.get(&self.name).map(String::as_str),
        }
    }

    fn key_value(&self, resolver: &Resolver) -> String {
        match &self.configured_key {
            Some(key) => key.clone(),
            None => resolver
                .update_lookup_for_param(self.location.breadcrumb().as_str())
                .generate(&self.name, &Pattern::from(StringPattern::default()))
                .to_string_literal(),
        }
    }

    fn with_value(&self, request: HttpRequest, value: String) -> HttpRequest {
        match self.location {
            ApiKeyLocation::Header => request.with_security_header(&self.name, value),
            ApiKeyLocation::Query => request.with_query_param(self.name.clone(), value),
        }
    }
}

impl SecurityScheme for ApiKeySecurityScheme {
    fn matches(&self, request: &HttpRequest, resolver: &Resolver) -> MatchResult {
        if self.value_in(request).is_some() || resolver.mock_mode {
            return MatchResult::Success;
        }
        MatchResult::failure(
            resolver
                .mismatch_messages
                .expected_key_was_missing(self.location.label(), &self.name),
        )
        .breadcrumb(self.location.breadcrumb().with(&self.name))
    }

    fn add_to(&self, request: HttpRequest, resolver: &Resolver) -> HttpRequest {
        let value = self.key_value(resolver);
        self.with_value(request, value)
    }

    fn remove_param(&self, mut request: HttpRequest) -> HttpRequest {
        match self.location {
            ApiKeyLocation::Header => request.without_header(&self.name),
            ApiKeyLocation::Query => {
                request.query.remove(&self.name);
                request
            }
        }
    }

    fn is_in_row(&self, row: &Row) -> bool {
        match self.location {
            ApiKeyLocation::Header => row.column_names.iter().any(|c| c.eq_ignore_ascii_case(&self.name)),
            ApiKeyLocation::Query => row.contains_field(&self.name),
        }
    }

    fn is_in_request(&self, request: &HttpRequest) -> bool {
        self.value_in(request).is_some()
    }

    fn copy_from_to(&self, original: &HttpRequest, new: HttpRequest) -> HttpRequest {
        match self.value_in(original) {
            Some(value) => self.with_value(new, value.to_string()),
            None => new,
        }
    }

    fn header_key(&self) -> Option<&str> {
        match self.location {
            ApiKeyLocation::Header => Some(&self.name),
            ApiKeyLocation::Query => None,
        }
    }
}
