//! `Authorization: Bearer <token>`

use crate::pattern::{Pattern, StringPattern};
use crate::resolver::Resolver;
use crate::result::{BreadCrumb, MatchResult};
use crate::row::Row;
use crate::security::{HttpRequest, SecurityScheme};

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerSecurityScheme {
    pub configured_token: Option<String>,
}

impl BearerSecurityScheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            configured_token: Some(token.into()),
        }
    }

    fn authorization_value(&self, resolver: &Resolver) -> String {
        let token = match &self.configured_token {
            Some(token) => token.clone(),
            None => resolver
                .update_lookup_for_param(BreadCrumb::Header.as_str())
                .generate(AUTHORIZATION, &Pattern::from(StringPattern::default()))
                .to_string_literal(),
        };
        format!("Bearer {}", token)
    }
}

impl SecurityScheme for BearerSecurityScheme {
    fn matches(&self, request: &HttpRequest, resolver: &Resolver) -> MatchResult {
        let Some((_, value)) = request.header(AUTHORIZATION) else {
            if resolver.mock_mode {
                return MatchResult::Success;
            }
            return MatchResult::failure(resolver.mismatch_messages.expected_key_was_missing("Header", AUTHORIZATION))
                .breadcrumb(BreadCrumb::Header.with(AUTHORIZATION));
        };

        if !value.to_lowercase().starts_with("bearer") {
            return MatchResult::failure(format!("{} header must be prefixed with \"Bearer\"", AUTHORIZATION))
                .breadcrumb(BreadCrumb::Header.with(AUTHORIZATION));
        }

        MatchResult::Success
    }

    fn add_to(&self, request: HttpRequest, resolver: &Resolver) -> HttpRequest {
        request.with_security_header(AUTHORIZATION, self.authorization_value(resolver))
    }

    fn remove_param(&self, request: HttpRequest) -> HttpRequest {
        request.without_header(AUTHORIZATION)
    }

    fn is_in_row(&self, row: &Row) -> bool {
        row.column_names.iter().any(|c| c.eq_ignore_ascii_case(AUTHORIZATION))
    }

    fn is_in_request(&self, request: &HttpRequest) -> bool {
        request.has_header(AUTHORIZATION)
    }

    fn copy_from_to(&self, original: &HttpRequest, new: HttpRequest) -> HttpRequest {
        match original.header(AUTHORIZATION) {
            Some((_, value)) => new.with_security_header(AUTHORIZATION, value),
            None => new,
        }
    }

    fn header_key(&self) -> Option<&str> {
        Some(AUTHORIZATION)
    }
}
