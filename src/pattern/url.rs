//! `(url)`: absolute URLs of a given scheme, or request paths

use std::fmt;

use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use url::{ParseError, Url};

use crate::encompass::{self, TypeStack};
use crate::error::{ContractError, Result};
use crate::negative::{scalar_annotation, NegativePatternConfiguration};
use crate::pattern::{row_variation_of_self, variation_of_self, NullPattern, Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::result::MatchResult;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::value::Value;
use crate::variations::Variations;

static PATH_BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse("http://localhost").ok());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlScheme {
    Http,
    #[default]
    Https,
    /// http or https
    Either,
    /// A path relative to the server root
    Path,
}

impl UrlScheme {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Either => "either http or https",
            Self::Path => "path",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::Http => "http://",
            Self::Https | Self::Either => "https://",
            Self::Path => "/",
        }
    }

    /// Does a normalised URL belong to this scheme?
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Http => url.starts_with("http://"),
            Self::Https => url.starts_with("https://"),
            Self::Either => url.starts_with("http://") || url.starts_with("https://"),
            Self::Path => url.starts_with('/'),
        }
    }

    /// Does every URL of `other` belong to this scheme?
    pub fn accepts(&self, other: UrlScheme) -> bool {
        *self == other || (*self == Self::Either && matches!(other, Self::Http | Self::Https))
    }
}

impl fmt::Display for UrlScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlPattern {
    pub scheme: UrlScheme,
    pub type_alias: Option<String>,
}

impl UrlPattern {
    pub fn new(scheme: UrlScheme) -> Self {
        Self {
            scheme,
            type_alias: None,
        }
    }
}

fn random_segment() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

fn normalize(text: &str) -> Result<String> {
    let invalid = |e: ParseError| ContractError::InvalidUrl {
        value: text.to_string(),
        reason: e.to_string(),
    };

    match Url::parse(text) {
        Ok(url) => Ok(url.to_string()),
        Err(ParseError::RelativeUrlWithoutBase) if text.starts_with('/') => {
            let base = PATH_BASE.as_ref().ok_or_else(|| invalid(ParseError::RelativeUrlWithoutBase))?;
            let joined = base.join(text).map_err(invalid)?;
            let mut path = joined.path().to_string();
            if let Some(query) = joined.query() {
                path.push('?');
                path.push_str(query);
            }
            Ok(path)
        }
        Err(e) => Err(invalid(e)),
    }
}

impl PatternOps for UrlPattern {
    fn matches(&self, sample: &Value, resolver: &Resolver) -> MatchResult {
        match sample {
            _ if sample.has_template() => MatchResult::Success,
            Value::String(text) => match self.parse(text, resolver) {
                Ok(Value::String(url)) if self.scheme.matches(&url) => MatchResult::Success,
                Ok(_) => MatchResult::failure(format!("Expected {} to be {}", text, self.scheme)),
                Err(e) => MatchResult::Failure(e.to_failure()),
            },
            _ => MatchResult::failure("URLs can only be held in strings."),
        }
    }

    fn generate(&self, resolver: &Resolver) -> Value {
        if let Some(url) = resolver.provide_string(&self.clone().into()) {
            return Value::String(url);
        }
        let url = match self.scheme {
            UrlScheme::Path => format!("/{}/{}", random_segment(), random_segment()),
            scheme => format!("{}{}.com/{}", scheme.prefix(), random_segment(), random_segment()),
        };
        Value::String(url)
    }

    fn parse(&self, text: &str, _resolver: &Resolver) -> Result<Value> {
        normalize(text).map(Value::String)
    }

    /// Schemes are part of a URL type's identity.
    fn encompasses(&self, other: &Pattern, tr: &Resolver, or: &Resolver, stack: &TypeStack) -> MatchResult {
        let this: Pattern = self.clone().into();
        if let Some(result) = encompass::encompasses_wrapped(&this, other, tr, or, stack) {
            return result;
        }
        match other {
            Pattern::Url(other) if self.scheme.accepts(other.scheme) => MatchResult::Success,
            Pattern::Url(other) => MatchResult::failure(format!("Expected {}, got {}", self.scheme, other.scheme)),
            _ => encompass::type_mismatch(&this, other),
        }
    }

    fn new_based_on_row(&self, _row: &Row, _resolver: &Resolver) -> Variations<ReturnValue<Pattern>> {
        row_variation_of_self(self.clone().into())
    }

    fn new_based_on(&self, _resolver: &Resolver) -> Variations<Pattern> {
        variation_of_self(self.clone().into())
    }

    fn negative_based_on(
        &self,
        row: &Row,
        resolver: &Resolver,
        config: &NegativePatternConfiguration,
    ) -> Variations<ReturnValue<Pattern>> {
        scalar_annotation(&self.clone().into(), vec![NullPattern.into()], row, resolver, config)
    }

    fn type_name(&self) -> String {
        "url".to_string()
    }

    fn canonical_form(&self) -> String {
        "(url)".to_string()
    }

    fn type_alias(&self) -> Option<&str> {
        self.type_alias.as_deref()
    }
}
