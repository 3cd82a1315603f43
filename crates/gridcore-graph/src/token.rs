#![forbid(unsafe_code)]

//! Domain-qualified dependency tokens.

use std::fmt;

/// Domain a dependency identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Domain {
    /// A row data field, addressed by path.
    #[default]
    Field,
    /// A derived column, addressed by name.
    Computed,
    /// Grid metadata, addressed by key.
    Meta,
}

impl Domain {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Computed => "computed",
            Self::Meta => "meta",
        }
    }

    fn from_prefix(s: &str) -> Option<Self> {
        match s {
            "field" => Some(Self::Field),
            "computed" => Some(Self::Computed),
            "meta" => Some(Self::Meta),
            _ => None,
        }
    }
}

/// A parsed dependency identifier: domain plus domain-specific payload
/// (field path, computed-column name, or meta key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyToken {
    domain: Domain,
    payload: String,
}

/// Failure to parse a raw token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParseError {
    /// The raw input that failed to parse.
    pub raw: String,
}

impl fmt::Display for TokenParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency token {:?} has an empty payload", self.raw)
    }
}

impl std::error::Error for TokenParseError {}

impl DependencyToken {
    /// A field token.
    #[must_use]
    pub fn field(path: impl Into<String>) -> Self {
        Self {
            domain: Domain::Field,
            payload: path.into(),
        }
    }

    /// A computed-column token.
    #[must_use]
    pub fn computed(name: impl Into<String>) -> Self {
        Self {
            domain: Domain::Computed,
            payload: name.into(),
        }
    }

    /// A metadata token.
    #[must_use]
    pub fn meta(key: impl Into<String>) -> Self {
        Self {
            domain: Domain::Meta,
            payload: key.into(),
        }
    }

    /// Parse a raw token string.
    ///
    /// A `domain:payload` prefix selects the domain; un-prefixed tokens
    /// (including unknown prefixes, which are just payload text containing
    /// a colon) fall back to `default_domain`. An empty payload is a parse
    /// error.
    pub fn parse(raw: &str, default_domain: Domain) -> Result<Self, TokenParseError> {
        let (domain, payload) = match raw.split_once(':') {
            Some((prefix, rest)) => match Domain::from_prefix(prefix) {
                Some(domain) => (domain, rest),
                None => (default_domain, raw),
            },
            None => (default_domain, raw),
        };
        if payload.trim().is_empty() {
            return Err(TokenParseError {
                raw: raw.to_string(),
            });
        }
        Ok(Self {
            domain,
            payload: payload.to_string(),
        })
    }

    /// The token's domain.
    #[inline]
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// The domain-specific payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Normalized `domain:payload` key used for graph identity.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.domain.prefix(), self.payload)
    }
}

impl fmt::Display for DependencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain.prefix(), self.payload)
    }
}
