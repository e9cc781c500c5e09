use std::fmt;

use url::Url;

use crate::error::{DomainError, DomainResult};

use super::ValueObject;

/// Optional login URL of a site.
///
/// Absence is an explicit state ([`SiteUrl::empty`]) rather than a missing
/// field, so the aggregate always holds a `SiteUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SiteUrl(Option<String>);

impl SiteUrl {
    /// Trim and validate a URL. Blank input yields the empty state.
    ///
    /// # Errors
    /// `InvalidSiteUrl` when the trimmed value does not parse as an absolute URL.
    pub fn new(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        Url::parse(trimmed).map_err(|e| {
            DomainError::InvalidSiteUrl(format!("'{}' is not a valid URL: {}", trimmed, e))
        })?;

        Ok(Self(Some(trimmed.to_string())))
    }

    /// Build from an optional raw value; `None` yields the empty state.
    pub fn from_optional(value: Option<&str>) -> DomainResult<Self> {
        match value {
            Some(raw) => Self::new(raw),
            None => Ok(Self::empty()),
        }
    }

    /// The "no URL" state
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Host name of the URL, if there is one.
    pub fn domain(&self) -> Option<String> {
        let raw = self.0.as_deref()?;
        let url = Url::parse(raw).ok()?;
        url.host_str().map(str::to_string)
    }
}

impl ValueObject for SiteUrl {
    type Primitive = Option<String>;

    fn to_primitive(&self) -> Option<String> {
        self.0.clone()
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or_default())
    }
}
