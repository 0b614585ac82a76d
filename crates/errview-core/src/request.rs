// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-request facts consumed during resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// A language tag with an optional region, e.g. `en` or `pt-BR`.
///
/// The language is stored lower-case and the region upper-case, so
/// `EN_us` and `en-US` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,
}

impl Locale {
    /// Build a locale from its parts.
    pub fn new(language: impl AsRef<str>, region: Option<&str>) -> Self {
        Self {
            language: language.as_ref().trim().to_ascii_lowercase(),
            region: region
                .map(|r| r.trim().to_ascii_uppercase())
                .filter(|r| !r.is_empty()),
        }
    }

    /// Parse a tag such as `en`, `en-US` or `en_us`.
    ///
    /// Extra subtags beyond the region are ignored. Returns `None` for empty
    /// input, the wildcard `*`, or a language that is not alphabetic.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag == "*" {
            return None;
        }
        let mut parts = tag.split(['-', '_']);
        let language = parts.next()?;
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts.next().filter(|r| !r.is_empty());
        Some(Self::new(language, region))
    }

    /// Lower-case language subtag.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Upper-case region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Canonical tag, most specific first, then the bare language.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        match self.region {
            Some(ref region) => vec![format!("{}-{region}", self.language), self.language.clone()],
            None => vec![self.language.clone()],
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", None)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Some(ref region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchKind
// ---------------------------------------------------------------------------

/// How the current request reached the handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// A top-level request from the client.
    #[default]
    Request,
    /// Rendered as part of another response.
    Include,
    /// Internally forwarded from another handler.
    Forward,
}

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// The slice of the HTTP request the resolver needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path, used for diagnostics only.
    pub path: String,
    /// Locale selected for the response.
    pub locale: Locale,
    /// How the request was dispatched.
    pub dispatch: DispatchKind,
}

impl RequestContext {
    /// A top-level request for `path` in the default locale.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the response locale.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the dispatch kind.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchKind) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Status codes are only applied to top-level requests.
    pub fn is_top_level(&self) -> bool {
        self.dispatch == DispatchKind::Request
    }
}
