// SPDX-License-Identifier: MIT OR Apache-2.0
//! Locale-aware message lookup.
//!
//! [`MessageStore`] is the only interface the resolver depends on. A lookup
//! never fails: a missing key yields the caller's default, formatted with the
//! same arguments. [`CatalogMessageStore`] is a small in-memory
//! implementation; loading catalogs from resource files is left to the host
//! application.
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod format;

use std::collections::HashMap;
use std::sync::Arc;

use errview_core::Locale;

pub use format::format_message;

// ---------------------------------------------------------------------------
// MessageStore
// ---------------------------------------------------------------------------

/// Locale-aware key/value text lookup.
///
/// Implementations must be safe for concurrent reads and must not panic on
/// missing keys or malformed templates.
pub trait MessageStore: Send + Sync {
    /// Resolve `key` for `locale`, substituting `args` into the template.
    /// Returns `default` (formatted with `args`) when no template exists.
    fn lookup(
        &self,
        key: &str,
        args: &[serde_json::Value],
        default: &str,
        locale: &Locale,
    ) -> String;
}

impl<T: MessageStore + ?Sized> MessageStore for Arc<T> {
    fn lookup(
        &self,
        key: &str,
        args: &[serde_json::Value],
        default: &str,
        locale: &Locale,
    ) -> String {
        (**self).lookup(key, args, default, locale)
    }
}

impl<T: MessageStore + ?Sized> MessageStore for &T {
    fn lookup(
        &self,
        key: &str,
        args: &[serde_json::Value],
        default: &str,
        locale: &Locale,
    ) -> String {
        (**self).lookup(key, args, default, locale)
    }
}

/// Render a default message the way a store would: placeholders are only
/// substituted when arguments are present.
#[must_use]
pub fn render_default(default: &str, args: &[serde_json::Value]) -> String {
    if args.is_empty() {
        default.to_string()
    } else {
        format_message(default, args)
    }
}

// ---------------------------------------------------------------------------
// CatalogMessageStore
// ---------------------------------------------------------------------------

/// In-memory message catalogs keyed by locale tag.
///
/// A lookup for `pt-BR` checks the `pt-BR` catalog, then `pt`, then the
/// fallback locale's candidates (if configured), and finally the root
/// catalog (registered with an empty tag).
///
/// ```
/// use errview_core::Locale;
/// use errview_messages::{CatalogMessageStore, MessageStore};
///
/// let store = CatalogMessageStore::new()
///     .with_message("", "order.rejected", "Order {0} was rejected.")
///     .with_message("de", "order.rejected", "Bestellung {0} wurde abgelehnt.");
///
/// let de = Locale::parse("de-AT").unwrap();
/// let args = [serde_json::json!(42)];
/// assert_eq!(
///     store.lookup("order.rejected", &args, "", &de),
///     "Bestellung 42 wurde abgelehnt."
/// );
/// assert_eq!(
///     store.lookup("order.rejected", &args, "", &Locale::default()),
///     "Order 42 was rejected."
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogMessageStore {
    catalogs: HashMap<String, HashMap<String, String>>,
    fallback_locale: Option<Locale>,
}

impl CatalogMessageStore {
    /// Create an empty store; every lookup returns its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `locale` when the request locale has no entry.
    #[must_use]
    pub fn with_fallback_locale(mut self, locale: Locale) -> Self {
        self.fallback_locale = Some(locale);
        self
    }

    /// Add a template. `tag` is a locale tag such as `en-US`; an empty tag
    /// targets the root catalog.
    #[must_use]
    pub fn with_message(
        mut self,
        tag: &str,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.insert(tag, key, template);
        self
    }

    /// Add a template in place. Tags that do not parse as a locale go to the
    /// root catalog.
    pub fn insert(&mut self, tag: &str, key: impl Into<String>, template: impl Into<String>) {
        let tag = Locale::parse(tag).map(|l| l.to_string()).unwrap_or_default();
        self.catalogs
            .entry(tag)
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Add every `(key, template)` pair to the catalog for `tag`.
    pub fn extend<K, V>(&mut self, tag: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, template) in entries {
            self.insert(tag, key, template);
        }
    }

    /// Number of templates across all catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.values().map(HashMap::len).sum()
    }

    /// Whether no template has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the raw template for `key`, following the locale fallback chain.
    #[must_use]
    pub fn template(&self, key: &str, locale: &Locale) -> Option<&str> {
        let mut tags = locale.candidates();
        if let Some(ref fallback) = self.fallback_locale {
            tags.extend(fallback.candidates());
        }
        tags.push(String::new());
        tags.iter()
            .filter_map(|tag| self.catalogs.get(tag))
            .find_map(|catalog| catalog.get(key))
            .map(String::as_str)
    }
}

impl MessageStore for CatalogMessageStore {
    fn lookup(
        &self,
        key: &str,
        args: &[serde_json::Value],
        default: &str,
        locale: &Locale,
    ) -> String {
        match self.template(key, locale) {
            Some(template) => format_message(template, args),
            None => render_default(default, args),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
