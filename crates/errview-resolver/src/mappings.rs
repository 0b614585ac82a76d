// SPDX-License-Identifier: MIT OR Apache-2.0
//! The two rule tables: kind-hierarchy mappings and error-code mappings.
//!
//! Both tables are ordered and immutable once the resolver is built.

use errview_config::{ErrorCodeMapping, ExceptionMapping};
use errview_core::{KindId, Taxonomy};

// ── ExceptionMappings ───────────────────────────────────────────────────

/// A kind-mapping hit: which row matched and how far up the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMatch<'a> {
    /// The row's pattern.
    pub pattern: &'a str,
    /// The row's view.
    pub view: &'a str,
    /// Inheritance distance from the matched kind.
    pub depth: usize,
}

/// Ordered (kind-name pattern, view) rows matched by inheritance distance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionMappings {
    rows: Vec<(String, String)>,
}

impl ExceptionMappings {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, pattern: impl Into<String>, view: impl Into<String>) {
        self.rows.push((pattern.into(), view.into()));
    }

    /// Returns `true` when no rows are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Finds the row with the smallest inheritance distance from `kind`.
    ///
    /// On equal distance the row registered first wins.
    #[must_use]
    pub fn find(&self, taxonomy: &Taxonomy, kind: KindId) -> Option<KindMatch<'_>> {
        let mut best: Option<KindMatch<'_>> = None;
        for (pattern, view) in self.iter() {
            let Some(depth) = taxonomy.depth(kind, pattern) else {
                continue;
            };
            if best.is_none_or(|b| depth < b.depth) {
                best = Some(KindMatch {
                    pattern,
                    view,
                    depth,
                });
            }
        }
        best
    }
}

impl From<&[ExceptionMapping]> for ExceptionMappings {
    fn from(rows: &[ExceptionMapping]) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(row.pattern.clone(), row.view.clone());
        }
        table
    }
}

// ── ErrorCodeMappings ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct CodeRow {
    raw: String,
    folded: Vec<String>,
    view: String,
}

/// Ordered (comma-separated codes, view) rows.
///
/// Codes are split, trimmed and case-folded once on insertion; blank
/// entries are dropped and so never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCodeMappings {
    rows: Vec<CodeRow>,
}

impl ErrorCodeMappings {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row whose key is a comma-separated code list.
    pub fn push(&mut self, codes: impl Into<String>, view: impl Into<String>) {
        let raw = codes.into();
        let folded = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
            .collect();
        self.rows.push(CodeRow {
            raw,
            folded,
            view: view.into(),
        });
    }

    /// Returns `true` when no rows are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows in registration order, with their original code lists.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|r| (r.raw.as_str(), r.view.as_str()))
    }

    /// View of the first row listing `code`, compared trimmed and
    /// case-insensitively.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&str> {
        let needle = code.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.folded.iter().any(|c| *c == needle))
            .map(|row| row.view.as_str())
    }
}

impl From<&[ErrorCodeMapping]> for ErrorCodeMappings {
    fn from(rows: &[ErrorCodeMapping]) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(row.codes.clone(), row.view.clone());
        }
        table
    }
}
