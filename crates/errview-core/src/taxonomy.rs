// SPDX-License-Identifier: MIT OR Apache-2.0
//! Closed error-kind taxonomy.
//!
//! Every kind has a qualified name and a single parent; the implicit root
//! kind [`ROOT_KIND_NAME`] sits at the top of every chain. Kind mappings
//! match by walking this chain, so the taxonomy stands in for a class
//! hierarchy without any runtime reflection beyond [`std::error::Error`]
//! downcasting for bound types.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use crate::fault::Fault;

/// Qualified name of the implicit root kind.
pub const ROOT_KIND_NAME: &str = "Error";

// ---------------------------------------------------------------------------
// KindId
// ---------------------------------------------------------------------------

/// Opaque handle to a kind registered in a [`Taxonomy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(u32);

impl KindId {
    /// The root kind, present in every taxonomy.
    pub const ROOT: KindId = KindId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building a [`Taxonomy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    /// A kind with the same qualified name already exists.
    #[error("duplicate error kind `{name}`")]
    DuplicateKind {
        /// The offending name.
        name: String,
    },
    /// The parent handle does not belong to this taxonomy.
    #[error("unknown parent for error kind `{name}`")]
    UnknownParent {
        /// Name of the kind being registered.
        name: String,
    },
    /// Kind names must contain at least one non-whitespace character.
    #[error("error kind name must not be empty")]
    EmptyName,
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

type TypeMatcher = fn(&(dyn StdError + 'static)) -> bool;

fn is_type<T: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    err.is::<T>()
}

#[derive(Debug, Clone)]
struct KindEntry {
    name: String,
    parent: Option<KindId>,
}

/// Immutable set of error kinds.
///
/// Build one at startup with [`Taxonomy::builder`] and share it behind an
/// `Arc`; nothing mutates it afterwards.
///
/// ```
/// use errview_core::{KindId, Taxonomy};
///
/// let mut builder = Taxonomy::builder();
/// let io = builder.register("app.IoFailure", KindId::ROOT).unwrap();
/// let missing = builder.register("app.io.FileMissing", io).unwrap();
/// let taxonomy = builder.build();
///
/// assert_eq!(taxonomy.depth(missing, "FileMissing"), Some(0));
/// assert_eq!(taxonomy.depth(missing, "IoFailure"), Some(1));
/// assert_eq!(taxonomy.depth(io, "FileMissing"), None);
/// ```
pub struct Taxonomy {
    kinds: Vec<KindEntry>,
    by_name: HashMap<String, KindId>,
    bindings: Vec<(TypeMatcher, KindId)>,
}

impl Taxonomy {
    /// Start a new builder seeded with the root kind.
    #[must_use]
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::new()
    }

    /// Number of kinds, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// A taxonomy always holds the root, so this is never `true`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Look up a kind by its qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// Qualified name of `kind`. Handles from another taxonomy resolve to the
    /// root name.
    #[must_use]
    pub fn name(&self, kind: KindId) -> &str {
        self.kinds
            .get(kind.index())
            .map_or(ROOT_KIND_NAME, |entry| entry.name.as_str())
    }

    /// Direct parent of `kind`; `None` for the root.
    #[must_use]
    pub fn parent(&self, kind: KindId) -> Option<KindId> {
        self.kinds.get(kind.index()).and_then(|entry| entry.parent)
    }

    /// Iterate from `kind` up to and including the root.
    pub fn ancestors(&self, kind: KindId) -> impl Iterator<Item = KindId> + '_ {
        let start = if kind.index() < self.kinds.len() {
            kind
        } else {
            KindId::ROOT
        };
        std::iter::successors(Some(start), move |k| self.parent(*k))
    }

    /// Whether `kind` equals `ancestor` or descends from it.
    #[must_use]
    pub fn is_a(&self, kind: KindId, ancestor: KindId) -> bool {
        self.ancestors(kind).any(|k| k == ancestor)
    }

    /// Inheritance distance from `kind` to the first level whose qualified
    /// name contains `pattern`.
    ///
    /// Distance `0` is `kind` itself, each parent step adds one. The root is
    /// the last level inspected; no match yields `None`.
    #[must_use]
    pub fn depth(&self, kind: KindId, pattern: &str) -> Option<usize> {
        self.ancestors(kind)
            .position(|k| self.name(k).contains(pattern))
    }

    /// Classify a single error value (without following its source chain).
    ///
    /// A [`Fault`] reports its own kind; other errors are matched against the
    /// types bound with [`TaxonomyBuilder::bind`], first binding wins.
    #[must_use]
    pub fn classify(&self, err: &(dyn StdError + 'static)) -> Option<KindId> {
        if let Some(fault) = err.downcast_ref::<Fault>() {
            return Some(fault.kind());
        }
        self.bindings
            .iter()
            .find(|(matches, _)| matches(err))
            .map(|(_, kind)| *kind)
    }

    /// Kind of the most specific cause of `fault`: the innermost error of its
    /// source chain this taxonomy can classify, or the fault's own kind.
    #[must_use]
    pub fn most_specific_kind(&self, fault: &Fault) -> KindId {
        let mut found = fault.kind();
        let mut current = fault.source_ref();
        while let Some(err) = current {
            if let Some(kind) = self.classify(err) {
                found = kind;
            }
            current = err.source();
        }
        found
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        TaxonomyBuilder::new().build()
    }
}

impl fmt::Debug for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Taxonomy")
            .field("kinds", &self.kinds)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TaxonomyBuilder
// ---------------------------------------------------------------------------

/// Incrementally registers kinds; call [`build`](Self::build) to freeze.
#[derive(Debug)]
pub struct TaxonomyBuilder {
    taxonomy: Taxonomy,
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyBuilder {
    /// Create a builder containing only the root kind.
    #[must_use]
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(ROOT_KIND_NAME.to_string(), KindId::ROOT);
        Self {
            taxonomy: Taxonomy {
                kinds: vec![KindEntry {
                    name: ROOT_KIND_NAME.to_string(),
                    parent: None,
                }],
                by_name,
                bindings: Vec::new(),
            },
        }
    }

    /// Register a kind under `parent`.
    ///
    /// # Errors
    ///
    /// Fails when the trimmed name is empty, already registered, or when
    /// `parent` was not issued by this builder.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        parent: KindId,
    ) -> Result<KindId, TaxonomyError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TaxonomyError::EmptyName);
        }
        if self.taxonomy.by_name.contains_key(&name) {
            return Err(TaxonomyError::DuplicateKind { name });
        }
        if parent.index() >= self.taxonomy.kinds.len() {
            return Err(TaxonomyError::UnknownParent { name });
        }
        let id = KindId(self.taxonomy.kinds.len() as u32);
        self.taxonomy.by_name.insert(name.clone(), id);
        self.taxonomy.kinds.push(KindEntry {
            name,
            parent: Some(parent),
        });
        Ok(id)
    }

    /// Register a kind whose parent is given by qualified name.
    ///
    /// # Errors
    ///
    /// As [`register`](Self::register); an unknown parent name yields
    /// [`TaxonomyError::UnknownParent`].
    pub fn register_under(
        &mut self,
        name: impl Into<String>,
        parent: &str,
    ) -> Result<KindId, TaxonomyError> {
        let name = name.into();
        match self.taxonomy.get(parent) {
            Some(parent) => self.register(name, parent),
            None => Err(TaxonomyError::UnknownParent { name }),
        }
    }

    /// Bind the concrete error type `T` to `kind`, so that foreign errors of
    /// that type are classified without being wrapped first.
    pub fn bind<T: StdError + 'static>(&mut self, kind: KindId) -> &mut Self {
        self.taxonomy.bindings.push((is_type::<T>, kind));
        self
    }

    /// Look up a kind registered so far.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<KindId> {
        self.taxonomy.get(name)
    }

    /// Freeze the taxonomy.
    #[must_use]
    pub fn build(self) -> Taxonomy {
        self.taxonomy
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
