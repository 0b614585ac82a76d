// SPDX-License-Identifier: MIT OR Apache-2.0
//! The [`Fault`] wrapper every handled error is normalized into.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{KindId, Taxonomy};

// ---------------------------------------------------------------------------
// Fault
// ---------------------------------------------------------------------------

/// An error carrying view-resolution metadata.
///
/// Besides its [`KindId`] and diagnostic message, a fault may carry an
/// application error code, a per-fault default friendly message and ordered
/// message arguments. The resolver writes the localized
/// [`friendly_message`](Self::friendly_message) once per resolution.
///
/// ```
/// use errview_core::{Fault, KindId};
///
/// let fault = Fault::new(KindId::ROOT, "order 42 rejected")
///     .with_code("  ORDER_REJECTED ")
///     .with_default_friendly_message("Your order could not be placed.")
///     .with_arg(42);
/// assert_eq!(fault.code(), Some("ORDER_REJECTED"));
/// assert_eq!(fault.message_args().len(), 1);
/// ```
pub struct Fault {
    kind: KindId,
    message: String,
    code: Option<String>,
    default_friendly_message: Option<String>,
    message_args: Vec<serde_json::Value>,
    friendly_message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Fault {
    /// Create a fault of `kind` with a diagnostic message and no code.
    pub fn new(kind: KindId, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            default_friendly_message: None,
            message_args: Vec::new(),
            friendly_message: None,
            source: None,
        }
    }

    /// Wrap an arbitrary error: no code, the error becomes the source and its
    /// display text the diagnostic message.
    pub fn wrap(kind: KindId, source: Box<dyn StdError + Send + Sync>) -> Self {
        Self {
            message: source.to_string(),
            source: Some(source),
            ..Self::new(kind, String::new())
        }
    }

    /// Attach an error code. The code is trimmed; a blank code clears it.
    pub fn with_code(mut self, code: impl AsRef<str>) -> Self {
        let trimmed = code.as_ref().trim();
        self.code = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Attach the message used when the store has no entry for the code.
    pub fn with_default_friendly_message(mut self, message: impl Into<String>) -> Self {
        self.default_friendly_message = Some(message.into());
        self
    }

    /// Append one positional message argument.
    ///
    /// The value is converted via [`serde_json::to_value`]; if serialisation
    /// fails, the argument is silently skipped.
    pub fn with_arg(mut self, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.message_args.push(v);
        }
        self
    }

    /// Replace all message arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = serde_json::Value>) -> Self {
        self.message_args = args.into_iter().collect();
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Kind of this fault (not of its causes).
    pub fn kind(&self) -> KindId {
        self.kind
    }

    /// Diagnostic message; never shown to end users.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code, trimmed and non-empty when present.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Per-fault default friendly message, if one was supplied.
    pub fn default_friendly_message(&self) -> Option<&str> {
        self.default_friendly_message.as_deref()
    }

    /// Positional arguments for message-template substitution.
    pub fn message_args(&self) -> &[serde_json::Value] {
        &self.message_args
    }

    /// Localized message written by the last resolution, if any.
    pub fn friendly_message(&self) -> Option<&str> {
        self.friendly_message.as_deref()
    }

    /// Record the localized friendly message.
    pub fn set_friendly_message(&mut self, message: impl Into<String>) {
        self.friendly_message = Some(message.into());
    }

    /// Underlying cause as a `'static` trait object.
    pub fn source_ref(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Fault");
        d.field("kind", &self.kind);
        d.field("message", &self.message);
        if let Some(ref code) = self.code {
            d.field("code", code);
        }
        if let Some(ref default) = self.default_friendly_message {
            d.field("default_friendly_message", default);
        }
        if !self.message_args.is_empty() {
            d.field("message_args", &self.message_args);
        }
        if let Some(ref friendly) = self.friendly_message {
            d.field("friendly_message", friendly);
        }
        if let Some(ref src) = self.source {
            d.field("source", &src.to_string());
        }
        d.finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(ref code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source_ref()
    }
}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serialisable snapshot of a [`Fault`], exposed to view templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaultDto {
    /// Qualified name of the fault's kind.
    pub kind: String,
    /// Qualified name of the most specific cause's kind.
    pub cause_kind: String,
    /// Error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Diagnostic message.
    pub message: String,
    /// Localized friendly message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_message: Option<String>,
    /// Message arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_args: Vec<serde_json::Value>,
    /// String representation of the source error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,
}

impl FaultDto {
    /// Snapshot `fault`, naming kinds through `taxonomy`.
    pub fn from_fault(fault: &Fault, taxonomy: &Taxonomy) -> Self {
        Self {
            kind: taxonomy.name(fault.kind).to_string(),
            cause_kind: taxonomy
                .name(taxonomy.most_specific_kind(fault))
                .to_string(),
            code: fault.code.clone(),
            message: fault.message.clone(),
            friendly_message: fault.friendly_message.clone(),
            message_args: fault.message_args.clone(),
            source_message: fault.source.as_ref().map(|s| s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
