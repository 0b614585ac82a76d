// SPDX-License-Identifier: MIT OR Apache-2.0
//! Warn-level reporting of resolved faults.
//!
//! The resolver hands each fault it resolved to an [`ErrorLogger`]. Logger
//! failures, including panics, are swallowed and reported at debug level so
//! they never change the resolution result.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use errview_core::{Fault, Taxonomy};

/// Sink for faults the resolver handled.
pub trait ErrorLogger: Send + Sync {
    /// Record `fault`.
    ///
    /// # Errors
    ///
    /// An error here is informational; the resolver discards it.
    fn log_exception(&self, fault: &Fault) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Human-readable name for this logger (used in diagnostics).
    fn name(&self) -> &str;
}

/// Emits one `tracing` warn event per fault.
///
/// The configured category is attached as the `category` field; the event
/// target is always `errview.resolver` since `tracing` targets are static.
#[derive(Debug, Clone)]
pub struct TracingErrorLogger {
    category: String,
    taxonomy: Arc<Taxonomy>,
}

impl TracingErrorLogger {
    /// Create a logger reporting under `category`.
    #[must_use]
    pub fn new(category: impl Into<String>, taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            category: category.into(),
            taxonomy,
        }
    }

    /// The category attached to every event.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl ErrorLogger for TracingErrorLogger {
    fn log_exception(&self, fault: &Fault) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(
            target: "errview.resolver",
            category = %self.category,
            kind = self.taxonomy.name(fault.kind()),
            code = fault.code().unwrap_or(""),
            message = fault.message(),
            "resolved fault"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Call `logger` for `fault`, containing any error or panic.
pub(crate) fn log_isolated(logger: &dyn ErrorLogger, fault: &Fault) {
    match catch_unwind(AssertUnwindSafe(|| logger.log_exception(fault))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::debug!(target: "errview.resolver", logger = logger.name(), error = %e, "error logger failed");
        }
        Err(_) => {
            tracing::debug!(target: "errview.resolver", logger = logger.name(), "error logger panicked");
        }
    }
}
