// SPDX-License-Identifier: MIT OR Apache-2.0
//! Maps a failed request's error to an error view, an HTTP status code and a
//! localized friendly message.
//!
//! Two rule tables drive the choice of view: [`ExceptionMappings`] match on
//! the error-kind hierarchy, [`ErrorCodeMappings`] on the application error
//! code. A kind match beats a code match; when neither matches the configured
//! default view is used, and otherwise the error is left unhandled.
//!
//! ```
//! use std::sync::Arc;
//! use errview_core::{Fault, KindId, RequestContext, Taxonomy};
//! use errview_messages::CatalogMessageStore;
//! use errview_resolver::ExceptionViewResolver;
//!
//! let mut b = Taxonomy::builder();
//! let not_found = b.register("app.NotFound", KindId::ROOT).unwrap();
//! let taxonomy = Arc::new(b.build());
//!
//! let resolver = ExceptionViewResolver::builder(taxonomy, Arc::new(CatalogMessageStore::new()))
//!     .exception_mapping("NotFound", "error/404")
//!     .status_code("error/404", 404)
//!     .build();
//!
//! let request = RequestContext::new("/orders/7");
//! let res = resolver
//!     .resolve_fault(Fault::new(not_found, "order 7 missing"), &request)
//!     .unwrap();
//! assert_eq!(res.view_name(), "error/404");
//! assert_eq!(res.status_code, Some(404));
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod friendly;
pub mod logging;
pub mod mappings;

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use errview_config::{ConfigError, ConfigWarning, DEFAULT_EXCEPTION_ATTRIBUTE, ResolverConfig};
use errview_core::{Fault, FaultDto, KindId, RequestContext, Taxonomy};
use errview_messages::MessageStore;
use serde::Serialize;

pub use friendly::{
    DEFAULT_MESSAGE, DEFAULT_MESSAGE_KEY, fill_friendly_message, resolve_friendly_message,
};
pub use logging::{ErrorLogger, TracingErrorLogger};
pub use mappings::{ErrorCodeMappings, ExceptionMappings, KindMatch};

// ---------------------------------------------------------------------------
// Resolution output
// ---------------------------------------------------------------------------

/// A view name plus the model handed to the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAndView {
    /// Error view to render.
    pub view_name: String,
    /// Template model. Holds the fault snapshot under the exception attribute.
    pub model: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of a handled error.
#[derive(Debug)]
pub struct Resolution {
    /// View and model to render.
    pub model_and_view: ModelAndView,
    /// Status to apply to the response, when the request is top-level.
    pub status_code: Option<u16>,
    /// Whether the rendered view must not be cached.
    pub prevent_caching: bool,
    /// The resolved fault, with its friendly message filled in.
    pub fault: Fault,
}

impl Resolution {
    /// Shortcut for `model_and_view.view_name`.
    #[must_use]
    pub fn view_name(&self) -> &str {
        &self.model_and_view.view_name
    }

    /// The localized friendly message (empty when nothing resolved).
    #[must_use]
    pub fn friendly_message(&self) -> &str {
        self.fault.friendly_message().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// ExceptionViewResolver
// ---------------------------------------------------------------------------

/// Error-to-view resolver. Immutable after [`ResolverBuilder::build`] and
/// safe to share across request threads.
pub struct ExceptionViewResolver {
    taxonomy: Arc<Taxonomy>,
    messages: Arc<dyn MessageStore>,
    exception_mappings: ExceptionMappings,
    error_code_mappings: ErrorCodeMappings,
    default_error_view: Option<String>,
    status_codes: BTreeMap<String, u16>,
    default_status_code: Option<u16>,
    exception_attribute: Option<String>,
    prevent_response_caching: bool,
    log_enable: bool,
    logger: Option<Arc<dyn ErrorLogger>>,
}

impl ExceptionViewResolver {
    /// Start a builder with empty tables.
    #[must_use]
    pub fn builder(taxonomy: Arc<Taxonomy>, messages: Arc<dyn MessageStore>) -> ResolverBuilder {
        ResolverBuilder::new(taxonomy, messages)
    }

    /// The taxonomy used to classify errors.
    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Kind-hierarchy mapping table.
    #[must_use]
    pub fn exception_mappings(&self) -> &ExceptionMappings {
        &self.exception_mappings
    }

    /// Error-code mapping table.
    #[must_use]
    pub fn error_code_mappings(&self) -> &ErrorCodeMappings {
        &self.error_code_mappings
    }

    /// Fallback view used when no row matches.
    #[must_use]
    pub fn default_error_view(&self) -> Option<&str> {
        self.default_error_view.as_deref()
    }

    /// Model key the fault is exposed under, if enabled.
    #[must_use]
    pub fn exception_attribute(&self) -> Option<&str> {
        self.exception_attribute.as_deref()
    }

    /// Whether logging of resolved faults is switched on.
    #[must_use]
    pub fn log_enabled(&self) -> bool {
        self.log_enable
    }

    /// Turn any error into a [`Fault`].
    ///
    /// A boxed `Fault` is unwrapped as-is. Anything else becomes a code-less
    /// fault of its classified kind (the root kind when unbound), with the
    /// original error kept as source.
    #[must_use]
    pub fn normalize(&self, error: Box<dyn StdError + Send + Sync>) -> Fault {
        match error.downcast::<Fault>() {
            Ok(fault) => *fault,
            Err(other) => {
                let kind = self.taxonomy.classify(&*other).unwrap_or(KindId::ROOT);
                Fault::wrap(kind, other)
            }
        }
    }

    /// Choose the view for `fault` and fill in its friendly message.
    ///
    /// The friendly message is written whether or not a view is found.
    /// Calling this twice on the same fault yields the same outcome.
    pub fn resolve_view(&self, fault: &mut Fault, request: &RequestContext) -> Option<String> {
        let view = self.select_view(fault);
        self.fill_friendly_message(fault, request);
        view
    }

    /// Resolve the friendly message for `request`'s locale into `fault`.
    pub fn fill_friendly_message(&self, fault: &mut Fault, request: &RequestContext) {
        fill_friendly_message(
            fault,
            &request.locale,
            self.messages.as_ref(),
            &self.taxonomy,
        );
    }

    fn select_view(&self, fault: &Fault) -> Option<String> {
        let by_kind = if self.exception_mappings.is_empty() {
            None
        } else {
            let cause = self.taxonomy.most_specific_kind(fault);
            self.exception_mappings
                .find(&self.taxonomy, cause)
                .map(|m| m.view)
        };
        if let Some(view) = by_kind {
            return Some(view.to_string());
        }

        let by_code = fault
            .code()
            .and_then(|code| self.error_code_mappings.find(code));
        if let Some(view) = by_code {
            return Some(view.to_string());
        }

        let fallback = self.default_error_view.clone();
        if let Some(ref view) = fallback {
            tracing::debug!(
                target: "errview.resolver",
                view = %view,
                kind = self.taxonomy.name(fault.kind()),
                "no mapping matched, using default error view"
            );
        }
        fallback
    }

    /// Status code for `view`: its table entry, else the default status.
    /// Only top-level requests receive a status.
    #[must_use]
    pub fn resolve_status_code(&self, request: &RequestContext, view: &str) -> Option<u16> {
        if !request.is_top_level() {
            return None;
        }
        self.status_codes
            .get(view)
            .copied()
            .or(self.default_status_code)
    }

    /// Package `view` and `fault` into a [`Resolution`].
    #[must_use]
    pub fn build_result(&self, view: String, fault: Fault, request: &RequestContext) -> Resolution {
        let mut model = serde_json::Map::new();
        if let Some(ref attr) = self.exception_attribute {
            match serde_json::to_value(FaultDto::from_fault(&fault, &self.taxonomy)) {
                Ok(value) => {
                    model.insert(attr.clone(), value);
                }
                Err(e) => {
                    tracing::debug!(target: "errview.resolver", error = %e, "fault not serializable");
                }
            }
        }
        let status_code = self.resolve_status_code(request, &view);
        Resolution {
            model_and_view: ModelAndView {
                view_name: view,
                model,
            },
            status_code,
            prevent_caching: self.prevent_response_caching,
            fault,
        }
    }

    /// Full dispatch entry point: normalize, pick a view, and on success
    /// build the result and hand the fault to the logger.
    ///
    /// Returns `None` when the error is not handled.
    #[must_use]
    pub fn resolve(
        &self,
        error: Box<dyn StdError + Send + Sync>,
        request: &RequestContext,
    ) -> Option<Resolution> {
        self.resolve_fault(self.normalize(error), request)
    }

    /// Like [`resolve`](Self::resolve) for an already-normalized fault.
    #[must_use]
    pub fn resolve_fault(&self, mut fault: Fault, request: &RequestContext) -> Option<Resolution> {
        let view = self.resolve_view(&mut fault, request)?;
        let resolution = self.build_result(view, fault, request);
        if self.log_enable {
            if let Some(ref logger) = self.logger {
                logging::log_isolated(logger.as_ref(), &resolution.fault);
            }
        }
        Some(resolution)
    }
}

impl fmt::Debug for ExceptionViewResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionViewResolver")
            .field("exception_mappings", &self.exception_mappings)
            .field("error_code_mappings", &self.error_code_mappings)
            .field("default_error_view", &self.default_error_view)
            .field("status_codes", &self.status_codes)
            .field("default_status_code", &self.default_status_code)
            .field("exception_attribute", &self.exception_attribute)
            .field("prevent_response_caching", &self.prevent_response_caching)
            .field("log_enable", &self.log_enable)
            .field("logger", &self.logger.as_ref().map(|l| l.name()))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`ExceptionViewResolver`].
pub struct ResolverBuilder {
    inner: ExceptionViewResolver,
}

impl ResolverBuilder {
    /// Empty tables, exception attribute `"exception"`, logging off.
    #[must_use]
    pub fn new(taxonomy: Arc<Taxonomy>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            inner: ExceptionViewResolver {
                taxonomy,
                messages,
                exception_mappings: ExceptionMappings::new(),
                error_code_mappings: ErrorCodeMappings::new(),
                default_error_view: None,
                status_codes: BTreeMap::new(),
                default_status_code: None,
                exception_attribute: Some(DEFAULT_EXCEPTION_ATTRIBUTE.to_string()),
                prevent_response_caching: false,
                log_enable: false,
                logger: None,
            },
        }
    }

    /// Seed a builder from a validated [`ResolverConfig`].
    ///
    /// Advisory warnings are emitted at warn level. When `log_enable` is set
    /// a [`TracingErrorLogger`] for the configured category is installed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the config is invalid.
    pub fn from_config(
        config: &ResolverConfig,
        taxonomy: Arc<Taxonomy>,
        messages: Arc<dyn MessageStore>,
    ) -> Result<Self, ConfigError> {
        let warnings: Vec<ConfigWarning> = errview_config::validate_config(config)?;
        for w in &warnings {
            tracing::warn!(target: "errview.resolver", warning = %w, "resolver config");
        }

        let logger: Option<Arc<dyn ErrorLogger>> = config.log_enabled().then(|| {
            Arc::new(TracingErrorLogger::new(
                config.log_category(),
                Arc::clone(&taxonomy),
            )) as Arc<dyn ErrorLogger>
        });

        let mut builder = Self::new(taxonomy, messages);
        builder.inner.exception_mappings =
            ExceptionMappings::from(config.exception_mappings.as_slice());
        builder.inner.error_code_mappings =
            ErrorCodeMappings::from(config.error_code_mappings.as_slice());
        builder.inner.default_error_view = config.default_error_view.clone();
        builder.inner.status_codes = config.status_codes.clone();
        builder.inner.default_status_code = config.default_status_code;
        builder.inner.exception_attribute = config.exception_attribute().map(str::to_string);
        builder.inner.prevent_response_caching = config.prevents_response_caching();
        builder.inner.log_enable = config.log_enabled();
        builder.inner.logger = logger;
        Ok(builder)
    }

    /// Append a kind-mapping row.
    #[must_use]
    pub fn exception_mapping(mut self, pattern: impl Into<String>, view: impl Into<String>) -> Self {
        self.inner.exception_mappings.push(pattern, view);
        self
    }

    /// Append an error-code row; `codes` is a comma-separated list.
    #[must_use]
    pub fn error_code_mapping(mut self, codes: impl Into<String>, view: impl Into<String>) -> Self {
        self.inner.error_code_mappings.push(codes, view);
        self
    }

    /// Set the fallback view.
    #[must_use]
    pub fn default_error_view(mut self, view: impl Into<String>) -> Self {
        self.inner.default_error_view = Some(view.into());
        self
    }

    /// Map a view to a response status.
    #[must_use]
    pub fn status_code(mut self, view: impl Into<String>, status: u16) -> Self {
        self.inner.status_codes.insert(view.into(), status);
        self
    }

    /// Status for views without a table entry.
    #[must_use]
    pub fn default_status_code(mut self, status: u16) -> Self {
        self.inner.default_status_code = Some(status);
        self
    }

    /// Model key for the fault; `None` or a blank name keeps it out of the model.
    #[must_use]
    pub fn exception_attribute(mut self, attr: Option<&str>) -> Self {
        self.inner.exception_attribute = attr
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        self
    }

    /// Mark rendered error views as non-cacheable.
    #[must_use]
    pub fn prevent_response_caching(mut self, prevent: bool) -> Self {
        self.inner.prevent_response_caching = prevent;
        self
    }

    /// Switch forwarding of resolved faults to the logger on or off.
    #[must_use]
    pub fn log_enable(mut self, enable: bool) -> Self {
        self.inner.log_enable = enable;
        self
    }

    /// Install the logger collaborator.
    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.inner.logger = Some(logger);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ExceptionViewResolver {
        self.inner
    }
}

impl fmt::Debug for ResolverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverBuilder")
            .field("inner", &self.inner)
            .finish()
    }
}
