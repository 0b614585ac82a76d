// SPDX-License-Identifier: MIT OR Apache-2.0
//! axum integration for [`errview_resolver`].
//!
//! Handlers return [`FaultResponse`] as their error type. It produces a bare
//! `500` and stashes the error in the response extensions. The
//! [`resolve_faults`] middleware picks it up, resolves it to an error view
//! and renders that view through a [`ViewRenderer`]. Errors the resolver does
//! not handle keep the original `500`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use errview_axum::{ErrorPages, FaultResponse, with_error_pages};
//! use errview_core::{Fault, KindId, Taxonomy};
//! use errview_messages::CatalogMessageStore;
//! use errview_resolver::ExceptionViewResolver;
//!
//! async fn boom() -> Result<&'static str, FaultResponse> {
//!     Err(Fault::new(KindId::ROOT, "boom").into())
//! }
//!
//! let resolver = ExceptionViewResolver::builder(
//!     Arc::new(Taxonomy::default()),
//!     Arc::new(CatalogMessageStore::new()),
//! )
//! .default_error_view("error/general")
//! .build();
//! let app: Router = with_error_pages(
//!     Router::new().route("/", get(boom)),
//!     ErrorPages::new(Arc::new(resolver)),
//! );
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod locale;
mod render;

use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use errview_core::{DispatchKind, RequestContext};
use errview_resolver::{ExceptionViewResolver, Resolution};

pub use locale::negotiate_locale;
pub use render::{JsonViewRenderer, RenderError, Rendered, ViewRenderer};

// ---------------------------------------------------------------------------
// FaultResponse
// ---------------------------------------------------------------------------

/// Handler error type that defers rendering to [`resolve_faults`].
///
/// Any `std::error::Error` converts into it, so `?` works on [`Fault`]s and
/// foreign errors alike.
///
/// [`Fault`]: errview_core::Fault
pub struct FaultResponse(Box<dyn StdError + Send + Sync>);

impl FaultResponse {
    /// Wrap an already boxed error.
    #[must_use]
    pub fn boxed(error: Box<dyn StdError + Send + Sync>) -> Self {
        Self(error)
    }
}

impl<E> From<E> for FaultResponse
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(Box::new(error))
    }
}

impl fmt::Debug for FaultResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FaultResponse").field(&self.0).finish()
    }
}

/// Response extension carrying the error until the middleware takes it.
#[derive(Clone)]
struct StashedFault(Arc<Mutex<Option<Box<dyn StdError + Send + Sync>>>>);

impl StashedFault {
    fn take(&self) -> Option<Box<dyn StdError + Send + Sync>> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl IntoResponse for FaultResponse {
    fn into_response(self) -> Response {
        let mut resp = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        resp.extensions_mut()
            .insert(StashedFault(Arc::new(Mutex::new(Some(self.0)))));
        resp
    }
}

// ---------------------------------------------------------------------------
// ErrorPages
// ---------------------------------------------------------------------------

/// Middleware state: the resolver and the renderer for its views.
#[derive(Clone)]
pub struct ErrorPages {
    resolver: Arc<ExceptionViewResolver>,
    renderer: Arc<dyn ViewRenderer>,
}

impl ErrorPages {
    /// Render resolved views with [`JsonViewRenderer`].
    #[must_use]
    pub fn new(resolver: Arc<ExceptionViewResolver>) -> Self {
        Self {
            resolver,
            renderer: Arc::new(JsonViewRenderer),
        }
    }

    /// Use a different renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// The wrapped resolver.
    #[must_use]
    pub fn resolver(&self) -> &ExceptionViewResolver {
        &self.resolver
    }

    fn render(&self, resolution: &Resolution) -> Result<Response, RenderError> {
        let rendered = self.renderer.render(&resolution.model_and_view)?;
        let status = resolution
            .status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let content_type =
            HeaderValue::from_str(&rendered.content_type).map_err(|e| RenderError {
                view: resolution.view_name().to_string(),
                reason: e.to_string(),
            })?;

        let mut resp = (status, rendered.body).into_response();
        resp.headers_mut().insert(header::CONTENT_TYPE, content_type);
        if resolution.prevent_caching {
            resp.headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
        Ok(resp)
    }
}

impl fmt::Debug for ErrorPages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPages")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// Build the resolver's view of `req`.
///
/// The locale comes from `Accept-Language` (default `en`), the dispatch kind
/// from a [`DispatchKind`] request extension (default top-level).
#[must_use]
pub fn request_context(req: &Request) -> RequestContext {
    let locale = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(negotiate_locale)
        .unwrap_or_default();
    let dispatch = req
        .extensions()
        .get::<DispatchKind>()
        .copied()
        .unwrap_or_default();
    RequestContext::new(req.uri().path())
        .with_locale(locale)
        .with_dispatch(dispatch)
}

/// Middleware resolving faults stashed by [`FaultResponse`].
///
/// Install with [`axum::middleware::from_fn_with_state`] or
/// [`with_error_pages`].
pub async fn resolve_faults(
    State(pages): State<ErrorPages>,
    req: Request,
    next: Next,
) -> Response {
    let ctx = request_context(&req);
    let mut resp = next.run(req).await;

    let Some(stash) = resp.extensions_mut().remove::<StashedFault>() else {
        return resp;
    };
    let Some(error) = stash.take() else {
        return resp;
    };

    let Some(resolution) = pages.resolver.resolve(error, &ctx) else {
        tracing::debug!(target: "errview.axum", path = %ctx.path, "fault not handled");
        return resp;
    };
    match pages.render(&resolution) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!(target: "errview.axum", path = %ctx.path, error = %e, "error view render failed");
            resp
        }
    }
}

/// Wrap `router` with [`resolve_faults`].
pub fn with_error_pages<S>(router: Router<S>, pages: ErrorPages) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(pages, resolve_faults))
}
