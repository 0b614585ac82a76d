// SPDX-License-Identifier: MIT OR Apache-2.0
//! Turning a resolved [`ModelAndView`] into a response body.

use errview_resolver::ModelAndView;

/// A rendered error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// Response body.
    pub body: String,
}

/// Rendering failed; the middleware falls back to the original response.
#[derive(Debug, thiserror::Error)]
#[error("view '{view}' could not be rendered: {reason}")]
pub struct RenderError {
    /// The view that failed.
    pub view: String,
    /// What went wrong.
    pub reason: String,
}

/// Template engine seam.
pub trait ViewRenderer: Send + Sync {
    /// Render `view` with its model.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the view is unknown or the model does
    /// not fit the template.
    fn render(&self, view: &ModelAndView) -> Result<Rendered, RenderError>;
}

/// Renders `{"view": ..., "model": ...}` as `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, view: &ModelAndView) -> Result<Rendered, RenderError> {
        let doc = serde_json::json!({
            "view": view.view_name,
            "model": view.model,
        });
        let body = serde_json::to_string(&doc).map_err(|e| RenderError {
            view: view.view_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Rendered {
            content_type: "application/json".into(),
            body,
        })
    }
}
