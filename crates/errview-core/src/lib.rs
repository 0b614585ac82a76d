// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types shared by every errview crate.
//!
//! * [`Taxonomy`]: the closed set of error kinds and their parent chains.
//! * [`Fault`]: the wrapper every handled error is normalized into. It carries
//!   an optional error code, message arguments and the friendly message.
//! * [`RequestContext`] / [`Locale`]: the per-request facts resolution needs.
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fault;
pub mod request;
pub mod taxonomy;

pub use fault::{Fault, FaultDto};
pub use request::{DispatchKind, Locale, RequestContext};
pub use taxonomy::{KindId, ROOT_KIND_NAME, Taxonomy, TaxonomyBuilder, TaxonomyError};
