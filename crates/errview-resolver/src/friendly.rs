// SPDX-License-Identifier: MIT OR Apache-2.0
//! Friendly-message resolution chain.
//!
//! 1. Look up the global default under [`DEFAULT_MESSAGE_KEY`] (fallback `""`).
//! 2. With a code: look up the code with the fault's arguments, falling back
//!    to the fault's own default message if it has text, else to the global
//!    default.
//! 3. Without a code: look up the qualified name of the most specific cause
//!    kind, falling back to the global default. The fault's own default
//!    message is not consulted on this path.

use errview_core::{Fault, Locale, Taxonomy};
use errview_messages::MessageStore;

/// Message key of the application-wide default friendly message.
pub const DEFAULT_MESSAGE_KEY: &str = "exception.defaultMessage";

/// Fallback used when the store has no global default either.
pub const DEFAULT_MESSAGE: &str = "";

/// Compute the friendly message for `fault` without storing it.
pub fn resolve_friendly_message(
    fault: &Fault,
    locale: &Locale,
    store: &dyn MessageStore,
    taxonomy: &Taxonomy,
) -> String {
    let global_default = store.lookup(DEFAULT_MESSAGE_KEY, &[], DEFAULT_MESSAGE, locale);

    match fault.code() {
        Some(code) => {
            let fallback = fault
                .default_friendly_message()
                .filter(|m| has_text(m))
                .unwrap_or(&global_default);
            store.lookup(code, fault.message_args(), fallback, locale)
        }
        None => {
            let cause = taxonomy.most_specific_kind(fault);
            store.lookup(taxonomy.name(cause), &[], &global_default, locale)
        }
    }
}

/// Resolve the friendly message and write it into `fault`.
pub fn fill_friendly_message(
    fault: &mut Fault,
    locale: &Locale,
    store: &dyn MessageStore,
    taxonomy: &Taxonomy,
) {
    let message = resolve_friendly_message(fault, locale, store, taxonomy);
    fault.set_friendly_message(message);
}

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}
