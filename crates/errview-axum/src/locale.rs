// SPDX-License-Identifier: MIT OR Apache-2.0
//! `Accept-Language` negotiation.

use errview_core::Locale;

/// Pick the preferred locale from an `Accept-Language` header value.
///
/// Entries are ranked by their `q` weight (default `1`); on equal weight the
/// earlier entry wins. Wildcards, unparsable tags and `q=0` entries are
/// skipped.
#[must_use]
pub fn negotiate_locale(header: &str) -> Option<Locale> {
    let mut best: Option<(f32, Locale)> = None;
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let Some(locale) = parts.next().and_then(Locale::parse) else {
            continue;
        };
        let weight = parts
            .find_map(|p| p.trim().strip_prefix("q="))
            .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok());
        let Some(weight) = weight.filter(|w| *w > 0.0) else {
            continue;
        };
        if best.as_ref().is_none_or(|(w, _)| weight > *w) {
            best = Some((weight, locale));
        }
    }
    best.map(|(_, locale)| locale)
}
