// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz error-code matching against arbitrary code lists.
//!
//! Verifies:
//! 1. Lookup never panics.
//! 2. A matching row always lists the probed code (trimmed, case-folded).
//! 3. Every non-blank entry of a row can be found again.
#![no_main]
use arbitrary::Arbitrary;
use errview_resolver::ErrorCodeMappings;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<String>,
    probe: String,
}

fuzz_target!(|input: Input| {
    let mut table = ErrorCodeMappings::new();
    for (i, row) in input.rows.iter().enumerate() {
        table.push(row.clone(), format!("view/{i}"));
    }

    if let Some(view) = table.find(&input.probe) {
        let needle = input.probe.trim().to_lowercase();
        let row = table
            .iter()
            .find(|(_, v)| *v == view)
            .map(|(codes, _)| codes)
            .expect("matched view must come from a row");
        assert!(
            row.split(',').any(|c| c.trim().to_lowercase() == needle),
            "row {row:?} does not list {needle:?}"
        );
    }

    for row in &input.rows {
        for code in row.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            assert!(table.find(code).is_some(), "entry {code:?} not found");
        }
    }
});
