// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz resolver config parsing, validation and merging.
#![no_main]
use errview_config::{merge_configs, parse_toml, validate_config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = parse_toml(s) else {
        return;
    };

    // Validation reports, it never panics.
    let _ = validate_config(&cfg);

    // Merging with itself keeps every overlay row and drops the duplicates.
    let merged = merge_configs(cfg.clone(), cfg.clone());
    assert_eq!(merged.exception_mappings.len(), cfg.exception_mappings.len());
    assert_eq!(merged.error_code_mappings.len(), cfg.error_code_mappings.len());

    // Derived accessors must not panic on arbitrary values.
    let _ = cfg.exception_attribute();
    let _ = cfg.log_category();
});
