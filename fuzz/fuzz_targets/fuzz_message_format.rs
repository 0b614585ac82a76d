// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz positional placeholder formatting with arbitrary templates.
#![no_main]
use errview_messages::format_message;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, Vec<String>)| {
    let (template, args) = input;
    let args: Vec<serde_json::Value> = args.into_iter().map(serde_json::Value::String).collect();

    let out = format_message(&template, &args);

    // Without arguments nothing is substituted.
    if args.is_empty() {
        assert_eq!(format_message(&template, &[]), template);
    }
    // Text without braces passes through unchanged.
    if !template.contains('{') {
        assert_eq!(out, template);
    }
});
