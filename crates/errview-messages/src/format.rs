// SPDX-License-Identifier: MIT OR Apache-2.0
//! Positional placeholder substitution.

use serde_json::Value;

/// Replace `{0}`, `{1}`, ... in `template` with the matching argument.
///
/// String arguments are inserted without quotes, every other JSON value in
/// its compact JSON form. Placeholders without a matching argument, and any
/// brace sequence that is not a plain index, are left untouched.
///
/// ```
/// use errview_messages::format_message;
/// use serde_json::json;
///
/// let out = format_message("{0} has {1} items {2}", &[json!("cart"), json!(3)]);
/// assert_eq!(out, "cart has 3 items {2}");
/// ```
#[must_use]
pub fn format_message(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].trim().parse().ok()?;
            let arg = args.get(index)?;
            Some((render(arg), close))
        });
        match substituted {
            Some((text, close)) => {
                out.push_str(&text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
