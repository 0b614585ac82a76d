// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for errview.
//!
//! [`ResolverConfig`] holds the rule tables and switches the resolver is
//! built from. Helpers load it from TOML, apply environment overrides, merge
//! overlays and report advisory [`ConfigWarning`]s.
//!
//! ```toml
//! default_error_view = "error/general"
//! default_status_code = 500
//! log_enable = true
//!
//! [status_codes]
//! "error/not-found" = 404
//!
//! [[exception_mappings]]
//! pattern = "NotFound"
//! view = "error/not-found"
//!
//! [[error_code_mappings]]
//! codes = "ORDER_REJECTED, ORDER_EXPIRED"
//! view = "error/order"
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file (or an environment override) could not be parsed.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// An exception mapping with an empty pattern matches every kind.
    EmptyPattern {
        /// Position in `exception_mappings`.
        index: usize,
    },
    /// A code list contains a blank entry, which never matches.
    EmptyCodeEntry {
        /// Position in `error_code_mappings`.
        index: usize,
        /// The raw code list.
        codes: String,
    },
    /// A row can never win because an earlier row has the same key.
    ShadowedMapping {
        /// Table the row belongs to.
        table: &'static str,
        /// The repeated pattern or code.
        key: String,
    },
    /// A status code is configured for a view nothing resolves to.
    UnreachableStatusView {
        /// The view name.
        view: String,
    },
    /// A recommended optional field is missing.
    MissingOptionalField {
        /// Name of the missing field.
        field: String,
        /// Why it matters.
        hint: String,
    },
    /// A log category is configured but logging is disabled.
    LoggingDisabled {
        /// The configured category.
        category: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::EmptyPattern { index } => {
                write!(f, "exception_mappings[{index}] has an empty pattern and matches every error")
            }
            ConfigWarning::EmptyCodeEntry { index, codes } => {
                write!(f, "error_code_mappings[{index}] contains a blank code in '{codes}'")
            }
            ConfigWarning::ShadowedMapping { table, key } => {
                write!(f, "{table}: '{key}' is shadowed by an earlier row")
            }
            ConfigWarning::UnreachableStatusView { view } => {
                write!(f, "status code configured for view '{view}' which no mapping produces")
            }
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
            ConfigWarning::LoggingDisabled { category } => {
                write!(f, "warn_log_category '{category}' is set but log_enable is false")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Attribute name the fault is exposed under when none is configured.
pub const DEFAULT_EXCEPTION_ATTRIBUTE: &str = "exception";

/// Log category used when logging is enabled without an explicit category.
pub const DEFAULT_LOG_CATEGORY: &str = "errview.resolver";

/// Resolver configuration, loaded once before serving traffic.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ResolverConfig {
    /// View rendered when neither table matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_error_view: Option<String>,

    /// Status applied when a resolved view has no entry in `status_codes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_status_code: Option<u16>,

    /// Forward every resolved error to the error logger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_enable: Option<bool>,

    /// Category the stock logger reports under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_log_category: Option<String>,

    /// Model attribute holding the fault; an empty string disables exposure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_attribute: Option<String>,

    /// Mark rendered error views as non-cacheable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevent_response_caching: Option<bool>,

    /// HTTP status per view name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub status_codes: BTreeMap<String, u16>,

    /// Ordered kind-name pattern → view rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exception_mappings: Vec<ExceptionMapping>,

    /// Ordered code list → view rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_code_mappings: Vec<ErrorCodeMapping>,
}

impl ResolverConfig {
    /// Whether the logging hook is active.
    #[must_use]
    pub fn log_enabled(&self) -> bool {
        self.log_enable.unwrap_or(false)
    }

    /// Attribute the fault is exposed under, `None` when disabled.
    #[must_use]
    pub fn exception_attribute(&self) -> Option<&str> {
        match self.exception_attribute.as_deref() {
            None => Some(DEFAULT_EXCEPTION_ATTRIBUTE),
            Some(attr) if attr.trim().is_empty() => None,
            Some(attr) => Some(attr),
        }
    }

    /// Whether error views should carry `Cache-Control: no-store`.
    #[must_use]
    pub fn prevents_response_caching(&self) -> bool {
        self.prevent_response_caching.unwrap_or(false)
    }

    /// Category for the stock logger: the configured one or the default.
    #[must_use]
    pub fn log_category(&self) -> &str {
        self.warn_log_category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_CATEGORY)
    }
}

/// One row of the kind mapping table.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ExceptionMapping {
    /// Substring matched against qualified kind names.
    pub pattern: String,
    /// View rendered on match.
    pub view: String,
}

/// One row of the error-code mapping table.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorCodeMapping {
    /// Comma-separated codes, compared trimmed and case-insensitively.
    pub codes: String,
    /// View rendered on match.
    pub view: String,
}

impl ErrorCodeMapping {
    /// Trimmed code entries of this row, blanks included.
    pub fn code_entries(&self) -> impl Iterator<Item = &str> {
        self.codes.split(',').map(str::trim)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Inclusive range of acceptable HTTP status codes.
const STATUS_RANGE: std::ops::RangeInclusive<u16> = 100..=599;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`ResolverConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ResolverConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => ResolverConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML string into a [`ResolverConfig`].
pub fn parse_toml(content: &str) -> Result<ResolverConfig, ConfigError> {
    toml::from_str::<ResolverConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `ERRVIEW_DEFAULT_ERROR_VIEW`
/// - `ERRVIEW_DEFAULT_STATUS_CODE`
/// - `ERRVIEW_LOG_ENABLE` (`true`/`false`/`1`/`0`)
/// - `ERRVIEW_WARN_LOG_CATEGORY`
pub fn apply_env_overrides(config: &mut ResolverConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("ERRVIEW_DEFAULT_ERROR_VIEW") {
        config.default_error_view = Some(val);
    }
    if let Ok(val) = std::env::var("ERRVIEW_DEFAULT_STATUS_CODE") {
        let code = val.trim().parse::<u16>().map_err(|e| ConfigError::ParseError {
            reason: format!("ERRVIEW_DEFAULT_STATUS_CODE '{val}': {e}"),
        })?;
        config.default_status_code = Some(code);
    }
    if let Ok(val) = std::env::var("ERRVIEW_LOG_ENABLE") {
        config.log_enable = Some(parse_bool(&val).ok_or_else(|| ConfigError::ParseError {
            reason: format!("ERRVIEW_LOG_ENABLE '{val}' is not a boolean"),
        })?);
    }
    if let Ok(val) = std::env::var("ERRVIEW_WARN_LOG_CATEGORY") {
        config.warn_log_category = Some(val);
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (blank view names, out-of-range status codes) are returned
/// as a [`ConfigError::ValidationError`]. Rows that can never match are
/// accepted as given and only reported as warnings.
pub fn validate_config(config: &ResolverConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref view) = config.default_error_view {
        if view.trim().is_empty() {
            errors.push("default_error_view must not be blank".into());
        }
    }
    if let Some(code) = config.default_status_code {
        if !STATUS_RANGE.contains(&code) {
            errors.push(format!("default_status_code {code} out of range (100..=599)"));
        }
    }

    let mut seen_patterns = HashSet::new();
    for (index, row) in config.exception_mappings.iter().enumerate() {
        if row.view.trim().is_empty() {
            errors.push(format!("exception_mappings[{index}]: view must not be blank"));
        }
        if row.pattern.is_empty() {
            warnings.push(ConfigWarning::EmptyPattern { index });
        }
        if !seen_patterns.insert(row.pattern.as_str()) {
            warnings.push(ConfigWarning::ShadowedMapping {
                table: "exception_mappings",
                key: row.pattern.clone(),
            });
        }
    }

    let mut seen_codes = HashSet::new();
    for (index, row) in config.error_code_mappings.iter().enumerate() {
        if row.view.trim().is_empty() {
            errors.push(format!("error_code_mappings[{index}]: view must not be blank"));
        }
        let mut blank_reported = false;
        for code in row.code_entries() {
            if code.is_empty() {
                if !blank_reported {
                    warnings.push(ConfigWarning::EmptyCodeEntry {
                        index,
                        codes: row.codes.clone(),
                    });
                    blank_reported = true;
                }
                continue;
            }
            if !seen_codes.insert(code.to_lowercase()) {
                warnings.push(ConfigWarning::ShadowedMapping {
                    table: "error_code_mappings",
                    key: code.to_string(),
                });
            }
        }
    }

    let reachable: BTreeSet<&str> = config
        .exception_mappings
        .iter()
        .map(|m| m.view.as_str())
        .chain(config.error_code_mappings.iter().map(|m| m.view.as_str()))
        .chain(config.default_error_view.as_deref())
        .collect();
    for (view, code) in &config.status_codes {
        if view.trim().is_empty() {
            errors.push("status_codes: view name must not be blank".into());
        }
        if !STATUS_RANGE.contains(code) {
            errors.push(format!(
                "status_codes['{view}']: {code} out of range (100..=599)"
            ));
        }
        if !reachable.contains(view.as_str()) {
            warnings.push(ConfigWarning::UnreachableStatusView { view: view.clone() });
        }
    }

    if config.default_error_view.is_none() {
        warnings.push(ConfigWarning::MissingOptionalField {
            field: "default_error_view".into(),
            hint: "unmapped errors fall through to the framework's own handling".into(),
        });
    }
    if let Some(ref category) = config.warn_log_category {
        if !config.log_enabled() {
            warnings.push(ConfigWarning::LoggingDisabled {
                category: category.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
///
/// Mapping rows from `overlay` come first so they win ties; `base` rows
/// whose pattern (or code list) also appears in `overlay` are dropped.
/// Status-code maps are combined; on collisions the overlay entry wins.
pub fn merge_configs(base: ResolverConfig, overlay: ResolverConfig) -> ResolverConfig {
    let mut status_codes = base.status_codes;
    status_codes.extend(overlay.status_codes);

    let overlay_patterns: HashSet<String> = overlay
        .exception_mappings
        .iter()
        .map(|m| m.pattern.clone())
        .collect();
    let mut exception_mappings = overlay.exception_mappings;
    exception_mappings.extend(
        base.exception_mappings
            .into_iter()
            .filter(|m| !overlay_patterns.contains(&m.pattern)),
    );

    let overlay_codes: HashSet<String> = overlay
        .error_code_mappings
        .iter()
        .map(|m| m.codes.clone())
        .collect();
    let mut error_code_mappings = overlay.error_code_mappings;
    error_code_mappings.extend(
        base.error_code_mappings
            .into_iter()
            .filter(|m| !overlay_codes.contains(&m.codes)),
    );

    ResolverConfig {
        default_error_view: overlay.default_error_view.or(base.default_error_view),
        default_status_code: overlay.default_status_code.or(base.default_status_code),
        log_enable: overlay.log_enable.or(base.log_enable),
        warn_log_category: overlay.warn_log_category.or(base.warn_log_category),
        exception_attribute: overlay.exception_attribute.or(base.exception_attribute),
        prevent_response_caching: overlay
            .prevent_response_caching
            .or(base.prevent_response_caching),
        status_codes,
        exception_mappings,
        error_code_mappings,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mapping(pattern: &str, view: &str) -> ExceptionMapping {
        ExceptionMapping {
            pattern: pattern.into(),
            view: view.into(),
        }
    }

    fn code_mapping(codes: &str, view: &str) -> ErrorCodeMapping {
        ErrorCodeMapping {
            codes: codes.into(),
            view: view.into(),
        }
    }

    // -- 1. Default config is valid ------------------------------------------

    #[test]
    fn default_config_is_valid() {
        let cfg = ResolverConfig::default();
        let warnings = validate_config(&cfg).expect("default config should be valid");
        assert!(!warnings.is_empty(), "should have advisory warnings");
    }

    // -- 2. Default accessors ------------------------------------------------

    #[test]
    fn default_accessors() {
        let cfg = ResolverConfig::default();
        assert!(!cfg.log_enabled());
        assert!(!cfg.prevents_response_caching());
        assert_eq!(cfg.exception_attribute(), Some(DEFAULT_EXCEPTION_ATTRIBUTE));
        assert_eq!(cfg.log_category(), DEFAULT_LOG_CATEGORY);
    }

    #[test]
    fn blank_exception_attribute_disables_exposure() {
        let cfg = ResolverConfig {
            exception_attribute: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.exception_attribute(), None);
        let cfg = ResolverConfig {
            exception_attribute: Some("error".into()),
            ..Default::default()
        };
        assert_eq!(cfg.exception_attribute(), Some("error"));
    }

    // -- 3. Parse a full TOML document ---------------------------------------

    #[test]
    fn parse_valid_toml_string() {
        let toml = r#"
            default_error_view = "error/general"
            default_status_code = 500
            log_enable = true
            warn_log_category = "app.errors"

            [status_codes]
            "error/not-found" = 404

            [[exception_mappings]]
            pattern = "NotFound"
            view = "error/not-found"

            [[exception_mappings]]
            pattern = "Timeout"
            view = "error/busy"

            [[error_code_mappings]]
            codes = "ERR001, ERR002"
            view = "error/business"
        "#;
        let cfg = parse_toml(toml).unwrap();
        assert_eq!(cfg.default_error_view.as_deref(), Some("error/general"));
        assert_eq!(cfg.default_status_code, Some(500));
        assert!(cfg.log_enabled());
        assert_eq!(cfg.log_category(), "app.errors");
        assert_eq!(cfg.status_codes["error/not-found"], 404);
        assert_eq!(cfg.exception_mappings.len(), 2);
        assert_eq!(cfg.exception_mappings[0].pattern, "NotFound");
        assert_eq!(cfg.exception_mappings[1].view, "error/busy");
        assert_eq!(cfg.error_code_mappings[0].codes, "ERR001, ERR002");
    }

    // -- 4. Invalid TOML produces ParseError ---------------------------------

    #[test]
    fn parse_invalid_toml_gives_parse_error() {
        let err = parse_toml("this is [not valid toml =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_wrong_types_gives_parse_error() {
        let err = parse_toml("default_status_code = \"five hundred\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let err = parse_toml("default_status_code = 70000").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn empty_string_toml_parses_to_defaults() {
        assert_eq!(parse_toml("").unwrap(), ResolverConfig::default());
    }

    // -- 5. Code entries -----------------------------------------------------

    #[test]
    fn code_entries_are_trimmed() {
        let row = code_mapping(" a , B,,c ", "v");
        let entries: Vec<&str> = row.code_entries().collect();
        assert_eq!(entries, vec!["a", "B", "", "c"]);
    }

    // -- 6. Hard validation errors -------------------------------------------

    #[test]
    fn validation_catches_blank_views() {
        let cfg = ResolverConfig {
            default_error_view: Some("  ".into()),
            exception_mappings: vec![mapping("Foo", "")],
            error_code_mappings: vec![code_mapping("A", " ")],
            ..Default::default()
        };
        match validate_config(&cfg).unwrap_err() {
            ConfigError::ValidationError { reasons } => {
                assert_eq!(reasons.len(), 3, "{reasons:?}");
                assert!(reasons.iter().any(|r| r.contains("default_error_view")));
                assert!(reasons.iter().any(|r| r.contains("exception_mappings[0]")));
                assert!(reasons.iter().any(|r| r.contains("error_code_mappings[0]")));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn validation_catches_status_out_of_range() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            default_status_code: Some(99),
            status_codes: BTreeMap::from([("error".into(), 600)]),
            ..Default::default()
        };
        match validate_config(&cfg).unwrap_err() {
            ConfigError::ValidationError { reasons } => {
                assert!(reasons.iter().any(|r| r.contains("default_status_code 99")));
                assert!(reasons.iter().any(|r| r.contains("600")));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    // -- 7. Advisory warnings ------------------------------------------------

    #[test]
    fn malformed_code_rows_only_warn() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            error_code_mappings: vec![code_mapping("A,,B", "v1"), code_mapping(",", "v2")],
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        let blanks: Vec<_> = warnings
            .iter()
            .filter(|w| matches!(w, ConfigWarning::EmptyCodeEntry { .. }))
            .collect();
        assert_eq!(blanks.len(), 2);
    }

    #[test]
    fn empty_pattern_warns() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            exception_mappings: vec![mapping("", "catch-all")],
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(warnings.contains(&ConfigWarning::EmptyPattern { index: 0 }));
    }

    #[test]
    fn shadowed_rows_warn() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            exception_mappings: vec![mapping("Foo", "a"), mapping("Foo", "b")],
            error_code_mappings: vec![code_mapping("X1", "a"), code_mapping("x1, X2", "b")],
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(warnings.contains(&ConfigWarning::ShadowedMapping {
            table: "exception_mappings",
            key: "Foo".into(),
        }));
        assert!(warnings.contains(&ConfigWarning::ShadowedMapping {
            table: "error_code_mappings",
            key: "x1".into(),
        }));
    }

    #[test]
    fn unreachable_status_view_warns() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            status_codes: BTreeMap::from([("error".into(), 500), ("orphan".into(), 418)]),
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(warnings.contains(&ConfigWarning::UnreachableStatusView {
            view: "orphan".into()
        }));
        assert!(!warnings.contains(&ConfigWarning::UnreachableStatusView {
            view: "error".into()
        }));
    }

    #[test]
    fn category_without_logging_warns() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            warn_log_category: Some("app".into()),
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert_eq!(
            warnings,
            vec![ConfigWarning::LoggingDisabled {
                category: "app".into()
            }]
        );
    }

    // -- 8. Merging ----------------------------------------------------------

    #[test]
    fn merge_overlay_overrides_scalars() {
        let base = ResolverConfig {
            default_error_view: Some("base".into()),
            default_status_code: Some(500),
            log_enable: Some(true),
            ..Default::default()
        };
        let overlay = ResolverConfig {
            default_error_view: Some("overlay".into()),
            log_enable: Some(false),
            ..Default::default()
        };
        let merged = merge_configs(base, overlay);
        assert_eq!(merged.default_error_view.as_deref(), Some("overlay"));
        assert_eq!(merged.default_status_code, Some(500));
        assert!(!merged.log_enabled());
    }

    #[test]
    fn merge_puts_overlay_rows_first() {
        let base = ResolverConfig {
            exception_mappings: vec![mapping("Foo", "base-foo"), mapping("Bar", "base-bar")],
            error_code_mappings: vec![code_mapping("A", "base-a")],
            ..Default::default()
        };
        let overlay = ResolverConfig {
            exception_mappings: vec![mapping("Foo", "overlay-foo"), mapping("Baz", "overlay-baz")],
            error_code_mappings: vec![code_mapping("B", "overlay-b")],
            ..Default::default()
        };
        let merged = merge_configs(base, overlay);
        let rows: Vec<(&str, &str)> = merged
            .exception_mappings
            .iter()
            .map(|m| (m.pattern.as_str(), m.view.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("Foo", "overlay-foo"), ("Baz", "overlay-baz"), ("Bar", "base-bar")]
        );
        assert_eq!(merged.error_code_mappings[0].codes, "B");
        assert_eq!(merged.error_code_mappings[1].codes, "A");
    }

    #[test]
    fn merge_combines_status_codes() {
        let base = ResolverConfig {
            status_codes: BTreeMap::from([("a".into(), 400), ("b".into(), 401)]),
            ..Default::default()
        };
        let overlay = ResolverConfig {
            status_codes: BTreeMap::from([("b".into(), 403)]),
            ..Default::default()
        };
        let merged = merge_configs(base, overlay);
        assert_eq!(merged.status_codes["a"], 400);
        assert_eq!(merged.status_codes["b"], 403);
    }

    // -- 9. Serialization ----------------------------------------------------

    #[test]
    fn toml_roundtrip() {
        let cfg = ResolverConfig {
            default_error_view: Some("error".into()),
            default_status_code: Some(500),
            log_enable: Some(true),
            warn_log_category: Some("cat".into()),
            exception_attribute: Some("ex".into()),
            prevent_response_caching: Some(true),
            status_codes: BTreeMap::from([("error".into(), 500)]),
            exception_mappings: vec![mapping("Foo", "error")],
            error_code_mappings: vec![code_mapping("A,B", "error")],
        };
        let serialized = toml::to_string(&cfg).unwrap();
        let back: ResolverConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn json_schema_lists_fields() {
        let schema = schemars::schema_for!(ResolverConfig);
        let json = serde_json::to_value(&schema).unwrap();
        let props = json["properties"].as_object().unwrap();
        assert!(props.contains_key("exception_mappings"));
        assert!(props.contains_key("error_code_mappings"));
        assert!(props.contains_key("status_codes"));
    }

    // -- 10. Loading from disk -----------------------------------------------

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errview.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "default_error_view = \"error\"\nprevent_response_caching = true").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.default_error_view.as_deref(), Some("error"));
        assert!(cfg.prevents_response_caching());
    }

    #[test]
    fn load_missing_file_gives_file_not_found() {
        let err = load_config(Some(Path::new("/nonexistent/errview.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn parse_bool_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::FileNotFound { path: "/foo".into() };
        assert!(e.to_string().contains("/foo"));
        let e = ConfigError::ParseError {
            reason: "bad toml".into(),
        };
        assert!(e.to_string().contains("bad toml"));
    }

    #[test]
    fn config_warning_display() {
        let w = ConfigWarning::EmptyCodeEntry {
            index: 2,
            codes: "A,,B".into(),
        };
        let s = w.to_string();
        assert!(s.contains("[2]"));
        assert!(s.contains("A,,B"));
        let w = ConfigWarning::ShadowedMapping {
            table: "exception_mappings",
            key: "Foo".into(),
        };
        assert!(w.to_string().contains("Foo"));
    }
}
