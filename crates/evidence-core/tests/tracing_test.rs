//! Tests for tracing initialization.

use evidence_core::tracing::setup::DEFAULT_LOG_FILTER;
use evidence_core::tracing::{filter_from, init_tracing};

/// T0-TRC-01: init_tracing is idempotent
#[test]
fn test_init_tracing_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(component = "test", "tracing initialized");
}

/// T0-TRC-02: missing or unparsable directives fall back to the default
#[test]
fn test_filter_falls_back_to_default() {
    let rendered = |d: Option<&str>| filter_from(d).to_string().to_ascii_lowercase();
    assert_eq!(rendered(None), DEFAULT_LOG_FILTER);
    assert_eq!(rendered(Some("evidence=notalevel")), DEFAULT_LOG_FILTER);
}

/// T0-TRC-03: valid directives are kept
#[test]
fn test_filter_keeps_valid_directives() {
    let filter = filter_from(Some("evidence_analysis=debug"))
        .to_string()
        .to_ascii_lowercase();
    assert!(filter.contains("evidence_analysis=debug"), "{filter}");
}
