//! Tests for the error taxonomy and its transport-boundary form.

use evidence_core::errors::error_code;
use evidence_core::errors::*;

/// T0-ERR-01: every analysis error maps to its stable code
#[test]
fn test_analysis_error_codes() {
    let cases = [
        (AnalysisError::insufficient("x"), "INSUFFICIENT_DATA"),
        (AnalysisError::ambiguous("x"), "AMBIGUOUS_INPUT"),
        (AnalysisError::degenerate("x"), "DEGENERATE_INPUT"),
        (
            AnalysisError::unsupported("paired_comparison", "x"),
            "UNSUPPORTED_METHOD",
        ),
        (
            AnalysisError::UnknownSession {
                session_id: "s".into(),
            },
            "UNKNOWN_SESSION",
        ),
        (
            AnalysisError::invalid_parameter("alpha", "x"),
            "INVALID_PARAMETER",
        ),
    ];
    for (err, code) in cases {
        assert_eq!(err.error_code(), code);
    }
}

/// T0-ERR-02: coded_string prefixes the code
#[test]
fn test_coded_string_format() {
    let err = AnalysisError::insufficient("group 'a' has 1 value");
    assert_eq!(
        err.coded_string(),
        "[INSUFFICIENT_DATA] Insufficient data: group 'a' has 1 value"
    );
}

/// T0-ERR-03: messages carry their context
#[test]
fn test_messages_carry_context() {
    let err = AnalysisError::unsupported("correlation_analysis", "needs two variables");
    let msg = err.to_string();
    assert!(msg.contains("correlation_analysis"));
    assert!(msg.contains("needs two variables"));

    let err = AnalysisError::invalid_parameter("confidence_level", "1.2 out of range");
    assert!(err.to_string().contains("confidence_level"));
}

/// T0-ERR-04: failures serialize as code + message
#[test]
fn test_failure_from_error_serializes() {
    let failure: AnalysisFailure = AnalysisError::degenerate("zero variance").into();
    assert_eq!(failure.code, error_code::DEGENERATE_INPUT);
    assert_eq!(failure.to_string(), "[DEGENERATE_INPUT] Degenerate input: zero variance");

    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["code"], "DEGENERATE_INPUT");
    assert_eq!(json["message"], "Degenerate input: zero variance");
}

#[test]
fn test_config_error_code() {
    let err = ConfigError::ValidationFailed {
        field: "analysis.alpha".into(),
        message: "bad".into(),
    };
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    let failure = AnalysisFailure::from(err);
    assert!(failure.message.contains("analysis.alpha"));
}
