use mcs_core::errors::{ErrorInfo, McsError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("parameter", "flatness")
        .with_context("value", "1.5")
}

#[test]
fn parameter_error_surface() {
    let err = McsError::Parameter(sample_info("P001", "flatness out of range"));
    assert_eq!(err.info().code, "P001");
    assert!(err.info().context.contains_key("parameter"));
}

#[test]
fn analysis_error_surface() {
    let err = McsError::Analysis(sample_info("A001", "degenerate baseline"));
    assert_eq!(err.info().code, "A001");
    assert!(err.info().context.contains_key("value"));
}

#[test]
fn rng_error_surface() {
    let err = McsError::Rng(sample_info("RN001", "signal install failed"));
    assert_eq!(err.info().code, "RN001");
}

#[test]
fn serde_error_surface() {
    let err = McsError::Serde(sample_info("S001", "schema mismatch"));
    assert_eq!(err.info().code, "S001");
}

#[test]
fn display_includes_hint_and_context() {
    let err = McsError::Parameter(
        ErrorInfo::new("P002", "multiplier out of range")
            .with_context("multiplier", "1.0")
            .with_hint("choose a value strictly between 0 and 1"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("P002"));
    assert!(rendered.contains("multiplier=1.0"));
    assert!(rendered.contains("choose a value"));
}
