//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_conversion_failed_display() {
    let err = Error::ConversionFailed("mesh has no faces".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Geometry conversion failed"));
    assert!(display.contains("mesh has no faces"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("object handle".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("object handle"));
}

#[test]
fn test_dispatcher_error_display() {
    let err = Error::DispatcherError("no threads".to_string());
    assert_eq!(format!("{}", err), "Geometry dispatcher error: no threads");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::ConversionFailed("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::DispatcherError("pool".to_string()));
    assert!(debug.contains("DispatcherError"));

    let debug = format!("{:?}", Error::InvalidResource("h".to_string()));
    assert!(debug.contains("InvalidResource"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("geometry".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

fn fails() -> Result<u32> {
    Err(Error::ConversionFailed("boom".to_string()))
}

fn propagates() -> Result<u32> {
    let value = fails()?;
    Ok(value + 1)
}

#[test]
fn test_result_propagation() {
    let result = propagates();
    assert!(matches!(result, Err(Error::ConversionFailed(_))));
}

#[test]
fn test_engine_err_macro_builds_invalid_resource() {
    let err = crate::engine_err!("galaxy3d::Test", "handle {} is stale", 7);
    match err {
        Error::InvalidResource(msg) => assert_eq!(msg, "handle 7 is stale"),
        other => panic!("unexpected error: {:?}", other),
    }
}
