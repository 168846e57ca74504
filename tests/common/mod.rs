//! Common test utilities for validation testing.
//!
//! This module provides assertion macros, logging setup and small helpers
//! used across the validation test categories.

use schema_rules::{Schema, ValidateOptions, ValidateResult, ValidationFailure};
use serde_json::Value;
use std::sync::Once;


static LOGGING: Once = Once::new();

/// Route `log` output through the test harness once per process.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Validate an owned copy of `data`, returning the validated value.
pub async fn validate_owned(
    schema: &Schema,
    mut data: Value,
    options: ValidateOptions,
) -> ValidateResult<Value> {
    init_logging();
    schema.validate_with(&mut data, options).await.cloned()
}

/// Error messages of a failure, in reported order.
pub fn messages(failure: &ValidationFailure) -> Vec<String> {
    failure.errors().iter().map(|e| e.message.clone()).collect()
}

/// Field paths of a failure, in reported order.
pub fn fields(failure: &ValidationFailure) -> Vec<String> {
    failure.errors().iter().map(|e| e.field.clone()).collect()
}

/// Custom assertion macro for successful validation
#[macro_export]
macro_rules! assert_validation_success {
    ($result:expr) => {
        match $result {
            Ok(_) => {
                // Success as expected
            }
            Err(err) => panic!("Expected validation to succeed, but got error: {:?}", err),
        }
    };
}

/// Custom assertion macro for a failed run, yielding the failure
#[macro_export]
macro_rules! assert_validation_failure {
    ($result:expr) => {
        match $result {
            Err(failure) => failure,
            Ok(value) => panic!("Expected validation to fail, but it passed with {}", value),
        }
    };
}

/// Custom assertion macro for the exact error messages of a failed run
#[macro_export]
macro_rules! assert_error_messages {
    ($result:expr, [$($message:expr),* $(,)?]) => {{
        let failure = $crate::assert_validation_failure!($result);
        let expected: Vec<String> = vec![$($message.to_string()),*];
        assert_eq!($crate::common::messages(&failure), expected);
        failure
    }};
}

/// Custom assertion macro for the field paths of a failed run
#[macro_export]
macro_rules! assert_error_fields {
    ($result:expr, [$($field:expr),* $(,)?]) => {{
        let failure = $crate::assert_validation_failure!($result);
        let expected: Vec<String> = vec![$($field.to_string()),*];
        assert_eq!($crate::common::fields(&failure), expected);
        failure
    }};
}
