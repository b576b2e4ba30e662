// Error types for the manatee call detector
//
// This module defines custom error types for detection and evaluation
// operations, providing structured error handling with numeric error codes
// for consistent reporting across the CLI and library boundaries.

mod detection;
mod evaluation;

pub use detection::{log_detection_error, DetectionError, DetectionErrorCodes};
pub use evaluation::{log_evaluation_error, EvaluationError, EvaluationErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// component boundaries.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
