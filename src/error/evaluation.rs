// Evaluation error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Evaluation error code constants
///
/// Error code range: 2001-2005
pub struct EvaluationErrorCodes {}

impl EvaluationErrorCodes {
    /// Discriminant trace and ground truth differ in length
    pub const SHAPE_MISMATCH: i32 = 2001;

    /// Ground truth contains no positive samples (TPR undefined)
    pub const NO_POSITIVE_SAMPLES: i32 = 2002;

    /// Ground truth contains no negative samples (FPR undefined)
    pub const NO_NEGATIVE_SAMPLES: i32 = 2003;

    /// Ground truth contains no intervals (interval accuracy undefined)
    pub const NO_INTERVALS: i32 = 2004;

    /// Window size exceeds the signal length
    pub const WINDOW_TOO_LARGE: i32 = 2005;
}

/// Log an evaluation error with structured context
pub fn log_evaluation_error(err: &EvaluationError, context: &str) {
    error!(
        "Evaluation error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Evaluation-related errors
///
/// Shape mismatches fail before any metric computation. Degenerate ground
/// truth (no positives, no negatives, no intervals) is surfaced as an
/// explicit error rather than a silent division by zero or a misleading
/// numeric result.
///
/// Error code range: 2001-2005
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// Score trace length differs from the ground-truth length
    ShapeMismatch { expected: usize, actual: usize },

    /// No positive ground-truth samples; true-positive rate is undefined
    NoPositiveSamples,

    /// No negative ground-truth samples; false-positive rate is undefined
    NoNegativeSamples,

    /// No ground-truth intervals; interval accuracy is undefined
    NoIntervals,

    /// Requested window size does not fit inside the signal
    WindowTooLarge { window: usize, signal_len: usize },
}

impl ErrorCode for EvaluationError {
    fn code(&self) -> i32 {
        match self {
            EvaluationError::ShapeMismatch { .. } => EvaluationErrorCodes::SHAPE_MISMATCH,
            EvaluationError::NoPositiveSamples => EvaluationErrorCodes::NO_POSITIVE_SAMPLES,
            EvaluationError::NoNegativeSamples => EvaluationErrorCodes::NO_NEGATIVE_SAMPLES,
            EvaluationError::NoIntervals => EvaluationErrorCodes::NO_INTERVALS,
            EvaluationError::WindowTooLarge { .. } => EvaluationErrorCodes::WINDOW_TOO_LARGE,
        }
    }

    fn message(&self) -> String {
        match self {
            EvaluationError::ShapeMismatch { expected, actual } => {
                format!(
                    "Trace length mismatch: expected {} samples, got {}",
                    expected, actual
                )
            }
            EvaluationError::NoPositiveSamples => {
                "Ground truth has no positive samples; ROC is undefined".to_string()
            }
            EvaluationError::NoNegativeSamples => {
                "Ground truth has no negative samples; ROC is undefined".to_string()
            }
            EvaluationError::NoIntervals => {
                "Ground truth has no intervals; interval accuracy is undefined".to_string()
            }
            EvaluationError::WindowTooLarge { window, signal_len } => {
                format!(
                    "Window of {} samples does not fit in signal of {} samples",
                    window, signal_len
                )
            }
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EvaluationError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for EvaluationError {}
