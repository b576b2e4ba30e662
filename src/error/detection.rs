// Detection error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Detection error code constants
///
/// These constants provide a single source of truth for error codes
/// reported by the trainer, scorer and weight cache.
///
/// Error code range: 1001-1005
pub struct DetectionErrorCodes {}

impl DetectionErrorCodes {
    /// Filter order is zero or not smaller than the waveform length
    pub const FILTER_ORDER_INVALID: i32 = 1001;

    /// Learning rate is zero or negative
    pub const LEARNING_RATE_INVALID: i32 = 1002;

    /// Event and noise weight vectors differ in length (or are empty)
    pub const WEIGHT_LENGTH_MISMATCH: i32 = 1003;

    /// Requested filter order has no cached weights and no training data
    pub const MISSING_CACHE_ENTRY: i32 = 1004;

    /// Weight cache file could not be read or written
    pub const CACHE_IO: i32 = 1005;
}

/// Log a detection error with structured context
///
/// Logs detection errors with the numeric error code, the component context
/// in which the error occurred, and the human-readable message.
pub fn log_detection_error(err: &DetectionError, context: &str) {
    error!(
        "Detection error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Detection-related errors
///
/// These errors cover LMS training, dual-filter scoring and weight cache
/// access. All are detected at component boundaries before any computation
/// starts.
///
/// Error code range: 1001-1005
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Filter order must satisfy 1 <= order < waveform length
    FilterOrderInvalid { order: usize, signal_len: usize },

    /// Learning rate must be a positive finite value
    LearningRateInvalid { rate: f64 },

    /// Event and noise weight vectors must be non-empty and of equal length
    WeightLengthMismatch { event: usize, noise: usize },

    /// No cached weights for the requested filter order and no training
    /// exemplars were supplied
    MissingCacheEntry { order: usize },

    /// Weight cache file access failed
    CacheIo { path: String, details: String },
}

impl ErrorCode for DetectionError {
    fn code(&self) -> i32 {
        match self {
            DetectionError::FilterOrderInvalid { .. } => DetectionErrorCodes::FILTER_ORDER_INVALID,
            DetectionError::LearningRateInvalid { .. } => {
                DetectionErrorCodes::LEARNING_RATE_INVALID
            }
            DetectionError::WeightLengthMismatch { .. } => {
                DetectionErrorCodes::WEIGHT_LENGTH_MISMATCH
            }
            DetectionError::MissingCacheEntry { .. } => DetectionErrorCodes::MISSING_CACHE_ENTRY,
            DetectionError::CacheIo { .. } => DetectionErrorCodes::CACHE_IO,
        }
    }

    fn message(&self) -> String {
        match self {
            DetectionError::FilterOrderInvalid { order, signal_len } => {
                format!(
                    "Filter order {} invalid for signal of {} samples (need 1 <= order < length)",
                    order, signal_len
                )
            }
            DetectionError::LearningRateInvalid { rate } => {
                format!("Learning rate must be positive and finite (got {})", rate)
            }
            DetectionError::WeightLengthMismatch { event, noise } => {
                format!(
                    "Event and noise weight vectors must match (event {}, noise {})",
                    event, noise
                )
            }
            DetectionError::MissingCacheEntry { order } => {
                format!(
                    "No cached weights for filter order {} and no training exemplars supplied",
                    order
                )
            }
            DetectionError::CacheIo { path, details } => {
                format!("Weight cache access failed for {}: {}", path, details)
            }
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DetectionError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for DetectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_error_codes() {
        assert_eq!(
            DetectionError::FilterOrderInvalid {
                order: 20,
                signal_len: 10
            }
            .code(),
            DetectionErrorCodes::FILTER_ORDER_INVALID
        );
        assert_eq!(
            DetectionError::LearningRateInvalid { rate: -0.5 }.code(),
            DetectionErrorCodes::LEARNING_RATE_INVALID
        );
        assert_eq!(
            DetectionError::WeightLengthMismatch { event: 4, noise: 8 }.code(),
            DetectionErrorCodes::WEIGHT_LENGTH_MISMATCH
        );
        assert_eq!(
            DetectionError::MissingCacheEntry { order: 15 }.code(),
            DetectionErrorCodes::MISSING_CACHE_ENTRY
        );
        assert_eq!(
            DetectionError::CacheIo {
                path: "weights.json".to_string(),
                details: "test".to_string()
            }
            .code(),
            DetectionErrorCodes::CACHE_IO
        );
    }

    #[test]
    fn test_detection_error_messages() {
        let err = DetectionError::FilterOrderInvalid {
            order: 20,
            signal_len: 10,
        };
        assert!(err.message().contains("20"));
        assert!(err.message().contains("10"));

        let err = DetectionError::LearningRateInvalid { rate: 0.0 };
        assert!(err.message().contains("positive"));

        let err = DetectionError::MissingCacheEntry { order: 15 };
        assert!(err.message().contains("15"));
    }

    #[test]
    fn test_detection_error_display() {
        let err = DetectionError::LearningRateInvalid { rate: -1.0 };
        let display = format!("{}", err);
        assert!(display.contains("DetectionError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
