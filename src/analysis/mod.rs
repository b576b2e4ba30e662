// Analysis module - adaptive-filter detection and evaluation pipeline
//
// This module holds the batch detection pipeline: LMS training of FIR
// predictors, dual-filter residual scoring, ground-truth interval handling
// and the threshold-sweep evaluation metrics.
//
// Pipeline: LmsTrainer -> DualFilterScorer -> metrics (accuracy / PR / ROC)

pub mod ground_truth;
pub mod lms;
pub mod metrics;
pub mod scoring;
pub mod window;

pub use ground_truth::{intervals_to_labels, labels_to_intervals, select_intervals, Interval};
pub use lms::{LmsTrainer, TrainingRun};
pub use metrics::{interval_accuracy, pr_curve, roc_curve, PrCurve, PrPoint, RocCurve, RocPoint};
pub use scoring::DualFilterScorer;
pub use window::{slice_windows, window_labels, LabeledWindow};

use crate::error::DetectionError;

/// Anything that turns a waveform into a per-position score trace
///
/// Higher scores mean stronger evidence of an event at that position. The
/// evaluation metrics only ever see a score trace plus ground truth, so any
/// detector implementing this trait (the dual-filter discriminant here, a
/// windowed classifier elsewhere) can be compared head-to-head with the
/// same accuracy/PR/ROC routines.
pub trait Scorer {
    /// Score every position of the waveform
    ///
    /// The returned trace has the same length as the input waveform.
    fn score(&self, waveform: &[f64]) -> Result<Vec<f64>, DetectionError>;
}
