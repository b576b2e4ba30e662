// Windowed-signal interface for alternative detectors
//
// Classifiers that operate on fixed-size chunks (rather than per-sample
// discriminants) consume the raw waveform sliced into fixed-size,
// fixed-stride windows, each carrying a binary label that is the logical OR
// of all frame labels inside the window. Such a classifier produces one
// score per window, and that score vector plus `window_labels` feeds the
// same ROC/AUC routine as the dual-filter discriminant, allowing
// head-to-head comparison.

use crate::error::EvaluationError;

/// One fixed-size slice of a waveform with its window-level label
#[derive(Debug, Clone)]
pub struct LabeledWindow {
    /// Index of the first sample in the window
    pub start: usize,
    /// Window samples, exactly the configured window size
    pub samples: Vec<f64>,
    /// True when any frame inside the window is labeled an event
    pub label: bool,
}

/// Slice a waveform and its frame labels into labeled windows
///
/// Windows start at multiples of `stride`; a trailing remainder shorter than
/// `window_size` is dropped, matching the reference batching behavior.
///
/// # Arguments
/// * `waveform` - Full signal
/// * `labels` - Per-sample binary ground truth, same length as `waveform`
/// * `window_size` - Samples per window (reference configuration: 100)
/// * `stride` - Offset between consecutive window starts
///
/// # Returns
/// * `Ok(Vec<LabeledWindow>)` - At least one window
/// * `Err(EvaluationError)` - Shape mismatch or window larger than signal
pub fn slice_windows(
    waveform: &[f64],
    labels: &[bool],
    window_size: usize,
    stride: usize,
) -> Result<Vec<LabeledWindow>, EvaluationError> {
    if waveform.len() != labels.len() {
        return Err(EvaluationError::ShapeMismatch {
            expected: waveform.len(),
            actual: labels.len(),
        });
    }
    if window_size == 0 || window_size > waveform.len() {
        return Err(EvaluationError::WindowTooLarge {
            window: window_size,
            signal_len: waveform.len(),
        });
    }

    let stride = stride.max(1);
    let mut windows = Vec::new();
    let mut start = 0;
    while start + window_size <= waveform.len() {
        let end = start + window_size;
        windows.push(LabeledWindow {
            start,
            samples: waveform[start..end].to_vec(),
            label: labels[start..end].iter().any(|&l| l),
        });
        start += stride;
    }

    Ok(windows)
}

/// Extract the window-level label vector, aligned with per-window scores
pub fn window_labels(windows: &[LabeledWindow]) -> Vec<bool> {
    windows.iter().map(|w| w.label).collect()
}
