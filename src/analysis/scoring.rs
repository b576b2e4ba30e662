// DualFilterScorer - residual-energy contrast between two FIR predictors
//
// Applies two trained predictors (call-class and noise-class) to the same
// waveform with fixed weights, producing a smoothed squared-prediction-error
// trace per predictor and the discriminant (noise error minus call error).
// A large positive discriminant means the call predictor explains the local
// signal better than the noise predictor, i.e. evidence of a call.
//
// Both predictors use the identical context-window convention as training,
// so the two residual traces are directly comparable sample-by-sample.

use crate::analysis::lms::validate_filter_order;
use crate::analysis::Scorer;
use crate::error::{DetectionError, EvaluationError};

/// DualFilterScorer holds one trained weight pair and the smoothing width
#[derive(Debug, Clone)]
pub struct DualFilterScorer {
    event_weights: Vec<f64>,
    noise_weights: Vec<f64>,
    smoothing_window: usize,
}

impl DualFilterScorer {
    /// Create a scorer from a trained weight pair
    ///
    /// # Arguments
    /// * `event_weights` - Coefficients trained on call exemplars
    /// * `noise_weights` - Coefficients trained on background noise
    /// * `smoothing_window` - Boxcar width for residual smoothing (reference
    ///   configuration uses 100 samples)
    ///
    /// # Returns
    /// * `Ok(DualFilterScorer)` - Valid scorer
    /// * `Err(DetectionError)` - Weight vectors are empty or differ in length
    pub fn new(
        event_weights: Vec<f64>,
        noise_weights: Vec<f64>,
        smoothing_window: usize,
    ) -> Result<Self, DetectionError> {
        if event_weights.is_empty() || event_weights.len() != noise_weights.len() {
            return Err(DetectionError::WeightLengthMismatch {
                event: event_weights.len(),
                noise: noise_weights.len(),
            });
        }
        Ok(Self {
            event_weights,
            noise_weights,
            smoothing_window: smoothing_window.max(1),
        })
    }

    /// Filter order of the held weight pair
    pub fn filter_order(&self) -> usize {
        self.event_weights.len()
    }

    /// Compute the smoothed squared-residual trace per predictor
    ///
    /// Positions before the filter order are zero by convention. Each raw
    /// trace is smoothed with a "same"-length boxcar moving average, so the
    /// output traces match the input length.
    ///
    /// # Arguments
    /// * `waveform` - Signal to score, length must exceed the filter order
    ///
    /// # Returns
    /// Tuple of (event residual, noise residual), each of waveform length
    pub fn residuals(&self, waveform: &[f64]) -> Result<(Vec<f64>, Vec<f64>), DetectionError> {
        validate_filter_order(self.filter_order(), waveform.len())?;

        let event_raw = squared_residual(waveform, &self.event_weights);
        let noise_raw = squared_residual(waveform, &self.noise_weights);

        Ok((
            smooth(&event_raw, self.smoothing_window),
            smooth(&noise_raw, self.smoothing_window),
        ))
    }

    /// Discriminant trace: noise residual minus event residual
    ///
    /// # Returns
    /// * `Ok(Vec<f64>)` - Per-position evidence of an event
    /// * `Err(EvaluationError)` - Residual traces differ in length
    pub fn discriminant(
        event_residual: &[f64],
        noise_residual: &[f64],
    ) -> Result<Vec<f64>, EvaluationError> {
        if event_residual.len() != noise_residual.len() {
            return Err(EvaluationError::ShapeMismatch {
                expected: event_residual.len(),
                actual: noise_residual.len(),
            });
        }
        Ok(residual_difference(event_residual, noise_residual))
    }
}

impl Scorer for DualFilterScorer {
    fn score(&self, waveform: &[f64]) -> Result<Vec<f64>, DetectionError> {
        let (event_residual, noise_residual) = self.residuals(waveform)?;
        // residuals() always returns equal-length traces
        Ok(residual_difference(&event_residual, &noise_residual))
    }
}

/// Elementwise noise-minus-event difference behind both `discriminant` and
/// `score`
fn residual_difference(event_residual: &[f64], noise_residual: &[f64]) -> Vec<f64> {
    noise_residual
        .iter()
        .zip(event_residual)
        .map(|(n, e)| n - e)
        .collect()
}

/// Squared one-step-ahead prediction error under fixed weights
///
/// Same window convention as training: coefficient j multiplies the sample
/// at lag m - j. No adaptation happens here.
fn squared_residual(waveform: &[f64], weights: &[f64]) -> Vec<f64> {
    let n = waveform.len();
    let m = weights.len();
    let mut residual = vec![0.0; n];

    for i in m..n {
        let prediction: f64 = weights
            .iter()
            .zip(&waveform[i - m..i])
            .map(|(w, x)| w * x)
            .sum();
        let error = waveform[i] - prediction;
        residual[i] = error * error;
    }

    residual
}

/// "Same"-length boxcar moving average
///
/// Matches a full convolution with a box of `width` entries of value
/// 1/width, truncated to the central `n` outputs: position i sums the
/// samples in [i - width/2, i + (width-1)/2] clamped to the signal, always
/// divided by the full width. Edge positions therefore see a partially
/// overlapping window.
pub(crate) fn smooth(trace: &[f64], width: usize) -> Vec<f64> {
    let n = trace.len();
    if width <= 1 || n == 0 {
        return trace.to_vec();
    }

    let left = width / 2;
    let right = width - 1 - left;
    let scale = 1.0 / width as f64;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right).min(n - 1);
            trace[lo..=hi].iter().sum::<f64>() * scale
        })
        .collect()
}
