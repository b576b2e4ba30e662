// LmsTrainer - online least-mean-squares FIR predictor fitting
//
// This module fits a fixed-length linear predictor to one exemplar waveform
// via online stochastic weight updates. Two such predictors (one trained on
// call exemplars, one on background noise) feed the dual-filter scorer.
//
// Algorithm (single causal pass, no epochs, no shuffling):
// 1. Initialize the m weights to zero
// 2. For each position i from m to N-1:
//    a. Take the context window x[i-m..i]
//    b. Predict x_hat[i] = dot(w, window)
//    c. Error e = x[i] - x_hat[i]
//    d. Update w += learning_rate * e * window
// 3. Return the final weight vector
//
// Coefficient j multiplies the sample at lag m - j from the predicted
// position; scoring uses the identical window convention, so trained
// weights apply directly.

use crate::error::DetectionError;

/// Full output of one LMS training pass
///
/// Mirrors the per-sample traces produced while adapting: the one-step-ahead
/// prediction and the squared prediction error at every position. Positions
/// before the filter order are zero (no prediction possible).
#[derive(Debug, Clone)]
pub struct TrainingRun {
    /// Final FIR coefficients, length = filter order
    pub weights: Vec<f64>,
    /// One-step-ahead prediction per position
    pub predicted: Vec<f64>,
    /// Squared prediction error per position
    pub squared_error: Vec<f64>,
}

/// LmsTrainer fits FIR predictor weights with a validated learning rate
#[derive(Debug, Clone, Copy)]
pub struct LmsTrainer {
    learning_rate: f64,
}

impl LmsTrainer {
    /// Create a trainer with the given learning rate
    ///
    /// # Arguments
    /// * `learning_rate` - Step size for the stochastic update (typical 0.01)
    ///
    /// # Returns
    /// * `Ok(LmsTrainer)` - Valid trainer
    /// * `Err(DetectionError)` - Learning rate is zero, negative or non-finite
    pub fn new(learning_rate: f64) -> Result<Self, DetectionError> {
        if !(learning_rate > 0.0) || !learning_rate.is_finite() {
            return Err(DetectionError::LearningRateInvalid {
                rate: learning_rate,
            });
        }
        Ok(Self { learning_rate })
    }

    /// Train a predictor of the given order on one exemplar waveform
    ///
    /// Pure function of its inputs: zero initialization and a deterministic
    /// sweep mean identical inputs always produce identical weights.
    ///
    /// # Arguments
    /// * `waveform` - Exemplar signal, length must exceed `filter_order`
    /// * `filter_order` - Number of past samples used per prediction
    ///
    /// # Returns
    /// * `Ok(Vec<f64>)` - Final weight vector of exactly `filter_order` entries
    /// * `Err(DetectionError)` - Filter order is zero or >= waveform length
    pub fn train(
        &self,
        waveform: &[f64],
        filter_order: usize,
    ) -> Result<Vec<f64>, DetectionError> {
        Ok(self.train_run(waveform, filter_order)?.weights)
    }

    /// Train a predictor and keep the per-sample prediction/error traces
    pub fn train_run(
        &self,
        waveform: &[f64],
        filter_order: usize,
    ) -> Result<TrainingRun, DetectionError> {
        validate_filter_order(filter_order, waveform.len())?;

        let n = waveform.len();
        let m = filter_order;
        let mut weights = vec![0.0; m];
        let mut predicted = vec![0.0; n];
        let mut squared_error = vec![0.0; n];

        // The update at position i depends on the weights left by position
        // i-1; this recurrence is strictly sequential.
        for i in m..n {
            let window = &waveform[i - m..i];
            let prediction: f64 = weights.iter().zip(window).map(|(w, x)| w * x).sum();
            let error = waveform[i] - prediction;

            predicted[i] = prediction;
            squared_error[i] = error * error;

            for (w, x) in weights.iter_mut().zip(window) {
                *w += self.learning_rate * error * x;
            }
        }

        Ok(TrainingRun {
            weights,
            predicted,
            squared_error,
        })
    }
}

/// Check that a filter order fits the waveform (1 <= order < length)
pub(crate) fn validate_filter_order(
    filter_order: usize,
    signal_len: usize,
) -> Result<(), DetectionError> {
    if filter_order == 0 || filter_order >= signal_len {
        return Err(DetectionError::FilterOrderInvalid {
            order: filter_order,
            signal_len,
        });
    }
    Ok(())
}
