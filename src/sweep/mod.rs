// Sweep module - filter-order experiment orchestration
//
// Model capacity (the filter order) is selected empirically: for each
// candidate order, load or train-and-cache the (event, noise) weight pair,
// score a held-out test waveform with the dual-filter discriminant, and
// collect the frame-level AUC. There is no closed-form selection rule; the
// (order, AUC) pairs are the output.
//
// Each order runs independently, so one failing order is logged and skipped
// without aborting already-completed results, and a sweep interrupted
// between orders leaves every finished cache entry intact.

pub mod cache;

pub use cache::{WeightCache, WeightPair};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::metrics::roc_curve;
use crate::analysis::scoring::DualFilterScorer;
use crate::analysis::{LmsTrainer, Scorer};
use crate::config::DetectionConfig;
use crate::error::{log_evaluation_error, DetectionError};

/// Exemplar waveforms used to train the two predictors
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// Recording dominated by manatee calls
    pub event_exemplar: Vec<f64>,
    /// Recording of background noise only
    pub noise_exemplar: Vec<f64>,
}

/// Held-out recording with frame-level ground truth
#[derive(Debug, Clone)]
pub struct TestSet {
    pub waveform: Vec<f64>,
    pub labels: Vec<bool>,
}

/// One completed sweep measurement
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub filter_order: usize,
    pub auc: f64,
}

/// SweepRunner drives the train/score/evaluate cycle across filter orders
pub struct SweepRunner {
    config: DetectionConfig,
    cache: WeightCache,
    training: Option<TrainingSet>,
    test: TestSet,
}

impl SweepRunner {
    /// Create a sweep runner
    ///
    /// # Arguments
    /// * `config` - Training, scoring and evaluation parameters
    /// * `cache` - Weight cache checked before any retraining
    /// * `training` - Exemplars for cache misses; pass `None` to require
    ///   every order to be cached already
    /// * `test` - Held-out waveform and frame labels for AUC
    pub fn new(
        config: DetectionConfig,
        cache: WeightCache,
        training: Option<TrainingSet>,
        test: TestSet,
    ) -> Self {
        Self {
            config,
            cache,
            training,
            test,
        }
    }

    /// Load or train the weight pair for one filter order
    ///
    /// Cache hits never retrain. On a miss without training exemplars the
    /// error is propagated to the caller rather than silently retraining
    /// with defaults.
    pub fn weights_for_order(&self, filter_order: usize) -> Result<WeightPair, DetectionError> {
        self.cache.get_or_compute(filter_order, || {
            let training = self
                .training
                .as_ref()
                .ok_or(DetectionError::MissingCacheEntry {
                    order: filter_order,
                })?;
            train_pair(training, filter_order, &self.config)
        })
    }

    /// Run one filter order end to end, returning its frame-level AUC
    pub fn evaluate_order(&self, filter_order: usize) -> Result<f64> {
        let pair = self
            .weights_for_order(filter_order)
            .with_context(|| format!("obtaining weights for filter order {}", filter_order))?;

        let scorer = DualFilterScorer::new(
            pair.event,
            pair.noise,
            self.config.scoring.smoothing_window,
        )?;
        let discriminant = scorer
            .score(&self.test.waveform)
            .with_context(|| format!("scoring test waveform at filter order {}", filter_order))?;

        let curve = roc_curve(
            &discriminant,
            &self.test.labels,
            filter_order,
            &self.config.evaluation,
        )
        .map_err(|err| {
            log_evaluation_error(&err, "sweep");
            err
        })?;
        Ok(curve.auc)
    }

    /// Sweep all candidate filter orders and aggregate (order, AUC) pairs
    ///
    /// Failing orders are logged and skipped; the returned points preserve
    /// the order of the input list.
    pub fn run(&self, filter_orders: &[usize]) -> Vec<SweepPoint> {
        let mut points = Vec::with_capacity(filter_orders.len());

        for &filter_order in filter_orders {
            log::info!("[Sweep] Filter order {}: evaluating", filter_order);
            match self.evaluate_order(filter_order) {
                Ok(auc) => {
                    log::info!("[Sweep] Filter order {}: AUC {:.4}", filter_order, auc);
                    points.push(SweepPoint { filter_order, auc });
                }
                Err(err) => {
                    log::warn!(
                        "[Sweep] Filter order {} failed, skipping: {:#}",
                        filter_order,
                        err
                    );
                }
            }
        }

        points
    }
}

/// Train both predictors of one weight pair
pub fn train_pair(
    training: &TrainingSet,
    filter_order: usize,
    config: &DetectionConfig,
) -> Result<WeightPair, DetectionError> {
    let trainer = LmsTrainer::new(config.training.learning_rate)?;
    let event = trainer.train(&training.event_exemplar, filter_order)?;
    let noise = trainer.train(&training.noise_exemplar, filter_order)?;
    Ok(WeightPair { event, noise })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SyntheticRecording;

    fn temp_cache(name: &str) -> WeightCache {
        let dir = std::env::temp_dir().join(format!(
            "manatee_sweep_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::remove_dir_all(&dir).ok();
        WeightCache::new(dir)
    }

    fn synthetic_runner(cache: WeightCache, with_training: bool) -> SweepRunner {
        let recording = SyntheticRecording::generate(42);
        let training = with_training.then(|| TrainingSet {
            event_exemplar: recording.event_exemplar.clone(),
            noise_exemplar: recording.noise_exemplar.clone(),
        });
        let test = TestSet {
            labels: recording.test_labels(),
            waveform: recording.test_waveform,
        };
        SweepRunner::new(DetectionConfig::default(), cache, training, test)
    }

    #[test]
    fn test_missing_cache_entry_without_training_data() {
        let runner = synthetic_runner(temp_cache("missing_entry"), false);
        let result = runner.weights_for_order(4);
        assert!(matches!(
            result,
            Err(DetectionError::MissingCacheEntry { order: 4 })
        ));
    }

    #[test]
    fn test_sweep_trains_and_caches_each_order() {
        let cache = temp_cache("trains");
        let runner = synthetic_runner(cache.clone(), true);

        let points = runner.run(&[1, 2, 4]);
        assert_eq!(points.len(), 3);
        assert_eq!(
            points.iter().map(|p| p.filter_order).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
        for point in &points {
            assert!(point.auc >= 0.0 && point.auc <= 1.0);
            assert!(cache.load(point.filter_order).unwrap().is_some());
        }
    }

    #[test]
    fn test_sweep_reuses_cached_weights() {
        let cache = temp_cache("reuses");
        let runner = synthetic_runner(cache.clone(), true);
        runner.run(&[2]);
        let stored = cache.load(2).unwrap().unwrap();

        // A runner without training data must still evaluate order 2 from
        // the cache alone
        let cached_runner = synthetic_runner(cache.clone(), false);
        let auc = cached_runner.evaluate_order(2).unwrap();
        assert!(auc >= 0.0 && auc <= 1.0);
        assert_eq!(cache.load(2).unwrap().unwrap(), stored);
    }

    #[test]
    fn test_failed_order_does_not_abort_sweep() {
        let cache = temp_cache("partial");
        let runner = synthetic_runner(cache, true);

        // An order as long as the test waveform cannot be scored
        let bad_order = runner.test.waveform.len();
        let points = runner.run(&[2, bad_order, 4]);
        assert_eq!(
            points.iter().map(|p| p.filter_order).collect::<Vec<_>>(),
            vec![2, 4]
        );
    }

    #[test]
    fn test_weight_pair_lengths_match_order() {
        let runner = synthetic_runner(temp_cache("lengths"), true);
        let pair = runner.weights_for_order(7).unwrap();
        assert_eq!(pair.event.len(), 7);
        assert_eq!(pair.noise.len(), 7);
    }
}
