// Metrics - threshold-sweep evaluation of a score trace against ground truth
//
// Three independent metrics, each a pure function of a score trace plus
// ground truth:
//
// 1. Interval accuracy at a fixed operating threshold: contiguous
//    above-threshold runs become predicted intervals, matched against
//    ground-truth intervals by sample overlap; accuracy = TP / (TP + FP + FN).
// 2. Precision/recall curve: interval-level classification recomputed over a
//    monotone sweep of evenly spaced thresholds across the observed score
//    range, returned sorted by recall.
// 3. ROC curve / AUC: frame-level rates over the distinct observed score
//    values walked from high to low, AUC by trapezoidal integration. Being
//    rank-based, the AUC is invariant under any strictly increasing
//    transform of the scores.
//
// Degenerate ground truth (no positives, no negatives, no intervals) is an
// explicit error, never a silent division by zero.

use serde::Serialize;

use crate::analysis::ground_truth::{labels_to_intervals, Interval};
use crate::config::{EvaluationConfig, WarmupPolicy};
use crate::error::EvaluationError;

/// A single point on the ROC curve
#[derive(Debug, Clone, Serialize)]
pub struct RocPoint {
    /// Score threshold at which this point is computed; `None` for the
    /// (0, 0) anchor, which sits above every observed score. The field is
    /// omitted from JSON at the anchor so serialized thresholds are always
    /// numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// False positive rate: FP / (FP + TN)
    pub fpr: f64,
    /// True positive rate: TP / (TP + FN)
    pub tpr: f64,
}

/// ROC curve with area under it
#[derive(Debug, Clone, Serialize)]
pub struct RocCurve {
    /// Points from (0, 0) to (1, 1), ascending in FPR
    pub points: Vec<RocPoint>,
    /// Area under the curve (trapezoidal rule), in [0, 1]
    pub auc: f64,
}

/// A single point on the precision/recall curve
#[derive(Debug, Clone, Serialize)]
pub struct PrPoint {
    /// Score threshold at which this point is computed
    pub threshold: f64,
    /// Matched predicted intervals / all predicted intervals
    pub precision: f64,
    /// Matched ground-truth intervals / all ground-truth intervals
    pub recall: f64,
}

/// Precision/recall curve over an interval-level threshold sweep
#[derive(Debug, Clone, Serialize)]
pub struct PrCurve {
    /// Points sorted by ascending recall
    pub points: Vec<PrPoint>,
}

/// Interval-level accuracy at a fixed operating threshold
///
/// Positions with score strictly above `threshold` are classified as event
/// samples and merged into predicted intervals. A ground-truth interval
/// counts as a true positive when some predicted interval overlaps it by at
/// least `min_overlap_samples`; several predicted intervals hitting the same
/// ground-truth interval count once. Unmatched predicted intervals are false
/// positives, unmatched ground-truth intervals false negatives.
///
/// # Arguments
/// * `scores` - Score trace (e.g. the dual-filter discriminant)
/// * `intervals` - Ground-truth event spans
/// * `threshold` - Operating threshold (the reference configuration uses 0)
/// * `config` - Overlap rule
///
/// # Returns
/// * `Ok(f64)` - TP / (TP + FP + FN), in [0, 1]
/// * `Err(EvaluationError)` - No ground-truth intervals
pub fn interval_accuracy(
    scores: &[f64],
    intervals: &[Interval],
    threshold: f64,
    config: &EvaluationConfig,
) -> Result<f64, EvaluationError> {
    if intervals.is_empty() {
        return Err(EvaluationError::NoIntervals);
    }

    let predicted = predicted_intervals(scores, threshold);
    let (matched_truth, matched_predicted) =
        match_intervals(&predicted, intervals, config.min_overlap_samples);

    let tp = matched_truth;
    let fp = predicted.len() - matched_predicted;
    let fn_ = intervals.len() - matched_truth;

    Ok(tp as f64 / (tp + fp + fn_) as f64)
}

/// Precision/recall curve over an evenly spaced threshold sweep
///
/// Sweeps `threshold_steps` thresholds across the observed score range and
/// recomputes the interval-level classification at each. A threshold with no
/// predicted intervals records precision 1 (nothing claimed, nothing wrong).
/// Points are returned sorted by ascending recall for downstream charting.
///
/// # Returns
/// * `Ok(PrCurve)` - Curve points
/// * `Err(EvaluationError)` - No ground-truth intervals or empty score trace
pub fn pr_curve(
    scores: &[f64],
    intervals: &[Interval],
    config: &EvaluationConfig,
) -> Result<PrCurve, EvaluationError> {
    if intervals.is_empty() {
        return Err(EvaluationError::NoIntervals);
    }
    if scores.is_empty() {
        return Err(EvaluationError::ShapeMismatch {
            expected: 1,
            actual: 0,
        });
    }

    let lo = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let steps = config.threshold_steps.max(2);
    let step = (hi - lo) / (steps - 1) as f64;

    let mut points = Vec::with_capacity(steps);
    for k in 0..steps {
        let threshold = lo + step * k as f64;
        let predicted = predicted_intervals(scores, threshold);
        let (matched_truth, matched_predicted) =
            match_intervals(&predicted, intervals, config.min_overlap_samples);

        let precision = if predicted.is_empty() {
            1.0
        } else {
            matched_predicted as f64 / predicted.len() as f64
        };
        let recall = matched_truth as f64 / intervals.len() as f64;

        points.push(PrPoint {
            threshold,
            precision,
            recall,
        });
    }

    points.sort_by(|a, b| {
        a.recall
            .partial_cmp(&b.recall)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(PrCurve { points })
}

/// ROC curve and AUC against frame-level labels
///
/// Walks the distinct observed score values from high to low, accumulating
/// true/false positives, then integrates TPR over FPR with the trapezoidal
/// rule. Warm-up positions (the first `warmup_len` frames, zero by
/// convention) are handled per the configured policy before any counting.
///
/// # Arguments
/// * `scores` - Per-frame score trace
/// * `labels` - Per-frame binary ground truth, same length as `scores`
/// * `warmup_len` - Number of leading positions without a prediction
///   (the filter order; pass 0 for pre-aligned score/label pairs such as
///   per-window classifier outputs)
/// * `config` - Warm-up policy
///
/// # Returns
/// * `Ok(RocCurve)` - Curve points and AUC
/// * `Err(EvaluationError)` - Shape mismatch, or no positive / no negative
///   labels after warm-up handling
pub fn roc_curve(
    scores: &[f64],
    labels: &[bool],
    warmup_len: usize,
    config: &EvaluationConfig,
) -> Result<RocCurve, EvaluationError> {
    if scores.len() != labels.len() {
        return Err(EvaluationError::ShapeMismatch {
            expected: scores.len(),
            actual: labels.len(),
        });
    }

    let warmup = warmup_len.min(scores.len());
    let (scores, labels): (Vec<f64>, Vec<bool>) = match config.warmup_policy {
        WarmupPolicy::Exclude => (scores[warmup..].to_vec(), labels[warmup..].to_vec()),
        WarmupPolicy::TreatAsBackground => {
            let mut relabeled = labels.to_vec();
            for label in &mut relabeled[..warmup] {
                *label = false;
            }
            (scores.to_vec(), relabeled)
        }
    };

    let total_pos = labels.iter().filter(|&&l| l).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 {
        return Err(EvaluationError::NoPositiveSamples);
    }
    if total_neg == 0 {
        return Err(EvaluationError::NoNegativeSamples);
    }

    // Sort by descending score; ties resolved together below
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let p = total_pos as f64;
    let n = total_neg as f64;

    let mut points = vec![RocPoint {
        threshold: None,
        fpr: 0.0,
        tpr: 0.0,
    }];

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        // Consume every sample sharing the current score before emitting a
        // point, so ties never split across thresholds
        let current = scores[order[i]];
        while i < order.len() && scores[order[i]] == current {
            if labels[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold: Some(current),
            fpr: fp as f64 / n,
            tpr: tp as f64 / p,
        });
    }

    let auc = trapezoidal_auc(&points);

    Ok(RocCurve { points, auc })
}

/// Contiguous runs of above-threshold positions as predicted intervals
fn predicted_intervals(scores: &[f64], threshold: f64) -> Vec<Interval> {
    let flags: Vec<bool> = scores.iter().map(|&s| s > threshold).collect();
    labels_to_intervals(&flags)
}

/// Count matched ground-truth and matched predicted intervals
///
/// A pair matches when it shares at least `min_overlap` samples. Returns
/// (ground-truth intervals with a match, predicted intervals with a match).
fn match_intervals(
    predicted: &[Interval],
    truth: &[Interval],
    min_overlap: usize,
) -> (usize, usize) {
    let min_overlap = min_overlap.max(1);

    let matched_truth = truth
        .iter()
        .filter(|t| predicted.iter().any(|p| p.overlap(t) >= min_overlap))
        .count();
    let matched_predicted = predicted
        .iter()
        .filter(|p| truth.iter().any(|t| t.overlap(p) >= min_overlap))
        .count();

    (matched_truth, matched_predicted)
}

/// Trapezoidal integral of TPR over FPR
fn trapezoidal_auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].fpr - pair[0].fpr) * (pair[0].tpr + pair[1].tpr) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> EvaluationConfig {
        EvaluationConfig::default()
    }

    #[test]
    fn test_exact_interval_match_gives_accuracy_one() {
        // Scores positive exactly on the ground-truth span 4..=7
        let mut scores = vec![-1.0; 12];
        for s in &mut scores[4..=7] {
            *s = 1.0;
        }
        let intervals = vec![Interval::new(4, 7)];

        let acc = interval_accuracy(&scores, &intervals, 0.0, &default_config()).unwrap();
        assert_eq!(acc, 1.0);
    }

    #[test]
    fn test_unmatched_prediction_counts_as_false_positive() {
        let mut scores = vec![-1.0; 20];
        for s in &mut scores[4..=7] {
            *s = 1.0;
        }
        for s in &mut scores[14..=15] {
            *s = 1.0;
        }
        let intervals = vec![Interval::new(4, 7)];

        // TP 1, FP 1, FN 0 -> 0.5
        let acc = interval_accuracy(&scores, &intervals, 0.0, &default_config()).unwrap();
        assert_eq!(acc, 0.5);
    }

    #[test]
    fn test_missed_interval_counts_as_false_negative() {
        let scores = vec![-1.0; 20];
        let intervals = vec![Interval::new(4, 7)];

        // TP 0, FP 0, FN 1 -> 0.0
        let acc = interval_accuracy(&scores, &intervals, 0.0, &default_config()).unwrap();
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_accuracy_requires_intervals() {
        let scores = vec![1.0; 10];
        assert!(matches!(
            interval_accuracy(&scores, &[], 0.0, &default_config()),
            Err(EvaluationError::NoIntervals)
        ));
    }

    #[test]
    fn test_min_overlap_rule() {
        // Prediction overlaps the truth by a single sample
        let mut scores = vec![-1.0; 20];
        for s in &mut scores[7..=9] {
            *s = 1.0;
        }
        let intervals = vec![Interval::new(9, 14)];

        let mut config = default_config();
        config.min_overlap_samples = 1;
        assert_eq!(
            interval_accuracy(&scores, &intervals, 0.0, &config).unwrap(),
            1.0
        );

        config.min_overlap_samples = 3;
        assert_eq!(
            interval_accuracy(&scores, &intervals, 0.0, &config).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_pr_curve_sorted_by_recall() {
        let mut scores = vec![0.0; 40];
        for s in &mut scores[10..=19] {
            *s = 2.0;
        }
        for s in &mut scores[30..=34] {
            *s = 1.0;
        }
        let intervals = vec![Interval::new(10, 19), Interval::new(30, 34)];

        let curve = pr_curve(&scores, &intervals, &default_config()).unwrap();
        assert_eq!(curve.points.len(), 100);
        assert!(curve
            .points
            .windows(2)
            .all(|pair| pair[0].recall <= pair[1].recall));
        // The lowest thresholds recover both intervals
        assert_eq!(curve.points.last().unwrap().recall, 1.0);
    }

    #[test]
    fn test_pr_curve_requires_intervals() {
        assert!(matches!(
            pr_curve(&[1.0, 2.0], &[], &default_config()),
            Err(EvaluationError::NoIntervals)
        ));
    }

    #[test]
    fn test_roc_shape_mismatch() {
        assert!(matches!(
            roc_curve(&[1.0, 2.0], &[true], 0, &default_config()),
            Err(EvaluationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_roc_degenerate_labels() {
        let scores = vec![0.5, 0.2, 0.9];

        assert!(matches!(
            roc_curve(&scores, &[false, false, false], 0, &default_config()),
            Err(EvaluationError::NoPositiveSamples)
        ));
        assert!(matches!(
            roc_curve(&scores, &[true, true, true], 0, &default_config()),
            Err(EvaluationError::NoNegativeSamples)
        ));
    }

    #[test]
    fn test_roc_perfect_separation() {
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        let labels = vec![false, false, true, true];

        let curve = roc_curve(&scores, &labels, 0, &default_config()).unwrap();
        assert!((curve.auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_inverted_separation() {
        let scores = vec![0.9, 0.8, 0.2, 0.1];
        let labels = vec![false, false, true, true];

        let curve = roc_curve(&scores, &labels, 0, &default_config()).unwrap();
        assert!(curve.auc.abs() < 1e-12);
    }

    #[test]
    fn test_roc_constant_scores_give_half_auc() {
        // A score trace carrying no information about the labels
        let scores = vec![0.3; 8];
        let labels = vec![true, false, true, false, true, false, true, false];

        let curve = roc_curve(&scores, &labels, 0, &default_config()).unwrap();
        assert!((curve.auc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_invariant_under_monotone_transform() {
        let scores = vec![-0.4, 1.2, 0.3, -2.0, 0.9, 0.1, -0.7, 2.5];
        let labels = vec![false, true, false, false, true, true, false, true];

        let base = roc_curve(&scores, &labels, 0, &default_config()).unwrap();

        let transformed: Vec<f64> = scores.iter().map(|&s| s.exp()).collect();
        let mapped = roc_curve(&transformed, &labels, 0, &default_config()).unwrap();

        assert!((base.auc - mapped.auc).abs() < 1e-12);
    }

    #[test]
    fn test_roc_warmup_treated_as_background() {
        // Positive labels inside the warm-up region are relabeled
        let scores = vec![0.0, 0.0, 0.9, 0.8, 0.1, 0.2];
        let labels = vec![true, true, true, true, false, false];

        let config = default_config();
        let curve = roc_curve(&scores, &labels, 2, &config).unwrap();
        // Remaining positives (indices 2, 3) outscore all negatives
        assert!((curve.auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_warmup_excluded() {
        let scores = vec![0.0, 0.0, 0.9, 0.8, 0.1, 0.2];
        let labels = vec![true, true, true, true, false, false];

        let mut config = default_config();
        config.warmup_policy = WarmupPolicy::Exclude;
        let curve = roc_curve(&scores, &labels, 2, &config).unwrap();
        assert!((curve.auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_all_positives_in_warmup_is_degenerate() {
        let scores = vec![0.0, 0.0, 0.5, 0.4];
        let labels = vec![true, true, false, false];

        assert!(matches!(
            roc_curve(&scores, &labels, 2, &default_config()),
            Err(EvaluationError::NoPositiveSamples)
        ));
    }

    #[test]
    fn test_roc_points_serialize_to_numeric_thresholds() {
        let scores = vec![0.1, 0.5, 0.3, 0.7];
        let labels = vec![false, true, false, true];

        let curve = roc_curve(&scores, &labels, 0, &default_config()).unwrap();
        let json = serde_json::to_value(&curve).unwrap();
        let points = json["points"].as_array().unwrap();

        // The anchor omits its threshold; every other point carries a number
        assert!(points[0].get("threshold").is_none());
        for point in &points[1..] {
            assert!(point["threshold"].is_number());
        }
    }

    #[test]
    fn test_roc_curve_endpoints() {
        let scores = vec![0.1, 0.5, 0.3, 0.7];
        let labels = vec![false, true, false, true];

        let curve = roc_curve(&scores, &labels, 0, &default_config()).unwrap();
        let first = curve.points.first().unwrap();
        let last = curve.points.last().unwrap();
        assert_eq!((first.fpr, first.tpr), (0.0, 0.0));
        assert_eq!((last.fpr, last.tpr), (1.0, 1.0));
    }
}
