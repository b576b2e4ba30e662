// Ground-truth model - labeled event spans and per-sample labels
//
// Ground truth arrives either as a set of closed [low, high] index intervals
// marking true call spans, or as a per-sample binary label trace. The
// evaluation metrics need both representations, so this module provides the
// conversions: interval accuracy and the PR sweep work on intervals, the
// frame-level ROC works on labels.

use serde::{Deserialize, Serialize};

/// A closed, inclusive span of sample indices marking one true event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// First sample index covered by the event
    pub low: usize,
    /// Last sample index covered by the event (inclusive)
    pub high: usize,
}

impl Interval {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    /// Number of samples the interval covers
    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.high < self.low
    }

    /// Number of samples shared with another interval
    pub fn overlap(&self, other: &Interval) -> usize {
        let lo = self.low.max(other.low);
        let hi = self.high.min(other.high);
        if hi >= lo {
            hi - lo + 1
        } else {
            0
        }
    }
}

/// Convert intervals to a per-sample binary label trace
///
/// Sets label true for every index inside any interval (union semantics, so
/// overlapping intervals merge idempotently). Indices past `length` are
/// clipped.
///
/// # Arguments
/// * `intervals` - Event spans, unordered, possibly overlapping
/// * `length` - Output trace length
pub fn intervals_to_labels(intervals: &[Interval], length: usize) -> Vec<bool> {
    let mut labels = vec![false; length];
    for interval in intervals {
        if interval.is_empty() || interval.low >= length {
            continue;
        }
        let hi = interval.high.min(length - 1);
        for label in &mut labels[interval.low..=hi] {
            *label = true;
        }
    }
    labels
}

/// Convert a per-sample binary label trace to maximal contiguous intervals
///
/// The returned intervals are sorted, non-overlapping and non-adjacent; the
/// union of their covered indices exactly equals the set of true labels.
pub fn labels_to_intervals(labels: &[bool]) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &label) in labels.iter().enumerate() {
        match (label, start) {
            (true, None) => start = Some(i),
            (false, Some(low)) => {
                intervals.push(Interval::new(low, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(low) = start {
        intervals.push(Interval::new(low, labels.len() - 1));
    }

    intervals
}

/// Restrict an interval set to the given indices
///
/// Test-set annotations mark a labeled subset (e.g. the "regular" calls) by
/// index into the full interval list; out-of-range indices are skipped with
/// a warning.
pub fn select_intervals(intervals: &[Interval], indices: &[usize]) -> Vec<Interval> {
    indices
        .iter()
        .filter_map(|&idx| {
            if let Some(interval) = intervals.get(idx) {
                Some(*interval)
            } else {
                log::warn!(
                    "[GroundTruth] Selector index {} out of range ({} intervals)",
                    idx,
                    intervals.len()
                );
                None
            }
        })
        .collect()
}
