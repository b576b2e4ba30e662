// WeightCache - persisted LMS weight pairs keyed by filter order
//
// Training both filters is the expensive step of a sweep, so learned weight
// pairs are persisted as JSON, one file per filter order, and checked before
// any retraining. Entries are written to a temp file and renamed into place,
// so an interrupted sweep never leaves a torn cache entry behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// One trained (event, noise) weight pair
///
/// Round-trips exactly through the JSON cache: same lengths, same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    /// Coefficients trained on call exemplars
    pub event: Vec<f64>,
    /// Coefficients trained on background noise
    pub noise: Vec<f64>,
}

/// File-backed key-value cache of weight pairs, keyed by filter order
#[derive(Debug, Clone)]
pub struct WeightCache {
    dir: PathBuf,
}

impl WeightCache {
    /// Create a cache rooted at the given directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Cache file path for one filter order
    pub fn entry_path(&self, filter_order: usize) -> PathBuf {
        self.dir.join(format!("lms_weights_w{}.json", filter_order))
    }

    /// Load the cached weight pair for a filter order, if present
    ///
    /// # Returns
    /// * `Ok(Some(WeightPair))` - Entry found and parsed
    /// * `Ok(None)` - No entry for this order
    /// * `Err(DetectionError)` - Entry exists but could not be read or parsed
    pub fn load(&self, filter_order: usize) -> Result<Option<WeightPair>, DetectionError> {
        let path = self.entry_path(filter_order);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|err| DetectionError::CacheIo {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        let pair: WeightPair =
            serde_json::from_str(&contents).map_err(|err| DetectionError::CacheIo {
                path: path.display().to_string(),
                details: err.to_string(),
            })?;
        Ok(Some(pair))
    }

    /// Persist a weight pair for a filter order
    ///
    /// Writes to a temp file in the cache directory, then renames it into
    /// place, so readers only ever see complete entries.
    pub fn store(&self, filter_order: usize, pair: &WeightPair) -> Result<(), DetectionError> {
        let path = self.entry_path(filter_order);
        let cache_io = |err: std::io::Error| DetectionError::CacheIo {
            path: path.display().to_string(),
            details: err.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(cache_io)?;

        let json = serde_json::to_string_pretty(pair).map_err(|err| DetectionError::CacheIo {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;

        let tmp_path = self.dir.join(format!(".lms_weights_w{}.tmp", filter_order));
        fs::write(&tmp_path, json).map_err(cache_io)?;
        fs::rename(&tmp_path, &path).map_err(cache_io)?;

        log::info!(
            "[WeightCache] Stored weights for filter order {} at {}",
            filter_order,
            path.display()
        );
        Ok(())
    }

    /// Load the entry for a filter order, or compute and persist it
    ///
    /// The compute closure only runs on a cache miss; its result is stored
    /// before being returned.
    pub fn get_or_compute<F>(
        &self,
        filter_order: usize,
        compute: F,
    ) -> Result<WeightPair, DetectionError>
    where
        F: FnOnce() -> Result<WeightPair, DetectionError>,
    {
        if let Some(pair) = self.load(filter_order)? {
            log::info!(
                "[WeightCache] Filter order {}: using stored weights",
                filter_order
            );
            return Ok(pair);
        }

        log::info!(
            "[WeightCache] Filter order {}: computing weights",
            filter_order
        );
        let pair = compute()?;
        self.store(filter_order, &pair)?;
        Ok(pair)
    }
}
