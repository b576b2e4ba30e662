// Manatee Detector Core - adaptive dual-filter acoustic event detection
//
// Detects manatee vocalizations in a continuous recording by contrasting
// two adaptively trained FIR predictors (call vs. background noise) and
// scoring each position by how much better the call predictor explains the
// signal. Batch-oriented: the signal is held fully in memory and scores are
// computed in one pass.

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod sweep;
pub mod testing;
pub mod waveform;

// Re-exports for convenience
pub use analysis::{DualFilterScorer, Interval, LmsTrainer, Scorer};
pub use config::DetectionConfig;
pub use error::{DetectionError, EvaluationError};
pub use sweep::{SweepRunner, WeightCache, WeightPair};
