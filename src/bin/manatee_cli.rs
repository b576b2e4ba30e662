use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use manatee_detector::analysis::ground_truth::intervals_to_labels;
use manatee_detector::analysis::metrics::{interval_accuracy, pr_curve, roc_curve, PrCurve, RocCurve};
use manatee_detector::analysis::{labels_to_intervals, Interval};
use manatee_detector::error::log_detection_error;
use manatee_detector::sweep::{train_pair, SweepPoint, TestSet, TrainingSet};
use manatee_detector::waveform::{load_intervals, load_wav};
use manatee_detector::{DetectionConfig, DetectionError, DualFilterScorer, Scorer, SweepRunner, WeightCache};

#[derive(Parser, Debug)]
#[command(
    name = "manatee_cli",
    about = "Adaptive dual-filter manatee call detector"
)]
struct Cli {
    /// Directory holding cached LMS weight pairs (one JSON file per order)
    #[arg(long, default_value = "weights")]
    cache_dir: PathBuf,
    /// Optional JSON config overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train the (event, noise) filter pair for one order and cache it
    Train {
        /// WAV recording dominated by manatee calls
        #[arg(long)]
        event: PathBuf,
        /// WAV recording of background noise only
        #[arg(long)]
        noise: PathBuf,
        #[arg(long)]
        order: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score a recording with cached weights and report detected spans
    Detect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        order: usize,
        /// Operating threshold on the discriminant
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate cached weights against ground-truth intervals
    Evaluate {
        #[arg(long)]
        input: PathBuf,
        /// Ground-truth JSON with low/high interval arrays
        #[arg(long)]
        ground_truth: PathBuf,
        #[arg(long)]
        order: usize,
        /// Restrict to the file's idx_regular subset
        #[arg(long, default_value_t = false)]
        regular_only: bool,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Sweep filter orders and report (order, AUC) pairs
    Sweep {
        #[arg(long)]
        event: PathBuf,
        #[arg(long)]
        noise: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        ground_truth: PathBuf,
        #[arg(long, default_value_t = false)]
        regular_only: bool,
        /// Candidate filter orders
        #[arg(long, num_args = 1.., required = true)]
        orders: Vec<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(DetectionConfig::load_from_file)
        .unwrap_or_default();
    let cache = WeightCache::new(&cli.cache_dir);
    tracing::info!("Weight cache directory: {}", cli.cache_dir.display());

    match cli.command {
        Commands::Train {
            event,
            noise,
            order,
            output,
        } => run_train(&config, &cache, &event, &noise, order, output),
        Commands::Detect {
            input,
            order,
            threshold,
            output,
        } => run_detect(&config, &cache, &input, order, threshold, output),
        Commands::Evaluate {
            input,
            ground_truth,
            order,
            regular_only,
            threshold,
            output,
        } => run_evaluate(
            &config,
            &cache,
            &input,
            &ground_truth,
            order,
            regular_only,
            threshold,
            output,
        ),
        Commands::Sweep {
            event,
            noise,
            input,
            ground_truth,
            regular_only,
            orders,
            output,
        } => run_sweep(
            config,
            cache,
            &event,
            &noise,
            &input,
            &ground_truth,
            regular_only,
            &orders,
            output,
        ),
    }
}

fn run_train(
    config: &DetectionConfig,
    cache: &WeightCache,
    event: &PathBuf,
    noise: &PathBuf,
    order: usize,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let training = TrainingSet {
        event_exemplar: load_wav(event)?,
        noise_exemplar: load_wav(noise)?,
    };
    let pair = train_pair(&training, order, config)
        .with_context(|| format!("training filter pair at order {}", order))?;
    cache.store(order, &pair)?;

    let report = TrainReportPayload {
        filter_order: order,
        event_samples: training.event_exemplar.len(),
        noise_samples: training.noise_exemplar.len(),
        cache_entry: cache.entry_path(order).display().to_string(),
    };
    emit_report(&report, output)?;
    Ok(ExitCode::from(0))
}

fn run_detect(
    config: &DetectionConfig,
    cache: &WeightCache,
    input: &PathBuf,
    order: usize,
    threshold: f64,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let waveform = load_wav(input)?;
    let scorer = scorer_from_cache(config, cache, order)?;
    let discriminant = scorer
        .score(&waveform)
        .with_context(|| format!("scoring {}", input.display()))?;

    let flags: Vec<bool> = discriminant.iter().map(|&d| d > threshold).collect();
    let detections = labels_to_intervals(&flags);

    let report = DetectReportPayload {
        input: input.display().to_string(),
        filter_order: order,
        threshold,
        detection_count: detections.len(),
        detections,
    };
    emit_report(&report, output)?;
    Ok(ExitCode::from(0))
}

#[allow(clippy::too_many_arguments)]
fn run_evaluate(
    config: &DetectionConfig,
    cache: &WeightCache,
    input: &PathBuf,
    ground_truth: &PathBuf,
    order: usize,
    regular_only: bool,
    threshold: f64,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let waveform = load_wav(input)?;
    let intervals = load_intervals(ground_truth, regular_only)?;
    let labels = intervals_to_labels(&intervals, waveform.len());

    let scorer = scorer_from_cache(config, cache, order)?;
    let discriminant = scorer
        .score(&waveform)
        .with_context(|| format!("scoring {}", input.display()))?;

    let accuracy = interval_accuracy(&discriminant, &intervals, threshold, &config.evaluation)?;
    let pr = pr_curve(&discriminant, &intervals, &config.evaluation)?;
    let roc = roc_curve(&discriminant, &labels, order, &config.evaluation)?;

    let report = EvaluateReportPayload {
        input: input.display().to_string(),
        filter_order: order,
        threshold,
        accuracy,
        auc: roc.auc,
        roc,
        pr,
    };
    emit_report(&report, output)?;
    Ok(ExitCode::from(0))
}

#[allow(clippy::too_many_arguments)]
fn run_sweep(
    config: DetectionConfig,
    cache: WeightCache,
    event: &PathBuf,
    noise: &PathBuf,
    input: &PathBuf,
    ground_truth: &PathBuf,
    regular_only: bool,
    orders: &[usize],
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let waveform = load_wav(input)?;
    let intervals = load_intervals(ground_truth, regular_only)?;
    let labels = intervals_to_labels(&intervals, waveform.len());

    let training = TrainingSet {
        event_exemplar: load_wav(event)?,
        noise_exemplar: load_wav(noise)?,
    };
    let test = TestSet {
        waveform,
        labels,
    };

    let runner = SweepRunner::new(config, cache, Some(training), test);
    let points = runner.run(orders);
    let all_succeeded = points.len() == orders.len();

    let report = SweepReportPayload {
        requested_orders: orders.to_vec(),
        points,
    };
    emit_report(&report, output)?;

    // Partial sweeps still report completed points, but exit nonzero
    if all_succeeded {
        Ok(ExitCode::from(0))
    } else {
        Ok(ExitCode::from(2))
    }
}

/// Build a scorer from cached weights for one filter order
fn scorer_from_cache(
    config: &DetectionConfig,
    cache: &WeightCache,
    order: usize,
) -> Result<DualFilterScorer> {
    let pair = match cache.load(order)? {
        Some(pair) => pair,
        None => {
            let err = DetectionError::MissingCacheEntry { order };
            log_detection_error(&err, "scorer setup");
            return Err(err).context("run the train subcommand first");
        }
    };
    Ok(DualFilterScorer::new(
        pair.event,
        pair.noise,
        config.scoring.smoothing_window,
    )?)
}

fn emit_report<T: Serialize>(report: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Serialize)]
struct TrainReportPayload {
    filter_order: usize,
    event_samples: usize,
    noise_samples: usize,
    cache_entry: String,
}

#[derive(Serialize)]
struct DetectReportPayload {
    input: String,
    filter_order: usize,
    threshold: f64,
    detection_count: usize,
    detections: Vec<Interval>,
}

#[derive(Serialize)]
struct EvaluateReportPayload {
    input: String,
    filter_order: usize,
    threshold: f64,
    accuracy: f64,
    auc: f64,
    roc: RocCurve,
    pr: PrCurve,
}

#[derive(Serialize)]
struct SweepReportPayload {
    requested_orders: Vec<usize>,
    points: Vec<SweepPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subcommand_accepts_output_flag() {
        let cli = Cli::try_parse_from([
            "manatee_cli",
            "train",
            "--event",
            "calls.wav",
            "--noise",
            "background.wav",
            "--order",
            "4",
            "--output",
            "report.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Train { order, output, .. } => {
                assert_eq!(order, 4);
                assert_eq!(output, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected the train subcommand"),
        }

        let cli = Cli::try_parse_from([
            "manatee_cli",
            "detect",
            "--input",
            "session.wav",
            "--order",
            "4",
            "--output",
            "report.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Detect { output, .. } => {
                assert_eq!(output, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected the detect subcommand"),
        }
    }
}
