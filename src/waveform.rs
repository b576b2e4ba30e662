// Waveform and ground-truth input
//
// Recordings arrive as WAV files (loaded via hound, mixed down to mono,
// normalized to f64 in [-1, 1]) and ground truth as JSON: either parallel
// `low`/`high` interval arrays (optionally with an index selector) or a
// flat 0/1 label array. Loading happens once per run; the owned buffers are
// then passed by reference into the trainer, scorer and evaluation calls.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::analysis::ground_truth::{select_intervals, Interval};

/// Load a WAV file as a mono f64 waveform
///
/// Multi-channel files are averaged across channels. Integer sample formats
/// are normalized by their full-scale value.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("opening WAV file {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("reading float samples from {}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("reading int samples from {}", path.display()))?
        }
    };

    if channels <= 1 {
        return Ok(samples);
    }

    // Mix down interleaved channels
    let mono: Vec<f64> = samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect();
    Ok(mono)
}

/// On-disk ground-truth interval format
///
/// `low[k]..=high[k]` is the k-th event span. The optional `idx_regular`
/// selector restricts evaluation to a labeled subset of the intervals.
#[derive(Debug, Deserialize)]
struct IntervalFile {
    low: Vec<usize>,
    high: Vec<usize>,
    #[serde(default)]
    idx_regular: Option<Vec<usize>>,
}

/// Load ground-truth intervals from a JSON file
///
/// When the file carries an `idx_regular` selector and `regular_only` is
/// set, only the selected intervals are returned.
pub fn load_intervals<P: AsRef<Path>>(path: P, regular_only: bool) -> Result<Vec<Interval>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading ground-truth file {}", path.display()))?;
    let file: IntervalFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing ground-truth JSON {}", path.display()))?;

    if file.low.len() != file.high.len() {
        bail!(
            "ground-truth file {}: low has {} entries, high has {}",
            path.display(),
            file.low.len(),
            file.high.len()
        );
    }

    let intervals: Vec<Interval> = file
        .low
        .iter()
        .zip(&file.high)
        .map(|(&low, &high)| Interval::new(low, high))
        .collect();

    match (&file.idx_regular, regular_only) {
        (Some(indices), true) => Ok(select_intervals(&intervals, indices)),
        _ => Ok(intervals),
    }
}

/// Load frame-level binary labels from a JSON array of 0/1 values
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<bool>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading label file {}", path.display()))?;
    let raw: Vec<u8> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing label JSON {}", path.display()))?;
    Ok(raw.into_iter().map(|v| v != 0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("manatee_waveform_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_load_intervals_plain() {
        let path = temp_path("intervals.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"low": [4, 20], "high": [7, 25]}}"#).unwrap();

        let intervals = load_intervals(&path, false).unwrap();
        assert_eq!(
            intervals,
            vec![Interval::new(4, 7), Interval::new(20, 25)]
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_intervals_regular_subset() {
        let path = temp_path("intervals_regular.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"low": [4, 20, 40], "high": [7, 25, 44], "idx_regular": [0, 2]}}"#
        )
        .unwrap();

        let all = load_intervals(&path, false).unwrap();
        assert_eq!(all.len(), 3);

        let regular = load_intervals(&path, true).unwrap();
        assert_eq!(regular, vec![Interval::new(4, 7), Interval::new(40, 44)]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_intervals_rejects_mismatched_arrays() {
        let path = temp_path("intervals_bad.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"low": [4, 20], "high": [7]}}"#).unwrap();

        assert!(load_intervals(&path, false).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_labels() {
        let path = temp_path("labels.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "[0, 1, 1, 0]").unwrap();

        let labels = load_labels(&path).unwrap();
        assert_eq!(labels, vec![false, true, true, false]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_wav_round_trip_mono() {
        let path = temp_path("mono.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &v in &[0i16, 16384, -16384, 0] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let waveform = load_wav(&path).unwrap();
        assert_eq!(waveform.len(), 4);
        assert!((waveform[1] - 0.5).abs() < 1e-3);
        assert!((waveform[2] + 0.5).abs() < 1e-3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_wav_stereo_mixdown() {
        let path = temp_path("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        // One frame: left 16384, right 0 -> mono 0.25
        writer.write_sample(16384i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let waveform = load_wav(&path).unwrap();
        assert_eq!(waveform.len(), 1);
        assert!((waveform[0] - 0.25).abs() < 1e-3);
        std::fs::remove_file(&path).ok();
    }
}
