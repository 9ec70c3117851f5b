//! Timing harness comparing the word sorters over growing samples.
//!
//! Produces plain numbers only; drawing the chart is up to the caller.

use crate::error::{Result, TraceError};
use crate::words::{WordSortAlgorithm, sort_words};
use serde::Serialize;
use std::hint::black_box;
use std::time::Instant;

/// Sample sizes, warm-up runs and repetitions for [`run_word_benchmark`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub sample_sizes: Vec<usize>,
    pub warmup_runs: usize,
    pub repetitions: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sample_sizes: vec![100, 500, 1_000, 2_000, 5_000],
            warmup_runs: 1,
            repetitions: 3,
        }
    }
}

impl BenchConfig {
    pub fn largest_sample(&self) -> usize {
        self.sample_sizes.iter().copied().max().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_sizes.is_empty() {
            return Err(TraceError::InvalidParameter {
                parameter: "sample-sizes".to_string(),
                reason: "at least one sample size is required".to_string(),
            });
        }
        if self.sample_sizes.contains(&0) {
            return Err(TraceError::InvalidParameter {
                parameter: "sample-sizes".to_string(),
                reason: "sample sizes must be >= 1".to_string(),
            });
        }
        if self.repetitions == 0 {
            return Err(TraceError::InvalidParameter {
                parameter: "repetitions".to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// One measurement: sample size and mean duration in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DataPoint {
    pub size: usize,
    pub millis: f64,
}

/// Measurements of one algorithm.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<DataPoint>,
}

/// Everything a chart needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchReport {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: Vec<Series>,
    pub total_seconds: f64,
}

/// Runs `action` `count` times, discarding the results.
pub fn warmup<F: FnMut()>(mut action: F, count: usize) {
    for _ in 0..count {
        action();
    }
}

/// Mean wall-clock duration of `action` over `repetitions` runs, in ms.
pub fn measure_duration_ms<F: FnMut()>(mut action: F, repetitions: usize) -> f64 {
    let repetitions = repetitions.max(1);
    let start = Instant::now();
    for _ in 0..repetitions {
        action();
    }
    start.elapsed().as_secs_f64() * 1_000.0 / repetitions as f64
}

/// Times quick and radix word sorting on prefixes of `words`.
///
/// Each sample size uses the first `size` words. Every run sorts a fresh copy
/// of the sample. Fails when `words` is shorter than the largest sample.
pub fn run_word_benchmark<S: AsRef<str>>(words: &[S], config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;
    let required = config.largest_sample();
    if words.len() < required {
        return Err(TraceError::InsufficientWords { found: words.len(), required });
    }

    let started = Instant::now();
    let mut series: Vec<Series> = WordSortAlgorithm::ALL
        .iter()
        .map(|algorithm| Series { label: algorithm.label().to_string(), points: Vec::new() })
        .collect();

    for &size in &config.sample_sizes {
        let sample: Vec<&str> = words[..size].iter().map(AsRef::as_ref).collect();
        for (algorithm, series) in WordSortAlgorithm::ALL.iter().zip(series.iter_mut()) {
            let millis = measure_sort(&sample, *algorithm, config);
            log::info!("{} on {size} words: {millis:.3} ms", algorithm.label());
            series.points.push(DataPoint { size, millis });
        }
    }

    Ok(BenchReport {
        title: "Word sort timing".to_string(),
        x_axis: "Words".to_string(),
        y_axis: "Time, ms".to_string(),
        series,
        total_seconds: started.elapsed().as_secs_f64(),
    })
}

fn measure_sort(sample: &[&str], algorithm: WordSortAlgorithm, config: &BenchConfig) -> f64 {
    let run = || {
        black_box(sort_words(sample.iter().copied(), algorithm));
    };
    warmup(run, config.warmup_runs);
    measure_duration_ms(run, config.repetitions)
}
