use crate::detection::DetectionError;
use crate::settings::SettingsError;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for benchmark runs.
pub type BenchmarkResult<T> = Result<T, BenchmarkError>;

/// The error type for running a benchmark series.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Run count must be greater than 0")]
    InvalidRunCount,

    #[error("Failed to apply video settings: {source}")]
    Settings {
        #[from]
        source: SettingsError,
    },

    #[error("Screen detection failed: {source}")]
    Detection {
        #[from]
        source: DetectionError,
    },

    #[error("Run {run} did not finish within {timeout:?}")]
    RunTimeout { run: u32, timeout: Duration },

    #[error("Unknown preset '{name}'")]
    UnknownPreset { name: String },
}

/// The error type for looking up and constructing benchmarks.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Game '{game}' not supported (available: {})", available.join(", "))]
    Unsupported { game: String, available: Vec<String> },

    #[error("Failed to load benchmark for '{game}': {source}")]
    LoadFailed {
        game: String,
        #[source]
        source: BenchmarkError,
    },
}
