// Types shared by every benchmark implementation
use super::error::BenchmarkResult;
use crate::detection::ScreenPoint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Per-game defaults used when the caller gives no run parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub default_runs: Option<u32>,
    /// Seconds to wait between runs
    pub cooldown: Option<u64>,
}

/// Outcome of a single completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// 1-based run number
    pub run: u32,
    pub duration: Duration,
    /// Template that signalled the end of the run
    pub finished_by: PathBuf,
    pub point: ScreenPoint,
}

pub trait Benchmark {
    fn game_name(&self) -> &str;

    fn config(&self) -> &BenchmarkConfig;

    /// Run `run_count` passes, sleeping `cooldown` between them (not after the last)
    fn run_benchmark_series(
        &mut self,
        run_count: u32,
        cooldown: Duration,
    ) -> BenchmarkResult<Vec<RunRecord>>;
}
