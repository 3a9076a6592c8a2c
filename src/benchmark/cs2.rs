//! Counter-Strike 2 benchmark series

use super::{
    error::{BenchmarkError, BenchmarkResult},
    types::{Benchmark, BenchmarkConfig, RunRecord},
};
use crate::detection::{DetectorConfig, ImageDetector, MonitorCapture, ScreenSource};
use crate::settings::{Cs2PresetAdapter, Preset, PresetAdapter, cs2::BUILTIN_PRESETS};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Template assets root override
pub const ASSETS_DIR_ENV: &str = "KATANA_ASSETS_DIR";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Built-in preset name or path of a JSON preset to apply before the series
pub const PRESET_ENV: &str = "KATANA_CS2_PRESET";

/// Resolution used for built-in presets
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Longest a single run may take before it is considered stuck
pub const RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Screens that appear when a benchmark pass completes, relative to the assets root
pub const FINISHED_TEMPLATES: [&str; 2] = ["cs2/benchmark_finished.png", "cs2/results_screen.png"];

pub struct Cs2Benchmark<S: ScreenSource = MonitorCapture> {
    detector: ImageDetector<S>,
    adapter: Cs2PresetAdapter,
    preset: Option<Preset>,
    config: BenchmarkConfig,
    finished_templates: Vec<PathBuf>,
}

impl Cs2Benchmark<MonitorCapture> {
    /// Benchmark on the primary monitor, configured from the environment
    pub fn from_env() -> BenchmarkResult<Self> {
        let assets_dir = std::env::var_os(ASSETS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
        log::info!("📁 Template assets: {}", assets_dir.display());

        let preset = match std::env::var(PRESET_ENV) {
            Ok(selection) if !selection.trim().is_empty() => Some(load_preset(selection.trim())?),
            _ => None,
        };

        let detector = ImageDetector::for_monitor(Some(assets_dir)).with_config(DetectorConfig {
            timeout: RUN_TIMEOUT,
            ..DetectorConfig::relaxed()
        });
        Ok(Self::new(detector, Cs2PresetAdapter::new(None)).with_preset(preset))
    }
}

impl<S: ScreenSource> Cs2Benchmark<S> {
    pub fn new(detector: ImageDetector<S>, adapter: Cs2PresetAdapter) -> Self {
        Self {
            detector,
            adapter,
            preset: None,
            config: BenchmarkConfig {
                default_runs: Some(3),
                cooldown: Some(30),
            },
            finished_templates: FINISHED_TEMPLATES.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn with_preset(mut self, preset: Option<Preset>) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_config(mut self, config: BenchmarkConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preset(&self) -> Option<&Preset> {
        self.preset.as_ref()
    }

    pub fn detector(&self) -> &ImageDetector<S> {
        &self.detector
    }

    fn apply_preset(&self) -> BenchmarkResult<()> {
        let Some(preset) = &self.preset else {
            log::info!("ℹ️ No preset selected, keeping current video settings");
            return Ok(());
        };

        log::info!(
            "🎛️ Applying preset '{}'",
            preset.name().unwrap_or("unnamed")
        );
        let outcome = self.adapter.apply_preset(preset, true)?;
        log::debug!("Preset outcome: {:?}", outcome);
        Ok(())
    }

    fn run_once(&self, run: u32) -> BenchmarkResult<RunRecord> {
        let config = self.detector.config();
        let start = Instant::now();

        let (finished_by, point) = self
            .detector
            .wait_for_any(
                self.finished_templates.as_slice(),
                config.timeout,
                config.check_interval,
                config.threshold,
                None,
            )
            .ok_or(BenchmarkError::RunTimeout {
                run,
                timeout: config.timeout,
            })?;

        Ok(RunRecord {
            run,
            duration: start.elapsed(),
            finished_by,
            point,
        })
    }
}

impl<S: ScreenSource> Benchmark for Cs2Benchmark<S> {
    fn game_name(&self) -> &str {
        "Counter-Strike 2"
    }

    fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    fn run_benchmark_series(
        &mut self,
        run_count: u32,
        cooldown: Duration,
    ) -> BenchmarkResult<Vec<RunRecord>> {
        if run_count == 0 {
            return Err(BenchmarkError::InvalidRunCount);
        }

        self.apply_preset()?;

        let mut records = Vec::with_capacity(run_count as usize);
        for run in 1..=run_count {
            log::info!("🏁 Benchmark run {}/{}", run, run_count);
            let record = self.run_once(run)?;
            log::info!(
                "✅ Run {} finished in {:.1}s",
                run,
                record.duration.as_secs_f32()
            );
            records.push(record);

            if run < run_count && !cooldown.is_zero() {
                log::info!("🕒 Cooling down for {}s", cooldown.as_secs());
                sleep(cooldown);
            }
        }

        Ok(records)
    }
}

/// Built-in preset by name, otherwise a JSON preset file
pub fn load_preset(selection: &str) -> BenchmarkResult<Preset> {
    let (width, height) = DEFAULT_RESOLUTION;
    if let Some(preset) = Cs2PresetAdapter::builtin_preset(selection, width, height) {
        return Ok(preset);
    }

    let path = PathBuf::from(selection);
    if path.is_file() {
        return Ok(Preset::load(&path)?);
    }

    log::error!(
        "❌ Preset '{}' is neither one of {:?} nor a preset file",
        selection,
        BUILTIN_PRESETS
    );
    Err(BenchmarkError::UnknownPreset {
        name: selection.to_string(),
    })
}
