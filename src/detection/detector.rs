//! Screen detection engine: single-shot, retrying and polling template searches

use super::{
    config::DetectorConfig,
    error::{DetectionError, DetectionResult},
    region::Region,
    screen::{MonitorCapture, ScreenImage, ScreenSource},
    template::{Template, display_name},
};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// A point in absolute screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: u32,
    pub y: u32,
}

impl ScreenPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A successful match with its diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Center of the best placement, in screen coordinates
    pub point: ScreenPoint,
    pub confidence: f32,
    /// Resolved path of the template that matched
    pub template: PathBuf,
}

/// Thresholds tried by a retrying search, in order
///
/// Attempt `i` uses `initial - i * (initial - min) / max_retries`; with no
/// retries only `initial` is tried.
pub fn threshold_schedule(initial: f32, min: f32, max_retries: u32) -> Vec<f32> {
    let step = if max_retries > 0 {
        (initial - min) / max_retries as f32
    } else {
        0.0
    };
    (0..=max_retries)
        .map(|attempt| initial - attempt as f32 * step)
        .collect()
}

/// Locates UI elements on screen by template matching
pub struct ImageDetector<S: ScreenSource = MonitorCapture> {
    source: S,
    assets_dir: Option<PathBuf>,
    config: DetectorConfig,
}

impl ImageDetector<MonitorCapture> {
    /// Detector over the primary monitor
    pub fn for_monitor(assets_dir: Option<PathBuf>) -> Self {
        Self::new(MonitorCapture::new()).with_assets_dir(assets_dir)
    }
}

impl<S: ScreenSource> ImageDetector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            assets_dir: None,
            config: DetectorConfig::default(),
        }
    }

    pub fn with_assets_dir(mut self, assets_dir: Option<PathBuf>) -> Self {
        self.assets_dir = assets_dir;
        self
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn assets_dir(&self) -> Option<&Path> {
        self.assets_dir.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Capture the region, or the full screen
    pub fn capture(&self, region: Option<Region>) -> DetectionResult<ScreenImage> {
        self.source.capture(region)
    }

    /// Single search that reports why nothing was found
    ///
    /// `Ok(None)` means the best placement scored below `threshold`.
    pub fn try_find(
        &self,
        template: impl AsRef<Path>,
        threshold: f32,
        region: Option<Region>,
    ) -> DetectionResult<Option<Detection>> {
        let template = Template::load(template.as_ref(), self.assets_dir.as_deref())?;
        let screen = self.capture(region)?;

        let matcher = template.matcher();
        if !matcher.fits_within(screen.width(), screen.height()) {
            return Err(DetectionError::TemplateTooLarge {
                name: template.name.clone(),
                template_width: template.width(),
                template_height: template.height(),
                capture_width: screen.width(),
                capture_height: screen.height(),
            });
        }

        let Some(best) = matcher.best_match(screen.pixels()) else {
            return Ok(None);
        };

        if best.score < threshold {
            log::warn!(
                "⚠️ No match found for {} (max confidence {:.2})",
                template.name,
                best.score
            );
            return Ok(None);
        }

        let (cx, cy) = best.centroid(template.width(), template.height());
        let (x, y) = match region {
            Some(region) => region.to_screen(cx, cy),
            None => (cx, cy),
        };
        log::info!(
            "✅ Match found for {} at ({}, {}) with confidence {:.2}",
            template.name,
            x,
            y,
            best.score
        );

        Ok(Some(Detection {
            point: ScreenPoint::new(x, y),
            confidence: best.score,
            template: template.path,
        }))
    }

    /// Find a template on screen; any failure is reported as no match
    pub fn find(
        &self,
        template: impl AsRef<Path>,
        threshold: f32,
        region: Option<Region>,
    ) -> Option<ScreenPoint> {
        match self.try_find(template, threshold, region) {
            Ok(found) => found.map(|d| d.point),
            Err(e) => {
                log::error!("❌ {e}");
                None
            }
        }
    }

    /// Find a template, relaxing the threshold on each retry
    pub fn find_with_retry(
        &self,
        template: impl AsRef<Path>,
        initial_threshold: f32,
        min_threshold: f32,
        max_retries: u32,
        region: Option<Region>,
        check_interval: Duration,
    ) -> Option<ScreenPoint> {
        let template = template.as_ref();
        let name = display_name(template);
        let schedule = threshold_schedule(initial_threshold, min_threshold, max_retries);
        let attempts = schedule.len();

        for (attempt, threshold) in schedule.into_iter().enumerate() {
            log::info!(
                "🔍 Looking for {} (attempt {}/{}, threshold: {:.2})",
                name,
                attempt + 1,
                attempts,
                threshold
            );

            if let Some(point) = self.find(template, threshold, region) {
                if attempt > 0 {
                    log::info!(
                        "✅ Found {} on retry attempt {} with threshold {:.2}",
                        name,
                        attempt + 1,
                        threshold
                    );
                }
                return Some(point);
            }

            if attempt + 1 < attempts {
                sleep(check_interval);
            }
        }

        log::warn!("❌ Failed to find {} after {} attempts", name, attempts);
        None
    }

    /// Poll until the template appears or `timeout` elapses
    pub fn wait_for(
        &self,
        template: impl AsRef<Path>,
        timeout: Duration,
        check_interval: Duration,
        threshold: f32,
        region: Option<Region>,
    ) -> Option<ScreenPoint> {
        let template = template.as_ref();
        let name = display_name(template);
        let start = Instant::now();

        log::info!("⏳ Waiting for {} (timeout: {:?})...", name, timeout);

        while start.elapsed() < timeout {
            if let Some(point) = self.find(template, threshold, region) {
                log::info!(
                    "✅ Found {} after {:.1}s",
                    name,
                    start.elapsed().as_secs_f32()
                );
                return Some(point);
            }
            pause_within(start, timeout, check_interval);
        }

        log::warn!(
            "⌛ Timeout after {:.1}s waiting for {}",
            start.elapsed().as_secs_f32(),
            name
        );
        None
    }

    /// Poll until any of the templates appears; earlier templates win within a tick
    pub fn wait_for_any<P: AsRef<Path>>(
        &self,
        templates: &[P],
        timeout: Duration,
        check_interval: Duration,
        threshold: f32,
        region: Option<Region>,
    ) -> Option<(PathBuf, ScreenPoint)> {
        let names: Vec<String> = templates
            .iter()
            .map(|t| display_name(t.as_ref()))
            .collect();
        let start = Instant::now();

        log::info!(
            "⏳ Waiting for any of {:?} (timeout: {:?})...",
            names,
            timeout
        );

        while start.elapsed() < timeout {
            for (template, name) in templates.iter().zip(&names) {
                if let Some(point) = self.find(template, threshold, region) {
                    log::info!(
                        "✅ Found {} after {:.1}s",
                        name,
                        start.elapsed().as_secs_f32()
                    );
                    return Some((template.as_ref().to_path_buf(), point));
                }
            }
            pause_within(start, timeout, check_interval);
        }

        log::warn!(
            "⌛ Timeout after {:.1}s waiting for any of {:?}",
            start.elapsed().as_secs_f32(),
            names
        );
        None
    }
}

/// Sleep for `interval`, but never past the deadline
fn pause_within(start: Instant, timeout: Duration, interval: Duration) {
    let remaining = timeout.saturating_sub(start.elapsed());
    sleep(interval.min(remaining));
}
