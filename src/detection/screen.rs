//! Screen capture sources
//!
//! Captures are returned as 3-channel RGB buffers. Matching sums the
//! correlation over channels, so the channel order has no effect on scores.

use super::error::{DetectionError, DetectionResult};
use super::region::Region;
use image::{DynamicImage, RgbImage};

/// A captured screen or screen region
#[derive(Debug, Clone)]
pub struct ScreenImage {
    pixels: RgbImage,
}

impl ScreenImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Anything that can produce screen captures
pub trait ScreenSource {
    /// Capture the region, or the full screen when `region` is `None`
    fn capture(&self, region: Option<Region>) -> DetectionResult<ScreenImage>;
}

/// Crop a full-screen frame down to a region, validating bounds
pub fn crop_to_region(frame: RgbImage, region: Option<Region>) -> DetectionResult<RgbImage> {
    let Some(region) = region else {
        return Ok(frame);
    };

    if !region.fits_within(frame.width(), frame.height()) {
        return Err(DetectionError::RegionOutOfBounds {
            region,
            screen_width: frame.width(),
            screen_height: frame.height(),
        });
    }

    let cropped = image::imageops::crop_imm(
        &frame,
        region.left,
        region.top,
        region.width,
        region.height,
    );
    Ok(cropped.to_image())
}

/// Captures the primary monitor of the local machine
#[derive(Debug, Clone, Default)]
pub struct MonitorCapture;

impl MonitorCapture {
    pub fn new() -> Self {
        Self
    }

    /// The primary monitor, or the first one when none is flagged primary
    fn select_monitor(&self) -> DetectionResult<xcap::Monitor> {
        let monitors = xcap::Monitor::all().map_err(|e| DetectionError::Capture {
            description: format!("Failed to enumerate monitors: {e}"),
        })?;

        let primary = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        monitors.into_iter().nth(primary).ok_or(DetectionError::NoMonitor)
    }
}

impl ScreenSource for MonitorCapture {
    fn capture(&self, region: Option<Region>) -> DetectionResult<ScreenImage> {
        let start = std::time::Instant::now();
        let monitor = self.select_monitor()?;

        let frame = monitor.capture_image().map_err(|e| DetectionError::Capture {
            description: e.to_string(),
        })?;
        let frame = DynamicImage::ImageRgba8(frame).to_rgb8();
        let pixels = crop_to_region(frame, region)?;

        log::debug!(
            "📸 Captured {}x{} in {}ms",
            pixels.width(),
            pixels.height(),
            start.elapsed().as_millis()
        );
        Ok(ScreenImage::new(pixels))
    }
}

/// Serves captures from a fixed image, e.g. a saved screenshot
#[derive(Debug, Clone)]
pub struct StillScreen {
    frame: RgbImage,
}

impl StillScreen {
    pub fn new(frame: RgbImage) -> Self {
        Self { frame }
    }
}

impl ScreenSource for StillScreen {
    fn capture(&self, region: Option<Region>) -> DetectionResult<ScreenImage> {
        crop_to_region(self.frame.clone(), region).map(ScreenImage::new)
    }
}
