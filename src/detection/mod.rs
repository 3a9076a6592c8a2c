//! Detection engine for locating game UI elements on screen
//!
//! Captures the screen (or a region of it), matches templates with
//! normalized cross-correlation, and offers single-shot, retrying and
//! polling searches. Every search blocks the calling thread.

pub mod config;
pub mod detector;
pub mod error;
pub mod region;
pub mod screen;
pub mod template;

#[cfg(test)]
mod tests;

// Re-export main types and functions
pub use config::DetectorConfig;
pub use detector::{Detection, ImageDetector, ScreenPoint, threshold_schedule};
pub use error::{DetectionError, DetectionResult};
pub use region::Region;
pub use screen::{MonitorCapture, ScreenImage, ScreenSource, StillScreen, crop_to_region};
pub use template::Template;
