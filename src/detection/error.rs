use super::region::Region;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for detection operations.
pub type DetectionResult<T> = Result<T, DetectionError>;

/// The error type for screen capture and template matching.
///
/// The public search operations degrade all of these to "no match";
/// `ImageDetector::try_find` surfaces them for diagnostics.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Template not found: {path:?}")]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Template {name} ({template_width}x{template_height}) is larger than capture ({capture_width}x{capture_height})"
    )]
    TemplateTooLarge {
        name: String,
        template_width: u32,
        template_height: u32,
        capture_width: u32,
        capture_height: u32,
    },

    #[error("Screen capture failed: {description}")]
    Capture { description: String },

    #[error("No monitors found")]
    NoMonitor,

    #[error("Capture region {region} exceeds screen bounds ({screen_width}x{screen_height})")]
    RegionOutOfBounds {
        region: Region,
        screen_width: u32,
        screen_height: u32,
    },
}
