//! Template resolution and loading

use super::error::{DetectionError, DetectionResult};
use crate::template_matching::TemplateMatcher;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// A reference image of a UI element, loaded for one search
#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub name: String,
    pub pixels: RgbImage,
}

impl Template {
    /// Resolve a template path, falling back to `assets_root / path`
    pub fn resolve(path: &Path, assets_root: Option<&Path>) -> DetectionResult<PathBuf> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        if let Some(root) = assets_root {
            let candidate = root.join(path);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(DetectionError::TemplateNotFound {
            path: path.to_path_buf(),
        })
    }

    /// Resolve and decode a template as a 3-channel color image
    pub fn load(path: &Path, assets_root: Option<&Path>) -> DetectionResult<Self> {
        let resolved = Self::resolve(path, assets_root)?;
        let image = image::open(&resolved).map_err(|source| DetectionError::TemplateLoad {
            path: resolved.clone(),
            source,
        })?;

        Ok(Self {
            name: display_name(&resolved),
            path: resolved,
            pixels: image.to_rgb8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn matcher(&self) -> TemplateMatcher {
        TemplateMatcher::new(&self.pixels)
    }
}

/// File name of a template path, for log messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}
