//! Screen regions for targeted capture and matching

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Whether the region lies entirely inside a screen of the given size
    pub fn fits_within(&self, screen_width: u32, screen_height: u32) -> bool {
        self.is_valid() && self.right() <= screen_width && self.bottom() <= screen_height
    }

    /// Check if this region contains a point
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Translate a point relative to this region into screen coordinates
    pub fn to_screen(&self, x: u32, y: u32) -> (u32, u32) {
        (self.left + x, self.top + y)
    }

    /// Get the center point of this region
    pub fn center(&self) -> (u32, u32) {
        (self.left + self.width / 2, self.top + self.height / 2)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.left, self.top, self.width, self.height
        )
    }
}

impl From<(u32, u32, u32, u32)> for Region {
    fn from((left, top, width, height): (u32, u32, u32, u32)) -> Self {
        Self::new(left, top, width, height)
    }
}
