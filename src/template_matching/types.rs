/// Template matching data types

/// Best placement of a template inside a searched image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Left edge of the placement in the searched image
    pub x: u32,
    /// Top edge of the placement in the searched image
    pub y: u32,
    /// Normalized correlation score (-1.0..=1.0, 1.0 is identical)
    pub score: f32,
}

impl Match {
    pub fn new(x: u32, y: u32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Center of the placement for a template of the given size
    pub fn centroid(&self, template_width: u32, template_height: u32) -> (u32, u32) {
        (self.x + template_width / 2, self.y + template_height / 2)
    }
}
