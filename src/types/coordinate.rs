use serde::{Deserialize, Serialize};

/// Resolution-independent position within a reference surface.
///
/// Both axes are percentages of the surface's rendered width/height, nominally
/// in `[0, 100]`. Values outside that range are kept as-is: a pointer event just
/// outside the tracked surface maps to a cue just off-frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both axes fall within the reference surface.
    pub fn is_within_surface(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

/// Rendered pixel size of a surface (user device or admin mirror).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns this surface scaled uniformly, e.g. the admin mirror rendered at 85%.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}
