//! Spatial selections in natural image pixels.

use serde::{Deserialize, Serialize};

/// The target pixel of a localized edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: u32,
    pub y: u32,
}

impl Hotspot {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with an image of the given size. `None` if nothing is left.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<CropRect> {
        if self.x >= image_width || self.y >= image_height {
            return None;
        }
        let width = self.width.min(image_width - self.x);
        let height = self.height.min(image_height - self.y);
        let clamped = CropRect::new(self.x, self.y, width, height);
        (!clamped.is_empty()).then_some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_trims_overhang() {
        let rect = CropRect::new(80, 10, 50, 200);
        assert_eq!(rect.clamp_to(100, 100), Some(CropRect::new(80, 10, 20, 90)));
    }

    #[test]
    fn clamp_outside_is_none() {
        assert_eq!(CropRect::new(100, 0, 10, 10).clamp_to(100, 100), None);
        assert_eq!(CropRect::new(0, 0, 0, 10).clamp_to(100, 100), None);
    }
}
