//! Pending spatial selection and display-to-image coordinate mapping.
//!
//! The UI reports clicks and drags in display coordinates; the service and
//! the cropper want natural image pixels. [`ImageViewport`] converts between
//! the two, the way the image element's natural/client size ratio does.

use egui::{pos2, Pos2, Rect, Vec2};
use retouch_core::{CropRect, Hotspot};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// At most one live selection at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    /// `display` is the click offset inside the shown image, used to draw the marker.
    Point { hotspot: Hotspot, display: Pos2 },
    Crop(CropRect),
}

impl Selection {
    pub fn hotspot(&self) -> Option<Hotspot> {
        match self {
            Selection::Point { hotspot, .. } => Some(*hotspot),
            _ => None,
        }
    }

    pub fn crop(&self) -> Option<CropRect> {
        match self {
            Selection::Crop(rect) => Some(*rect),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Where an image of `natural` size is drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageViewport {
    pub rect: Rect,
    pub natural: Vec2,
}

impl ImageViewport {
    pub fn new(rect: Rect, natural_width: u32, natural_height: u32) -> Self {
        Self {
            rect,
            natural: Vec2::new(natural_width as f32, natural_height as f32),
        }
    }

    /// Natural pixels per display point on each axis. `None` for a collapsed rect.
    pub fn scale(&self) -> Option<Vec2> {
        if self.rect.width() <= 0.0 || self.rect.height() <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            self.natural.x / self.rect.width(),
            self.natural.y / self.rect.height(),
        ))
    }

    /// Map a click to a hotspot, returning it with the display offset.
    pub fn to_hotspot(&self, click: Pos2) -> Option<(Hotspot, Pos2)> {
        if !self.rect.contains(click) {
            trace!("Click {:?} outside image {:?}", click, self.rect);
            return None;
        }
        let scale = self.scale()?;
        let offset = click - self.rect.min;
        let hotspot = Hotspot::new(
            to_pixel(offset.x * scale.x, self.natural.x),
            to_pixel(offset.y * scale.y, self.natural.y),
        );
        debug!("Mapped click {:?} to hotspot {:?}", click, hotspot);
        Some((hotspot, pos2(offset.x, offset.y)))
    }

    /// Map a display-space drag rectangle to natural pixels, clipped to the image.
    pub fn to_crop_rect(&self, selection: Rect) -> Option<CropRect> {
        let scale = self.scale()?;
        // Drags toward the top-left arrive with min and max swapped.
        let selection = Rect::from_two_pos(selection.min, selection.max);
        let clipped = selection.intersect(self.rect);
        if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
            return None;
        }
        let offset = clipped.min - self.rect.min;
        let rect = CropRect::new(
            (offset.x * scale.x).round() as u32,
            (offset.y * scale.y).round() as u32,
            (clipped.width() * scale.x).round() as u32,
            (clipped.height() * scale.y).round() as u32,
        );
        rect.clamp_to(self.natural.x as u32, self.natural.y as u32)
    }
}

// Round, then keep inside [0, extent).
fn to_pixel(value: f32, extent: f32) -> u32 {
    let max = (extent - 1.0).max(0.0);
    value.round().clamp(0.0, max) as u32
}

/// Crop aspect-ratio presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    #[default]
    Free,
    Square,
    FourThree,
    SixteenNine,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::FourThree,
        AspectRatio::SixteenNine,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Free => "Free",
            AspectRatio::Square => "1:1",
            AspectRatio::FourThree => "4:3",
            AspectRatio::SixteenNine => "16:9",
        }
    }

    /// Width divided by height; `None` for free-form.
    pub fn value(&self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::FourThree => Some(4.0 / 3.0),
            AspectRatio::SixteenNine => Some(16.0 / 9.0),
        }
    }

    /// Fit `rect` inside an image of the given size, keeping the ratio.
    ///
    /// The width is kept and the height derived from it; when that height
    /// runs past the bottom edge the height is capped and the width derived
    /// instead. `None` if nothing is left.
    pub fn fit(&self, rect: CropRect, image_width: u32, image_height: u32) -> Option<CropRect> {
        let rect = rect.clamp_to(image_width, image_height)?;
        let Some(ratio) = self.value() else {
            return Some(rect);
        };
        let max_height = image_height - rect.y;

        let mut width = rect.width;
        let mut height = (width as f32 / ratio).round().max(1.0) as u32;
        if height > max_height {
            height = max_height;
            width = ((height as f32 * ratio).round() as u32).clamp(1, rect.width);
        }
        trace!("{} fit {:?} -> {}x{}", self.label(), rect, width, height);
        Some(CropRect::new(rect.x, rect.y, width, height))
    }
}
