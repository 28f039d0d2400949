// Local crop: the one transformation done without the service.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat};
use retouch_core::{Artifact, CropRect, ImageMime};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CropError {
    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("the crop area lies outside the image")]
    OutOfBounds,
}

/// Natural size of an artifact, decoded from its header.
pub fn image_dimensions(artifact: &Artifact) -> Result<(u32, u32), CropError> {
    let image = image::load_from_memory(artifact.bytes())?;
    Ok(image.dimensions())
}

/// Crop `artifact` to `rect` and re-encode as PNG.
pub fn crop_artifact(artifact: &Artifact, rect: CropRect) -> Result<Artifact, CropError> {
    let image = image::load_from_memory(artifact.bytes())?;
    let (width, height) = image.dimensions();
    let rect = rect.clamp_to(width, height).ok_or(CropError::OutOfBounds)?;
    debug!(
        "Cropping {} ({}x{}) to {:?}",
        artifact.name(),
        width,
        height,
        rect
    );

    let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let mut bytes = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    let result = Artifact::generated("cropped", ImageMime::Png, bytes);
    info!("Cropped to {}x{} -> {}", rect.width, rect.height, result.name());
    Ok(result)
}
