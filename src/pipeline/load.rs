//! Image loading: decode extracted raster files in page order.

use crate::error::GridError;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::debug;

/// Decode each raster file into memory, preserving the given order.
///
/// The extractor already gates on emptiness, so `EmptySetError` here is a
/// defensive check rather than an expected path.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<DynamicImage>, GridError> {
    if paths.is_empty() {
        return Err(GridError::EmptySetError);
    }

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::open(path).map_err(|source| GridError::DecodeError {
            path: path.clone(),
            source,
        })?;
        images.push(img);
    }

    debug!("Decoded {} raster pages", images.len());
    Ok(images)
}
