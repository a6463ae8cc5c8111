//! Coordinate Mapper.
//!
//! Converts pointer offsets on a rendered surface into percentage coordinates
//! and back. Both views must map against the same logical reference rectangle
//! (same aspect ratio) for a cue placed on one to land on the same element in
//! the other; the mapper does not check that.

use crate::types::coordinate::Coordinate;
use crate::types::errors::MapperError;

/// Maps a pointer offset (relative to the surface's top-left corner) to a
/// percentage coordinate.
///
/// Results are not clamped: offsets outside the surface yield values below 0
/// or above 100.
pub fn to_percentage(
    pointer_offset_x: f64,
    pointer_offset_y: f64,
    surface_width: f64,
    surface_height: f64,
) -> Result<Coordinate, MapperError> {
    validate_surface(surface_width, surface_height)?;
    Ok(Coordinate {
        x: pointer_offset_x / surface_width * 100.0,
        y: pointer_offset_y / surface_height * 100.0,
    })
}

/// Renders a percentage coordinate onto a surface of the given pixel size.
pub fn to_pixels(coordinate: &Coordinate, surface_width: f64, surface_height: f64) -> (f64, f64) {
    (
        coordinate.x / 100.0 * surface_width,
        coordinate.y / 100.0 * surface_height,
    )
}

fn validate_surface(width: f64, height: f64) -> Result<(), MapperError> {
    // NaN fails both comparisons, so it is rejected too.
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        Ok(())
    } else {
        Err(MapperError::InvalidSurface { width, height })
    }
}
