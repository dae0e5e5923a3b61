//! Pixel/mm scale resolution
//!
//! Battle maps carry a 1-inch square grid, so the number of squares across
//! each axis fixes the physical size of the raster. The scale is the minimum
//! of the two axis-derived ratios: at most one axis ends up fractionally
//! under-scaled, neither ever prints larger than intended.

use crate::types::{Result, TilingError};

pub const MM_PER_INCH: f32 = 25.4;

/// Linear scale converting raster pixels to physical millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScale {
    pub pixels_per_mm: f32,
}

impl PixelScale {
    pub fn new(pixels_per_mm: f32) -> Result<Self> {
        if pixels_per_mm <= 0.0 || !pixels_per_mm.is_finite() {
            return Err(TilingError::InvalidGeometry(format!(
                "pixels per mm must be positive, was {pixels_per_mm}"
            )));
        }
        Ok(Self { pixels_per_mm })
    }

    /// Derive the scale from the number of 1-inch reference squares spanning
    /// the image.
    pub fn from_reference_squares(
        width_px: u32,
        height_px: u32,
        squares_wide: f32,
        squares_high: f32,
    ) -> Result<Self> {
        if squares_wide <= 0.0 || squares_high <= 0.0 {
            return Err(TilingError::InvalidGeometry(format!(
                "reference square counts must be positive, were {squares_wide}x{squares_high}"
            )));
        }
        let horizontal = width_px as f32 / (squares_wide * MM_PER_INCH);
        let vertical = height_px as f32 / (squares_high * MM_PER_INCH);
        let scale = Self::new(horizontal.min(vertical))?;
        log::info!("calculated {} pixels per mm", scale.pixels_per_mm);
        Ok(scale)
    }

    pub fn px_to_mm(&self, px: f32) -> f32 {
        px / self.pixels_per_mm
    }

    pub fn mm_to_px(&self, mm: f32) -> f32 {
        mm * self.pixels_per_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_axis_wins() {
        // 2000x1000 px, 20x10 one-inch squares: both axes agree
        let scale = PixelScale::from_reference_squares(2000, 1000, 20.0, 10.0).unwrap();
        assert!((scale.pixels_per_mm - 2000.0 / 508.0).abs() < 1e-4);

        // Height axis implies a larger scale; the smaller width-derived
        // scale must win
        let scale = PixelScale::from_reference_squares(2000, 1200, 20.0, 10.0).unwrap();
        assert!((scale.pixels_per_mm - 2000.0 / 508.0).abs() < 1e-4);
    }

    #[test]
    fn test_round_trip() {
        let scale = PixelScale::new(3.5).unwrap();
        let mm = scale.px_to_mm(700.0);
        assert!((scale.mm_to_px(mm) - 700.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(PixelScale::from_reference_squares(2000, 1000, 0.0, 10.0).is_err());
        assert!(PixelScale::new(0.0).is_err());
        assert!(PixelScale::new(-1.0).is_err());
    }
}
