//! Tile extraction and page composition
//!
//! Walks the plan's page grid, crops the source raster into page-sized
//! tiles (extended by the overlap strip on non-final edges) and attaches
//! the registration marks each printed sheet needs for reassembly.

use crate::marks::{RegistrationMark, registration_marks};
use crate::types::{LayoutPlan, PixelRect, Result, Tile, TilingError};

/// Source of raster data for composition.
///
/// The core never inspects pixel contents; it only needs dimensions and the
/// ability to cut out a rectangle. Crop rectangles are always within the
/// bounds reported by `dimensions`.
pub trait RasterSource {
    /// Opaque raster handle produced by cropping
    type Raster;

    /// Source dimensions as (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Cut out the given rectangle
    fn crop(&mut self, rect: PixelRect) -> Self::Raster;
}

/// One composed output page: the tile geometry, its cropped raster and the
/// registration marks to draw on the sheet.
#[derive(Debug, Clone)]
pub struct TilePage<R> {
    pub tile: Tile,
    pub raster: R,
    pub marks: Vec<RegistrationMark>,
}

/// Crop the source into tiles for every page of the plan.
///
/// Tiles are ordered column by column: for each grid x, all grid y values in
/// order. Fails with [`TilingError::DimensionMismatch`] when the source is
/// not the image the plan was computed from.
pub fn compose<S: RasterSource>(source: &mut S, plan: &LayoutPlan) -> Result<Vec<TilePage<S::Raster>>> {
    let (width_px, height_px) = source.dimensions();
    if (width_px, height_px) != (plan.image_width_px, plan.image_height_px) {
        return Err(TilingError::DimensionMismatch {
            expected_width: plan.image_width_px,
            expected_height: plan.image_height_px,
            actual_width: width_px,
            actual_height: height_px,
        });
    }

    let page_width_px = plan.page_width_mm * plan.pixels_per_mm;
    let page_height_px = plan.page_height_mm * plan.pixels_per_mm;
    let (overlap_east_mm, overlap_south_mm) = plan.overlap.oriented(plan.orientation);
    let overlap_east_px = overlap_east_mm * plan.pixels_per_mm;
    let overlap_south_px = overlap_south_mm * plan.pixels_per_mm;

    let mut pages = Vec::with_capacity(plan.total_pages() as usize);
    for x in 0..plan.pages_horizontal {
        for y in 0..plan.pages_vertical {
            let crop = PixelRect {
                left: (x as f32 * page_width_px) as u32,
                top: (y as f32 * page_height_px) as u32,
                right: ((x + 1) as f32 * page_width_px + overlap_east_px).min(width_px as f32)
                    as u32,
                bottom: ((y + 1) as f32 * page_height_px + overlap_south_px).min(height_px as f32)
                    as u32,
            };
            let tile = Tile {
                grid_x: x,
                grid_y: y,
                crop,
                last_horizontal: x + 1 == plan.pages_horizontal,
                last_vertical: y + 1 == plan.pages_vertical,
            };
            let marks = registration_marks(plan, &tile);
            log::debug!(
                "tile ({x},{y}): crop {}x{} px at ({},{}), {} marks",
                crop.width(),
                crop.height(),
                crop.left,
                crop.top,
                marks.len()
            );
            pages.push(TilePage {
                tile,
                raster: source.crop(crop),
                marks,
            });
        }
    }

    log::info!("composed {} tile pages", pages.len());
    Ok(pages)
}
