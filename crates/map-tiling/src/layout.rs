//! Layout planning
//!
//! Decides how many pages a map needs and in which orientation. Both
//! orientations are evaluated against the printable area of the paper and
//! the one producing fewer pages wins; an exact tie keeps portrait.

use crate::options::TilingOptions;
use crate::scale::PixelScale;
use crate::types::{BorderSpec, LayoutPlan, Orientation, OverlapSpec, PaperSize, Result, TilingError};

/// Pages needed along one axis.
///
/// When a single printable span already covers the extent, no overlap strip
/// is needed and the answer is exactly 1 regardless of the overlap value.
/// Otherwise every non-final page consumes `printable + overlap` of source
/// extent, because the overlap strip duplicates content that the next page
/// covers again.
fn pages_along(size_mm: f32, printable_mm: f32, overlap_mm: f32) -> u32 {
    let pages = if (size_mm / printable_mm).ceil() <= 1.0 {
        1
    } else {
        (size_mm / (printable_mm + overlap_mm)).ceil() as u32
    };
    log::debug!("pages(size={size_mm} printable={printable_mm} overlap={overlap_mm}) = {pages}");
    pages
}

fn zero_if_one(pages: u32, value_mm: f32) -> f32 {
    if pages == 1 { 0.0 } else { value_mm }
}

/// Compute the layout plan for an image of known physical size.
///
/// Fails with [`TilingError::InvalidGeometry`] when the border margins leave
/// no printable area on the chosen paper.
pub fn plan(
    image_width_mm: f32,
    image_height_mm: f32,
    paper: PaperSize,
    border: &BorderSpec,
    overlap: &OverlapSpec,
    scale: PixelScale,
) -> Result<LayoutPlan> {
    if image_width_mm <= 0.0 || image_height_mm <= 0.0 {
        return Err(TilingError::InvalidGeometry(format!(
            "image dimensions must be positive, were {image_width_mm}x{image_height_mm} mm"
        )));
    }

    let (paper_width, paper_height) = paper.dimensions_mm();
    let printable_width = paper_width - (border.east_mm + border.west_mm);
    let printable_height = paper_height - (border.north_mm + border.south_mm);
    if printable_width <= 0.0 || printable_height <= 0.0 {
        return Err(TilingError::InvalidGeometry(format!(
            "borders leave a non-positive printable area on {} paper ({printable_width}x{printable_height} mm)",
            paper.label()
        )));
    }

    let pages_horizontal_p = pages_along(image_width_mm, printable_width, overlap.east_mm);
    let pages_vertical_p = pages_along(image_height_mm, printable_height, overlap.south_mm);
    let pages_horizontal_l = pages_along(image_width_mm, printable_height, overlap.south_mm);
    let pages_vertical_l = pages_along(image_height_mm, printable_width, overlap.east_mm);

    // Landscape only when strictly fewer pages; ties keep portrait.
    let landscape =
        pages_horizontal_p * pages_vertical_p > pages_horizontal_l * pages_vertical_l;

    let (orientation, pages_horizontal, pages_vertical, page_width_mm, page_height_mm) =
        if landscape {
            (
                Orientation::Landscape,
                pages_horizontal_l,
                pages_vertical_l,
                printable_height - zero_if_one(pages_horizontal_l, overlap.south_mm),
                printable_width - zero_if_one(pages_vertical_l, overlap.east_mm),
            )
        } else {
            (
                Orientation::Portrait,
                pages_horizontal_p,
                pages_vertical_p,
                printable_width - zero_if_one(pages_horizontal_p, overlap.east_mm),
                printable_height - zero_if_one(pages_vertical_p, overlap.south_mm),
            )
        };

    log::info!(
        "using {orientation:?} orientation, {pages_horizontal} by {pages_vertical} pages"
    );

    Ok(LayoutPlan {
        orientation,
        pages_horizontal,
        pages_vertical,
        page_width_mm,
        page_height_mm,
        pixels_per_mm: scale.pixels_per_mm,
        image_width_px: scale.mm_to_px(image_width_mm).round() as u32,
        image_height_px: scale.mm_to_px(image_height_mm).round() as u32,
        paper,
        border: *border,
        overlap: *overlap,
    })
}

/// Plan directly from pixel dimensions and a resolved scale.
pub fn plan_for_image(
    width_px: u32,
    height_px: u32,
    scale: PixelScale,
    options: &TilingOptions,
) -> Result<LayoutPlan> {
    options.validate()?;
    let mut plan = plan(
        scale.px_to_mm(width_px as f32),
        scale.px_to_mm(height_px as f32),
        options.paper,
        &options.border,
        &options.overlap,
        scale,
    )?;
    // px -> mm -> px can lose a pixel to f32 rounding; the source dimensions
    // are authoritative here.
    plan.image_width_px = width_px;
    plan.image_height_px = height_px;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_plan(
        width_mm: f32,
        height_mm: f32,
        border: BorderSpec,
        overlap: OverlapSpec,
    ) -> LayoutPlan {
        plan(
            width_mm,
            height_mm,
            PaperSize::A4,
            &border,
            &overlap,
            PixelScale::new(4.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_page_fits() {
        let plan = a4_plan(
            100.0,
            150.0,
            BorderSpec::uniform(5.0),
            OverlapSpec::default(),
        );
        assert_eq!(plan.orientation, Orientation::Portrait);
        assert_eq!((plan.pages_horizontal, plan.pages_vertical), (1, 1));
        // Single-page axes keep the full printable span
        assert_eq!(plan.page_width_mm, 200.0);
        assert_eq!(plan.page_height_mm, 287.0);
    }

    #[test]
    fn test_overlap_does_not_inflate_single_page_axis() {
        // 200mm exactly fills the printable width; a 10mm overlap must not
        // push it onto a second page
        let plan = a4_plan(
            200.0,
            287.0,
            BorderSpec::uniform(5.0),
            OverlapSpec::default(),
        );
        assert_eq!((plan.pages_horizontal, plan.pages_vertical), (1, 1));
    }

    #[test]
    fn test_worked_a4_example() {
        // 2000x1000 px map with 20x10 one-inch squares: 508x254 mm at
        // ppm = 2000/508
        let scale = PixelScale::from_reference_squares(2000, 1000, 20.0, 10.0).unwrap();
        let plan = plan(
            2000.0 / scale.pixels_per_mm,
            1000.0 / scale.pixels_per_mm,
            PaperSize::A4,
            &BorderSpec::uniform(5.0),
            &OverlapSpec::default(),
            scale,
        )
        .unwrap();

        // Portrait: ceil(508/210)=3 x 1 = 3 pages; landscape would need
        // ceil(508/297)=2 x ceil(254/210)=2 = 4
        assert_eq!(plan.orientation, Orientation::Portrait);
        assert_eq!((plan.pages_horizontal, plan.pages_vertical), (3, 1));
        // Horizontal axis is multi-page so the 10mm overlap is borrowed from
        // the printable width; the vertical axis is untouched
        assert!((plan.page_width_mm - 190.0).abs() < 1e-4);
        assert!((plan.page_height_mm - 287.0).abs() < 1e-4);
        assert!((plan.pixels_per_mm - 3.937).abs() < 1e-3);
    }

    #[test]
    fn test_landscape_when_strictly_fewer_pages() {
        // 280x180 mm: portrait needs 2x1, landscape fits on one sheet
        let plan = a4_plan(280.0, 180.0, BorderSpec::uniform(5.0), OverlapSpec::none());
        assert_eq!(plan.orientation, Orientation::Landscape);
        assert_eq!((plan.pages_horizontal, plan.pages_vertical), (1, 1));
        assert_eq!(plan.page_width_mm, 287.0);
        assert_eq!(plan.page_height_mm, 200.0);
    }

    #[test]
    fn test_tie_prefers_portrait() {
        // A square image larger than one sheet in both directions produces
        // the same count either way
        // (2x2 = 4 sheets either way)
        let plan = a4_plan(400.0, 400.0, BorderSpec::uniform(5.0), OverlapSpec::none());
        assert_eq!((plan.pages_horizontal, plan.pages_vertical), (2, 2));
        assert_eq!(plan.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_minimizes_page_count_over_orientations() {
        for (w, h) in [(508.0, 254.0), (300.0, 300.0), (150.0, 600.0), (900.0, 120.0)] {
            let plan = a4_plan(w, h, BorderSpec::uniform(5.0), OverlapSpec::default());

            let p = (200.0f32, 287.0f32);
            let pages = |size: f32, printable: f32, overlap: f32| -> u32 {
                if (size / printable).ceil() <= 1.0 {
                    1
                } else {
                    (size / (printable + overlap)).ceil() as u32
                }
            };
            let portrait = pages(w, p.0, 10.0) * pages(h, p.1, 10.0);
            let landscape = pages(w, p.1, 10.0) * pages(h, p.0, 10.0);

            assert_eq!(plan.total_pages(), portrait.min(landscape), "{w}x{h}");
            if portrait == landscape {
                assert_eq!(plan.orientation, Orientation::Portrait, "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_round_trip_plan_is_single_page() {
        let first = a4_plan(508.0, 254.0, BorderSpec::uniform(5.0), OverlapSpec::default());

        // Re-plan the plan's own printable page as a custom paper with no
        // border or overlap: must come out as exactly one page. The custom
        // paper keeps the plan's page dimensions in portrait order.
        let (w, h) = if first.page_width_mm < first.page_height_mm {
            (first.page_width_mm, first.page_height_mm)
        } else {
            (first.page_height_mm, first.page_width_mm)
        };
        let again = plan(
            w,
            h,
            PaperSize::Custom {
                width_mm: w,
                height_mm: h,
            },
            &BorderSpec::uniform(0.0),
            &OverlapSpec::none(),
            PixelScale::new(first.pixels_per_mm).unwrap(),
        )
        .unwrap();
        assert_eq!((again.pages_horizontal, again.pages_vertical), (1, 1));
    }

    #[test]
    fn test_oversized_border_is_invalid_geometry() {
        let result = plan(
            100.0,
            100.0,
            PaperSize::A4,
            &BorderSpec::uniform(110.0),
            &OverlapSpec::none(),
            PixelScale::new(4.0).unwrap(),
        );
        assert!(matches!(result, Err(TilingError::InvalidGeometry(_))));
    }

    #[test]
    fn test_nonpositive_image_is_invalid_geometry() {
        let result = plan(
            0.0,
            100.0,
            PaperSize::A4,
            &BorderSpec::default(),
            &OverlapSpec::default(),
            PixelScale::new(4.0).unwrap(),
        );
        assert!(matches!(result, Err(TilingError::InvalidGeometry(_))));
    }
}
