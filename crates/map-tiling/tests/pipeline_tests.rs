use map_tiling::*;

struct FakeRaster {
    width: u32,
    height: u32,
}

impl RasterSource for FakeRaster {
    type Raster = PixelRect;

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn crop(&mut self, rect: PixelRect) -> PixelRect {
        rect
    }
}

fn run(width_px: u32, height_px: u32, squares_wide: f32, squares_high: f32) -> (LayoutPlan, Vec<TilePage<PixelRect>>) {
    let scale =
        PixelScale::from_reference_squares(width_px, height_px, squares_wide, squares_high)
            .unwrap();
    let plan = plan_for_image(width_px, height_px, scale, &TilingOptions::default()).unwrap();
    let mut source = FakeRaster {
        width: width_px,
        height: height_px,
    };
    let pages = compose(&mut source, &plan).unwrap();
    (plan, pages)
}

#[test]
fn test_page_count_matches_grid() {
    for (w, h, sw, sh) in [
        (2000, 1000, 20.0, 10.0),
        (1000, 2000, 10.0, 20.0),
        (512, 512, 5.0, 5.0),
        (4096, 1024, 40.0, 10.0),
    ] {
        let (plan, pages) = run(w, h, sw, sh);
        assert_eq!(pages.len() as u32, plan.pages_horizontal * plan.pages_vertical);
        assert!(plan.pages_horizontal >= 1 && plan.pages_vertical >= 1);
    }
}

#[test]
fn test_crops_stay_in_bounds_and_tile_seamlessly() {
    for (w, h, sw, sh) in [
        (2000, 1000, 20.0, 10.0),
        (3000, 2200, 30.0, 22.0),
        (750, 3000, 7.5, 30.0),
    ] {
        let (plan, pages) = run(w, h, sw, sh);

        for page in &pages {
            let crop = page.tile.crop;
            assert!(crop.right <= w && crop.bottom <= h);
            assert!(crop.width() > 0 && crop.height() > 0);
        }

        // Adjacent columns overlap or abut: the next column starts no later
        // than the previous one ends
        for x in 1..plan.pages_horizontal {
            let previous = pages
                .iter()
                .find(|p| p.tile.grid_x == x - 1 && p.tile.grid_y == 0)
                .unwrap();
            let current = pages
                .iter()
                .find(|p| p.tile.grid_x == x && p.tile.grid_y == 0)
                .unwrap();
            assert!(current.tile.crop.left <= previous.tile.crop.right);
        }
        for y in 1..plan.pages_vertical {
            let previous = pages
                .iter()
                .find(|p| p.tile.grid_x == 0 && p.tile.grid_y == y - 1)
                .unwrap();
            let current = pages
                .iter()
                .find(|p| p.tile.grid_x == 0 && p.tile.grid_y == y)
                .unwrap();
            assert!(current.tile.crop.top <= previous.tile.crop.bottom);
        }
    }
}

#[test]
fn test_last_row_and_column_flags() {
    let (plan, pages) = run(3000, 2200, 30.0, 22.0);
    for page in &pages {
        assert_eq!(
            page.tile.last_horizontal,
            page.tile.grid_x == plan.pages_horizontal - 1
        );
        assert_eq!(
            page.tile.last_vertical,
            page.tile.grid_y == plan.pages_vertical - 1
        );
    }
}

#[test]
fn test_mark_endpoints_stay_on_sheet() {
    let (plan, pages) = run(3000, 2200, 30.0, 22.0);
    let (page_w, page_h) = plan.paper_dimensions_mm();
    for page in &pages {
        for mark in &page.marks {
            let ((sx, sy), (ex, ey)) = mark.endpoints(page_w, page_h);
            for (x, y) in [(sx, sy), (ex, ey)] {
                assert!((0.0..=page_w).contains(&x), "x={x} outside sheet");
                assert!((0.0..=page_h).contains(&y), "y={y} outside sheet");
            }
        }
    }
}

#[test]
fn test_solid_marks_present_on_every_tile() {
    let (_, pages) = run(3000, 2200, 30.0, 22.0);
    for page in &pages {
        let solid = page.marks.iter().filter(|m| !m.dashed).count();
        // Four corners, two directions each
        assert_eq!(solid, 8);
        for mark in page.marks.iter().filter(|m| !m.dashed) {
            assert_eq!(mark.length_mm, MARK_LENGTH_MM);
            assert_eq!(mark.gap_mm, MARK_GAP_MM);
        }
    }
}
