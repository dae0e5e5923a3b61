//! Registration mark geometry
//!
//! Each tile gets short alignment ticks at its content corners plus dashed
//! cut-line ticks on edges shared with a neighbouring tile. Marks are pure
//! geometry in page-relative millimetres (origin at the top-left corner of
//! the sheet, y growing southward); rendering is the PDF writer's job.

use crate::types::{LayoutPlan, Tile};

/// Tick line length in mm
pub const MARK_LENGTH_MM: f32 = 5.0;
/// Gap between the anchor point and the start of the tick in mm
pub const MARK_GAP_MM: f32 = 1.0;

/// Compass direction a mark extends in, away from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkDirection {
    North,
    East,
    South,
    West,
}

/// A short alignment tick anchored at a tile corner.
///
/// Dashed marks denote cut lines shared with an adjacent tile; they are
/// omitted on the last row/column where no neighbour follows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistrationMark {
    pub anchor_x_mm: f32,
    pub anchor_y_mm: f32,
    pub direction: MarkDirection,
    pub length_mm: f32,
    pub gap_mm: f32,
    pub dashed: bool,
}

impl RegistrationMark {
    fn new(anchor_x_mm: f32, anchor_y_mm: f32, direction: MarkDirection, dashed: bool) -> Self {
        Self {
            anchor_x_mm,
            anchor_y_mm,
            direction,
            length_mm: MARK_LENGTH_MM,
            gap_mm: MARK_GAP_MM,
            dashed,
        }
    }

    /// Resolve the drawable segment, honouring the gap and the sheet bounds.
    ///
    /// When the anchor sits within one mark-length of the sheet edge the
    /// tick spans fully to that edge instead of stopping short of it, so no
    /// dangling stub is ever drawn past the paper boundary.
    pub fn endpoints(
        &self,
        page_width_mm: f32,
        page_height_mm: f32,
    ) -> ((f32, f32), (f32, f32)) {
        let (x, y) = (self.anchor_x_mm, self.anchor_y_mm);
        match self.direction {
            MarkDirection::West => {
                let end = if x <= self.length_mm { 0.0 } else { x - self.length_mm };
                ((x - self.gap_mm, y), (end, y))
            }
            MarkDirection::East => {
                let end = if page_width_mm - x <= self.length_mm {
                    page_width_mm
                } else {
                    x + self.length_mm
                };
                ((x + self.gap_mm, y), (end, y))
            }
            MarkDirection::North => {
                let end = if y <= self.length_mm { 0.0 } else { y - self.length_mm };
                ((x, y - self.gap_mm), (x, end))
            }
            MarkDirection::South => {
                let end = if page_height_mm - y <= self.length_mm {
                    page_height_mm
                } else {
                    y + self.length_mm
                };
                ((x, y + self.gap_mm), (x, end))
            }
        }
    }
}

/// Registration marks for one tile, in page-relative mm.
pub(crate) fn registration_marks(plan: &LayoutPlan, tile: &Tile) -> Vec<RegistrationMark> {
    let (north, east, south, west) = plan.drawing_borders_mm();
    let (page_width, page_height) = plan.paper_dimensions_mm();
    let content_width = tile.crop.width() as f32 / plan.pixels_per_mm;
    let content_height = tile.crop.height() as f32 / plan.pixels_per_mm;

    use MarkDirection::*;
    let mut marks = Vec::with_capacity(12);
    let mut tick = |x: f32, y: f32, dirs: &[MarkDirection], dashed: bool| {
        for &dir in dirs {
            marks.push(RegistrationMark::new(x, y, dir, dashed));
        }
    };

    // Solid corner ticks around the content box, always present
    tick(west, north, &[North, West], false);
    tick(west, north + content_height, &[South, West], false);
    tick(west + content_width, north + content_height, &[East, South], false);
    tick(west + content_width, north, &[East, North], false);

    // Dashed cut line shared with the tile to the east
    if !tile.last_horizontal {
        tick(page_width - east, north + content_height, &[South], true);
        tick(page_width - east, north, &[North], true);
    }

    // Dashed cut line shared with the tile below
    if !tile.last_vertical {
        tick(west, page_height - south, &[West], true);
        tick(west + content_width, page_height - south, &[East], true);
    }

    marks
}
