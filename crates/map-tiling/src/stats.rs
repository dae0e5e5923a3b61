use crate::types::{LayoutPlan, Orientation};

/// Summary of a layout plan, for display before committing to a print run.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingStatistics {
    pub total_sheets: u32,
    pub pages_horizontal: u32,
    pub pages_vertical: u32,
    pub orientation: Orientation,
    pub paper_label: &'static str,
    /// Physical size of the assembled map in mm
    pub assembled_width_mm: f32,
    pub assembled_height_mm: f32,
}

/// Calculate statistics for a layout plan
pub fn calculate_statistics(plan: &LayoutPlan) -> TilingStatistics {
    TilingStatistics {
        total_sheets: plan.total_pages(),
        pages_horizontal: plan.pages_horizontal,
        pages_vertical: plan.pages_vertical,
        orientation: plan.orientation,
        paper_label: plan.paper.label(),
        assembled_width_mm: plan.image_width_px as f32 / plan.pixels_per_mm,
        assembled_height_mm: plan.image_height_px as f32 / plan.pixels_per_mm,
    }
}
