use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilingError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error(
        "Image is {actual_width}x{actual_height} px but plan was computed for {expected_width}x{expected_height} px"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TilingError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (canonical orientation of the named sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    Letter,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A0 => (841.0, 1189.0),
            PaperSize::A1 => (594.0, 841.0),
            PaperSize::A2 => (420.0, 594.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaperSize::A0 => "A0",
            PaperSize::A1 => "A1",
            PaperSize::A2 => "A2",
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "Letter",
            PaperSize::Custom { .. } => "Custom",
        }
    }
}

/// Per-page border margins in millimetres, expressed portrait-relative.
///
/// These cover the strip most printers cannot reach. They apply to every
/// output page, not to the assembled map: trimming them off costs paper but
/// never shrinks the printed content.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderSpec {
    pub north_mm: f32,
    pub east_mm: f32,
    pub south_mm: f32,
    pub west_mm: f32,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

impl BorderSpec {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f32) -> Self {
        Self {
            north_mm: margin_mm,
            east_mm: margin_mm,
            south_mm: margin_mm,
            west_mm: margin_mm,
        }
    }

    /// Margins as (north, east, south, west) for the given orientation.
    ///
    /// Rotating to landscape remaps each margin one step clockwise:
    /// north→east, east→south, south→west, west→north.
    pub fn oriented(&self, orientation: Orientation) -> (f32, f32, f32, f32) {
        match orientation {
            Orientation::Portrait => (self.north_mm, self.east_mm, self.south_mm, self.west_mm),
            Orientation::Landscape => (self.east_mm, self.south_mm, self.west_mm, self.north_mm),
        }
    }
}

/// Overlap strips in millimetres, expressed portrait-relative.
///
/// Every non-last tile is extended by this much on its east and south edge,
/// duplicating content onto the neighbouring sheet so the cut line does not
/// have to be exact when taping sheets together.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlapSpec {
    pub east_mm: f32,
    pub south_mm: f32,
}

impl Default for OverlapSpec {
    fn default() -> Self {
        Self {
            east_mm: 10.0,
            south_mm: 10.0,
        }
    }
}

impl OverlapSpec {
    pub fn none() -> Self {
        Self {
            east_mm: 0.0,
            south_mm: 0.0,
        }
    }

    /// Overlaps as (east, south) for the given orientation, remapped by the
    /// same rotation as [`BorderSpec::oriented`].
    pub fn oriented(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Portrait => (self.east_mm, self.south_mm),
            Orientation::Landscape => (self.south_mm, self.east_mm),
        }
    }
}

/// A pixel-space crop rectangle, half-open on the right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Result of layout planning: how the source image maps onto a page grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPlan {
    pub orientation: Orientation,
    /// Number of page columns (>= 1)
    pub pages_horizontal: u32,
    /// Number of page rows (>= 1)
    pub pages_vertical: u32,
    /// Printable page width in mm, already shrunk by the overlap on
    /// multi-page axes
    pub page_width_mm: f32,
    /// Printable page height in mm, already shrunk by the overlap on
    /// multi-page axes
    pub page_height_mm: f32,
    /// Linear scale used to convert between pixel and mm space
    pub pixels_per_mm: f32,
    /// Source image dimensions the plan was computed from
    pub image_width_px: u32,
    pub image_height_px: u32,
    pub paper: PaperSize,
    pub border: BorderSpec,
    pub overlap: OverlapSpec,
}

impl LayoutPlan {
    /// Total number of output pages
    pub fn total_pages(&self) -> u32 {
        self.pages_horizontal * self.pages_vertical
    }

    /// Full paper dimensions in mm with the plan's orientation applied
    pub fn paper_dimensions_mm(&self) -> (f32, f32) {
        self.paper.dimensions_with_orientation(self.orientation)
    }

    /// Margins used when drawing a page, as (north, east, south, west) in mm.
    ///
    /// Orientation-adjusted border with the orientation-adjusted overlap
    /// folded into the east and south sides, so the overlap strip stays
    /// outside the nominal content box.
    pub fn drawing_borders_mm(&self) -> (f32, f32, f32, f32) {
        let (north, east, south, west) = self.border.oriented(self.orientation);
        let (overlap_east, overlap_south) = self.overlap.oriented(self.orientation);
        (north, east + overlap_east, south + overlap_south, west)
    }
}

/// One output page of the tiling, identified by its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Column index, 0-based, west to east
    pub grid_x: u32,
    /// Row index, 0-based, north to south
    pub grid_y: u32,
    /// Crop rectangle into the source image, clamped to its bounds
    pub crop: PixelRect,
    /// True when no tile follows to the east
    pub last_horizontal: bool,
    /// True when no tile follows to the south
    pub last_vertical: bool,
}
