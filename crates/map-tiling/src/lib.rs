pub mod compose;
mod layout;
mod marks;
mod options;
mod scale;
mod stats;
mod types;

pub use compose::{RasterSource, TilePage, compose};
pub use layout::{plan, plan_for_image};
pub use marks::{MARK_GAP_MM, MARK_LENGTH_MM, MarkDirection, RegistrationMark};
pub use options::TilingOptions;
pub use scale::{MM_PER_INCH, PixelScale};
pub use stats::{TilingStatistics, calculate_statistics};
pub use types::*;
