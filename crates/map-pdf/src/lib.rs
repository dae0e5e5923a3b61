mod extract;
mod writer;

pub use extract::{ExtractOptions, extract_images};
pub use writer::{write_single_page_pdf, write_tiled_pdf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Geometry error: {0}")]
    Tiling(#[from] map_tiling::TilingError),
}

pub type Result<T> = std::result::Result<T, PdfError>;
