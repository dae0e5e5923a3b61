mod enhance;
mod names;
mod source;
mod upscale;

pub use enhance::{Enhancement, enhance};
pub use names::{MapName, parse_map_filename};
pub use source::DynamicRaster;
pub use upscale::{Upscaler, UpscalerConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Upscaler failed: {0}")]
    Upscaler(String),
    #[error("Filename not of the form name_WxH.png, was {0}")]
    BadMapFilename(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;
