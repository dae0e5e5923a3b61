//! External super-resolution wrapper
//!
//! Shells out to a waifu2x-style command line tool (`-s <scale> -n <noise>
//! -i <in> -o <out>` usage). The tool is optional: when the executable is
//! missing or there is nothing to do, the input image is returned unchanged
//! so a pipeline configured for upscaling still works on machines without
//! the tool installed.

use std::path::PathBuf;
use std::process::Stdio;

use image::DynamicImage;
use tokio::process::Command;

use crate::{RasterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct UpscalerConfig {
    /// Full path to the super-resolution executable
    pub executable: PathBuf,
    /// Scale by 2x (false keeps the size and only de-noises)
    pub scale: bool,
    /// De-noise level, if any
    pub noise: Option<u8>,
}

pub struct Upscaler {
    config: UpscalerConfig,
}

impl Upscaler {
    pub fn new(config: UpscalerConfig) -> Self {
        Self { config }
    }

    /// Run the external tool over the image, returning the enhanced raster.
    pub async fn run(&self, image: DynamicImage) -> Result<DynamicImage> {
        if !self.config.executable.is_file() {
            log::warn!(
                "no upscaler executable at {}, skipping",
                self.config.executable.display()
            );
            return Ok(image);
        }
        if !self.config.scale && self.config.noise.is_none() {
            log::info!("nothing to do for upscaler");
            return Ok(image);
        }

        let workdir = tempfile::tempdir()?;
        let source = workdir.path().join("source.png");
        let dest = workdir.path().join("dest.png");

        log::info!("writing original image to {}", source.display());
        let save_path = source.clone();
        tokio::task::spawn_blocking(move || image.save(&save_path)).await??;

        let mut command = Command::new(&self.config.executable);
        if let Some(dir) = self.config.executable.parent() {
            command.current_dir(dir);
        }
        command
            .arg("-s")
            .arg(if self.config.scale { "2" } else { "1" })
            .arg("-n")
            .arg(self.config.noise.unwrap_or(0).to_string())
            .arg("-i")
            .arg(&source)
            .arg("-o")
            .arg(&dest)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::info!("running upscaler: {command:?}");
        let output = command.output().await?;
        if !output.status.success() {
            return Err(RasterError::Upscaler(format!(
                "{} exited with {}: {}",
                self.config.executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        log::info!("upscaler completed, reading {}", dest.display());
        let result = tokio::task::spawn_blocking(move || image::open(&dest)).await??;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[tokio::test]
    async fn test_missing_executable_returns_input() {
        let upscaler = Upscaler::new(UpscalerConfig {
            executable: PathBuf::from("/nonexistent/waifu2x"),
            scale: true,
            noise: Some(2),
        });
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let out = upscaler.run(image).await.unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_nothing_to_do_returns_input() {
        // An existing file that is not even executable never gets run when
        // there is no work requested
        let marker = tempfile::NamedTempFile::new().unwrap();
        let upscaler = Upscaler::new(UpscalerConfig {
            executable: marker.path().to_owned(),
            scale: false,
            noise: None,
        });
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let out = upscaler.run(image).await.unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
    }
}
