//! Basic raster enhancement
//!
//! Multiplicative brightness, kernel-blend sharpness and luma-anchored
//! saturation, applied before tiling so every page gets the same treatment.
//! A factor of 1.0 leaves the channel untouched; `None` skips the step.

use image::{DynamicImage, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

/// Enhancement factors. All default to off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Enhancement {
    /// >1.0 brightens, <1.0 darkens
    pub brighten: Option<f32>,
    /// >1.0 sharpens, <1.0 smooths
    pub sharpen: Option<f32>,
    /// >1.0 saturates, <1.0 desaturates (0.0 is grayscale)
    pub saturation: Option<f32>,
}

impl Enhancement {
    pub fn is_noop(&self) -> bool {
        fn inactive(factor: Option<f32>) -> bool {
            factor.is_none_or(|f| (f - 1.0).abs() < f32::EPSILON)
        }
        inactive(self.brighten) && inactive(self.sharpen) && inactive(self.saturation)
    }
}

/// Apply the requested enhancements in order: brighten, sharpen, saturation.
pub fn enhance(image: DynamicImage, enhancement: &Enhancement) -> DynamicImage {
    if enhancement.is_noop() {
        return image;
    }

    let mut rgba = image.into_rgba8();

    if let Some(factor) = enhancement.brighten.filter(|f| (f - 1.0).abs() >= f32::EPSILON) {
        log::info!("applying brighten {factor}");
        for pixel in rgba.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                *channel = (*channel as f32 * factor).clamp(0.0, 255.0) as u8;
            }
        }
    }

    if let Some(factor) = enhancement.sharpen.filter(|f| (f - 1.0).abs() >= f32::EPSILON) {
        log::info!("applying sharpen {factor}");
        rgba = blend_from(&gaussian_blur_f32(&rgba, 1.0), &rgba, factor);
    }

    if let Some(factor) = enhancement.saturation.filter(|f| (f - 1.0).abs() >= f32::EPSILON) {
        log::info!("applying saturation {factor}");
        for pixel in rgba.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            for channel in &mut pixel.0[..3] {
                *channel = (luma + factor * (*channel as f32 - luma)).clamp(0.0, 255.0) as u8;
            }
        }
    }

    DynamicImage::ImageRgba8(rgba)
}

/// Channel-wise `base + factor * (target - base)`: interpolates for
/// factor < 1 and extrapolates past the target for factor > 1.
fn blend_from(base: &RgbaImage, target: &RgbaImage, factor: f32) -> RgbaImage {
    let mut out = target.clone();
    for (base_px, (target_px, out_px)) in base
        .pixels()
        .zip(target.pixels().zip(out.pixels_mut()))
    {
        for i in 0..3 {
            let b = base_px.0[i] as f32;
            let t = target_px.0[i] as f32;
            out_px.0[i] = (b + factor * (t - b)).clamp(0.0, 255.0) as u8;
        }
        out_px.0[3] = target_px.0[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn flat(r: u8, g: u8, b: u8) -> DynamicImage {
        let mut img = RgbaImage::new(8, 8);
        for px in img.pixels_mut() {
            *px = Rgba([r, g, b, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_noop_passes_through() {
        let image = flat(10, 20, 30);
        let out = enhance(image.clone(), &Enhancement::default());
        assert_eq!(out.as_bytes(), image.as_bytes());

        let unit = Enhancement {
            brighten: Some(1.0),
            sharpen: Some(1.0),
            saturation: Some(1.0),
        };
        assert!(unit.is_noop());
    }

    #[test]
    fn test_brighten_scales_channels() {
        let out = enhance(
            flat(10, 20, 30),
            &Enhancement {
                brighten: Some(2.0),
                ..Default::default()
            },
        );
        let px = out.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(px, [20, 40, 60, 255]);
    }

    #[test]
    fn test_brighten_clamps() {
        let out = enhance(
            flat(200, 200, 200),
            &Enhancement {
                brighten: Some(2.0),
                ..Default::default()
            },
        );
        assert_eq!(out.to_rgba8().get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_saturation_is_grayscale() {
        let out = enhance(
            flat(255, 0, 0),
            &Enhancement {
                saturation: Some(0.0),
                ..Default::default()
            },
        );
        let [r, g, b, _] = out.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        // Red luma
        assert!((r as i32 - 76).abs() <= 1);
    }

    #[test]
    fn test_sharpen_is_stable_on_flat_image() {
        // Blur of a flat image is the flat image, so sharpening changes
        // nothing
        let out = enhance(
            flat(100, 150, 200),
            &Enhancement {
                sharpen: Some(1.5),
                ..Default::default()
            },
        );
        assert_eq!(out.to_rgba8().get_pixel(4, 4).0, [100, 150, 200, 255]);
    }
}
