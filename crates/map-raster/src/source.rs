use image::DynamicImage;
use map_tiling::{PixelRect, RasterSource};

/// [`RasterSource`] over a decoded image, feeding tile crops to the
/// composition engine.
pub struct DynamicRaster {
    image: DynamicImage,
}

impl DynamicRaster {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn into_inner(self) -> DynamicImage {
        self.image
    }
}

impl RasterSource for DynamicRaster {
    type Raster = DynamicImage;

    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn crop(&mut self, rect: PixelRect) -> DynamicImage {
        self.image
            .crop_imm(rect.left, rect.top, rect.width(), rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_crop_dimensions() {
        let mut source = DynamicRaster::new(DynamicImage::ImageRgba8(RgbaImage::new(200, 100)));
        assert_eq!(source.dimensions(), (200, 100));

        let tile = source.crop(PixelRect {
            left: 150,
            top: 40,
            right: 200,
            bottom: 100,
        });
        assert_eq!((tile.width(), tile.height()), (50, 60));
    }
}
