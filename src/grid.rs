use std::path::Path;

use image::{ImageError, ImageFormat, Rgba, RgbaImage};

use crate::{header::Dimensions, HuffError, Result};

/// Pixels of an image in row-major order, packed as `0xAARRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub dimensions: Dimensions,
    pub pixels: Vec<u32>,
}

impl PixelGrid {
    pub fn new(dimensions: Dimensions, pixels: Vec<u32>) -> Result<Self> {
        if pixels.len() != dimensions.area() {
            return Err(HuffError::TruncatedStream(
                "pixel count does not match the image dimensions",
            ));
        }
        Ok(PixelGrid { dimensions, pixels })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => HuffError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            },
            other => HuffError::Image(other),
        })?;
        Ok(Self::from_image(&image.to_rgba8()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image()?
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(source) => HuffError::DestinationUnavailable {
                    path: path.to_path_buf(),
                    source,
                },
                other => HuffError::Image(other),
            })
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        PixelGrid {
            dimensions: Dimensions {
                width: image.width(),
                height: image.height(),
            },
            pixels: image.pixels().map(|p| pack(*p)).collect(),
        }
    }

    pub fn to_image(&self) -> Result<RgbaImage> {
        let raw = self.pixels.iter().flat_map(|&p| unpack(p).0).collect();
        RgbaImage::from_raw(self.dimensions.width, self.dimensions.height, raw).ok_or(
            HuffError::TruncatedStream("pixel count does not match the image dimensions"),
        )
    }
}

fn pack(Rgba([r, g, b, a]): Rgba<u8>) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

fn unpack(argb: u32) -> Rgba<u8> {
    let [a, r, g, b] = argb.to_be_bytes();
    Rgba([r, g, b, a])
}
