use std::path::Path;

use image::{RgbImage, imageops::FilterType};

use crate::foundation::core::Canvas;
use crate::foundation::error::{FlagwaveError, FlagwaveResult};

/// Immutable RGB8 image every frame is resampled from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseImage {
    pixels: RgbImage,
}

impl BaseImage {
    /// Wrap tightly packed row-major RGB8 bytes.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> FlagwaveResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.rgb_len() {
            return Err(FlagwaveError::validation(format!(
                "rgb8 buffer length {} does not match {}x{}x3",
                data.len(),
                width,
                height
            )));
        }
        let pixels = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| FlagwaveError::validation("rgb8 buffer too small"))?;
        Ok(Self { pixels })
    }

    /// Single-color image covering `canvas`.
    pub fn solid(canvas: Canvas, rgb: [u8; 3]) -> Self {
        Self {
            pixels: RgbImage::from_pixel(canvas.width, canvas.height, image::Rgb(rgb)),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Image dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// RGB8 bytes, tightly packed, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }
}

impl From<RgbImage> for BaseImage {
    fn from(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

/// Load `path` and resize it to `canvas`.
///
/// Alpha is discarded. Resizing uses a linear (triangle) filter and is skipped when the
/// decoded image already matches `canvas`.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_base_image(path: impl AsRef<Path>, canvas: Canvas) -> FlagwaveResult<BaseImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FlagwaveError::InputNotFound(path.to_path_buf()));
    }
    let canvas = Canvas::new(canvas.width, canvas.height)?;

    let decoded = image::open(path)
        .map_err(|e| FlagwaveError::decode(format!("decode image '{}': {e}", path.display())))?;
    let rgb = decoded.to_rgb8();
    let (src_w, src_h) = rgb.dimensions();

    let pixels = if (src_w, src_h) == (canvas.width, canvas.height) {
        rgb
    } else {
        tracing::debug!(src_w, src_h, dst = %canvas, "resizing base image");
        image::imageops::resize(&rgb, canvas.width, canvas.height, FilterType::Triangle)
    };

    Ok(BaseImage { pixels })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
