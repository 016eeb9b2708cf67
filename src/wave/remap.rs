use crate::assets::decode::BaseImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::render::frame::FrameRGB;
use crate::wave::field::WaveField;

/// What a bilinear tap reads when it lands outside the base image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Fixed RGB color.
    Constant([u8; 3]),
    /// Clamp to the nearest edge pixel.
    Replicate,
}

impl Default for BorderMode {
    /// Black, so displaced edges reveal a dark margin.
    fn default() -> Self {
        Self::Constant([0, 0, 0])
    }
}

/// Per-pixel source coordinates: output pixel `(j, i)` samples the base image at
/// `(map_x[i, j], map_y[i, j])`.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementMap {
    canvas: Canvas,
    map_x: Vec<f32>,
    map_y: Vec<f32>,
}

impl DisplacementMap {
    /// Identity map: every pixel samples itself.
    pub fn identity(canvas: Canvas) -> Self {
        Self::from_field(&WaveField::zeros(canvas), 0.0)
    }

    /// Displace both axes by the same field sample scaled by `intensity`.
    pub fn from_field(field: &WaveField, intensity: f64) -> Self {
        let canvas = field.canvas();
        let k = intensity as f32;
        let mut map_x = Vec::with_capacity(canvas.pixel_count());
        let mut map_y = Vec::with_capacity(canvas.pixel_count());
        for (idx, w) in field.values().iter().enumerate() {
            let i = idx / canvas.width as usize;
            let j = idx % canvas.width as usize;
            let d = w * k;
            map_x.push(j as f32 + d);
            map_y.push(i as f32 + d);
        }
        Self {
            canvas,
            map_x,
            map_y,
        }
    }

    /// Map dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Source coordinate `(x, y)` for output column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> (f32, f32) {
        let idx = y as usize * self.canvas.width as usize + x as usize;
        (self.map_x[idx], self.map_y[idx])
    }
}

/// Resample `base` through `map` with bilinear interpolation.
///
/// Each of the four taps resolves through `border` on its own, so edge pixels blend towards
/// the border color rather than snapping to it.
pub fn remap_bilinear(
    base: &BaseImage,
    map: &DisplacementMap,
    border: BorderMode,
) -> FlagwaveResult<FrameRGB> {
    let canvas = base.canvas();
    if map.canvas() != canvas {
        return Err(FlagwaveError::DimensionMismatch {
            expected: canvas,
            actual: map.canvas(),
        });
    }

    let src = base.as_raw();
    let w = i64::from(canvas.width);
    let h = i64::from(canvas.height);
    let tap = |x: i64, y: i64| -> [f32; 3] {
        let (x, y) = if x >= 0 && x < w && y >= 0 && y < h {
            (x, y)
        } else {
            match border {
                BorderMode::Constant(rgb) => return rgb.map(f32::from),
                BorderMode::Replicate => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            }
        };
        let o = ((y * w + x) * 3) as usize;
        [
            f32::from(src[o]),
            f32::from(src[o + 1]),
            f32::from(src[o + 2]),
        ]
    };

    let mut data = Vec::with_capacity(canvas.rgb_len());
    for (&sx, &sy) in map.map_x.iter().zip(map.map_y.iter()) {
        let x0f = sx.floor();
        let y0f = sy.floor();
        let fx = sx - x0f;
        let fy = sy - y0f;
        let x0 = x0f as i64;
        let y0 = y0f as i64;

        let p00 = tap(x0, y0);
        let p10 = tap(x0 + 1, y0);
        let p01 = tap(x0, y0 + 1);
        let p11 = tap(x0 + 1, y0 + 1);

        for c in 0..3 {
            let top = p00[c] + (p10[c] - p00[c]) * fx;
            let bottom = p01[c] + (p11[c] - p01[c]) * fx;
            let v = top + (bottom - top) * fy;
            data.push(v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Ok(FrameRGB {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/wave/remap.rs"]
mod tests;
