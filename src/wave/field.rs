//! Per-frame wave parameters.
//!
//! The phase advances linearly from `0` to `4π` over the clip, so the travelling wave
//! completes two cycles and the intensity pulse (which runs at half the phase rate) completes
//! one.

use std::f64::consts::PI;

use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};

/// Extent of the normalized grid the wave is evaluated on, along both axes.
pub const GRID_EXTENT: f64 = 10.0;

/// Phase of `frame` in a clip of `total_frames` frames: `(frame / total) * 4π`.
///
/// `total_frames` must be non-zero.
pub fn phase(frame: FrameIndex, total_frames: u64) -> f64 {
    (frame.0 as f64 / total_frames as f64) * 4.0 * PI
}

/// Displacement magnitude in pixels, pulsing within `[4, 20]`.
pub fn flex_intensity(phase: f64) -> f64 {
    ((phase * 0.5).sin() + 1.5) * 8.0
}

/// Uniform brightness offset in `[0, 6]`.
pub fn shimmer(phase: f64) -> u8 {
    ((phase.sin() + 1.0) * 3.0).floor().clamp(0.0, 6.0) as u8
}

/// Scalars that drive one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    /// Wave phase in radians.
    pub phase: f64,
    /// Displacement magnitude applied to the wave field.
    pub flex_intensity: f64,
    /// Brightness offset added to every channel.
    pub shimmer: u8,
}

impl FrameParams {
    /// Parameters for `frame` in a clip of `total_frames` frames.
    pub fn for_frame(frame: FrameIndex, total_frames: u64) -> FlagwaveResult<Self> {
        if frame.0 >= total_frames {
            return Err(FlagwaveError::validation(format!(
                "frame {} is out of bounds for a clip of {} frames",
                frame.0, total_frames
            )));
        }
        Ok(Self::from_phase(phase(frame, total_frames)))
    }

    /// Parameters at an explicit phase.
    pub fn from_phase(phase: f64) -> Self {
        Self {
            phase,
            flex_intensity: flex_intensity(phase),
            shimmer: shimmer(phase),
        }
    }

    /// Same phase with the given intensity, e.g. `0.0` for an undisplaced frame.
    pub fn with_intensity(self, flex_intensity: f64) -> Self {
        Self {
            flex_intensity,
            ..self
        }
    }
}

/// Row-major H×W grid of wave samples.
///
/// `wave(x, y) = sin(0.5x - phase) * cos(0.3y + 0.5 phase)` where `x` and `y` run evenly from
/// `0` to [`GRID_EXTENT`] (both ends included) across the columns and rows.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveField {
    canvas: Canvas,
    values: Vec<f32>,
}

impl WaveField {
    /// Evaluate the field over `canvas` at `phase`.
    pub fn generate(canvas: Canvas, phase: f64) -> Self {
        // The field is separable, so each axis term is computed once.
        let cols: Vec<f64> = linspace(GRID_EXTENT, canvas.width as usize)
            .map(|x| (x * 0.5 - phase).sin())
            .collect();
        let rows =
            linspace(GRID_EXTENT, canvas.height as usize).map(|y| (y * 0.3 + phase * 0.5).cos());

        let mut values = Vec::with_capacity(canvas.pixel_count());
        for row in rows {
            values.extend(cols.iter().map(|col| (col * row) as f32));
        }
        Self { canvas, values }
    }

    /// All-zero field.
    pub fn zeros(canvas: Canvas) -> Self {
        Self {
            canvas,
            values: vec![0.0; canvas.pixel_count()],
        }
    }

    /// Field dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.canvas.width as usize + x as usize]
    }

    /// Row-major samples.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// `n` evenly spaced samples over `[0, stop]`; a single sample sits at `0`.
fn linspace(stop: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { stop / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| i as f64 * step)
}

#[cfg(test)]
#[path = "../../tests/unit/wave/field.rs"]
mod tests;
