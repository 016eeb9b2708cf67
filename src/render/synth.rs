use crate::assets::decode::BaseImage;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::render::frame::FrameRGB;
use crate::wave::field::{FrameParams, WaveField};
use crate::wave::remap::{BorderMode, DisplacementMap, remap_bilinear};

/// Synthesize frame `frame` of a `total_frames` clip.
///
/// Pure in all of its arguments: the same inputs always give bit-identical pixels, whatever
/// order frames are requested in.
#[tracing::instrument(level = "trace", skip(base))]
pub fn synthesize(
    base: &BaseImage,
    frame: FrameIndex,
    total_frames: u64,
    canvas: Canvas,
    border: BorderMode,
) -> FlagwaveResult<FrameRGB> {
    let params = FrameParams::for_frame(frame, total_frames)?;
    synthesize_with(base, params, canvas, border)
}

/// Synthesize a frame from explicit parameters.
pub fn synthesize_with(
    base: &BaseImage,
    params: FrameParams,
    canvas: Canvas,
    border: BorderMode,
) -> FlagwaveResult<FrameRGB> {
    if base.canvas() != canvas {
        return Err(FlagwaveError::DimensionMismatch {
            expected: canvas,
            actual: base.canvas(),
        });
    }

    let field = WaveField::generate(canvas, params.phase);
    let map = DisplacementMap::from_field(&field, params.flex_intensity);
    let mut frame = remap_bilinear(base, &map, border)?;
    apply_shimmer(&mut frame, params.shimmer);
    Ok(frame)
}

/// Add `amount` to every channel, saturating at 255.
pub fn apply_shimmer(frame: &mut FrameRGB, amount: u8) {
    if amount == 0 {
        return;
    }
    for c in &mut frame.data {
        *c = c.saturating_add(amount);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/synth.rs"]
mod tests;
