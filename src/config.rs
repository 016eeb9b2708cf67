use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::ffmpeg::VideoCodec;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::wave::remap::BorderMode;

/// Everything a clip render needs, passed explicitly instead of read from globals.
///
/// Missing JSON fields fall back to [`FlagConfig::default`], which reproduces the classic
/// 3-second 1280x720 clip at 30 fps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlagConfig {
    /// Input raster image (any format the `image` crate decodes).
    pub image_path: PathBuf,
    /// Output video path.
    pub output_path: PathBuf,
    /// Number of frames in the clip.
    pub frame_count: u64,
    /// Output (and resized base image) dimensions.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Output codec.
    pub codec: VideoCodec,
    /// Out-of-bounds policy for the displacement remap.
    pub border: BorderMode,
    /// Overwrite `output_path` if it already exists.
    pub overwrite: bool,
    /// Frame-level parallelism.
    pub threading: RenderThreading,
    /// `ffmpeg` executable used for video output.
    pub ffmpeg: PathBuf,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("american_flag.png"),
            output_path: PathBuf::from("patriot_flex.mp4"),
            frame_count: 90,
            canvas: Canvas::default(),
            fps: Fps::default(),
            codec: VideoCodec::default(),
            border: BorderMode::default(),
            overwrite: true,
            threading: RenderThreading::default(),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl FlagConfig {
    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> FlagwaveResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON config string.
    pub fn from_json_str(text: &str) -> FlagwaveResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| FlagwaveError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the values that have no sensible meaning when zero.
    pub fn validate(&self) -> FlagwaveResult<()> {
        if self.frame_count == 0 {
            return Err(FlagwaveError::validation("frame_count must be >= 1"));
        }
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if let Some(n) = self.threading.threads
            && n == 0
        {
            return Err(FlagwaveError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// [`FlagConfig::validate`] plus the limits of yuv420p video output: even width and height.
    pub fn validate_video(&self) -> FlagwaveResult<()> {
        self.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(FlagwaveError::validation(format!(
                "video output needs even dimensions, got {}",
                self.canvas
            )));
        }
        Ok(())
    }
}

/// Threading and chunking controls for multi-frame rendering.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Render frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Frames synthesized per batch before they are pushed to the sink.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
