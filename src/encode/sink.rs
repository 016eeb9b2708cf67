use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::render::frame::FrameRGB;

/// Stream parameters handed to a [`FrameSink`] when it is opened; fixed until `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame dimensions.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in clip order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. After a
/// successful `begin`, exactly one of `end` or `abort` is called.
pub trait FrameSink: Send {
    /// Open the output stream.
    fn begin(&mut self, cfg: SinkConfig) -> FlagwaveResult<()>;
    /// Append one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> FlagwaveResult<()>;
    /// Flush and close the stream after the last frame.
    fn end(&mut self) -> FlagwaveResult<()>;
    /// Release the stream after a failure; partial output should not survive.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGB)>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGB)] {
        &self.frames
    }

    /// `true` once `end` has completed.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// `true` once `abort` has been called.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlagwaveResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> FlagwaveResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlagwaveError::encode("in-memory sink not started"))?;
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(FlagwaveError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        if frame.canvas() != cfg.canvas {
            return Err(FlagwaveError::DimensionMismatch {
                expected: cfg.canvas,
                actual: frame.canvas(),
            });
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlagwaveResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
