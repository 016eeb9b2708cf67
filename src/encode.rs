//! Encoding sinks.
//!
//! Sinks consume synthesized frames in clip order and are driven by [`crate::run_with_sink`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
