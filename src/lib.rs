//! Flagwave turns a still flag image into a short clip of the flag waving.
//!
//! Every frame is a pure function of its index: a sinusoidal wave field is scaled by a slowly
//! pulsing intensity, added to both pixel axes to form a displacement map, the base image is
//! resampled through that map and a small brightness shimmer is added on top. Frames are
//! streamed in index order into a [`FrameSink`], by default the system `ffmpeg`.
//!
//! - Build a [`FlagConfig`] (or load one from JSON)
//! - Call [`run`] to render the whole clip, or [`synthesize`] for a single frame
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Base image loading.
pub mod assets;
/// Run configuration.
pub mod config;
/// Output sinks.
pub mod encode;
/// Per-frame synthesis.
pub mod render;
/// Clip assembly.
pub mod session;
/// Wave field and displacement remapping.
pub mod wave;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{FlagwaveError, FlagwaveResult};

pub use crate::assets::decode::{BaseImage, load_base_image};
pub use crate::config::{FlagConfig, RenderThreading};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, VideoCodec, ffmpeg_available, is_ffmpeg_on_path,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::frame::FrameRGB;
pub use crate::render::synth::{apply_shimmer, synthesize, synthesize_with};
pub use crate::session::{RenderStats, render_frame_png, run, run_with_sink};
pub use crate::wave::field::{FrameParams, WaveField, flex_intensity, phase, shimmer};
pub use crate::wave::remap::{BorderMode, DisplacementMap, remap_bilinear};
