use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::assets::decode::{BaseImage, load_base_image};
use crate::config::FlagConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::render::frame::FrameRGB;
use crate::render::synth::synthesize;

/// Counters for a finished clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_written: u64,
    /// Wall time from opening the sink to finalizing it.
    pub elapsed: Duration,
}

/// Render the configured clip to an MP4 through the system `ffmpeg`.
pub fn run(cfg: &FlagConfig) -> FlagwaveResult<RenderStats> {
    cfg.validate_video()?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: cfg.output_path.clone(),
        overwrite: cfg.overwrite,
        codec: cfg.codec,
        program: cfg.ffmpeg.clone(),
    });
    run_with_sink(cfg, &mut sink)
}

/// Render the configured clip into `sink`.
///
/// The input image is loaded before the sink is opened, so a missing input never leaves an
/// output behind. Once open, the sink is either ended after the last frame or aborted on the
/// first failure.
#[tracing::instrument(
    skip_all,
    fields(image = %cfg.image_path.display(), frames = cfg.frame_count, canvas = %cfg.canvas)
)]
pub fn run_with_sink(cfg: &FlagConfig, sink: &mut dyn FrameSink) -> FlagwaveResult<RenderStats> {
    cfg.validate()?;
    let base = load_base_image(&cfg.image_path, cfg.canvas)?;
    let pool = if cfg.threading.parallel {
        Some(build_thread_pool(cfg.threading.threads)?)
    } else {
        None
    };

    tracing::info!(parallel = cfg.threading.parallel, "rendering clip");
    let started = Instant::now();
    let mut stream = OpenSink::begin(
        sink,
        SinkConfig {
            canvas: cfg.canvas,
            fps: cfg.fps,
        },
    )?;

    let range = FrameRange::clip(cfg.frame_count);
    match &pool {
        None => {
            for f in range.start.0..range.end.0 {
                let idx = FrameIndex(f);
                let frame = synthesize(&base, idx, cfg.frame_count, cfg.canvas, cfg.border)?;
                stream.push(idx, &frame)?;
            }
        }
        Some(pool) => {
            let chunk_size = normalized_chunk_size(cfg.threading.chunk_size);
            let mut chunk_start = range.start.0;
            while chunk_start < range.end.0 {
                let chunk_end = (chunk_start + chunk_size).min(range.end.0);
                let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
                let frames = synthesize_chunk_parallel(&base, chunk, cfg, pool)?;
                for (f, frame) in (chunk_start..chunk_end).zip(frames.iter()) {
                    stream.push(FrameIndex(f), frame)?;
                }
                chunk_start = chunk_end;
            }
        }
    }

    let frames_written = stream.pushed;
    stream.finish()?;
    let stats = RenderStats {
        frames_written,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        frames = stats.frames_written,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "clip finished"
    );
    Ok(stats)
}

/// Render a single frame of the configured clip to a PNG.
pub fn render_frame_png(
    cfg: &FlagConfig,
    frame: FrameIndex,
    out_path: impl AsRef<Path>,
) -> FlagwaveResult<FrameRGB> {
    cfg.validate()?;
    let out_path = out_path.as_ref();
    let base = load_base_image(&cfg.image_path, cfg.canvas)?;
    let rgb = synthesize(&base, frame, cfg.frame_count, cfg.canvas, cfg.border)?;

    ensure_parent_dir(out_path)?;
    image::save_buffer_with_format(
        out_path,
        &rgb.data,
        rgb.width,
        rgb.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out_path.display()))?;
    Ok(rgb)
}

/// An opened sink; aborts on drop unless [`OpenSink::finish`] was reached.
struct OpenSink<'a> {
    sink: &'a mut dyn FrameSink,
    pushed: u64,
    closed: bool,
}

impl<'a> OpenSink<'a> {
    fn begin(sink: &'a mut dyn FrameSink, cfg: SinkConfig) -> FlagwaveResult<Self> {
        sink.begin(cfg)?;
        Ok(Self {
            sink,
            pushed: 0,
            closed: false,
        })
    }

    fn push(&mut self, idx: FrameIndex, frame: &FrameRGB) -> FlagwaveResult<()> {
        self.sink.push_frame(idx, frame)?;
        self.pushed += 1;
        tracing::debug!(frame = idx.0, "frame written");
        Ok(())
    }

    fn finish(mut self) -> FlagwaveResult<()> {
        self.closed = true;
        self.sink.end()
    }
}

impl Drop for OpenSink<'_> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(frames = self.pushed, "aborting output stream");
            self.sink.abort();
        }
    }
}

fn synthesize_chunk_parallel(
    base: &BaseImage,
    chunk: FrameRange,
    cfg: &FlagConfig,
    pool: &rayon::ThreadPool,
) -> FlagwaveResult<Vec<FrameRGB>> {
    let indices: Vec<u64> = (chunk.start.0..chunk.end.0).collect();
    pool.install(|| {
        indices
            .par_iter()
            .map(|&f| synthesize(base, FrameIndex(f), cfg.frame_count, cfg.canvas, cfg.border))
            .collect::<FlagwaveResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> FlagwaveResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FlagwaveError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FlagwaveError::validation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}
