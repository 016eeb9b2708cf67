use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FlagwaveError, FlagwaveResult};
use crate::render::frame::FrameRGB;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Video codec written into the MP4 container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// MPEG-4 Part 2, tagged `mp4v`.
    #[default]
    Mpeg4,
    /// H.264 via `libx264`, tagged `avc1`.
    H264,
}

impl VideoCodec {
    /// Four-character code stored in the container.
    pub fn fourcc(self) -> &'static str {
        match self {
            Self::Mpeg4 => "mp4v",
            Self::H264 => "avc1",
        }
    }

    fn encoder_args(self) -> &'static [&'static str] {
        match self {
            Self::Mpeg4 => &["-c:v", "mpeg4", "-q:v", "3"],
            Self::H264 => &["-c:v", "libx264", "-preset", "medium", "-crf", "20"],
        }
    }
}

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Output codec.
    pub codec: VideoCodec,
    /// `ffmpeg` executable, looked up on `PATH` when it is a bare name.
    pub program: PathBuf,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            codec: VideoCodec::default(),
            program: PathBuf::from("ffmpeg"),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to its stdin.
///
/// Output is written with bit-exact flags, so identical frames produce identical files. If the
/// sink is aborted or dropped while the encoder is still running, the child is killed and the
/// partial file is removed.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn join_stderr(&mut self) -> FlagwaveResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => Ok(handle
                .join()
                .map_err(|_| FlagwaveError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| FlagwaveError::encode(format!("ffmpeg stderr read failed: {e}")))?),
            None => Ok(Vec::new()),
        }
    }

    /// Close stdin, reap the child and return what it wrote to stderr.
    ///
    /// Used once a write has failed: the pipe broke because `ffmpeg` exited, and its stderr
    /// carries the reason.
    fn collect_failure(&mut self) -> String {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        let stderr = self.join_stderr().unwrap_or_default();
        self.cfg = None;
        self.remove_partial_output();
        String::from_utf8_lossy(&stderr).trim().to_owned()
    }

    fn remove_partial_output(&self) {
        if let Err(e) = std::fs::remove_file(&self.opts.out_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(
                path = %self.opts.out_path.display(),
                "failed to remove partial output: {e}"
            );
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlagwaveResult<()> {
        if self.child.is_some() {
            return Err(FlagwaveError::stream_open("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(FlagwaveError::validation("fps must be non-zero"));
        }
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(FlagwaveError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(FlagwaveError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)
            .map_err(|e| FlagwaveError::stream_open(e.to_string()))?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(FlagwaveError::stream_open(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        ensure_writable(&self.opts.out_path)?;

        if !ffmpeg_available(&self.opts.program) {
            return Err(FlagwaveError::stream_open(format!(
                "ffmpeg is required for MP4 encoding, but '{}' could not be run",
                self.opts.program.display()
            )));
        }

        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &cfg.canvas.to_string(),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);
        cmd.args(self.opts.codec.encoder_args());
        cmd.args([
            "-tag:v",
            self.opts.codec.fourcc(),
            "-pix_fmt",
            "yuv420p",
            "-fflags",
            "+bitexact",
            "-flags:v",
            "+bitexact",
            "-map_metadata",
            "-1",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            FlagwaveError::stream_open(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FlagwaveError::stream_open("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            FlagwaveError::stream_open("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            codec = self.opts.codec.fourcc(),
            canvas = %cfg.canvas,
            "spawned ffmpeg"
        );

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> FlagwaveResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlagwaveError::encode("ffmpeg sink not started"))?;
        let first = match self.last_idx {
            Some(last) if idx.0 <= last.0 => {
                return Err(FlagwaveError::encode(
                    "ffmpeg sink received out-of-order frame index",
                ));
            }
            Some(_) => false,
            None => true,
        };
        self.last_idx = Some(idx);

        if frame.canvas() != cfg.canvas {
            return Err(FlagwaveError::DimensionMismatch {
                expected: cfg.canvas,
                actual: frame.canvas(),
            });
        }
        if frame.data.len() != cfg.canvas.rgb_len() {
            return Err(FlagwaveError::validation(
                "frame.data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FlagwaveError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        let Err(e) = stdin.write_all(&frame.data) else {
            return Ok(());
        };

        let stderr = self.collect_failure();
        let reason = if stderr.is_empty() {
            e.to_string()
        } else {
            stderr
        };
        // A pipe that breaks on the first frame means ffmpeg never opened the stream.
        if first {
            Err(FlagwaveError::stream_open(format!(
                "ffmpeg could not open '{}': {reason}",
                self.opts.out_path.display()
            )))
        } else {
            Err(FlagwaveError::encode(format!(
                "ffmpeg stopped at frame {}: {reason}",
                idx.0
            )))
        }
    }

    fn end(&mut self) -> FlagwaveResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| FlagwaveError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            FlagwaveError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = self.join_stderr()?;
        self.cfg = None;

        if !status.success() {
            self.remove_partial_output();
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(FlagwaveError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        let _ = child.kill();
        let _ = child.wait();
        let _ = self.join_stderr();
        self.cfg = None;
        self.remove_partial_output();
        tracing::debug!(out = %self.opts.out_path.display(), "aborted ffmpeg sink");
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FlagwaveResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Fail with `StreamOpen` unless `path` can be opened for writing.
///
/// An existing file is opened without truncation; a file created by the check is removed again.
fn ensure_writable(path: &Path) -> FlagwaveResult<()> {
    let existed = path.exists();
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| {
            FlagwaveError::stream_open(format!(
                "output '{}' is not writable: {e}",
                path.display()
            ))
        })?;
    if !existed {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    ffmpeg_available(Path::new("ffmpeg"))
}

/// Return `true` when `program -version` runs successfully.
pub fn ffmpeg_available(program: &Path) -> bool {
    std::process::Command::new(program)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
