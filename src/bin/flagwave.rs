use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flagwave::{BorderMode, Canvas, FlagConfig, FlagwaveError, Fps, FrameIndex, VideoCodec};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flagwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the waving clip as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    clip: ClipArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Output codec.
    #[arg(long, value_enum)]
    codec: Option<CodecChoice>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames synthesized per batch (parallel mode only).
    #[arg(long)]
    chunk_size: Option<usize>,

    /// `ffmpeg` executable to encode with.
    #[arg(long)]
    ffmpeg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    clip: ClipArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ClipArgs {
    /// JSON config file; flags given on the command line take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input flag image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Number of frames in the clip.
    #[arg(long)]
    frames: Option<u64>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Out-of-bounds policy for displaced samples.
    #[arg(long, value_enum)]
    border: Option<BorderChoice>,

    /// Border color for `--border constant`, as `R,G,B`.
    #[arg(long, value_delimiter = ',', num_args = 3)]
    border_rgb: Option<Vec<u8>>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Mpeg4,
    H264,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BorderChoice {
    Constant,
    Replicate,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let FlagwaveError::InputNotFound(path) = &err {
                eprintln!(
                    "Error: {} not found. Add the flag image to your folder.",
                    path.display()
                );
            } else {
                eprintln!("Error: {err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<(), FlagwaveError> {
    let mut cfg = args.clip.resolve()?;
    if let Some(out) = args.out {
        cfg.output_path = out;
    }
    if args.no_overwrite {
        cfg.overwrite = false;
    }
    if let Some(codec) = args.codec {
        cfg.codec = match codec {
            CodecChoice::Mpeg4 => VideoCodec::Mpeg4,
            CodecChoice::H264 => VideoCodec::H264,
        };
    }
    if args.parallel {
        cfg.threading.parallel = true;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if let Some(chunk_size) = args.chunk_size {
        cfg.threading.chunk_size = chunk_size;
    }
    if let Some(ffmpeg) = args.ffmpeg {
        cfg.ffmpeg = ffmpeg;
    }
    cfg.validate_video()?;

    eprintln!(
        "[SYSTEM] Forging the flag wave for {}...",
        cfg.image_path.display()
    );
    let stats = flagwave::run(&cfg)?;
    eprintln!(
        "[SYSTEM] Video saved as {} ({} frames, {:.2}s of video, rendered in {:.2}s).",
        cfg.output_path.display(),
        stats.frames_written,
        cfg.fps.frames_to_secs(stats.frames_written),
        stats.elapsed.as_secs_f64()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> Result<(), FlagwaveError> {
    let cfg = args.clip.resolve()?;
    flagwave::render_frame_png(&cfg, FrameIndex(args.frame), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

impl ClipArgs {
    fn resolve(&self) -> Result<FlagConfig, FlagwaveError> {
        let mut cfg = match &self.config {
            Some(path) => FlagConfig::from_path(path)?,
            None => FlagConfig::default(),
        };
        if let Some(image) = &self.image {
            cfg.image_path = image.clone();
        }
        if let Some(frames) = self.frames {
            cfg.frame_count = frames;
        }
        cfg.canvas = Canvas::new(
            self.width.unwrap_or(cfg.canvas.width),
            self.height.unwrap_or(cfg.canvas.height),
        )?;
        if let Some(fps) = self.fps {
            cfg.fps = Fps::new(fps, 1)?;
        }
        let rgb = match self.border_rgb.as_deref() {
            Some(&[r, g, b]) => Some([r, g, b]),
            _ => None,
        };
        match (self.border, rgb) {
            (Some(BorderChoice::Replicate), Some(_)) => {
                return Err(FlagwaveError::validation(
                    "--border-rgb only applies to --border constant",
                ));
            }
            (Some(BorderChoice::Replicate), None) => cfg.border = BorderMode::Replicate,
            (Some(BorderChoice::Constant), rgb) => {
                cfg.border = BorderMode::Constant(rgb.unwrap_or([0, 0, 0]));
            }
            (None, Some(rgb)) => cfg.border = BorderMode::Constant(rgb),
            (None, None) => {}
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
