use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use heartfield::{
    FfmpegSink, FfmpegSinkOpts, FrameIndex, FrameRange, FrameSink, GestureDef, InputEvent,
    PngSequenceSink, Show, ShowConfig,
};

#[derive(Parser, Debug)]
#[command(name = "heartfield", version)]
struct Cli {
    /// Show config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Deliver a pointer gesture at this show time in seconds (repeatable).
    #[arg(long = "gesture-at", global = true)]
    gesture_at: Vec<f64>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a given time as a PNG.
    Frame(FrameArgs),
    /// Render the first seconds of the show as an MP4 (requires `ffmpeg`) or a PNG sequence.
    Render(RenderArgs),
    /// Print target set sizes as JSON.
    Targets,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Show time in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Length of the render in seconds.
    #[arg(long)]
    seconds: f64,

    /// Output MP4 path, or directory with `--png-dir`.
    #[arg(long)]
    out: PathBuf,

    /// Write numbered PNG frames into `--out` instead of encoding an MP4.
    #[arg(long, default_value_t = false)]
    png_dir: bool,

    /// Overwrite the MP4 if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.gesture_at)?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(config, args),
        Command::Render(args) => cmd_render(config, args),
        Command::Targets => cmd_targets(config),
    }
}

fn load_config(path: Option<&Path>, gesture_at: &[f64]) -> anyhow::Result<ShowConfig> {
    let mut config = match path {
        Some(p) => ShowConfig::from_path(p)
            .with_context(|| format!("load show config '{}'", p.display()))?,
        None => ShowConfig::default(),
    };
    config
        .gestures
        .extend(gesture_at.iter().map(|&at_secs| GestureDef {
            at_secs,
            kind: InputEvent::PointerDown,
        }));
    config.validate().context("invalid --gesture-at")?;
    Ok(config)
}

/// Longest show time accepted by `frame --at` and `render --seconds`.
const MAX_SHOW_SECS: f64 = 3600.0;

fn seconds_to_frame(show: &Show, secs: f64) -> anyhow::Result<u64> {
    if !secs.is_finite() || secs < 0.0 {
        anyhow::bail!("time must be finite and >= 0, got {secs}");
    }
    if secs > MAX_SHOW_SECS {
        anyhow::bail!("time {secs}s exceeds the {MAX_SHOW_SECS}s limit");
    }
    Ok(show.fps().secs_to_frames_floor(secs))
}

fn cmd_frame(config: ShowConfig, args: FrameArgs) -> anyhow::Result<()> {
    let mut show = Show::new(config)?;
    let idx = seconds_to_frame(&show, args.at)?;
    show.advance_to(FrameIndex(idx))?;
    let frame = show.render_frame()?;

    heartfield::encode::png::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(config: ShowConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut show = Show::new(config)?;
    let frames = seconds_to_frame(&show, args.seconds)?.max(1);
    let range = FrameRange::new(FrameIndex(0), FrameIndex(frames))?;

    let mut sink: Box<dyn FrameSink> = if args.png_dir {
        Box::new(PngSequenceSink::new(args.out.clone()))
    } else {
        Box::new(FfmpegSink::new(FfmpegSinkOpts {
            overwrite: args.overwrite,
            background: show.config().background,
            ..FfmpegSinkOpts::new(args.out.clone())
        }))
    };
    let stats = show.render_range(range, sink.as_mut())?;

    eprintln!(
        "wrote {} ({} frames{})",
        args.out.display(),
        stats.frames_total,
        if stats.with_audio { ", with audio" } else { "" }
    );
    Ok(())
}

fn cmd_targets(config: ShowConfig) -> anyhow::Result<()> {
    let show = Show::new(config)?;
    let summary = show.targets().summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
