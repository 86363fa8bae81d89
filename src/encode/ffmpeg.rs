use crate::encode::sink::{AudioInputConfig, FrameSink, OrderGuard, SinkConfig};
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
    /// Color any remaining alpha is flattened onto.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::rgb(0, 0, 0),
        }
    }
}

/// Streams raw RGBA frames into a system `ffmpeg` process that writes an H.264 MP4.
///
/// When `SinkConfig.audio` is set the PCM file is muxed as AAC and the output is cut to the
/// shorter stream.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    order: OrderGuard,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            order: OrderGuard::default(),
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &fps_arg(cfg.fps),
            "-i",
            "pipe:0",
        ]);
        match &cfg.audio {
            Some(audio) => {
                push_audio_input(&mut cmd, audio);
                cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac", "-shortest"]);
            }
            None => {
                cmd.args(["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]);
            }
        }
        cmd.args(["-movflags", "+faststart"]).arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> HeartfieldResult<()> {
        validate_video(&cfg)?;
        if let Some(audio) = &cfg.audio
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(HeartfieldError::validation(
                "audio input needs a non-zero sample rate and channel count",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(HeartfieldError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(HeartfieldError::encode(
                "ffmpeg was not found on PATH; it is required for MP4 output",
            ));
        }

        let mut child = self
            .command(&cfg)
            .spawn()
            .map_err(|e| HeartfieldError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HeartfieldError::encode("ffmpeg stdin unavailable"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| HeartfieldError::encode("ffmpeg stderr unavailable"))?;
        let drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::info!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            audio = cfg.audio.is_some(),
            "ffmpeg sink started"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(drain);
        self.cfg = Some(cfg);
        self.order.reset();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HeartfieldResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| HeartfieldError::encode("ffmpeg sink not started"))?;
        self.order.accept(idx)?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(HeartfieldError::validation(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_over_background(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.background,
        )?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| HeartfieldError::encode("ffmpeg sink already finished"))?;
        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| HeartfieldError::encode(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> HeartfieldResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| HeartfieldError::encode("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| HeartfieldError::encode(format!("wait for ffmpeg: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| HeartfieldError::encode("ffmpeg stderr reader panicked"))?
                .map_err(|e| HeartfieldError::encode(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            return Err(HeartfieldError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        tracing::info!(out = %self.opts.out_path.display(), "ffmpeg sink finished");
        Ok(())
    }
}

fn validate_video(cfg: &SinkConfig) -> HeartfieldResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(HeartfieldError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(HeartfieldError::validation(
            "mp4 output needs a non-empty frame size",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(HeartfieldError::validation(
            "mp4 output needs even width and height (yuv420p)",
        ));
    }
    Ok(())
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

fn push_audio_input(cmd: &mut Command, audio: &AudioInputConfig) {
    cmd.args([
        "-f",
        "f32le",
        "-ar",
        &audio.sample_rate.to_string(),
        "-ac",
        &audio.channels.to_string(),
        "-i",
    ])
    .arg(&audio.path);
}

/// Composite RGBA8 over an opaque background and force alpha to 255.
fn flatten_over_background(
    dst: &mut [u8],
    src: &[u8],
    src_premul: bool,
    background: Rgba8,
) -> HeartfieldResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(HeartfieldError::validation(
            "frame byte length does not match width * height * 4",
        ));
    }
    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> HeartfieldResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
