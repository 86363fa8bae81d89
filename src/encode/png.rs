use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, OrderGuard, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::render::backend::FrameRGBA;
use std::path::{Path, PathBuf};

/// Writes each frame as `frame_NNNNNN.png` inside a directory. Audio is ignored.
pub struct PngSequenceSink {
    dir: PathBuf,
    order: OrderGuard,
    written: Vec<PathBuf>,
    started: bool,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            order: OrderGuard::default(),
            written: Vec::new(),
            started: false,
        }
    }

    /// Path the frame at `idx` is written to.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", idx.0))
    }

    /// Files written during the current range.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> HeartfieldResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(HeartfieldError::validation(
                "png output needs a non-empty frame size",
            ));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            HeartfieldError::encode(format!(
                "create png directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        if cfg.audio.is_some() {
            tracing::debug!("png sequence sink drops the soundtrack");
        }
        self.order.reset();
        self.written.clear();
        self.started = true;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HeartfieldResult<()> {
        if !self.started {
            return Err(HeartfieldError::encode("png sink not started"));
        }
        self.order.accept(idx)?;
        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> HeartfieldResult<()> {
        self.started = false;
        tracing::info!(
            dir = %self.dir.display(),
            frames = self.written.len(),
            "png sequence finished"
        );
        Ok(())
    }
}

/// Save one frame as an RGBA PNG, converting premultiplied pixels to straight alpha.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> HeartfieldResult<()> {
    ensure_parent_dir(path)?;
    let straight;
    let bytes = if frame.premultiplied {
        straight = unpremultiply(&frame.data);
        &straight
    } else {
        &frame.data
    };
    image::save_buffer_with_format(
        path,
        bytes,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| HeartfieldError::encode(format!("write png '{}': {e}", path.display())))
}

fn unpremultiply(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
