use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::render::backend::FrameRGBA;
use std::path::PathBuf;

/// Handed to a [`FrameSink`] once, before the first frame of a range.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Soundtrack to mux, when the audio cue fired inside the range.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM soundtrack for sinks that can carry audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInputConfig {
    /// Interleaved `f32le` samples.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Consumes rendered frames in show order.
///
/// `push_frame` is called with strictly increasing `FrameIndex` values between `begin` and `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> HeartfieldResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HeartfieldResult<()>;
    fn end(&mut self) -> HeartfieldResult<()>;
}

/// Tracks the ordering contract on behalf of a sink.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OrderGuard {
    last: Option<FrameIndex>,
}

impl OrderGuard {
    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    pub(crate) fn accept(&mut self, idx: FrameIndex) -> HeartfieldResult<()> {
        if let Some(last) = self.last
            && idx <= last
        {
            return Err(HeartfieldError::encode(format!(
                "frame {} pushed after frame {}",
                idx.0, last.0
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// Keeps every frame in memory; for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: OrderGuard,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The config received in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames in the order they were pushed.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` has been called for the current range.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> HeartfieldResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.order.reset();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HeartfieldResult<()> {
        self.order.accept(idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> HeartfieldResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
