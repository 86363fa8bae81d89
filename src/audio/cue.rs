use crate::foundation::error::HeartfieldResult;

/// Default playback volume.
pub const DEFAULT_VOLUME: f32 = 0.4;

/// User gestures that can start playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown,
    TouchStart,
}

/// Something that can play the soundtrack.
pub trait AudioOutput {
    fn set_volume(&mut self, volume: f32);
    /// Start playback. An `Err` is a rejected play.
    fn play(&mut self) -> HeartfieldResult<()>;
}

/// What a gesture did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    /// The cue was already spent.
    Ignored,
    Played,
    /// `play` failed; the failure was dropped.
    Rejected,
}

/// One-shot trigger: the first pointer or touch gesture starts playback, later ones do nothing.
///
/// Both gestures share one armed flag, so firing either disarms the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioCue {
    volume: f32,
    armed: bool,
}

impl Default for AudioCue {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

impl AudioCue {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            armed: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Handle a gesture. Rejected playback is logged at debug level and swallowed.
    pub fn on_event(&mut self, event: InputEvent, output: &mut dyn AudioOutput) -> CueOutcome {
        if !self.armed {
            return CueOutcome::Ignored;
        }
        self.armed = false;
        output.set_volume(self.volume);
        match output.play() {
            Ok(()) => {
                tracing::debug!(?event, "audio cue played");
                CueOutcome::Played
            }
            Err(err) => {
                tracing::debug!(?event, error = %err, "audio playback rejected");
                CueOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/cue.rs"]
mod tests;
