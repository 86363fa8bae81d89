//! Background music: armed by the first gesture, muxed into the MP4 when it fires.

pub mod cue;
pub mod track;

pub use cue::{AudioCue, AudioOutput, CueOutcome, InputEvent};
pub use track::{SOUNDTRACK_CHANNELS, SOUNDTRACK_SAMPLE_RATE, Soundtrack};
