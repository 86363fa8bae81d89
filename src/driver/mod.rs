//! Phase sequencing: what happens to the particle field, and when.

pub mod context;
pub mod phase;
pub mod sequencer;

pub use context::AnimationContext;
pub use phase::{PhaseKind, PhaseSpec, REPEAT_DELAY_SECS, default_sequence};
pub use sequencer::Sequencer;
