//! heartfield renders a looping particle show offline.
//!
//! A fixed cloud of points scatters, gathers into a heart, bursts, then spells a label and a
//! caption, forever, while the whole cloud slowly yaws back and forth. Frames are rasterized on
//! the CPU and streamed into a [`FrameSink`]; a soundtrack starts on the first scripted gesture
//! and is muxed when the sink supports audio.
//!
//! - Load a [`ShowConfig`]
//! - Create a [`Show`]
//! - Step and render single frames, or stream a range with [`Show::render_range`]
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod audio;
pub mod config;
pub mod driver;
pub mod encode;
pub mod particles;
pub mod render;
pub mod sampling;
pub mod session;
pub mod targets;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, Point, Vec3, Viewport};
pub use crate::foundation::error::{HeartfieldError, HeartfieldResult};

pub use crate::audio::cue::{AudioCue, AudioOutput, CueOutcome, InputEvent};
pub use crate::config::{AudioConfig, GestureDef, ShowConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::FrameRGBA;
pub use crate::sampling::glyph::{AlphaMask, GlyphRasterizer, SvgGlyphRasterizer};
pub use crate::session::{RenderStats, Show};
pub use crate::targets::{TargetSets, TargetSummary};
