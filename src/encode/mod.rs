//! Frame sinks: where rendered frames go.

pub mod ffmpeg;
pub mod png;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use png::PngSequenceSink;
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
