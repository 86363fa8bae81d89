use crate::audio::cue::{AudioOutput, DEFAULT_VOLUME};
use crate::encode::sink::AudioInputConfig;
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use std::path::{Path, PathBuf};

/// Sample rate of decoded and mixed PCM.
pub const SOUNDTRACK_SAMPLE_RATE: u32 = 48_000;
/// Decoded PCM is always interleaved stereo.
pub const SOUNDTRACK_CHANNELS: u16 = 2;

#[derive(Clone, Debug)]
enum PcmSource {
    None,
    File(PathBuf),
    Samples(Vec<f32>),
}

#[derive(Clone, Debug)]
struct Started {
    at_secs: f64,
    pcm: Vec<f32>,
}

/// Offline stand-in for the page's audio element.
///
/// `play` decodes the source and pins it to the current show clock; [`Soundtrack::write_range`]
/// later lays the volume-scaled samples onto a silent track covering a render range.
#[derive(Clone, Debug)]
pub struct Soundtrack {
    source: PcmSource,
    volume: f32,
    clock_secs: f64,
    started: Option<Started>,
}

impl Soundtrack {
    /// Soundtrack decoded from `source` through `ffmpeg`; `None` makes every play fail.
    pub fn new(source: Option<PathBuf>) -> Self {
        Self::with_source(source.map_or(PcmSource::None, PcmSource::File))
    }

    /// Soundtrack backed by interleaved stereo samples at [`SOUNDTRACK_SAMPLE_RATE`].
    pub fn from_samples(interleaved: Vec<f32>) -> Self {
        Self::with_source(PcmSource::Samples(interleaved))
    }

    fn with_source(source: PcmSource) -> Self {
        Self {
            source,
            volume: DEFAULT_VOLUME,
            clock_secs: 0.0,
            started: None,
        }
    }

    /// Show time a subsequent `play` is pinned to.
    pub fn set_clock(&mut self, secs: f64) {
        self.clock_secs = secs;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Show time playback started at, if it did.
    pub fn started_at(&self) -> Option<f64> {
        self.started.as_ref().map(|s| s.at_secs)
    }

    /// Interleaved samples for `[start_secs, start_secs + duration_secs)`, or `None` before
    /// playback started. Time before the start and after the end of the source is silence.
    pub fn mix_range(&self, start_secs: f64, duration_secs: f64) -> Option<Vec<f32>> {
        let started = self.started.as_ref()?;
        let channels = usize::from(SOUNDTRACK_CHANNELS);
        let rate = f64::from(SOUNDTRACK_SAMPLE_RATE);
        let out_frames = (duration_secs.max(0.0) * rate).round() as usize;
        let src_frames = started.pcm.len() / channels;
        let offset = ((started.at_secs - start_secs) * rate).round() as i64;

        let mut out = vec![0.0f32; out_frames * channels];
        for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
            let j = i as i64 - offset;
            if j < 0 || j as usize >= src_frames {
                continue;
            }
            let src = &started.pcm[j as usize * channels..(j as usize + 1) * channels];
            for (d, s) in frame.iter_mut().zip(src) {
                *d = s * self.volume;
            }
        }
        Some(out)
    }

    /// Write the mixed range to `path` as `f32le` and describe it for a sink.
    pub fn write_range(
        &self,
        start_secs: f64,
        duration_secs: f64,
        path: &Path,
    ) -> HeartfieldResult<Option<AudioInputConfig>> {
        let Some(samples) = self.mix_range(start_secs, duration_secs) else {
            return Ok(None);
        };
        write_f32le(&samples, path)?;
        tracing::info!(
            path = %path.display(),
            samples = samples.len(),
            "soundtrack written"
        );
        Ok(Some(AudioInputConfig {
            path: path.to_path_buf(),
            sample_rate: SOUNDTRACK_SAMPLE_RATE,
            channels: SOUNDTRACK_CHANNELS,
        }))
    }
}

impl AudioOutput for Soundtrack {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) -> HeartfieldResult<()> {
        if self.started.is_some() {
            return Ok(());
        }
        let pcm = match &self.source {
            PcmSource::None => {
                return Err(HeartfieldError::validation("no audio source configured"));
            }
            PcmSource::File(path) => decode_f32_stereo(path, SOUNDTRACK_SAMPLE_RATE)?,
            PcmSource::Samples(s) => s.clone(),
        };
        self.started = Some(Started {
            at_secs: self.clock_secs,
            pcm,
        });
        Ok(())
    }
}

/// Decode any ffmpeg-readable audio to interleaved stereo `f32` at `sample_rate`.
pub fn decode_f32_stereo(path: &Path, sample_rate: u32) -> HeartfieldResult<Vec<f32>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-f", "f32le", "-acodec", "pcm_f32le", "-ac"])
        .arg(SOUNDTRACK_CHANNELS.to_string())
        .arg("-ar")
        .arg(sample_rate.to_string())
        .arg("pipe:1")
        .output()
        .map_err(|e| HeartfieldError::encode(format!("run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(HeartfieldError::encode(format!(
            "ffmpeg could not decode '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if !out.stdout.len().is_multiple_of(4) {
        return Err(HeartfieldError::encode(
            "decoded audio is not a whole number of f32 samples",
        ));
    }
    Ok(out
        .stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn write_f32le(samples: &[f32], path: &Path) -> HeartfieldResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    std::fs::write(path, bytes)
        .map_err(|e| HeartfieldError::encode(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
