//! JSON show configuration.

use crate::audio::cue::{DEFAULT_VOLUME, InputEvent};
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Fps, Viewport};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::render::backend::{RenderSettings, point_size_for};
use crate::targets::TextTargets;
use std::path::{Path, PathBuf};

/// Largest accepted viewport edge in pixels.
pub const MAX_VIEWPORT_EDGE: u32 = 16_384;

/// Everything that shapes a show. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowConfig {
    pub viewport: Viewport,
    pub fps: Fps,
    pub particle_count: usize,
    /// Seed for every random draw in the show.
    pub seed: u64,
    pub color: Rgba8,
    pub background: Rgba8,
    pub label_text: String,
    pub caption_text: String,
    /// Preferred face for the text targets; any sans-serif face is the fallback.
    pub font_family: String,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dirs: Vec<PathBuf>,
    pub audio: AudioConfig,
    /// Scripted gestures, in show seconds.
    pub gestures: Vec<GestureDef>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        let text = TextTargets::default();
        Self {
            viewport: Viewport::default(),
            fps: Fps::default(),
            particle_count: 1400,
            seed: 0,
            color: Rgba8::rgb(0xee, 0x52, 0x82),
            background: Rgba8::rgb(0, 0, 0),
            label_text: text.label_text,
            caption_text: text.caption_text,
            font_family: "Arial".to_owned(),
            font_dirs: Vec::new(),
            audio: AudioConfig::default(),
            gestures: Vec::new(),
        }
    }
}

/// Soundtrack settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Audio file decoded through `ffmpeg` when the cue fires.
    pub source: Option<PathBuf>,
    /// Playback volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            source: None,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// A gesture delivered at a fixed show time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureDef {
    pub at_secs: f64,
    #[serde(default = "default_gesture_kind")]
    pub kind: InputEvent,
}

fn default_gesture_kind() -> InputEvent {
    InputEvent::PointerDown
}

impl ShowConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> HeartfieldResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| HeartfieldError::serde(format!("show config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> HeartfieldResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read show config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> HeartfieldResult<()> {
        if self.particle_count == 0 {
            return Err(HeartfieldError::validation("particle_count must be > 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.viewport.width > MAX_VIEWPORT_EDGE || self.viewport.height > MAX_VIEWPORT_EDGE {
            return Err(HeartfieldError::validation(format!(
                "viewport {}x{} exceeds {MAX_VIEWPORT_EDGE} px",
                self.viewport.width, self.viewport.height
            )));
        }
        if !self.audio.volume.is_finite() || !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(HeartfieldError::validation(
                "audio.volume must be within [0, 1]",
            ));
        }
        if let Some(g) = self
            .gestures
            .iter()
            .find(|g| !g.at_secs.is_finite() || g.at_secs < 0.0)
        {
            return Err(HeartfieldError::validation(format!(
                "gesture time {} must be finite and >= 0",
                g.at_secs
            )));
        }
        Ok(())
    }

    pub fn text_targets(&self) -> TextTargets {
        TextTargets {
            label_text: self.label_text.clone(),
            caption_text: self.caption_text.clone(),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self.background,
            point_rgba: self.color,
            point_size: point_size_for(self.viewport),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
