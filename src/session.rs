//! The running show: particle state, sequencer, rotation, renderer and audio cue on one clock.

use crate::animation::tween::YoyoTween;
use crate::audio::cue::{AudioCue, CueOutcome, InputEvent};
use crate::audio::track::Soundtrack;
use crate::config::{GestureDef, ShowConfig};
use crate::driver::context::AnimationContext;
use crate::driver::phase::{REPEAT_DELAY_SECS, default_sequence};
use crate::driver::sequencer::Sequencer;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRange, Viewport};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::particles::ParticleField;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::PointRenderer;
use crate::sampling::glyph::{GlyphRasterizer, SvgGlyphRasterizer};
use crate::targets::{TargetSetBuilder, TargetSets, TargetStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Position buffer uploads the renderer performed.
    pub buffer_uploads: u64,
    /// Whether a soundtrack was handed to the sink.
    pub with_audio: bool,
}

/// Offline show driver.
///
/// The show starts at frame 0 with the first phase already entered. [`Show::step`] advances one
/// frame; rendering never mutates particles. Time only moves forward.
pub struct Show {
    config: ShowConfig,
    fps: Fps,
    frame: FrameIndex,
    ctx: AnimationContext,
    sequencer: Option<Sequencer>,
    sequence_origin_secs: f64,
    rotation: YoyoTween,
    renderer: PointRenderer,
    rasterizer: Box<dyn GlyphRasterizer>,
    cue: AudioCue,
    soundtrack: Soundtrack,
    gestures: Vec<GestureDef>,
    next_gesture: usize,
}

impl Show {
    /// Build a show that rasterizes text with system fonts.
    pub fn new(config: ShowConfig) -> HeartfieldResult<Self> {
        let rasterizer = SvgGlyphRasterizer::new(config.font_family.clone(), &config.font_dirs);
        Self::with_rasterizer(config, Box::new(rasterizer))
    }

    /// Build a show with a caller-supplied glyph rasterizer.
    pub fn with_rasterizer(
        config: ShowConfig,
        mut rasterizer: Box<dyn GlyphRasterizer>,
    ) -> HeartfieldResult<Self> {
        config.validate()?;
        let fps = Fps::new(config.fps.num, config.fps.den)?;
        let viewport = config.viewport;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let field = ParticleField::new_scattered(config.particle_count, viewport, &mut rng);
        let sets = TargetSetBuilder::new(rasterizer.as_mut(), config.text_targets()).build(
            viewport,
            config.particle_count,
            &mut rng,
        )?;
        let ctx = AnimationContext::new(field, TargetStore::new(sets), viewport, rng);

        let mut gestures = config.gestures.clone();
        gestures.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));

        let mut show = Self {
            fps,
            frame: FrameIndex(0),
            ctx,
            sequencer: None,
            sequence_origin_secs: 0.0,
            rotation: YoyoTween::scene_yaw(),
            renderer: PointRenderer::new(viewport, config.render_settings()),
            rasterizer,
            cue: AudioCue::new(config.audio.volume),
            soundtrack: Soundtrack::new(config.audio.source.clone()),
            gestures,
            next_gesture: 0,
            config,
        };
        show.start_sequence()?;
        Ok(show)
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frame the particle state corresponds to.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn time_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame.0)
    }

    pub fn viewport(&self) -> Viewport {
        self.ctx.viewport
    }

    pub fn field(&self) -> &ParticleField {
        &self.ctx.field
    }

    pub fn sequencer(&self) -> Option<&Sequencer> {
        self.sequencer.as_ref()
    }

    /// Current target sets.
    pub fn targets(&self) -> Arc<TargetSets> {
        self.ctx.targets.snapshot()
    }

    /// Cloud yaw at the current frame, in radians.
    pub fn rotation_y(&self) -> f64 {
        self.rotation.sample(self.time_secs())
    }

    pub fn cue(&self) -> &AudioCue {
        &self.cue
    }

    pub fn soundtrack(&self) -> &Soundtrack {
        &self.soundtrack
    }

    /// Swap the audio output, e.g. for PCM that is already decoded.
    pub fn set_soundtrack(&mut self, soundtrack: Soundtrack) {
        self.soundtrack = soundtrack;
    }

    pub fn renderer(&self) -> &PointRenderer {
        &self.renderer
    }

    /// Replace the running sequence with a fresh one starting now.
    ///
    /// The old sequencer is killed and dropped before the new one enters its first phase.
    pub fn start_sequence(&mut self) -> HeartfieldResult<()> {
        if let Some(mut old) = self.sequencer.take() {
            old.kill();
            tracing::debug!(cycle = old.cycle(), "previous sequence killed");
        }
        let mut seq = Sequencer::new(default_sequence(), REPEAT_DELAY_SECS)?;
        self.sequence_origin_secs = self.time_secs();
        seq.advance_to(&mut self.ctx, 0.0);
        self.sequencer = Some(seq);
        Ok(())
    }

    /// Advance one frame: scripted gestures, then the sequencer.
    pub fn step(&mut self) {
        self.frame = FrameIndex(self.frame.0 + 1);
        let now = self.time_secs();
        self.dispatch_gestures_until(now);
        if let Some(seq) = self.sequencer.as_mut() {
            seq.advance_to(&mut self.ctx, now - self.sequence_origin_secs);
        }
    }

    /// Step until the state corresponds to `target`.
    pub fn advance_to(&mut self, target: FrameIndex) -> HeartfieldResult<()> {
        if target < self.frame {
            return Err(HeartfieldError::validation(format!(
                "show is at frame {} and cannot rewind to {}",
                self.frame.0, target.0
            )));
        }
        while self.frame < target {
            self.step();
        }
        Ok(())
    }

    /// Rasterize the current state.
    pub fn render_frame(&mut self) -> HeartfieldResult<FrameRGBA> {
        let rotation = self.rotation_y();
        self.renderer.render(self.ctx.field.buffer_mut(), rotation)
    }

    /// Deliver a pointer gesture at the current time.
    pub fn pointer_down(&mut self) -> CueOutcome {
        self.gesture(InputEvent::PointerDown, self.time_secs())
    }

    /// Deliver a touch gesture at the current time.
    pub fn touch_start(&mut self) -> CueOutcome {
        self.gesture(InputEvent::TouchStart, self.time_secs())
    }

    fn gesture(&mut self, event: InputEvent, at_secs: f64) -> CueOutcome {
        self.soundtrack.set_clock(at_secs);
        self.cue.on_event(event, &mut self.soundtrack)
    }

    fn dispatch_gestures_until(&mut self, t_secs: f64) {
        while let Some(g) = self.gestures.get(self.next_gesture).copied() {
            if g.at_secs > t_secs {
                break;
            }
            self.next_gesture += 1;
            self.gesture(g.kind, g.at_secs);
        }
    }

    /// New output size. Targets stay as they were; call [`Show::rebuild_targets`] to resample.
    pub fn resize(&mut self, viewport: Viewport) {
        self.ctx.viewport = viewport;
        self.config.viewport = viewport;
        self.renderer.resize(viewport);
    }

    /// Resample all three target sets for the current viewport and swap them in at once.
    ///
    /// A phase already running keeps the sets it captured.
    pub fn rebuild_targets(&mut self) -> HeartfieldResult<u64> {
        let sets = TargetSetBuilder::new(self.rasterizer.as_mut(), self.config.text_targets())
            .build(
                self.ctx.viewport,
                self.config.particle_count,
                &mut self.ctx.rng,
            )?;
        Ok(self.ctx.targets.replace(sets))
    }

    /// Render `range` into `sink`, stepping the show forward as needed.
    ///
    /// Scripted gestures up to the last frame of the range are dispatched before the first frame
    /// is rendered, so the sink learns about the soundtrack in `begin`. While the range renders,
    /// [`Show::cue`] and [`Show::soundtrack`] may already report a gesture whose time has not
    /// been reached on the show clock. The audio itself still starts at the gesture time.
    ///
    /// The soundtrack is written to a temporary `f32le` file that is removed when the render
    /// returns.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> HeartfieldResult<RenderStats> {
        if range.is_empty() {
            return Err(HeartfieldError::validation("render range must be non-empty"));
        }
        self.advance_to(range.start)?;

        let start_secs = self.fps.frames_to_secs(range.start.0);
        let duration_secs = self.fps.frames_to_secs(range.len_frames());
        self.dispatch_gestures_until(self.fps.frames_to_secs(range.end.0 - 1));

        let mut audio_tmp = TempFileGuard(None);
        let audio = if self.soundtrack.started_at().is_some() {
            let path = temp_audio_path();
            let cfg = self
                .soundtrack
                .write_range(start_secs, duration_secs, &path)?;
            audio_tmp.0 = Some(path);
            cfg
        } else {
            None
        };

        let uploads_before = self.renderer.upload_count();
        let with_audio = audio.is_some();
        sink.begin(SinkConfig {
            width: self.ctx.viewport.width,
            height: self.ctx.viewport.height,
            fps: self.fps,
            audio,
        })?;

        for i in range.start.0..range.end.0 {
            self.advance_to(FrameIndex(i))?;
            let frame = self.render_frame()?;
            sink.push_frame(FrameIndex(i), &frame)?;
        }
        sink.end()?;

        Ok(RenderStats {
            frames_total: range.len_frames(),
            buffer_uploads: self.renderer.upload_count() - uploads_before,
            with_audio,
        })
    }
}

fn temp_audio_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "heartfield_soundtrack_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
