//! Viewport-sized target point sets: the heart shape, the label, and the caption.

use crate::foundation::core::{Point, Vec3, Viewport};
use crate::foundation::error::HeartfieldResult;
use crate::sampling::curve::{Heart, sample_curve};
use crate::sampling::glyph::{GlyphRasterizer, GlyphRequest, sample_text};
use rand::Rng;
use std::sync::Arc;

/// Width below which a viewport counts as narrow.
pub const NARROW_MAX_WIDTH: u32 = 600;
/// Width below which a viewport counts as medium.
pub const MEDIUM_MAX_WIDTH: u32 = 1024;

const SHAPE_MULTIPLIER: f64 = 1.3;
const SHAPE_Y_OFFSET: f64 = -100.0;
const SHAPE_Z_JITTER: f64 = 40.0;
const TEXT_Z_JITTER: f64 = 20.0;
const TEXT_STRIDE: u32 = 4;

/// Label offset applied when a phase captures the label set.
pub const LABEL_OFFSET: Vec3 = Vec3::new(0.0, -50.0, 0.0);
/// Caption offset applied when a phase captures the caption set.
pub const CAPTION_OFFSET: Vec3 = Vec3::new(120.0, -50.0, 0.0);

/// The three named sets, built together and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetSets {
    /// Heart outline, one point per particle.
    pub shape: Vec<Vec3>,
    /// Label text points (size depends on glyph coverage).
    pub label: Vec<Vec3>,
    /// Caption text points (size depends on glyph coverage).
    pub caption: Vec<Vec3>,
    /// Viewport the sets were sized for.
    pub viewport: Viewport,
    /// Monotonic build number, assigned by [`TargetStore`].
    pub generation: u64,
}

/// Which set a phase reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetSetKind {
    Shape,
    Label,
    Caption,
}

impl TargetSets {
    /// Borrow one set by kind.
    pub fn get(&self, kind: TargetSetKind) -> &[Vec3] {
        match kind {
            TargetSetKind::Shape => &self.shape,
            TargetSetKind::Label => &self.label,
            TargetSetKind::Caption => &self.caption,
        }
    }

    pub fn summary(&self) -> TargetSummary {
        TargetSummary {
            generation: self.generation,
            viewport: self.viewport,
            shape: self.shape.len(),
            label: self.label.len(),
            caption: self.caption.len(),
        }
    }
}

/// Set sizes, as printed by `heartfield targets`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TargetSummary {
    pub generation: u64,
    pub viewport: Viewport,
    pub shape: usize,
    pub label: usize,
    pub caption: usize,
}

/// Strings rendered into the label and caption sets.
#[derive(Clone, Debug, PartialEq)]
pub struct TextTargets {
    pub label_text: String,
    pub caption_text: String,
}

impl Default for TextTargets {
    fn default() -> Self {
        Self {
            label_text: "Walaa".to_owned(),
            caption_text: "I LOVE YOU WALAA".to_owned(),
        }
    }
}

/// Heart scale factor for a viewport: `min(w, h) / divisor * 1.3`.
///
/// The divisor is 30 for narrow, 33 for medium and 36 for wide viewports.
pub fn shape_scale(viewport: Viewport) -> f64 {
    let divisor = if viewport.width < NARROW_MAX_WIDTH {
        30.0
    } else if viewport.width < MEDIUM_MAX_WIDTH {
        33.0
    } else {
        36.0
    };
    viewport.w().min(viewport.h()) / divisor * SHAPE_MULTIPLIER
}

fn text_height(viewport: Viewport) -> u32 {
    let h = viewport.h();
    if viewport.width < NARROW_MAX_WIDTH {
        ((h * 0.14).floor() as u32).max(96)
    } else {
        ((h * 0.18).floor() as u32).max(120)
    }
}

/// Bitmap request for the label string.
pub fn label_request<'a>(text: &'a str, viewport: Viewport) -> GlyphRequest<'a> {
    GlyphRequest {
        text,
        width: ((viewport.w() * 0.7).floor() as u32).max(380),
        height: text_height(viewport),
        stride: TEXT_STRIDE,
        font_scale: 0.72,
    }
}

/// Bitmap request for the caption string.
pub fn caption_request<'a>(text: &'a str, viewport: Viewport) -> GlyphRequest<'a> {
    GlyphRequest {
        text,
        width: ((viewport.w() * 0.9).floor() as u32).max(500),
        height: text_height(viewport),
        stride: TEXT_STRIDE,
        font_scale: 0.5,
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f64) -> f64 {
    rng.random_range(-half..half)
}

fn lift_text<R: Rng + ?Sized>(points: Vec<Point>, rng: &mut R) -> Vec<Vec3> {
    points
        .into_iter()
        .map(|p| Vec3::from_point(p, jitter(rng, TEXT_Z_JITTER)))
        .collect()
}

/// Builds [`TargetSets`] from the curve sampler and a glyph rasterizer.
pub struct TargetSetBuilder<'r> {
    rasterizer: &'r mut dyn GlyphRasterizer,
    text: TextTargets,
}

impl<'r> TargetSetBuilder<'r> {
    pub fn new(rasterizer: &'r mut dyn GlyphRasterizer, text: TextTargets) -> Self {
        Self { rasterizer, text }
    }

    /// Build all three sets for `viewport`. The shape set always has `particle_count` points.
    #[tracing::instrument(skip(self, rng))]
    pub fn build<R: Rng + ?Sized>(
        &mut self,
        viewport: Viewport,
        particle_count: usize,
        rng: &mut R,
    ) -> HeartfieldResult<TargetSets> {
        let scale = shape_scale(viewport);
        let shape = sample_curve(&Heart, particle_count, rng)
            .into_iter()
            .map(|p| {
                Vec3::new(
                    p.x * scale,
                    p.y * scale + SHAPE_Y_OFFSET,
                    jitter(rng, SHAPE_Z_JITTER),
                )
            })
            .collect();

        let label_pts = sample_text(
            &mut *self.rasterizer,
            &label_request(&self.text.label_text, viewport),
        )?;
        let label = lift_text(label_pts, rng);

        let caption_pts = sample_text(
            &mut *self.rasterizer,
            &caption_request(&self.text.caption_text, viewport),
        )?;
        let caption = lift_text(caption_pts, rng);

        Ok(TargetSets {
            shape,
            label,
            caption,
            viewport,
            generation: 0,
        })
    }
}

/// Holds the current [`TargetSets`] behind an `Arc`; rebuilds swap the whole value.
///
/// Readers take a snapshot and keep it for as long as they need, so a rebuild never changes what
/// an in-flight phase sees.
#[derive(Debug)]
pub struct TargetStore {
    current: Arc<TargetSets>,
    next_generation: u64,
}

impl TargetStore {
    pub fn new(mut initial: TargetSets) -> Self {
        initial.generation = 1;
        Self {
            current: Arc::new(initial),
            next_generation: 2,
        }
    }

    /// Cheap handle to the current sets.
    pub fn snapshot(&self) -> Arc<TargetSets> {
        Arc::clone(&self.current)
    }

    /// Replace all three sets at once and return the new generation.
    pub fn replace(&mut self, mut sets: TargetSets) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        sets.generation = generation;
        tracing::info!(
            generation,
            shape = sets.shape.len(),
            label = sets.label.len(),
            caption = sets.caption.len(),
            "target sets replaced"
        );
        self.current = Arc::new(sets);
        generation
    }

    pub fn generation(&self) -> u64 {
        self.current.generation
    }
}

#[cfg(test)]
#[path = "../../tests/unit/targets/mod.rs"]
mod tests;
