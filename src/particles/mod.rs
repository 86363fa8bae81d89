//! The particle array and the flat position buffer the renderer reads.

use crate::foundation::core::{Vec3, Viewport};
use rand::Rng;
use std::f64::consts::TAU;

/// Per-frame fraction of the remaining distance covered by a converging particle.
pub const CONVERGENCE_FACTOR: f64 = 0.08;

/// Scatter depth range is `[-SCATTER_DEPTH / 2, SCATTER_DEPTH / 2)`.
pub const SCATTER_DEPTH: f64 = 400.0;

const BURST_MIN_DISTANCE: f64 = 200.0;
const BURST_DISTANCE_SPAN: f64 = 400.0;
const BURST_DEPTH: f64 = 600.0;

/// One point of the cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Convergence target for the running phase; `None` leaves the particle inert.
    pub target: Option<Vec3>,
}

/// Flat `[x0, y0, z0, x1, ...]` mirror of particle positions.
///
/// Every mutation marks the buffer dirty; the renderer re-uploads only dirty buffers.
#[derive(Clone, Debug)]
pub struct PositionBuffer {
    data: Vec<f32>,
    dirty: bool,
}

impl PositionBuffer {
    fn new(count: usize) -> Self {
        Self {
            data: vec![0.0; count * 3],
            dirty: true,
        }
    }

    fn write(&mut self, i: usize, p: Vec3) {
        let o = i * 3;
        self.data[o] = p.x as f32;
        self.data[o + 1] = p.y as f32;
        self.data[o + 2] = p.z as f32;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Fixed-size particle array plus its position buffer.
///
/// The array is sized once; phases only rewrite its contents.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    buffer: PositionBuffer,
}

impl ParticleField {
    /// `count` particles spread over the viewport, without targets.
    pub fn new_scattered<R: Rng + ?Sized>(count: usize, viewport: Viewport, rng: &mut R) -> Self {
        let mut field = Self {
            particles: vec![Particle::default(); count],
            buffer: PositionBuffer::new(count),
        };
        field.scatter(viewport, rng);
        field
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn buffer(&self) -> &PositionBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PositionBuffer {
        &mut self.buffer
    }

    /// Redraw every position uniformly across the viewport and the scatter depth, and drop all
    /// targets.
    pub fn scatter<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let (w, h) = (viewport.w(), viewport.h());
        for p in &mut self.particles {
            p.position = Vec3::new(
                (rng.random::<f64>() - 0.5) * w,
                (rng.random::<f64>() - 0.5) * h,
                (rng.random::<f64>() - 0.5) * SCATTER_DEPTH,
            );
            p.target = None;
        }
        self.sync_buffer();
    }

    /// Target particle `i` at `set[i % set.len()] + offset`.
    ///
    /// An empty set leaves every target as it was and returns `false`.
    pub fn assign_cyclic(&mut self, set: &[Vec3], offset: Vec3) -> bool {
        if set.is_empty() {
            return false;
        }
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.target = Some(set[i % set.len()] + offset);
        }
        true
    }

    /// Target each particle at a random direction 200..600 units from where it is now, with a
    /// fresh deep `z`.
    pub fn assign_burst<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            let ang = rng.random::<f64>() * TAU;
            let dist = BURST_MIN_DISTANCE + rng.random::<f64>() * BURST_DISTANCE_SPAN;
            p.target = Some(Vec3::new(
                p.position.x + ang.cos() * dist,
                p.position.y + ang.sin() * dist,
                (rng.random::<f64>() - 0.5) * BURST_DEPTH,
            ));
        }
    }

    /// One step of `position += (target - position) * factor` for every targeted particle.
    pub fn converge(&mut self, factor: f64) {
        for (i, p) in self.particles.iter_mut().enumerate() {
            let Some(target) = p.target else {
                continue;
            };
            p.position += (target - p.position) * factor;
            self.buffer.write(i, p.position);
        }
        self.buffer.mark_dirty();
    }

    /// Copy every position into the buffer.
    pub fn sync_buffer(&mut self) {
        for (i, p) in self.particles.iter().enumerate() {
            self.buffer.write(i, p.position);
        }
        self.buffer.mark_dirty();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/mod.rs"]
mod tests;
