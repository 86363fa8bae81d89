use crate::foundation::core::{Vec3, Viewport};
use crate::particles::ParticleField;
use crate::targets::{TargetSetKind, TargetSets, TargetStore};
use rand::rngs::StdRng;
use std::sync::Arc;

/// Everything a phase hook may touch, owned in one place and passed by `&mut`.
pub struct AnimationContext {
    /// The particle array and its position buffer.
    pub field: ParticleField,
    /// Current target sets.
    pub targets: TargetStore,
    /// Viewport used by scatter.
    pub viewport: Viewport,
    /// Randomness for scatter and burst.
    pub rng: StdRng,
    captured: Option<Arc<TargetSets>>,
}

impl AnimationContext {
    pub fn new(field: ParticleField, targets: TargetStore, viewport: Viewport, rng: StdRng) -> Self {
        Self {
            field,
            targets,
            viewport,
            rng,
            captured: None,
        }
    }

    /// Take a snapshot of the current target sets and keep it for the running phase.
    pub(crate) fn capture_targets(&mut self) -> Arc<TargetSets> {
        let snap = self.targets.snapshot();
        self.captured = Some(Arc::clone(&snap));
        snap
    }

    /// Generation of the sets the running phase captured, if any.
    pub fn captured_generation(&self) -> Option<u64> {
        self.captured.as_ref().map(|s| s.generation)
    }

    /// Aim every particle at `kind` cyclically, shifted by `offset`.
    pub(crate) fn assign_from(&mut self, kind: TargetSetKind, offset: Vec3) {
        let sets = self.capture_targets();
        let set = sets.get(kind);
        if !self.field.assign_cyclic(set, offset) {
            tracing::debug!(?kind, "target set empty, keeping previous targets");
        }
    }
}
