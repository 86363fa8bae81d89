use crate::animation::ease::Ease;
use crate::driver::context::AnimationContext;
use crate::foundation::core::Vec3;
use crate::particles::CONVERGENCE_FACTOR;
use crate::targets::{CAPTION_OFFSET, LABEL_OFFSET, TargetSetKind};

/// Pause between the end of one cycle and the next Scatter.
pub const REPEAT_DELAY_SECS: f64 = 1.0;

/// Kind of phase; selects the hooks in [`PhaseKind::hooks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PhaseKind {
    Scatter,
    Hold,
    ConvergeShape,
    Burst,
    ConvergeLabel,
    ConvergeCaption,
}

/// One segment of the sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpec {
    pub kind: PhaseKind,
    /// How long the per-frame rule runs.
    pub duration_secs: f64,
    /// Shapes reported progress only.
    pub ease: Ease,
}

impl PhaseSpec {
    pub const fn new(kind: PhaseKind, duration_secs: f64, ease: Ease) -> Self {
        Self {
            kind,
            duration_secs,
            ease,
        }
    }

    const fn hold(duration_secs: f64) -> Self {
        Self::new(PhaseKind::Hold, duration_secs, Ease::Linear)
    }
}

/// The ten-step show: scatter, heart, burst, label, caption, with holds in between.
pub fn default_sequence() -> Vec<PhaseSpec> {
    vec![
        PhaseSpec::new(PhaseKind::Scatter, 1.2, Ease::OutQuad),
        PhaseSpec::hold(0.6),
        PhaseSpec::new(PhaseKind::ConvergeShape, 3.0, Ease::InOutCubic),
        PhaseSpec::hold(1.0),
        PhaseSpec::new(PhaseKind::Burst, 0.6, Ease::OutCubic),
        PhaseSpec::hold(0.5),
        PhaseSpec::new(PhaseKind::ConvergeLabel, 2.4, Ease::InOutCubic),
        PhaseSpec::hold(1.0),
        PhaseSpec::new(PhaseKind::ConvergeCaption, 2.6, Ease::InOutCubic),
        PhaseSpec::hold(1.6),
    ]
}

/// On-enter and per-frame rules for one [`PhaseKind`].
#[derive(Clone, Copy)]
pub struct PhaseHooks {
    pub on_enter: fn(&mut AnimationContext),
    pub on_tick: fn(&mut AnimationContext),
}

impl std::fmt::Debug for PhaseHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseHooks").finish_non_exhaustive()
    }
}

static HOOKS: [PhaseHooks; 6] = [
    // Scatter
    PhaseHooks {
        on_enter: enter_scatter,
        on_tick: tick_sync,
    },
    // Hold
    PhaseHooks {
        on_enter: noop,
        on_tick: noop,
    },
    // ConvergeShape
    PhaseHooks {
        on_enter: enter_shape,
        on_tick: tick_converge,
    },
    // Burst
    PhaseHooks {
        on_enter: enter_burst,
        on_tick: tick_converge,
    },
    // ConvergeLabel
    PhaseHooks {
        on_enter: enter_label,
        on_tick: tick_converge,
    },
    // ConvergeCaption
    PhaseHooks {
        on_enter: enter_caption,
        on_tick: tick_converge,
    },
];

impl PhaseKind {
    fn table_index(self) -> usize {
        match self {
            Self::Scatter => 0,
            Self::Hold => 1,
            Self::ConvergeShape => 2,
            Self::Burst => 3,
            Self::ConvergeLabel => 4,
            Self::ConvergeCaption => 5,
        }
    }

    pub fn hooks(self) -> &'static PhaseHooks {
        &HOOKS[self.table_index()]
    }
}

fn noop(_: &mut AnimationContext) {}

fn enter_scatter(ctx: &mut AnimationContext) {
    let viewport = ctx.viewport;
    ctx.field.scatter(viewport, &mut ctx.rng);
}

fn tick_sync(ctx: &mut AnimationContext) {
    ctx.field.sync_buffer();
}

fn enter_shape(ctx: &mut AnimationContext) {
    ctx.assign_from(TargetSetKind::Shape, Vec3::ZERO);
}

fn enter_burst(ctx: &mut AnimationContext) {
    ctx.field.assign_burst(&mut ctx.rng);
}

fn enter_label(ctx: &mut AnimationContext) {
    ctx.assign_from(TargetSetKind::Label, LABEL_OFFSET);
}

fn enter_caption(ctx: &mut AnimationContext) {
    ctx.assign_from(TargetSetKind::Caption, CAPTION_OFFSET);
}

fn tick_converge(ctx: &mut AnimationContext) {
    ctx.field.converge(CONVERGENCE_FACTOR);
}
