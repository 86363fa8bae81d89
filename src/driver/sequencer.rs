use crate::driver::context::AnimationContext;
use crate::driver::phase::{PhaseKind, PhaseSpec};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor {
    cycle: u64,
    index: usize,
}

/// Plays a list of phases back to back, then waits `repeat_delay_secs` and starts over, forever.
///
/// Time only moves through [`Sequencer::tick`]. Within one tick every phase whose span overlaps the
/// advanced window gets its hooks run once, in order: the phase already running is ticked, then
/// each phase starting inside the window is entered and ticked.
#[derive(Debug)]
pub struct Sequencer {
    phases: Vec<PhaseSpec>,
    starts: Vec<f64>,
    total_secs: f64,
    period_secs: f64,
    elapsed_secs: f64,
    next: Cursor,
    current: Option<Cursor>,
    killed: bool,
}

impl Sequencer {
    pub fn new(phases: Vec<PhaseSpec>, repeat_delay_secs: f64) -> HeartfieldResult<Self> {
        if phases.is_empty() {
            return Err(HeartfieldError::validation("sequence needs at least one phase"));
        }
        if !repeat_delay_secs.is_finite() || repeat_delay_secs < 0.0 {
            return Err(HeartfieldError::validation(
                "repeat delay must be finite and >= 0",
            ));
        }

        let mut starts = Vec::with_capacity(phases.len());
        let mut total_secs = 0.0;
        for (i, p) in phases.iter().enumerate() {
            if !p.duration_secs.is_finite() || p.duration_secs < 0.0 {
                return Err(HeartfieldError::validation(format!(
                    "phase {i} ({:?}) duration must be finite and >= 0",
                    p.kind
                )));
            }
            starts.push(total_secs);
            total_secs += p.duration_secs;
        }

        let period_secs = total_secs + repeat_delay_secs;
        if period_secs <= 0.0 {
            return Err(HeartfieldError::validation(
                "sequence period must be > 0 to repeat",
            ));
        }

        Ok(Self {
            phases,
            starts,
            total_secs,
            period_secs,
            elapsed_secs: 0.0,
            next: Cursor { cycle: 0, index: 0 },
            current: None,
            killed: false,
        })
    }

    fn start_of(&self, c: Cursor) -> f64 {
        c.cycle as f64 * self.period_secs + self.starts[c.index]
    }

    fn end_of(&self, c: Cursor) -> f64 {
        self.start_of(c) + self.phases[c.index].duration_secs
    }

    fn advance(&self, c: Cursor) -> Cursor {
        if c.index + 1 < self.phases.len() {
            Cursor {
                cycle: c.cycle,
                index: c.index + 1,
            }
        } else {
            Cursor {
                cycle: c.cycle + 1,
                index: 0,
            }
        }
    }

    /// Advance the clock by `dt_secs` and run the hooks that fall in the window.
    ///
    /// Negative or non-finite steps count as zero. A zero step still enters phases that start at
    /// the current time, which is how the first phase begins.
    pub fn tick(&mut self, ctx: &mut AnimationContext, dt_secs: f64) {
        let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        self.advance_to(ctx, self.elapsed_secs + dt);
    }

    /// Like [`Sequencer::tick`], but moves the clock to an absolute time so frame-driven callers
    /// do not accumulate rounding error. Times before the current clock count as a zero step.
    pub fn advance_to(&mut self, ctx: &mut AnimationContext, t_secs: f64) {
        if self.killed {
            return;
        }
        let t0 = self.elapsed_secs;
        let t1 = if t_secs.is_finite() { t_secs.max(t0) } else { t0 };

        if let Some(cur) = self.current
            && t1 > t0
            && self.end_of(cur) > t0
        {
            (self.phases[cur.index].kind.hooks().on_tick)(ctx);
        }

        while self.start_of(self.next) <= t1 {
            let cur = self.next;
            let kind = self.phases[cur.index].kind;
            tracing::debug!(cycle = cur.cycle, phase = cur.index, ?kind, "phase enter");
            let hooks = kind.hooks();
            (hooks.on_enter)(ctx);
            (hooks.on_tick)(ctx);
            self.current = Some(cur);
            self.next = self.advance(cur);
        }

        self.elapsed_secs = t1;
    }

    /// Stop for good; later ticks do nothing.
    pub fn kill(&mut self) {
        self.killed = true;
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Phases plus repeat delay.
    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }

    /// Sum of phase durations.
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    /// Kind of the most recently entered phase.
    pub fn current_phase(&self) -> Option<PhaseKind> {
        self.current.map(|c| self.phases[c.index].kind)
    }

    /// Index of the most recently entered phase within the sequence.
    pub fn current_index(&self) -> Option<usize> {
        self.current.map(|c| c.index)
    }

    /// Completed-or-running cycle number of the current phase.
    pub fn cycle(&self) -> u64 {
        self.current.map_or(0, |c| c.cycle)
    }

    /// Eased progress of the current phase in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let Some(cur) = self.current else {
            return 0.0;
        };
        let spec = &self.phases[cur.index];
        if spec.duration_secs <= 0.0 {
            return 1.0;
        }
        let t = (self.elapsed_secs - self.start_of(cur)) / spec.duration_secs;
        spec.ease.apply(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/sequencer.rs"]
mod tests;
