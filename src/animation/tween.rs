use crate::animation::ease::Ease;

/// Scalar tween that repeats forever, playing forward then backward ("yo-yo").
///
/// Runs on its own clock, independent of the phase sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoyoTween {
    /// Value at progress 0.
    pub from: f64,
    /// Value at progress 1.
    pub to: f64,
    /// Seconds for one direction.
    pub half_period_secs: f64,
    /// Ease applied in both directions.
    pub ease: Ease,
}

impl YoyoTween {
    /// Slow yaw applied to the whole cloud: 0 to 0.35 rad over 6 s and back.
    pub const fn scene_yaw() -> Self {
        Self {
            from: 0.0,
            to: 0.35,
            half_period_secs: 6.0,
            ease: Ease::InOutSine,
        }
    }

    /// Sample the tween at `t_secs` since it started.
    pub fn sample(&self, t_secs: f64) -> f64 {
        if self.half_period_secs.is_nan() || self.half_period_secs <= 0.0 || !t_secs.is_finite() {
            return self.from;
        }
        let t = t_secs.max(0.0);
        let leg = (t / self.half_period_secs).floor();
        let local = (t - leg * self.half_period_secs) / self.half_period_secs;
        let p = if (leg as u64).is_multiple_of(2) {
            local
        } else {
            1.0 - local
        };
        self.from + (self.to - self.from) * self.ease.apply(p)
    }
}
