use crate::foundation::core::Point;
use rand::Rng;
use std::f64::consts::TAU;

/// A closed curve parameterized over `t in [0, 2π)`.
pub trait ClosedCurve {
    /// Evaluate the curve at parameter `t`.
    fn eval(&self, t: f64) -> Point;
}

/// The classic heart curve, roughly 32 units wide and 29 tall, centered near the origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heart;

impl ClosedCurve for Heart {
    fn eval(&self, t: f64) -> Point {
        let s = t.sin();
        let x = 16.0 * s * s * s;
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        Point::new(x, y)
    }
}

/// Draw exactly `count` points on `curve`, each from an independent uniform parameter.
///
/// Density follows the parameterization, not arc length, so points bunch where the curve moves
/// slowly in `t`.
pub fn sample_curve<C, R>(curve: &C, count: usize, rng: &mut R) -> Vec<Point>
where
    C: ClosedCurve + ?Sized,
    R: Rng + ?Sized,
{
    (0..count)
        .map(|_| curve.eval(rng.random_range(0.0..TAU)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/curve.rs"]
mod tests;
