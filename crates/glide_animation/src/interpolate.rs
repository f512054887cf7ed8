//! Interpolation helpers
//!
//! Glide's animations are exponential approaches rather than integrated
//! springs: every frame closes a fixed fraction of the remaining distance,
//! which converges without overshoot.

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Move `current` a `factor` fraction of the way toward `target`
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Exponential approach with a convergence threshold
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approach {
    /// Fraction of the remaining distance covered per step (0.0-1.0)
    pub factor: f64,
    /// Distance under which the value snaps to the target
    pub epsilon: f64,
}

impl Approach {
    pub const fn new(factor: f64, epsilon: f64) -> Self {
        Self { factor, epsilon }
    }

    pub fn is_settled(&self, current: f64, target: f64) -> bool {
        (target - current).abs() <= self.epsilon
    }

    /// One step toward `target`. Returns the new value and whether it settled.
    pub fn step(&self, current: f64, target: f64) -> (f64, bool) {
        if self.is_settled(current, target) {
            (target, true)
        } else {
            (approach(current, target, self.factor), false)
        }
    }
}
