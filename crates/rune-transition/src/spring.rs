//! Spring driven animation binding.
//!
//! Progress follows the analytic solution of a unit-mass damped harmonic
//! oscillator released from rest at 0 towards 1:
//!
//! ```text
//! x''(t) + 2ζω₀x'(t) + ω₀²x(t) = ω₀²,   ω₀ = √k
//! ```
//!
//! The binding maps that progress onto `[start_value, end_value]`.

use rune_config::SpringConfig;

use super::binding::AnimationBinding;
use super::types::PropertyAnimation;

/// Springs settle no earlier than this, so the first frames of a stiff spring
/// aren't mistaken for rest.
const MIN_SETTLE_SECS: f32 = 0.02;

/// The default animation binding: a spring towards the end value.
#[derive(Debug, Clone)]
pub struct SpringTransition {
    animation: PropertyAnimation,
    start_value: f32,
    omega_0: f32,
    damping_ratio: f32,
    rest_threshold: f32,
    /// Seconds since `start`.
    elapsed: f32,
    progress: f32,
    running: bool,
}

impl SpringTransition {
    /// Create a spring with the default spring settings.
    pub fn new(animation: PropertyAnimation) -> Self {
        Self::with_config(animation, &SpringConfig::default())
    }

    /// Create a spring with explicit settings.
    ///
    /// # Panics
    /// Panics if stiffness, damping ratio or rest threshold is not positive,
    /// since such a spring never comes to rest.
    pub fn with_config(animation: PropertyAnimation, config: &SpringConfig) -> Self {
        assert!(
            config.stiffness > 0.0 && config.damping_ratio > 0.0,
            "Spring stiffness and damping ratio must be positive"
        );
        assert!(
            config.rest_threshold > 0.0,
            "Spring rest threshold must be positive"
        );
        Self {
            start_value: animation.end_value,
            animation,
            omega_0: config.stiffness.sqrt(),
            damping_ratio: config.damping_ratio,
            rest_threshold: config.rest_threshold,
            elapsed: 0.0,
            progress: 0.0,
            running: false,
        }
    }

    /// Spring progress at `t` seconds, 0 at rest start and 1 at the target.
    fn position_at(&self, t: f32) -> f32 {
        let t = f64::from(t);
        let omega_0 = f64::from(self.omega_0);
        let zeta = f64::from(self.damping_ratio);

        let position = if (zeta - 1.0).abs() < 1e-3 {
            // Critically damped: 1 - e^(-ω₀t)(1 + ω₀t)
            1.0 - (-omega_0 * t).exp() * (1.0 + omega_0 * t)
        } else if zeta < 1.0 {
            // Underdamped: oscillates around the target
            let root = (1.0 - zeta * zeta).sqrt();
            let omega_d = omega_0 * root;
            let decay = (-zeta * omega_0 * t).exp();
            1.0 - decay * ((omega_d * t).cos() + (zeta / root) * (omega_d * t).sin())
        } else {
            // Overdamped: two real decay rates r1 > r2, no overshoot
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega_0 * (zeta - root);
            let r2 = -omega_0 * (zeta + root);
            1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        };
        position as f32
    }
}

impl AnimationBinding for SpringTransition {
    fn animation(&self) -> &PropertyAnimation {
        &self.animation
    }

    fn start(&mut self, start_value: f32) {
        self.start_value = start_value;
        self.elapsed = 0.0;
        self.progress = 0.0;
        self.running = true;
    }

    fn update(&mut self, delta_ms: f32) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed += delta_ms / 1000.0;
        let position = self.position_at(self.elapsed);
        // Near the target and barely moving; an underdamped spring passes
        // through the target at speed several times before resting.
        let settled = (1.0 - position).abs() < self.rest_threshold
            && (position - self.progress).abs() < self.rest_threshold
            && self.elapsed > MIN_SETTLE_SECS;

        if settled || self.start_value == self.animation.end_value {
            self.progress = 1.0;
            self.running = false;
        } else {
            self.progress = position;
        }
        self.running
    }

    fn current_value(&self) -> f32 {
        let end = self.animation.end_value;
        self.start_value + (end - self.start_value) * self.progress
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
