//! Duration based animation binding.

use rune_config::TimingConfig;

use super::binding::AnimationBinding;
use super::easing::Interpolator;
use super::types::PropertyAnimation;

/// Animates towards the end value over a fixed duration along an
/// [`Interpolator`] curve.
#[derive(Debug, Clone)]
pub struct TimingTransition {
    animation: PropertyAnimation,
    start_value: f32,
    duration_ms: f32,
    interpolator: Interpolator,
    elapsed_ms: f32,
    running: bool,
}

impl TimingTransition {
    pub fn new(animation: PropertyAnimation, duration_ms: f32) -> Self {
        Self {
            start_value: animation.end_value,
            animation,
            duration_ms: duration_ms.max(0.0),
            interpolator: Interpolator::default(),
            elapsed_ms: 0.0,
            running: false,
        }
    }

    /// Use the configured default duration.
    pub fn with_config(animation: PropertyAnimation, config: &TimingConfig) -> Self {
        Self::new(animation, config.duration_ms)
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Linear progress through the duration, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

impl AnimationBinding for TimingTransition {
    fn animation(&self) -> &PropertyAnimation {
        &self.animation
    }

    fn start(&mut self, start_value: f32) {
        self.start_value = start_value;
        self.elapsed_ms = 0.0;
        self.running = true;
    }

    fn update(&mut self, delta_ms: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.running = false;
        }
        self.running
    }

    fn current_value(&self) -> f32 {
        let eased = self.interpolator.interpolate(self.progress());
        self.start_value + (self.animation.end_value - self.start_value) * eased
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
