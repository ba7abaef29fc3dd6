//! The seam between the transition manager and whatever performs the
//! interpolation.
//!
//! The manager never interpolates values itself. An animator factory turns a
//! [`PropertyAnimation`] into an [`AnimationBinding`], the manager starts it
//! and then advances it from the frame tick until it reports it is done.

use std::fmt;

use super::types::PropertyAnimation;

/// A running interpolation for a single property handle.
pub trait AnimationBinding {
    /// The animation this binding was created for.
    fn animation(&self) -> &PropertyAnimation;

    /// Begin animating from `start_value` towards the animation's end value.
    fn start(&mut self, start_value: f32);

    /// Advance by `delta_ms` milliseconds.
    ///
    /// Returns `true` while the binding is still running and `false` once it
    /// has reached its end value.
    fn update(&mut self, delta_ms: f32) -> bool;

    /// The value the property should currently be rendered with.
    fn current_value(&self) -> f32;

    /// Stop the binding where it is. A stopped binding never reports
    /// completion.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

impl fmt::Debug for dyn AnimationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationBinding")
            .field("animation", self.animation())
            .field("current_value", &self.current_value())
            .field("running", &self.is_running())
            .finish()
    }
}
