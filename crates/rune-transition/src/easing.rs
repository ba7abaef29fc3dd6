//! Interpolation curves for duration based transitions.
//!
//! Curves map linear progress (0.0 to 1.0) to eased progress. The named
//! curves are fixed cubic beziers; [`Interpolator::cubic_bezier`] accepts
//! custom control points.

use serde::{Deserialize, Serialize};

/// Timing curve applied to a [`TimingTransition`](crate::timing::TimingTransition).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interpolator {
    /// Constant rate of change.
    Linear,
    /// Starts slowly and speeds up. `cubic-bezier(0.4, 0, 1, 1)`.
    Accelerate,
    /// Starts quickly and slows down. `cubic-bezier(0, 0, 0.2, 1)`.
    Decelerate,
    /// Slow at both ends. `cubic-bezier(0.4, 0, 0.2, 1)`.
    #[default]
    AccelerateDecelerate,
    /// Custom curve through control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Interpolator {
    /// Map linear progress `t` to eased progress. Input is clamped to [0, 1].
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Accelerate => bezier_progress(0.4, 0.0, 1.0, 1.0, t),
            Self::Decelerate => bezier_progress(0.0, 0.0, 0.2, 1.0, t),
            Self::AccelerateDecelerate => bezier_progress(0.4, 0.0, 0.2, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier_progress(x1, y1, x2, y2, t),
        }
    }

    /// Create a custom cubic bezier curve.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }
}

/// One coordinate of a unit cubic bezier with endpoints 0 and 1.
#[inline]
fn bezier_component(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_component_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Eased progress at horizontal position `x`.
fn bezier_progress(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson on the curve parameter; x is a good first guess.
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = bezier_component_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    bezier_component(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let curve = Interpolator::Linear;
        assert!(approx_eq(curve.interpolate(0.25), 0.25));
        assert!(approx_eq(curve.interpolate(0.75), 0.75));
    }

    #[test]
    fn test_endpoints() {
        for curve in [
            Interpolator::Linear,
            Interpolator::Accelerate,
            Interpolator::Decelerate,
            Interpolator::AccelerateDecelerate,
        ] {
            assert!(approx_eq(curve.interpolate(0.0), 0.0), "{curve:?} at 0");
            assert!(approx_eq(curve.interpolate(1.0), 1.0), "{curve:?} at 1");
        }
    }

    #[test]
    fn test_accelerate_is_slow_early() {
        let curve = Interpolator::Accelerate;
        assert!(curve.interpolate(0.25) < 0.25);
        assert!(curve.interpolate(0.5) < 0.5);
    }

    #[test]
    fn test_decelerate_is_fast_early() {
        let curve = Interpolator::Decelerate;
        assert!(curve.interpolate(0.25) > 0.25);
        assert!(curve.interpolate(0.5) > 0.5);
    }

    #[test]
    fn test_accelerate_decelerate_is_monotonic() {
        let curve = Interpolator::AccelerateDecelerate;
        let mut last = 0.0;
        for i in 1..=20 {
            let v = curve.interpolate(i as f32 / 20.0);
            assert!(v >= last, "curve went backwards at step {i}");
            last = v;
        }
    }

    #[test]
    fn test_clamping() {
        let curve = Interpolator::default();
        assert!(approx_eq(curve.interpolate(-1.0), 0.0));
        assert!(approx_eq(curve.interpolate(2.0), 1.0));
    }

    #[test]
    fn test_linear_bezier() {
        let curve = Interpolator::cubic_bezier(0.0, 0.0, 1.0, 1.0);
        assert!(approx_eq(curve.interpolate(0.5), 0.5));
    }

    #[test]
    #[should_panic(expected = "Bezier x values must be in [0, 1]")]
    fn test_invalid_bezier() {
        Interpolator::cubic_bezier(0.5, 0.0, 1.5, 1.0);
    }
}
