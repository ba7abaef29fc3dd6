//! Registry of the visual properties the transition engine knows how to animate.
//!
//! The set is closed: every variant carries a pure accessor that reads its
//! scalar value off a [`LayoutOutput`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::LayoutOutput;

/// An animatable visual property of a laid-out element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedProperty {
    // Geometry
    X,
    Y,
    Width,
    Height,

    // Visual
    Alpha,
    Scale,
    /// Rotation in degrees.
    Rotation,
}

impl AnimatedProperty {
    /// Every known property, in declaration order. Used to expand
    /// "all properties" selectors.
    pub const ALL: [AnimatedProperty; 7] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Alpha,
        Self::Scale,
        Self::Rotation,
    ];

    /// Read this property's value from a layout output.
    pub fn read(&self, output: &LayoutOutput) -> f32 {
        let bounds = output.bounds();
        match self {
            Self::X => bounds.x,
            Self::Y => bounds.y,
            Self::Width => bounds.width,
            Self::Height => bounds.height,
            Self::Alpha => output.alpha(),
            Self::Scale => output.scale(),
            Self::Rotation => output.rotation(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Alpha => "alpha",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
        }
    }

    /// Returns true if animating this property moves or resizes the element.
    pub fn affects_bounds(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Width | Self::Height)
    }
}

/// Change detection between two property values.
///
/// Exact comparison, except that NaN matches NaN so a value stuck at NaN
/// never counts as changed.
pub fn same_value(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl fmt::Display for AnimatedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
