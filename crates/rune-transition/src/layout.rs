//! Immutable per-frame layout data the transition engine diffs.
//!
//! A [`LayoutSnapshot`] is produced once per computed frame by the layout
//! pipeline. It maps each [`TransitionKey`] to the [`LayoutOutput`] computed
//! for that element and carries the [`TransitionSet`] declared for the frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::{Result, TransitionError};
use super::transition::TransitionSet;
use super::types::TransitionKey;

/// Axis-aligned bounds of a laid-out element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Layout result for one keyed element.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    transition_key: TransitionKey,
    bounds: Bounds,
    alpha: f32,
    scale: f32,
    rotation: f32,
}

impl LayoutOutput {
    /// Create an output with default visual state (opaque, unscaled, unrotated).
    pub fn new(transition_key: impl Into<TransitionKey>, bounds: Bounds) -> Self {
        Self {
            transition_key: transition_key.into(),
            bounds,
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn transition_key(&self) -> &TransitionKey {
        &self.transition_key
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// All keyed layout outputs of one frame plus the frame's root transition.
///
/// Outputs keep their insertion order so "all keys" selectors resolve
/// deterministically.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    outputs: Vec<LayoutOutput>,
    /// Index from transition key to position in `outputs`.
    key_index: HashMap<TransitionKey, usize>,
    root_transition: TransitionSet,
}

impl LayoutSnapshot {
    /// Create an empty snapshot declaring `root_transition` for its frame.
    pub fn new(root_transition: TransitionSet) -> Self {
        Self {
            outputs: Vec::new(),
            key_index: HashMap::new(),
            root_transition,
        }
    }

    /// Build a snapshot from a list of outputs.
    pub fn from_outputs<I>(root_transition: TransitionSet, outputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = LayoutOutput>,
    {
        let mut snapshot = Self::new(root_transition);
        for output in outputs {
            snapshot.insert(output)?;
        }
        Ok(snapshot)
    }

    /// Add an output, consuming and returning the snapshot.
    pub fn with_output(mut self, output: LayoutOutput) -> Result<Self> {
        self.insert(output)?;
        Ok(self)
    }

    fn insert(&mut self, output: LayoutOutput) -> Result<()> {
        let key = output.transition_key();
        if key.is_empty() {
            return Err(TransitionError::EmptyTransitionKey);
        }
        if self.key_index.contains_key(key) {
            return Err(TransitionError::DuplicateTransitionKey(key.clone()));
        }
        self.key_index.insert(key.clone(), self.outputs.len());
        self.outputs.push(output);
        Ok(())
    }

    /// The transition declared for this frame.
    pub fn root_transition(&self) -> &TransitionSet {
        &self.root_transition
    }

    /// Look up the output for a transition key.
    pub fn output(&self, key: &str) -> Option<&LayoutOutput> {
        self.key_index.get(key).map(|&i| &self.outputs[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_index.contains_key(key)
    }

    /// Transition keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &TransitionKey> {
        self.outputs.iter().map(LayoutOutput::transition_key)
    }

    /// Outputs in insertion order.
    pub fn outputs(&self) -> impl Iterator<Item = &LayoutOutput> {
        self.outputs.iter()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
