//! Core value types shared by the transition engine.
//!
//! - `TransitionKey`: stable identity of an element across two frames
//! - `PropertyHandle`: one property of one keyed element
//! - `PropertyAnimation`: a handle plus the value it should animate to
//! - `AnimationId`: unique identifier for a running binding
//! - `AnimationState`: lifecycle state of a key's animation set

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::property::AnimatedProperty;

/// Stable identifier for one renderable element across two computed frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionKey(String);

impl TransitionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TransitionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransitionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for TransitionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&TransitionKey> for TransitionKey {
    fn from(key: &TransitionKey) -> Self {
        key.clone()
    }
}

/// A single animatable property of a single keyed element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyHandle {
    pub transition_key: TransitionKey,
    pub property: AnimatedProperty,
}

impl PropertyHandle {
    pub fn new(transition_key: impl Into<TransitionKey>, property: AnimatedProperty) -> Self {
        Self {
            transition_key: transition_key.into(),
            property,
        }
    }
}

impl fmt::Display for PropertyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.transition_key, self.property)
    }
}

/// A property change that should be animated: which handle, and to what value.
///
/// The end value is the absolute value read from the next frame, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnimation {
    pub handle: PropertyHandle,
    pub end_value: f32,
}

impl PropertyAnimation {
    pub fn new(handle: PropertyHandle, end_value: f32) -> Self {
        Self { handle, end_value }
    }

    pub fn transition_key(&self) -> &TransitionKey {
        &self.handle.transition_key
    }

    pub fn property(&self) -> AnimatedProperty {
        self.handle.property
    }
}

/// Unique identifier for a running animation binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of the animation set attached to one transition key.
///
/// `Idle -> Animating -> (Complete | Cancelled) -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// No bindings are running for the key.
    #[default]
    Idle,
    /// At least one binding is running for the key.
    Animating,
    /// Every binding of the key finished.
    Complete,
    /// The key's animations were stopped before finishing.
    Cancelled,
}

impl AnimationState {
    /// Complete and Cancelled are transient; the key returns to Idle after them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}
