//! Layout-diff-driven transitions for keyed render trees.
//!
//! This crate provides:
//! - **Snapshots**: immutable per-frame layout outputs keyed by transition key
//! - **Transition rules**: declarative key and property selectors composed into sets
//! - **Delta computation**: the property changes a rule set asks to animate
//! - **Lifecycle**: bindings started, advanced, retargeted and completed per key
//!
//! # Architecture
//!
//! ```text
//! LayoutSnapshot (current) ─┐
//!                           ├─ diff::resolve_animations ─► PropertyAnimation*
//! LayoutSnapshot (next) ────┘            │
//!     └── root TransitionSet             ▼
//!                               TransitionAnimator ─► AnimationBinding
//!                                                        │
//! TransitionManager ◄────────────────────────────────────┘
//!   ├── bindings per PropertyHandle
//!   ├── CompletionTracker (per-key counts)
//!   └── EventQueue + OnAnimationCompleteListener
//! ```

pub mod binding;
pub mod completion;
pub mod diff;
pub mod easing;
pub mod error;
pub mod events;
pub mod layout;
pub mod manager;
pub mod property;
pub mod spring;
pub mod timing;
pub mod transition;
pub mod types;

pub use binding::AnimationBinding;
pub use completion::{CompletionTracker, Release};
pub use diff::{ResolvedAnimation, compute_property_animations, resolve_animations};
pub use easing::Interpolator;
pub use error::{Result, TransitionError};
pub use events::{EventQueue, TransitionEvent};
pub use layout::{Bounds, LayoutOutput, LayoutSnapshot};
pub use manager::{NoopCompleteListener, OnAnimationCompleteListener, TransitionManager};
pub use property::AnimatedProperty;
pub use spring::SpringTransition;
pub use timing::TimingTransition;
pub use transition::{
    KeyTarget, PropertyTarget, SpringAnimator, TimingAnimator, TransitionAnimator, TransitionSet,
    TransitionSpec, default_animator,
};
pub use types::{AnimationId, AnimationState, PropertyAnimation, PropertyHandle, TransitionKey};

pub use rune_config::{DefaultAnimator, SpringConfig, TimingConfig, TransitionConfig};
