//! Delta computation between two layout snapshots.
//!
//! Walks the flattened transition specs in declaration order, resolves each
//! spec to concrete (key, property) pairs and keeps the pairs whose value
//! actually changed between the current and next frame. The first spec that
//! names a pair claims it; later specs naming the same pair are ignored.

use std::collections::HashSet;
use std::rc::Rc;

use super::layout::LayoutSnapshot;
use super::property::same_value;
use super::transition::{TransitionAnimator, TransitionSet};
use super::types::{PropertyAnimation, PropertyHandle};

/// A changed property paired with the animator of the spec that claimed it.
#[derive(Clone)]
pub struct ResolvedAnimation {
    pub animation: PropertyAnimation,
    /// Value in the current frame.
    pub start_value: f32,
    /// `None` when the claiming spec uses the default animator.
    pub animator: Option<Rc<dyn TransitionAnimator>>,
}

impl std::fmt::Debug for ResolvedAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedAnimation")
            .field("animation", &self.animation)
            .field("start_value", &self.start_value)
            .finish_non_exhaustive()
    }
}

/// Resolve `transitions` against the two frames.
///
/// Pairs whose key is missing from `current` (appearing elements) and pairs
/// whose value is unchanged (see [`same_value`]) produce nothing.
pub fn resolve_animations(
    current: &LayoutSnapshot,
    next: &LayoutSnapshot,
    transitions: &TransitionSet,
) -> Vec<ResolvedAnimation> {
    let mut claimed: HashSet<PropertyHandle> = HashSet::new();
    let mut resolved = Vec::new();

    for spec in transitions.flatten() {
        let properties = spec.resolve_properties();
        if properties.is_empty() {
            continue;
        }

        for key in spec.resolve_keys(next) {
            let Some(next_output) = next.output(key.as_str()) else {
                continue;
            };
            let current_output = current.output(key.as_str());

            for &property in &properties {
                let handle = PropertyHandle::new(key.clone(), property);
                if !claimed.insert(handle.clone()) {
                    continue;
                }

                let Some(current_output) = current_output else {
                    continue;
                };

                let start_value = property.read(current_output);
                let end_value = property.read(next_output);
                if same_value(start_value, end_value) {
                    continue;
                }

                resolved.push(ResolvedAnimation {
                    animation: PropertyAnimation::new(handle, end_value),
                    start_value,
                    animator: spec.animator_ref().cloned(),
                });
            }
        }
    }

    resolved
}

/// The property animations the next frame's root transition asks for.
///
/// Pure: identical inputs always produce equal output, in the same order.
pub fn compute_property_animations(
    current: &LayoutSnapshot,
    next: &LayoutSnapshot,
) -> Vec<PropertyAnimation> {
    resolve_animations(current, next, next.root_transition())
        .into_iter()
        .map(|resolved| resolved.animation)
        .collect()
}
