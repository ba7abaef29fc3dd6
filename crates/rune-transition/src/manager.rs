//! Transition manager: turns layout diffs into running animation bindings.
//!
//! The `TransitionManager` owns every binding created from layout changes. It:
//! - Reconciles in-flight bindings against the next frame before creating any
//! - Diffs two layout snapshots and starts one binding per changed property
//! - Advances bindings from the frame tick and reports per-key completion
//! - Exposes the current animated value of each property for rendering
//!
//! # Usage
//!
//! ```ignore
//! use rune_transition::{TransitionKey, TransitionManager};
//!
//! let mut manager = TransitionManager::new(|key: &TransitionKey| {
//!     tracing::info!(%key, "transition finished");
//! });
//!
//! manager.setup_transitions(&current, &next);
//!
//! // Each frame
//! manager.update(16.67);
//! if let Some(x) = manager.animated_value("card", AnimatedProperty::X) {
//!     // Render with the animated x
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use rune_config::TransitionConfig;
use tracing::{debug, trace, warn};

use super::binding::AnimationBinding;
use super::completion::{CompletionTracker, Release};
use super::diff::resolve_animations;
use super::events::{EventQueue, TransitionEvent};
use super::layout::LayoutSnapshot;
use super::property::{AnimatedProperty, same_value};
use super::transition::{TransitionAnimator, default_animator};
use super::types::{AnimationId, AnimationState, PropertyHandle, TransitionKey};

/// Receives a callback once per transition key when all of its bindings have
/// finished. Never called for a key whose animations were cancelled.
pub trait OnAnimationCompleteListener {
    fn on_animation_complete(&mut self, transition_key: &TransitionKey);
}

impl<F> OnAnimationCompleteListener for F
where
    F: FnMut(&TransitionKey),
{
    fn on_animation_complete(&mut self, transition_key: &TransitionKey) {
        self(transition_key)
    }
}

/// Listener that ignores completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompleteListener;

impl OnAnimationCompleteListener for NoopCompleteListener {
    fn on_animation_complete(&mut self, _transition_key: &TransitionKey) {}
}

struct ActiveBinding {
    id: AnimationId,
    binding: Box<dyn AnimationBinding>,
}

/// Owner of every running transition binding.
///
/// Only one binding runs per [`PropertyHandle`]. All calls must come from the
/// thread that produces layout snapshots.
pub struct TransitionManager {
    bindings: HashMap<PropertyHandle, ActiveBinding>,
    completion: CompletionTracker,
    listener: Box<dyn OnAnimationCompleteListener>,
    event_queue: EventQueue,
    /// Animator for specs that do not set one.
    default_animator: Rc<dyn TransitionAnimator>,
    enabled: bool,
}

impl TransitionManager {
    /// Create a manager with the default `[transitions]` settings.
    pub fn new(listener: impl OnAnimationCompleteListener + 'static) -> Self {
        Self::with_config(listener, &TransitionConfig::default())
    }

    /// Create a manager honoring the `[transitions]` configuration section:
    /// the enable switch, and the spring or timing settings of the default
    /// animator.
    pub fn with_config(
        listener: impl OnAnimationCompleteListener + 'static,
        config: &TransitionConfig,
    ) -> Self {
        Self {
            bindings: HashMap::new(),
            completion: CompletionTracker::new(),
            listener: Box::new(listener),
            event_queue: EventQueue::new(),
            default_animator: default_animator(config),
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable transitions. Takes effect on the next
    /// [`setup_transitions`](Self::setup_transitions); running bindings are
    /// left alone until then.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Create and start bindings for every property that changed between
    /// `current` and `next`, as selected by `next`'s root transition.
    ///
    /// In-flight bindings are reconciled first:
    /// - bindings of keys missing from `next` are cancelled with their key
    /// - bindings whose end value no longer matches `next` are stopped; a
    ///   replacement for the same handle starts from the interrupted value,
    ///   and without one the key is cancelled
    /// - bindings whose end value still matches keep running untouched
    ///
    /// # Panics
    /// Panics if an animator returns a binding that is not running after
    /// `start`.
    pub fn setup_transitions(&mut self, current: &LayoutSnapshot, next: &LayoutSnapshot) {
        if !self.enabled {
            if !self.bindings.is_empty() {
                warn!(
                    running = self.bindings.len(),
                    "transitions disabled; cancelling in-flight bindings"
                );
                self.cancel_where(|_| true);
            }
            self.settle();
            return;
        }

        let animating_before: HashSet<TransitionKey> = self
            .bindings
            .keys()
            .map(|handle| handle.transition_key.clone())
            .collect();

        // Reconcile in-flight bindings against the next frame.
        let mut interrupted: HashMap<PropertyHandle, f32> = HashMap::new();
        let mut cancelled = 0usize;
        let handles: Vec<PropertyHandle> = self.bindings.keys().cloned().collect();
        for handle in handles {
            let target = next
                .output(handle.transition_key.as_str())
                .map(|output| handle.property.read(output));

            let Some(active) = self.bindings.get(&handle) else {
                continue;
            };
            let release = match target {
                None => Release::Cancelled,
                Some(target) if !same_value(active.binding.animation().end_value, target) => {
                    Release::Replaced
                }
                Some(_) => continue,
            };

            if let Some(mut active) = self.bindings.remove(&handle) {
                active.binding.stop();
                trace!(
                    id = active.id.0,
                    %handle,
                    ?release,
                    value = active.binding.current_value(),
                    "stopped binding"
                );
                // Interrupted bindings are released once it is known whether
                // this pass replaces them.
                if release == Release::Replaced {
                    interrupted.insert(handle.clone(), active.binding.current_value());
                } else {
                    self.completion.release(&handle.transition_key, release);
                }
                cancelled += 1;
            }
        }

        // Create bindings for the changed properties.
        let specs = next.root_transition().flatten().len();
        let mut started: Vec<(TransitionKey, usize)> = Vec::new();
        let mut created = 0usize;
        for resolved in resolve_animations(current, next, next.root_transition()) {
            let handle = resolved.animation.handle.clone();
            if let Some(active) = self.bindings.get(&handle) {
                trace!(id = active.id.0, %handle, "binding already targets next value");
                continue;
            }

            let replaces = interrupted.remove(&handle);
            let start_value = replaces.unwrap_or(resolved.start_value);
            let animator = resolved
                .animator
                .unwrap_or_else(|| Rc::clone(&self.default_animator));
            let mut binding = animator.create_animation(resolved.animation);
            binding.start(start_value);
            assert!(
                binding.is_running(),
                "animator returned a binding for {handle} that is not running after start"
            );

            let id = AnimationId::new();
            trace!(
                id = id.0,
                %handle,
                start_value,
                end_value = binding.animation().end_value,
                "started binding"
            );

            let key = handle.transition_key.clone();
            self.completion.retain(&key);
            if replaces.is_some() {
                self.completion.release(&key, Release::Replaced);
            }
            self.bindings.insert(handle, ActiveBinding { id, binding });
            created += 1;

            if !animating_before.contains(&key) {
                match started.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, count)) => *count += 1,
                    None => started.push((key, 1)),
                }
            }
        }

        // Stopped without a replacement: the key can no longer complete.
        for handle in interrupted.into_keys() {
            trace!(%handle, "interrupted binding not replaced");
            self.completion
                .release(&handle.transition_key, Release::Cancelled);
        }

        debug!(
            specs,
            created,
            cancelled,
            running = self.bindings.len(),
            "transition pass"
        );

        self.settle();
        for (transition_key, animations) in started {
            self.event_queue.push(TransitionEvent::Started {
                transition_key,
                animations,
            });
        }
    }

    /// Advance every running binding by `delta_ms` milliseconds.
    ///
    /// Bindings that finish are removed; keys whose last binding finished are
    /// reported to the listener.
    pub fn update(&mut self, delta_ms: f32) {
        if self.bindings.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        for (handle, active) in self.bindings.iter_mut() {
            if !active.binding.update(delta_ms) {
                finished.push(handle.clone());
            }
        }

        for handle in finished {
            if let Some(active) = self.bindings.remove(&handle) {
                trace!(id = active.id.0, %handle, "binding finished");
                self.completion
                    .release(&handle.transition_key, Release::Finished);
            }
        }

        self.settle();
    }

    /// Cancel every binding of `key`. Returns the number of bindings stopped.
    pub fn stop(&mut self, key: &str) -> usize {
        let stopped = self.cancel_where(|handle| handle.transition_key.as_str() == key);
        self.settle();
        stopped
    }

    /// Cancel every running binding. Returns the number of bindings stopped.
    pub fn stop_all(&mut self) -> usize {
        let stopped = self.cancel_where(|_| true);
        self.settle();
        stopped
    }

    fn cancel_where(&mut self, predicate: impl Fn(&PropertyHandle) -> bool) -> usize {
        let handles: Vec<PropertyHandle> = self
            .bindings
            .keys()
            .filter(|handle| predicate(handle))
            .cloned()
            .collect();

        for handle in &handles {
            if let Some(mut active) = self.bindings.remove(handle) {
                active.binding.stop();
                trace!(id = active.id.0, %handle, "cancelled binding");
                self.completion
                    .release(&handle.transition_key, Release::Cancelled);
            }
        }
        handles.len()
    }

    /// Report keys whose bindings have all stopped.
    fn settle(&mut self) {
        for (transition_key, outcome) in self.completion.settle() {
            debug!(%transition_key, ?outcome, "transition settled");
            match outcome {
                AnimationState::Complete => {
                    self.listener.on_animation_complete(&transition_key);
                    self.event_queue
                        .push(TransitionEvent::Completed { transition_key });
                }
                _ => {
                    self.event_queue
                        .push(TransitionEvent::Cancelled { transition_key });
                }
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current value of a running binding, if one exists for the property.
    pub fn animated_value(&self, key: &str, property: AnimatedProperty) -> Option<f32> {
        self.bindings
            .get(&PropertyHandle::new(key, property))
            .map(|active| active.binding.current_value())
    }

    /// `Animating` while the key has running bindings, `Idle` otherwise.
    pub fn state(&self, key: &str) -> AnimationState {
        self.completion.state(key)
    }

    pub fn is_animating(&self, key: &str) -> bool {
        self.state(key) == AnimationState::Animating
    }

    /// Number of running bindings across all keys.
    pub fn running_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn has_running_animations(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Properties of `key` that currently have a running binding.
    pub fn animated_properties(&self, key: &str) -> Vec<AnimatedProperty> {
        let mut properties: Vec<AnimatedProperty> = self
            .bindings
            .keys()
            .filter(|handle| handle.transition_key.as_str() == key)
            .map(|handle| handle.property)
            .collect();
        properties.sort_by_key(|p| AnimatedProperty::ALL.iter().position(|q| q == p));
        properties
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain all pending events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.event_queue.drain()
    }

    pub fn pending_event_count(&self) -> usize {
        self.event_queue.len()
    }

    /// Pending events for one key, without removing them.
    pub fn events_for_key(&self, key: &str) -> Vec<&TransitionEvent> {
        self.event_queue.events_for_key(key)
    }
}

impl Default for TransitionManager {
    fn default() -> Self {
        Self::new(NoopCompleteListener)
    }
}

impl fmt::Debug for TransitionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionManager")
            .field("running", &self.bindings.len())
            .field("completion", &self.completion)
            .field("pending_events", &self.event_queue.len())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// Animators and listeners are shared through `Rc` and boxed without `Send`.
static_assertions::assert_not_impl_any!(TransitionManager: Send, Sync);
