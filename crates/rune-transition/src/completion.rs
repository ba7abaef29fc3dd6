//! Per-key completion bookkeeping.
//!
//! A key may have many bindings running at once (one per property), but
//! completion is reported once per key. `CompletionTracker` keeps an explicit
//! count of outstanding bindings per key and decides the key's outcome once
//! that count reaches zero.

use std::collections::HashMap;

use super::types::{AnimationState, TransitionKey};

/// Why a binding stopped counting against its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The binding reached its end value.
    Finished,
    /// The binding was stopped because its target changed and a new binding
    /// for the same handle took over in the same pass.
    Replaced,
    /// The key's whole animation set is being stopped.
    Cancelled,
}

#[derive(Debug, Default, Clone)]
struct KeyProgress {
    outstanding: usize,
    finished: usize,
    cancelled: bool,
}

/// Reference-counted completion tracker keyed by transition key.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    keys: HashMap<TransitionKey, KeyProgress>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a newly started binding against `key`.
    pub fn retain(&mut self, key: &TransitionKey) {
        let progress = self.keys.entry(key.clone()).or_default();
        progress.outstanding += 1;
    }

    /// A binding of `key` stopped for `reason`.
    ///
    /// Outcomes are not decided here; call [`settle`](Self::settle) once all
    /// releases and retains of a pass have been applied.
    pub fn release(&mut self, key: &TransitionKey, reason: Release) {
        let Some(progress) = self.keys.get_mut(key) else {
            return;
        };
        progress.outstanding = progress.outstanding.saturating_sub(1);
        match reason {
            Release::Finished => progress.finished += 1,
            Release::Replaced => {}
            Release::Cancelled => progress.cancelled = true,
        }
    }

    /// Remove every key with no outstanding bindings and return its outcome,
    /// sorted by key.
    ///
    /// A key completes if at least one of its bindings finished and the key
    /// was not cancelled; otherwise it is cancelled.
    pub fn settle(&mut self) -> Vec<(TransitionKey, AnimationState)> {
        let mut settled: Vec<(TransitionKey, AnimationState)> = self
            .keys
            .iter()
            .filter(|(_, progress)| progress.outstanding == 0)
            .map(|(key, progress)| {
                let outcome = if progress.cancelled || progress.finished == 0 {
                    AnimationState::Cancelled
                } else {
                    AnimationState::Complete
                };
                (key.clone(), outcome)
            })
            .collect();

        for (key, _) in &settled {
            self.keys.remove(key);
        }
        settled.sort_by(|a, b| a.0.cmp(&b.0));
        settled
    }

    /// `Animating` while the key has outstanding bindings, `Idle` otherwise.
    pub fn state(&self, key: &str) -> AnimationState {
        match self.keys.get(key) {
            Some(progress) if progress.outstanding > 0 => AnimationState::Animating,
            _ => AnimationState::Idle,
        }
    }

    pub fn outstanding(&self, key: &str) -> usize {
        self.keys.get(key).map_or(0, |p| p.outstanding)
    }

    /// Number of keys with outstanding bindings.
    pub fn animating_key_count(&self) -> usize {
        self.keys.values().filter(|p| p.outstanding > 0).count()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
