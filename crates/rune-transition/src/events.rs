//! Per-key lifecycle events.
//!
//! The manager records every key-level state change in an [`EventQueue`] so
//! callers can poll them after `setup_transitions` or a frame tick, in
//! addition to the completion listener.
//!
//! ```ignore
//! manager.update(16.0);
//! for event in manager.drain_events() {
//!     if let TransitionEvent::Cancelled { transition_key } = event {
//!         tracing::debug!(%transition_key, "transition cancelled");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::types::{AnimationState, TransitionKey};

/// A key's animation set changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// The key went from idle to animating.
    Started {
        transition_key: TransitionKey,
        /// Number of bindings started for the key in this pass.
        animations: usize,
    },
    /// Every binding of the key finished.
    Completed { transition_key: TransitionKey },
    /// The key's bindings were stopped before finishing.
    Cancelled { transition_key: TransitionKey },
}

impl TransitionEvent {
    pub fn transition_key(&self) -> &TransitionKey {
        match self {
            Self::Started { transition_key, .. }
            | Self::Completed { transition_key }
            | Self::Cancelled { transition_key } => transition_key,
        }
    }

    /// The state the key entered.
    pub fn state(&self) -> AnimationState {
        match self {
            Self::Started { .. } => AnimationState::Animating,
            Self::Completed { .. } => AnimationState::Complete,
            Self::Cancelled { .. } => AnimationState::Cancelled,
        }
    }
}

/// FIFO queue of transition events.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<TransitionEvent> {
        self.events.pop_front()
    }

    pub fn peek(&self) -> Option<&TransitionEvent> {
        self.events.front()
    }

    /// Drain all events, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    /// Pending events for one key, without removing them.
    pub fn events_for_key(&self, key: &str) -> Vec<&TransitionEvent> {
        self.events
            .iter()
            .filter(|e| e.transition_key().as_str() == key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(key: &str) -> TransitionEvent {
        TransitionEvent::Completed {
            transition_key: TransitionKey::new(key),
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(TransitionEvent::Started {
            transition_key: TransitionKey::new("a"),
            animations: 2,
        });
        queue.push(completed("a"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().unwrap().state(), AnimationState::Animating);
        assert_eq!(queue.pop().unwrap().state(), AnimationState::Animating);
        assert_eq!(queue.pop(), Some(completed("a")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_for_key() {
        let mut queue = EventQueue::new();
        queue.push(completed("a"));
        queue.push(completed("b"));
        queue.push(TransitionEvent::Cancelled {
            transition_key: TransitionKey::new("a"),
        });

        assert_eq!(queue.events_for_key("a").len(), 2);
        assert_eq!(queue.events_for_key("b").len(), 1);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&completed("row")).unwrap();
        assert_eq!(json, r#"{"type":"completed","transition_key":"row"}"#);

        let parsed: TransitionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, completed("row"));
    }
}
