//! Domain event system — decoupled communication between bounded contexts.
//!
//! The scheduler publishes turn-lifecycle events as they happen; a
//! conversation view (or any other subscriber) reacts without the engine
//! knowing it exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::turn::CharacterResponse;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A turn was accepted and is fanning out
    TurnSubmitted {
        session_id: String,
        character_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// One character's slot was delivered into the turn
    ResponseDelivered {
        session_id: String,
        character_id: String,
        delay_ms: u64,
        errored: bool,
        timestamp: DateTime<Utc>,
    },

    /// All slots delivered; carries the full ordered response list
    TurnCompleted {
        session_id: String,
        turn_id: String,
        responses: Vec<CharacterResponse>,
        timestamp: DateTime<Utc>,
    },

    /// The batch was cancelled before full delivery
    TurnCancelled {
        session_id: String,
        timestamp: DateTime<Utc>,
    },

    /// One character's generation call failed (slot fell back)
    GenerationFailed {
        session_id: String,
        character_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A stock character was shadowed by a user override
    CharacterShadowed {
        user_id: String,
        original_id: String,
        override_id: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
/// Components can subscribe to receive all events and filter for what they
/// care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ResponseDelivered {
            session_id: "session_1".into(),
            character_id: "zoe".into(),
            delay_ms: 400,
            errored: false,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::ResponseDelivered {
                character_id,
                delay_ms,
                ..
            } => {
                assert_eq!(character_id, "zoe");
                assert_eq!(*delay_ms, 400);
            }
            _ => panic!("Expected ResponseDelivered event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::TurnCancelled {
            session_id: "session_1".into(),
            timestamp: Utc::now(),
        });
    }
}
