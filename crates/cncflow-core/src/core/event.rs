//! Event system for controller communication
//!
//! Provides:
//! - A closed set of controller notification kinds
//! - Event dispatcher for publishing notifications to async subscribers

use crate::data::{ControllerState, JobProgress};
use tokio::sync::broadcast;

/// Controller event types
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Connection established on the named port
    Connected(String),
    /// Disconnection occurred
    Disconnected,
    /// Controller state changed
    StateChanged(ControllerState),
    /// Job execution progress changed
    JobStatusChanged(JobProgress),
    /// Error occurred
    Error(String),
}

impl std::fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerEvent::Connected(name) => write!(f, "Connected to {}", name),
            ControllerEvent::Disconnected => write!(f, "Disconnected"),
            ControllerEvent::StateChanged(state) => write!(f, "State: {}", state),
            ControllerEvent::JobStatusChanged(progress) => write!(f, "Job status: {}", progress),
            ControllerEvent::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Event dispatcher for publishing events to subscribers
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for controller events.
    tx: broadcast::Sender<ControllerEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Create a new event dispatcher with default buffer size
    pub fn default_with_buffer() -> Self {
        Self::new(100)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    pub fn publish(
        &self,
        event: ControllerEvent,
    ) -> Result<usize, broadcast::error::SendError<ControllerEvent>> {
        self.tx.send(event)
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::default_with_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let event = ControllerEvent::JobStatusChanged(JobProgress::new(3, 10));
        assert_eq!(event.to_string(), "Job status: 3/10");
        assert_eq!(ControllerEvent::Disconnected.to_string(), "Disconnected");
    }

    #[tokio::test]
    async fn test_dispatcher_delivery() {
        let dispatcher = EventDispatcher::default();
        assert!(dispatcher.publish(ControllerEvent::Disconnected).is_err());

        let mut rx = dispatcher.subscribe();
        assert_eq!(dispatcher.subscriber_count(), 1);

        dispatcher
            .publish(ControllerEvent::StateChanged(ControllerState::Idle))
            .expect("Should publish");
        let received = rx.recv().await.expect("Should receive");
        assert_eq!(received, ControllerEvent::StateChanged(ControllerState::Idle));
    }
}
