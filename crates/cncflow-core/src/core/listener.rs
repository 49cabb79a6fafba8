//! Controller listener interface
//!
//! Defines the listener trait for controller notifications

use crate::core::event::ControllerEvent;
use uuid::Uuid;

/// Handle for a registered controller listener.
///
/// Uniquely identifies a listener subscription. Can be used to unsubscribe
/// from controller events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerListenerHandle(pub String);

impl ControllerListenerHandle {
    /// Create a new unique handle
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ControllerListenerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener trait for controller events
///
/// Implement this trait to receive notifications from a controller client.
/// Notifications are delivered on the thread that produced them and must
/// return quickly.
pub trait ControllerListener: Send + Sync {
    /// Called for every controller notification
    fn on_event(&self, event: &ControllerEvent);
}

impl<F> ControllerListener for F
where
    F: Fn(&ControllerEvent) + Send + Sync,
{
    fn on_event(&self, event: &ControllerEvent) {
        self(event)
    }
}
