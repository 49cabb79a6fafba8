//! Controller client trait
//!
//! Commands are fire-and-forget from the caller's point of view: a returned
//! error only reports that the command could not be handed to the transport.

use crate::core::listener::{ControllerListener, ControllerListenerHandle};
use crate::error::Result;
use std::sync::Arc;

/// Imperative job commands plus notification registration.
pub trait ControllerClient: Send + Sync {
    /// Start the loaded job from the beginning
    fn start(&self) -> Result<()>;

    /// Resume a paused job
    fn resume(&self) -> Result<()>;

    /// Pause the running job
    fn pause(&self) -> Result<()>;

    /// Stop the job
    fn stop(&self) -> Result<()>;

    /// Unload the loaded job
    fn unload(&self) -> Result<()>;

    /// Register a listener for controller notifications
    fn add_listener(&self, listener: Arc<dyn ControllerListener>) -> ControllerListenerHandle;

    /// Remove a listener. Returns true if it was registered.
    fn remove_listener(&self, handle: &ControllerListenerHandle) -> bool;
}
