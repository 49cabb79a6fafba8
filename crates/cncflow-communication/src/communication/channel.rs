//! Channel-backed controller client
//!
//! Commands are queued on a bounded tokio mpsc channel whose receiving end
//! belongs to the transport task. Notifications pushed in through
//! [`ChannelController::notify`] reach every registered listener
//! synchronously and async subscribers through a broadcast dispatcher.

use super::JobCommand;
use cncflow_core::{
    ConnectionError, ControllerClient, ControllerError, ControllerEvent, ControllerListener,
    ControllerListenerHandle, EventDispatcher, Result,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Default capacity of the command queue
pub const DEFAULT_COMMAND_CAPACITY: usize = 100;

/// Controller client that forwards job commands over an mpsc channel
pub struct ChannelController {
    /// Name identifier
    name: String,
    /// Command sender channel
    command_tx: mpsc::Sender<JobCommand>,
    /// Registered controller listeners
    listeners: Arc<RwLock<HashMap<ControllerListenerHandle, Arc<dyn ControllerListener>>>>,
    /// Broadcast of notifications for async consumers
    dispatcher: EventDispatcher,
}

impl ChannelController {
    /// Create a controller and the receiver the transport task reads commands from
    pub fn new(name: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<JobCommand>) {
        let (command_tx, command_rx) = mpsc::channel(capacity.max(1));
        let controller = Self {
            name: name.into(),
            command_tx,
            listeners: Arc::new(RwLock::new(HashMap::new())),
            dispatcher: EventDispatcher::default(),
        };
        (controller, command_rx)
    }

    /// Controller name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver a controller notification to listeners and async subscribers
    pub fn notify(&self, event: ControllerEvent) {
        tracing::trace!("{}: {}", self.name, event);

        // Snapshot so listeners may (un)register while being notified
        let listeners: Vec<Arc<dyn ControllerListener>> =
            self.listeners.read().values().cloned().collect();
        for listener in listeners {
            listener.on_event(&event);
        }

        // No async subscribers is fine
        let _ = self.dispatcher.publish(event);
    }

    /// Receiver for async consumption of notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.dispatcher.subscribe()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn send(&self, command: JobCommand) -> Result<()> {
        match self.command_tx.try_send(command) {
            Ok(()) => {
                tracing::debug!("{}: queued {}", self.name, command);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(ControllerError::CommandRejected {
                reason: format!("command queue full, dropped {}", command),
            }
            .into()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ConnectionError::ChannelClosed.into()),
        }
    }
}

impl ControllerClient for ChannelController {
    fn start(&self) -> Result<()> {
        self.send(JobCommand::Start)
    }

    fn resume(&self) -> Result<()> {
        self.send(JobCommand::Resume)
    }

    fn pause(&self) -> Result<()> {
        self.send(JobCommand::Pause)
    }

    fn stop(&self) -> Result<()> {
        self.send(JobCommand::Stop)
    }

    fn unload(&self) -> Result<()> {
        self.send(JobCommand::Unload)
    }

    fn add_listener(&self, listener: Arc<dyn ControllerListener>) -> ControllerListenerHandle {
        let handle = ControllerListenerHandle::new();
        self.listeners.write().insert(handle.clone(), listener);
        tracing::debug!("{}: listener {} added", self.name, handle.0);
        handle
    }

    fn remove_listener(&self, handle: &ControllerListenerHandle) -> bool {
        let removed = self.listeners.write().remove(handle).is_some();
        if removed {
            tracing::debug!("{}: listener {} removed", self.name, handle.0);
        }
        removed
    }
}

impl std::fmt::Debug for ChannelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelController")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
