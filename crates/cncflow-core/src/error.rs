//! Error handling for CNCFlow
//!
//! Provides error types for the controller-facing layers of the application:
//! - Controller errors (command issuance, workflow contract violations)
//! - Connection errors (command channel and transport plumbing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Controller error type
///
/// Represents errors related to driving a CNC controller,
/// including workflow contract violations and rejected commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// Controller is not connected or not ready
    #[error("Controller not connected")]
    NotConnected,

    /// Invalid state transition
    #[error("Invalid state transition from {current:?} to {requested:?}")]
    InvalidStateTransition {
        /// The current state name.
        current: String,
        /// The requested action or state name.
        requested: String,
    },

    /// Command was rejected by controller
    #[error("Command rejected: {reason}")]
    CommandRejected {
        /// The reason the command was rejected.
        reason: String,
    },
}

/// Connection error type
///
/// Represents errors in the plumbing between a controller client and
/// the transport task that talks to the machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// The command channel has no receiver
    #[error("Command channel closed")]
    ChannelClosed,
}

/// Main error type for CNCFlow
///
/// Either kind of failure a controller client can report.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl Error {
    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Controller(ControllerError::NotConnected)
        )
    }

    /// Check if this is a controller error
    pub fn is_controller_error(&self) -> bool {
        matches!(self, Error::Controller(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
