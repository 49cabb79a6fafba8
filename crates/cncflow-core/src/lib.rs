//! # CNCFlow Core
//!
//! Core types, traits, and utilities for CNCFlow.
//! Provides the fundamental abstractions for controller clients,
//! the job workflow state, and the application event bus.

pub mod core;
pub mod data;
pub mod error;
pub mod event_bus;

pub use core::{
    event::{ControllerEvent, EventDispatcher},
    ControllerClient, ControllerListener, ControllerListenerHandle,
};

pub use data::{ControllerState, JobProgress, WorkflowState};

pub use error::{ConnectionError, ControllerError, Error, Result};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, ConnectionEvent, ErrorEvent, ErrorSeverity, EventBus, EventBusConfig,
    EventBusError, EventCategory, EventFilter, JobEvent, MachineEvent, RecordKind,
    SettingsEvent, SubscriptionId, WorkflowEvent,
};
