//! # CNCFlow
//!
//! Job workflow control for CNC controllers:
//! - A run/pause/stop/close toolbar that tracks the job workflow state
//! - Machine and machine profile travel-limit records with update forms
//! - An in-process event bus that carries job and settings broadcasts
//!
//! ## Architecture
//!
//! CNCFlow is organized as a workspace with multiple crates:
//!
//! 1. **cncflow-core** - Core types, controller client traits, event bus
//! 2. **cncflow-communication** - Channel-backed controller client
//! 3. **cncflow-settings** - Application configuration
//! 4. **cncflow-devicedb** - Machine records, record store, update forms
//! 5. **cncflow-ui** - Toolkit-independent toolbar view model
//! 6. **cncflow** - Console binary that wires the crates together

pub mod console;

pub use cncflow_communication::{ChannelController, JobCommand};
pub use cncflow_core::{
    AppEvent, ControllerClient, ControllerError, ControllerEvent, ControllerState, Error,
    EventBus, EventBusConfig, JobEvent, JobProgress, Result, WorkflowEvent, WorkflowState,
};
pub use cncflow_devicedb::{
    MachineProfileRecord, MachineProfileUpdateForm, MachineRecord, MachineUpdateForm,
    RecordStore,
};
pub use cncflow_settings::Config;
pub use cncflow_ui::{ButtonStates, Toolbar, ToolbarButton, ToolbarProps};
pub use console::{Console, ConsoleCommand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, leaving stdout to the console
/// - RUST_LOG environment variable support, falling back to `default_level`
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", default_level, e))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}
