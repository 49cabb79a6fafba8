//! Event type definitions for the event bus.
//!
//! This module defines all application events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::data::{ControllerState, WorkflowState};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Machine connection events
    Connection(ConnectionEvent),
    /// Machine state and status
    Machine(MachineEvent),
    /// Job commands issued by the workflow toolbar
    Job(JobEvent),
    /// Externally requested workflow changes
    Workflow(WorkflowEvent),
    /// Settings and record changes
    Settings(SettingsEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Connection(_) => EventCategory::Connection,
            AppEvent::Machine(_) => EventCategory::Machine,
            AppEvent::Job(_) => EventCategory::Job,
            AppEvent::Workflow(_) => EventCategory::Workflow,
            AppEvent::Settings(_) => EventCategory::Settings,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Connection(e) => e.description(),
            AppEvent::Machine(e) => e.description(),
            AppEvent::Job(e) => e.description(),
            AppEvent::Workflow(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Machine connection events.
    Connection,
    /// Machine state and status events.
    Machine,
    /// Job command broadcasts.
    Job,
    /// Workflow override requests.
    Workflow,
    /// Settings and record events.
    Settings,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Connection => write!(f, "Connection"),
            EventCategory::Machine => write!(f, "Machine"),
            EventCategory::Job => write!(f, "Job"),
            EventCategory::Workflow => write!(f, "Workflow"),
            EventCategory::Settings => write!(f, "Settings"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Connection-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectionEvent {
    /// Successfully connected.
    Connected {
        /// Port path that was connected.
        port: String,
    },
    /// Disconnected from device.
    Disconnected {
        /// Port path that was disconnected.
        port: String,
    },
    /// Readiness of the connected device changed.
    ReadyChanged {
        /// Whether the device accepts commands.
        ready: bool,
    },
}

impl ConnectionEvent {
    fn description(&self) -> String {
        match self {
            ConnectionEvent::Connected { port } => format!("Connected to {}", port),
            ConnectionEvent::Disconnected { port } => format!("Disconnected from {}", port),
            ConnectionEvent::ReadyChanged { ready } => {
                format!("Ready: {}", if *ready { "yes" } else { "no" })
            }
        }
    }
}

/// Machine state and status events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MachineEvent {
    /// Controller state changed.
    StateChanged {
        /// Previous controller state.
        old: ControllerState,
        /// New controller state.
        new: ControllerState,
    },
}

impl MachineEvent {
    fn description(&self) -> String {
        match self {
            MachineEvent::StateChanged { old, new } => format!("State: {} -> {}", old, new),
        }
    }
}

/// Job commands broadcast by the workflow toolbar so sibling views stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEvent {
    /// Job started from the beginning.
    Start,
    /// Paused job resumed.
    Resume,
    /// Running job paused.
    Pause,
    /// Job stopped.
    Stop,
    /// Loaded job unloaded.
    Unload,
    /// Workflow state changed.
    WorkflowStateChanged {
        /// Previous workflow state.
        old: WorkflowState,
        /// New workflow state.
        new: WorkflowState,
    },
}

impl JobEvent {
    /// Topic name of this event.
    pub fn topic(&self) -> &'static str {
        match self {
            JobEvent::Start => "job-start",
            JobEvent::Resume => "job-resume",
            JobEvent::Pause => "job-pause",
            JobEvent::Stop => "job-stop",
            JobEvent::Unload => "job-unload",
            JobEvent::WorkflowStateChanged { .. } => "workflow-state-changed",
        }
    }

    fn description(&self) -> String {
        match self {
            JobEvent::WorkflowStateChanged { old, new } => {
                format!("Workflow: {} -> {}", old, new)
            }
            other => format!("Job: {}", other.topic()),
        }
    }
}

/// Requests from other views to adopt a workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// Adopt the given workflow state without issuing commands.
    SetState(WorkflowState),
}

impl WorkflowEvent {
    /// Topic name of this event.
    pub fn topic(&self) -> &'static str {
        match self {
            WorkflowEvent::SetState(_) => "set-workflow-state",
        }
    }

    fn description(&self) -> String {
        match self {
            WorkflowEvent::SetState(state) => format!("Set workflow state: {}", state),
        }
    }
}

/// Kind of record a settings event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// A machine record.
    Machine,
    /// A machine profile record.
    MachineProfile,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Machine => write!(f, "machine"),
            RecordKind::MachineProfile => write!(f, "machine profile"),
        }
    }
}

/// Record store events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// A record was updated.
    RecordUpdated {
        /// Kind of record.
        kind: RecordKind,
        /// Record identifier.
        id: String,
        /// Whether views listing the records should reload them.
        reload: bool,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::RecordUpdated { kind, id, reload } => {
                format!("Updated {} {} (reload={})", kind, id, reload)
            }
        }
    }
}

/// Error severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Something failed but the application carries on.
    Warning,
    /// An operation failed.
    Error,
}

/// Error and diagnostic events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// Non-fatal warning.
    Warning {
        /// Short machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
    /// Operation failure.
    Error {
        /// Short machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::Warning { code, message } => {
                format!("Warning [{}]: {}", code, message)
            }
            ErrorEvent::Error { code, message } => {
                format!("Error [{}]: {}", code, message)
            }
        }
    }

    /// Get the severity of this event
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorEvent::Warning { .. } => ErrorSeverity::Warning,
            ErrorEvent::Error { .. } => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_category() {
        let event = AppEvent::Connection(ConnectionEvent::Connected {
            port: "/dev/ttyUSB0".to_string(),
        });
        assert_eq!(event.category(), EventCategory::Connection);

        assert_eq!(AppEvent::Job(JobEvent::Start).category(), EventCategory::Job);
        assert_eq!(
            AppEvent::Workflow(WorkflowEvent::SetState(WorkflowState::Paused)).category(),
            EventCategory::Workflow
        );
    }

    #[test]
    fn test_job_topics() {
        assert_eq!(JobEvent::Start.topic(), "job-start");
        assert_eq!(JobEvent::Resume.topic(), "job-resume");
        assert_eq!(JobEvent::Pause.topic(), "job-pause");
        assert_eq!(JobEvent::Stop.topic(), "job-stop");
        assert_eq!(JobEvent::Unload.topic(), "job-unload");
    }

    #[test]
    fn test_event_description() {
        let event = AppEvent::Job(JobEvent::WorkflowStateChanged {
            old: WorkflowState::Idle,
            new: WorkflowState::Running,
        });
        assert_eq!(event.description(), "Workflow: Idle -> Running");
        assert_eq!(AppEvent::Job(JobEvent::Pause).description(), "Job: job-pause");
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Workflow(WorkflowEvent::SetState(WorkflowState::Running));
        let json = serde_json::to_string(&event).expect("Should serialize");
        let parsed: AppEvent = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_error_severity() {
        let warning = ErrorEvent::Warning {
            code: "W001".to_string(),
            message: "Test".to_string(),
        };
        assert_eq!(warning.severity(), ErrorSeverity::Warning);

        let error = ErrorEvent::Error {
            code: "E001".to_string(),
            message: "Test".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }
}
