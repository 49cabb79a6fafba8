//! Data models for machine state and job execution
//!
//! This module provides:
//! - Controller state as reported by the connected machine
//! - The job workflow state tracked by the UI
//! - Job progress counters from controller status reports

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine/Controller state machine states
///
/// Represents the operational state reported by the CNC controller.
/// This is the physical machine state, distinct from [`WorkflowState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerState {
    /// Not connected to any controller
    #[default]
    Disconnected,
    /// In the process of connecting to controller
    Connecting,
    /// Connected and idle, ready for commands
    Idle,
    /// Executing a G-code program
    Run,
    /// Program paused, awaiting resume
    Hold,
    /// Manual jog/movement mode
    Jog,
    /// Machine alarm state (requires manual intervention)
    Alarm,
    /// Check mode (dry-run without machine movement)
    Check,
    /// Safety door interlock triggered
    Door,
    /// Homing/homing cycle in progress
    Home,
    /// Low-power sleep/idle state
    Sleep,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Idle => write!(f, "Idle"),
            Self::Run => write!(f, "Run"),
            Self::Hold => write!(f, "Hold"),
            Self::Jog => write!(f, "Jog"),
            Self::Alarm => write!(f, "Alarm"),
            Self::Check => write!(f, "Check"),
            Self::Door => write!(f, "Door"),
            Self::Home => write!(f, "Home"),
            Self::Sleep => write!(f, "Sleep"),
        }
    }
}

impl FromStr for ControllerState {
    type Err = String;

    /// Parse a controller state name, accepting GRBL sub-states such as `Hold:0`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let base = s.split(':').next().unwrap_or(s).to_ascii_lowercase();
        match base.as_str() {
            "disconnected" => Ok(Self::Disconnected),
            "connecting" => Ok(Self::Connecting),
            "idle" => Ok(Self::Idle),
            "run" => Ok(Self::Run),
            "hold" => Ok(Self::Hold),
            "jog" => Ok(Self::Jog),
            "alarm" => Ok(Self::Alarm),
            "check" => Ok(Self::Check),
            "door" => Ok(Self::Door),
            "home" => Ok(Self::Home),
            "sleep" => Ok(Self::Sleep),
            _ => Err(format!("Unknown controller state '{}'", s)),
        }
    }
}

/// The UI's belief about the job execution phase.
///
/// Exactly one state is current at any time. It lives only as long as the
/// toolbar that owns it and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkflowState {
    /// No job executing
    #[default]
    Idle,
    /// A job has been started or resumed
    Running,
    /// A running job has been paused
    Paused,
}

impl WorkflowState {
    /// All workflow states, in declaration order.
    pub const ALL: [WorkflowState; 3] = [
        WorkflowState::Idle,
        WorkflowState::Running,
        WorkflowState::Paused,
    ];
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

impl FromStr for WorkflowState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            other => Err(format!("Unknown workflow state '{}'", other)),
        }
    }
}

/// Executed/total counters carried by a job status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobProgress {
    /// Units (lines) the controller has executed
    pub executed: u64,
    /// Units (lines) in the loaded job
    pub total: u64,
}

impl JobProgress {
    /// Create a new progress value
    pub fn new(executed: u64, total: u64) -> Self {
        Self { executed, total }
    }

    /// A job is finished once every unit has been executed.
    ///
    /// An empty job (`total == 0`) counts as finished.
    pub fn is_finished(&self) -> bool {
        self.executed >= self.total
    }
}

impl fmt::Display for JobProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.executed, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_progress_finished() {
        assert!(!JobProgress::new(0, 10).is_finished());
        assert!(!JobProgress::new(9, 10).is_finished());
        assert!(JobProgress::new(10, 10).is_finished());
        assert!(JobProgress::new(11, 10).is_finished());
        assert!(JobProgress::new(0, 0).is_finished());
    }

    #[test]
    fn test_controller_state_parse() {
        assert_eq!("Idle".parse::<ControllerState>(), Ok(ControllerState::Idle));
        assert_eq!("hold:0".parse::<ControllerState>(), Ok(ControllerState::Hold));
        assert_eq!(" Run ".parse::<ControllerState>(), Ok(ControllerState::Run));
        assert!("Flying".parse::<ControllerState>().is_err());
    }

    #[test]
    fn test_workflow_state_roundtrip_names() {
        for state in WorkflowState::ALL {
            assert_eq!(state.to_string().parse::<WorkflowState>(), Ok(state));
        }
        assert_eq!(WorkflowState::default(), WorkflowState::Idle);
    }
}
