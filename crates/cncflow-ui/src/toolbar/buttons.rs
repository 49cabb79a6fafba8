//! Toolbar button affordances

use cncflow_core::WorkflowState;
use serde::{Deserialize, Serialize};

/// The four job buttons on the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolbarButton {
    /// Start or resume the job
    Run,
    /// Pause the running job
    Pause,
    /// Stop the paused job
    Stop,
    /// Unload the job
    Close,
}

impl ToolbarButton {
    /// All buttons in display order
    pub const ALL: [ToolbarButton; 4] = [
        ToolbarButton::Run,
        ToolbarButton::Pause,
        ToolbarButton::Stop,
        ToolbarButton::Close,
    ];

    /// Tooltip label
    pub fn label(&self) -> &'static str {
        match self {
            ToolbarButton::Run => "Run",
            ToolbarButton::Pause => "Pause",
            ToolbarButton::Stop => "Stop",
            ToolbarButton::Close => "Close",
        }
    }

    /// Symbolic icon name
    pub fn icon_name(&self) -> &'static str {
        match self {
            ToolbarButton::Run => "media-playback-start-symbolic",
            ToolbarButton::Pause => "media-playback-pause-symbolic",
            ToolbarButton::Stop => "media-playback-stop-symbolic",
            ToolbarButton::Close => "user-trash-symbolic",
        }
    }

    /// Whether the workflow state allows pressing this button
    pub fn permits(&self, state: WorkflowState) -> bool {
        match self {
            ToolbarButton::Run => matches!(state, WorkflowState::Idle | WorkflowState::Paused),
            ToolbarButton::Pause => state == WorkflowState::Running,
            ToolbarButton::Stop => state == WorkflowState::Paused,
            ToolbarButton::Close => state == WorkflowState::Idle,
        }
    }
}

impl std::fmt::Display for ToolbarButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Enabled flags for the toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonStates {
    pub can_run: bool,
    pub can_pause: bool,
    pub can_stop: bool,
    pub can_close: bool,
}

impl ButtonStates {
    /// Derive the flags from connection presence, readiness and workflow state
    pub fn compute(connected: bool, ready: bool, state: WorkflowState) -> Self {
        let can_click = connected && ready;
        Self {
            can_run: can_click && ToolbarButton::Run.permits(state),
            can_pause: can_click && ToolbarButton::Pause.permits(state),
            can_stop: can_click && ToolbarButton::Stop.permits(state),
            can_close: can_click && ToolbarButton::Close.permits(state),
        }
    }

    /// Whether the given button is enabled
    pub fn is_enabled(&self, button: ToolbarButton) -> bool {
        match button {
            ToolbarButton::Run => self.can_run,
            ToolbarButton::Pause => self.can_pause,
            ToolbarButton::Stop => self.can_stop,
            ToolbarButton::Close => self.can_close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_combinations() {
        for connected in [false, true] {
            for ready in [false, true] {
                for state in WorkflowState::ALL {
                    let buttons = ButtonStates::compute(connected, ready, state);
                    let click = connected && ready;
                    assert_eq!(
                        buttons.can_run,
                        click && (state == WorkflowState::Idle || state == WorkflowState::Paused),
                        "run: connected={} ready={} state={}",
                        connected,
                        ready,
                        state
                    );
                    assert_eq!(buttons.can_pause, click && state == WorkflowState::Running);
                    assert_eq!(buttons.can_stop, click && state == WorkflowState::Paused);
                    assert_eq!(buttons.can_close, click && state == WorkflowState::Idle);
                }
            }
        }
    }

    #[test]
    fn test_exactly_expected_buttons_when_connected() {
        let idle = ButtonStates::compute(true, true, WorkflowState::Idle);
        assert_eq!(
            idle,
            ButtonStates {
                can_run: true,
                can_pause: false,
                can_stop: false,
                can_close: true,
            }
        );

        let paused = ButtonStates::compute(true, true, WorkflowState::Paused);
        assert!(paused.is_enabled(ToolbarButton::Run));
        assert!(paused.is_enabled(ToolbarButton::Stop));
        assert!(!paused.is_enabled(ToolbarButton::Close));
    }

    #[test]
    fn test_disconnected_disables_everything() {
        for state in WorkflowState::ALL {
            let buttons = ButtonStates::compute(false, true, state);
            assert!(ToolbarButton::ALL.iter().all(|b| !buttons.is_enabled(*b)));
        }
    }
}
