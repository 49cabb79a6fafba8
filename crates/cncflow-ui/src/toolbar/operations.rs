//! Toolbar operations
//!
//! State is mutated under the lock; controller commands and bus broadcasts
//! happen after it is released.

use super::*;
use cncflow_core::{ControllerError, ErrorEvent, JobEvent};

/// A command the toolbar hands to the controller client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobAction {
    Start,
    Resume,
    Pause,
    Stop,
    Unload,
}

impl JobAction {
    fn event(self) -> JobEvent {
        match self {
            JobAction::Start => JobEvent::Start,
            JobAction::Resume => JobEvent::Resume,
            JobAction::Pause => JobEvent::Pause,
            JobAction::Stop => JobEvent::Stop,
            JobAction::Unload => JobEvent::Unload,
        }
    }

    fn send(self, controller: &dyn ControllerClient) -> cncflow_core::Result<()> {
        match self {
            JobAction::Start => controller.start(),
            JobAction::Resume => controller.resume(),
            JobAction::Pause => controller.pause(),
            JobAction::Stop => controller.stop(),
            JobAction::Unload => controller.unload(),
        }
    }
}

impl Toolbar {
    /// Apply the host view's connection props.
    ///
    /// A missing port forces `Idle` without issuing anything. Otherwise, a
    /// finished job plus an idle machine issues a single stop and returns to
    /// `Idle`.
    pub fn update_props(&self, props: ToolbarProps) {
        self.inner.update_props(props);
    }

    /// Handle a controller notification
    pub fn handle_controller_event(&self, event: &ControllerEvent) {
        self.inner.handle_controller_event(event);
    }

    /// Adopt a workflow state without issuing commands
    pub fn set_workflow_state(&self, state: WorkflowState) {
        self.inner.adopt(state);
    }

    /// Run: start from `Idle`, resume from `Paused`
    pub fn run(&self) -> Result<WorkflowState, ControllerError> {
        self.inner.press(ToolbarButton::Run)
    }

    /// Pause the running job
    pub fn pause(&self) -> Result<WorkflowState, ControllerError> {
        self.inner.press(ToolbarButton::Pause)
    }

    /// Stop the paused job
    pub fn stop(&self) -> Result<WorkflowState, ControllerError> {
        self.inner.press(ToolbarButton::Stop)
    }

    /// Unload the job while idle
    pub fn close(&self) -> Result<WorkflowState, ControllerError> {
        self.inner.press(ToolbarButton::Close)
    }

    /// Press any toolbar button.
    ///
    /// Pressing a button the workflow state does not permit is a contract
    /// violation: it panics in debug builds and is a no-op otherwise.
    pub fn press(&self, button: ToolbarButton) -> Result<WorkflowState, ControllerError> {
        self.inner.press(button)
    }
}

impl ToolbarInner {
    fn press(&self, button: ToolbarButton) -> Result<WorkflowState, ControllerError> {
        let (old, new, action) = {
            let mut state = self.state.lock();
            let old = state.workflow_state;

            debug_assert!(
                button.permits(old),
                "{} pressed while workflow is {}",
                button,
                old
            );
            if !button.permits(old) {
                tracing::warn!("Ignoring {} while workflow is {}", button, old);
                return Err(ControllerError::InvalidStateTransition {
                    current: old.to_string(),
                    requested: button.to_string(),
                });
            }
            if !state.props.can_click() {
                tracing::warn!("Ignoring {}: no ready connection", button);
                return Err(ControllerError::NotConnected);
            }

            let (new, action) = match button {
                ToolbarButton::Run if old == WorkflowState::Paused => {
                    (WorkflowState::Running, JobAction::Resume)
                }
                ToolbarButton::Run => (WorkflowState::Running, JobAction::Start),
                ToolbarButton::Pause => (WorkflowState::Paused, JobAction::Pause),
                ToolbarButton::Stop => (WorkflowState::Idle, JobAction::Stop),
                ToolbarButton::Close => (WorkflowState::Idle, JobAction::Unload),
            };
            state.workflow_state = new;
            (old, new, action)
        };

        self.issue(action);
        self.announce(old, new);
        Ok(new)
    }

    pub(super) fn update_props(&self, props: ToolbarProps) {
        let (old, new, action) = {
            let mut state = self.state.lock();
            state.props = props;
            let old = state.workflow_state;

            if !state.props.has_port() {
                state.workflow_state = WorkflowState::Idle;
                (old, WorkflowState::Idle, None)
            } else if state.job_finished && state.props.active_state == ControllerState::Idle {
                tracing::info!("Job finished and machine idle, stopping");
                state.workflow_state = WorkflowState::Idle;
                state.job_finished = false;
                (old, WorkflowState::Idle, Some(JobAction::Stop))
            } else {
                (old, old, None)
            }
        };

        if let Some(action) = action {
            self.issue(action);
        }
        self.announce(old, new);
    }

    pub(super) fn handle_controller_event(&self, event: &ControllerEvent) {
        match event {
            ControllerEvent::JobStatusChanged(progress) => {
                if progress.is_finished() {
                    tracing::debug!("Job finished ({})", progress);
                    self.state.lock().job_finished = true;
                }
            }
            ControllerEvent::Connected(_)
            | ControllerEvent::Disconnected
            | ControllerEvent::StateChanged(_)
            | ControllerEvent::Error(_) => {}
        }
    }

    pub(super) fn adopt(&self, new: WorkflowState) {
        let old = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.workflow_state, new)
        };
        self.announce(old, new);
    }

    /// Send a command and broadcast its topic. Client failures are logged, never retried.
    fn issue(&self, action: JobAction) {
        tracing::info!("Issuing {}", action.event().topic());
        if let Err(e) = action.send(self.controller.as_ref()) {
            tracing::warn!("Controller rejected {}: {}", action.event().topic(), e);
            self.publish(AppEvent::Error(ErrorEvent::Warning {
                code: "controller-command".to_string(),
                message: e.to_string(),
            }));
        }
        self.publish(AppEvent::Job(action.event()));
    }

    fn announce(&self, old: WorkflowState, new: WorkflowState) {
        if old != new {
            tracing::debug!("Workflow {} -> {}", old, new);
            self.publish(AppEvent::Job(JobEvent::WorkflowStateChanged { old, new }));
        }
    }

    fn publish(&self, event: AppEvent) {
        // Nobody listening is not an error here
        let _ = self.bus.publish(event);
    }
}
