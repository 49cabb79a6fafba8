//! Property tests: the toolbar against a reference model over random input sequences

use cncflow_communication::{ChannelController, JobCommand};
use cncflow_core::{
    AppEvent, ControllerEvent, ControllerState, EventBus, JobProgress, WorkflowEvent,
    WorkflowState,
};
use cncflow_ui::{ButtonStates, Toolbar, ToolbarButton, ToolbarProps};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Input {
    Press(ToolbarButton),
    Props {
        port: bool,
        ready: bool,
        active_state: ControllerState,
    },
    Progress { executed: u64, total: u64 },
    Override(WorkflowState),
}

fn input_strategy() -> impl Strategy<Value = Input> {
    let button = prop::sample::select(ToolbarButton::ALL.to_vec());
    let active = prop::sample::select(vec![
        ControllerState::Idle,
        ControllerState::Run,
        ControllerState::Hold,
        ControllerState::Alarm,
    ]);
    let workflow = prop::sample::select(WorkflowState::ALL.to_vec());
    prop_oneof![
        4 => button.prop_map(Input::Press),
        3 => (any::<bool>(), any::<bool>(), active).prop_map(|(port, ready, active_state)| {
            Input::Props { port, ready, active_state }
        }),
        2 => (0u64..5, 0u64..5).prop_map(|(executed, total)| Input::Progress { executed, total }),
        1 => workflow.prop_map(Input::Override),
    ]
}

/// Reference model of the workflow rules
#[derive(Debug, Default)]
struct Model {
    state: WorkflowState,
    job_finished: bool,
    port: bool,
    ready: bool,
}

impl Model {
    fn apply(&mut self, input: &Input) -> Vec<JobCommand> {
        match input {
            Input::Press(button) => {
                let buttons = ButtonStates::compute(self.port, self.ready, self.state);
                if !buttons.is_enabled(*button) {
                    return Vec::new();
                }
                let (next, command) = match (button, self.state) {
                    (ToolbarButton::Run, WorkflowState::Paused) => {
                        (WorkflowState::Running, JobCommand::Resume)
                    }
                    (ToolbarButton::Run, _) => (WorkflowState::Running, JobCommand::Start),
                    (ToolbarButton::Pause, _) => (WorkflowState::Paused, JobCommand::Pause),
                    (ToolbarButton::Stop, _) => (WorkflowState::Idle, JobCommand::Stop),
                    (ToolbarButton::Close, _) => (WorkflowState::Idle, JobCommand::Unload),
                };
                self.state = next;
                vec![command]
            }
            Input::Props {
                port,
                ready,
                active_state,
            } => {
                self.port = *port;
                self.ready = *ready;
                if !port {
                    self.state = WorkflowState::Idle;
                    Vec::new()
                } else if self.job_finished && *active_state == ControllerState::Idle {
                    self.state = WorkflowState::Idle;
                    self.job_finished = false;
                    vec![JobCommand::Stop]
                } else {
                    Vec::new()
                }
            }
            Input::Progress { executed, total } => {
                if executed >= total {
                    self.job_finished = true;
                }
                Vec::new()
            }
            Input::Override(state) => {
                self.state = *state;
                Vec::new()
            }
        }
    }
}

proptest! {
    #[test]
    fn toolbar_matches_model(inputs in prop::collection::vec(input_strategy(), 1..40)) {
        let bus = Arc::new(EventBus::new());
        let (controller, mut commands) = ChannelController::new("prop", 256);
        let controller = Arc::new(controller);
        let toolbar = Toolbar::mount(bus.clone(), controller.clone());
        let mut model = Model::default();

        for input in &inputs {
            let expected = model.apply(input);

            match input {
                Input::Press(button) => {
                    // Only enabled buttons are pressable in the UI
                    if toolbar.buttons().is_enabled(*button) {
                        prop_assert!(toolbar.press(*button).is_ok());
                    }
                }
                Input::Props { port, ready, active_state } => {
                    toolbar.update_props(ToolbarProps {
                        port: port.then(|| "/dev/ttyACM0".to_string()),
                        ready: *ready,
                        active_state: *active_state,
                    });
                }
                Input::Progress { executed, total } => {
                    controller.notify(ControllerEvent::JobStatusChanged(
                        JobProgress::new(*executed, *total),
                    ));
                }
                Input::Override(state) => {
                    let _ = bus.publish(AppEvent::Workflow(WorkflowEvent::SetState(*state)));
                }
            }

            let mut issued = Vec::new();
            while let Ok(command) = commands.try_recv() {
                issued.push(command);
            }
            prop_assert_eq!(issued, expected, "after {:?}", input);
            prop_assert_eq!(toolbar.workflow_state(), model.state);
            prop_assert_eq!(toolbar.job_finished(), model.job_finished);
            if matches!(input, Input::Props { port: false, .. }) {
                prop_assert_eq!(toolbar.workflow_state(), WorkflowState::Idle);
            }
        }
    }

    #[test]
    fn button_flags_follow_table(port in any::<bool>(), ready in any::<bool>(), index in 0usize..3) {
        let state = WorkflowState::ALL[index];
        let buttons = ButtonStates::compute(port, ready, state);
        let enabled = ToolbarButton::ALL
            .iter()
            .filter(|b| buttons.is_enabled(**b))
            .count();
        if port && ready {
            prop_assert_eq!(enabled, if state == WorkflowState::Running { 1 } else { 2 });
        } else {
            prop_assert_eq!(enabled, 0);
        }
    }
}
