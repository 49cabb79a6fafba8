//! Job workflow toolbar
//!
//! Tracks whether the loaded job is idle, running or paused, and turns
//! Run/Pause/Stop/Close presses into controller commands plus job broadcasts
//! on the event bus.
//!
//! Inputs:
//! - [`ToolbarProps`] from the host view on every update pass
//! - `JobStatusChanged` notifications from the controller client
//! - `WorkflowEvent::SetState` overrides from the event bus
//! - button presses
//!
//! Bus and controller subscriptions are owned by the [`Toolbar`] and released
//! when it is dropped.

mod buttons;
mod operations;

pub use buttons::{ButtonStates, ToolbarButton};

use cncflow_core::{
    AppEvent, ControllerClient, ControllerEvent, ControllerListener, ControllerListenerHandle,
    ControllerState, EventBus, EventCategory, EventFilter, SubscriptionId, WorkflowEvent,
    WorkflowState,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Connection information supplied by the host view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolbarProps {
    /// Port of the active connection, if any
    pub port: Option<String>,
    /// Whether the connected device accepts commands
    pub ready: bool,
    /// State reported by the machine
    pub active_state: ControllerState,
}

impl ToolbarProps {
    /// Props for an open, ready connection
    pub fn connected(port: impl Into<String>, active_state: ControllerState) -> Self {
        Self {
            port: Some(port.into()),
            ready: true,
            active_state,
        }
    }

    /// Whether a port is present. An empty port name counts as absent.
    pub fn has_port(&self) -> bool {
        self.port.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Whether job buttons may be clicked at all
    pub fn can_click(&self) -> bool {
        self.has_port() && self.ready
    }
}

#[derive(Debug, Default)]
struct ToolbarState {
    workflow_state: WorkflowState,
    job_finished: bool,
    props: ToolbarProps,
}

struct ToolbarInner {
    bus: Arc<EventBus>,
    controller: Arc<dyn ControllerClient>,
    state: Mutex<ToolbarState>,
}

/// Workflow controller behind the job toolbar
pub struct Toolbar {
    inner: Arc<ToolbarInner>,
    subscriptions: Vec<SubscriptionId>,
    listener: Option<ControllerListenerHandle>,
}

/// Forwards controller notifications to a live toolbar
struct ToolbarListener {
    inner: Weak<ToolbarInner>,
}

impl ControllerListener for ToolbarListener {
    fn on_event(&self, event: &ControllerEvent) {
        if let Some(inner) = self.inner.upgrade() {
            inner.handle_controller_event(event);
        }
    }
}

impl Toolbar {
    /// Create the toolbar and subscribe it to the bus and the controller.
    ///
    /// The workflow starts out `Idle` with no connection.
    pub fn mount(bus: Arc<EventBus>, controller: Arc<dyn ControllerClient>) -> Self {
        let inner = Arc::new(ToolbarInner {
            bus: bus.clone(),
            controller: controller.clone(),
            state: Mutex::new(ToolbarState::default()),
        });

        let weak = Arc::downgrade(&inner);
        let subscription = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Workflow]),
            move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match event {
                    AppEvent::Workflow(WorkflowEvent::SetState(state)) => inner.adopt(state),
                    other => tracing::trace!("Toolbar ignoring {}", other.description()),
                }
            },
        );

        let listener = controller.add_listener(Arc::new(ToolbarListener {
            inner: Arc::downgrade(&inner),
        }));

        tracing::debug!("Toolbar mounted");
        Self {
            inner,
            subscriptions: vec![subscription],
            listener: Some(listener),
        }
    }

    /// Tear the toolbar down, releasing its subscriptions
    pub fn unmount(self) {
        drop(self);
    }

    /// Current workflow state
    pub fn workflow_state(&self) -> WorkflowState {
        self.inner.state.lock().workflow_state
    }

    /// Whether a finished job is waiting for the machine to report idle
    pub fn job_finished(&self) -> bool {
        self.inner.state.lock().job_finished
    }

    /// Props from the last update pass
    pub fn props(&self) -> ToolbarProps {
        self.inner.state.lock().props.clone()
    }

    /// Enabled flags for the four buttons
    pub fn buttons(&self) -> ButtonStates {
        let state = self.inner.state.lock();
        ButtonStates::compute(
            state.props.has_port(),
            state.props.ready,
            state.workflow_state,
        )
    }
}

impl Drop for Toolbar {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.inner.bus.unsubscribe(id);
        }
        if let Some(handle) = self.listener.take() {
            self.inner.controller.remove_listener(&handle);
        }
        tracing::debug!("Toolbar unmounted");
    }
}

impl std::fmt::Debug for Toolbar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Toolbar")
            .field("workflow_state", &state.workflow_state)
            .field("job_finished", &state.job_finished)
            .field("props", &state.props)
            .finish()
    }
}
