//! Line-oriented console driving the job toolbar
//!
//! Each input line is one command. Connection commands update the toolbar
//! props and notify the controller; button commands press toolbar buttons
//! only while they are enabled. Prop changes are announced on the bus as
//! connection and machine events.

use anyhow::{bail, Context};
use cncflow_communication::ChannelController;
use cncflow_core::{
    AppEvent, ConnectionEvent, ControllerEvent, ControllerState, EventBus, JobProgress,
    MachineEvent, WorkflowEvent, WorkflowState,
};
use cncflow_devicedb::RecordStore;
use cncflow_ui::{Toolbar, ToolbarButton, ToolbarProps};
use std::sync::Arc;

/// Help text listing the console commands
pub const HELP: &str = "\
commands:
  connect <port>        open a connection on <port>
  disconnect            drop the connection
  ready <true|false>    mark the device ready or busy
  state <state>         report the machine state (Idle, Run, Hold, ...)
  progress <done> <of>  report job progress
  run | pause | stop | close
  override <idle|running|paused>
  machines              list machine records
  events                show recent bus events
  status                show workflow state and buttons
  help
  quit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Connect(String),
    Disconnect,
    Ready(bool),
    State(ControllerState),
    Progress(JobProgress),
    Press(ToolbarButton),
    Override(WorkflowState),
    Machines,
    Events,
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let arg = |index: usize| {
            args.get(index)
                .copied()
                .with_context(|| format!("'{}' needs an argument", verb))
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "connect" => Self::Connect(arg(0)?.to_string()),
            "disconnect" => Self::Disconnect,
            "ready" => Self::Ready(arg(0)?.parse().context("expected true or false")?),
            "state" => Self::State(arg(0)?.parse().map_err(anyhow::Error::msg)?),
            "progress" => {
                let executed = arg(0)?.parse().context("executed must be a count")?;
                let total = arg(1)?.parse().context("total must be a count")?;
                Self::Progress(JobProgress::new(executed, total))
            }
            "run" => Self::Press(ToolbarButton::Run),
            "pause" => Self::Press(ToolbarButton::Pause),
            "stop" => Self::Press(ToolbarButton::Stop),
            "close" => Self::Press(ToolbarButton::Close),
            "override" => Self::Override(arg(0)?.parse().map_err(anyhow::Error::msg)?),
            "machines" => Self::Machines,
            "events" => Self::Events,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{}'", other),
        };
        Ok(Some(command))
    }
}

/// Toolbar plus the connection props the console simulates
pub struct Console {
    bus: Arc<EventBus>,
    controller: Arc<ChannelController>,
    records: Arc<RecordStore>,
    toolbar: Toolbar,
    props: ToolbarProps,
}

impl Console {
    pub fn new(
        bus: Arc<EventBus>,
        controller: Arc<ChannelController>,
        records: Arc<RecordStore>,
    ) -> Self {
        let toolbar = Toolbar::mount(bus.clone(), controller.clone());
        Self {
            bus,
            controller,
            records,
            toolbar,
            props: ToolbarProps::default(),
        }
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Run a command and return the reply to print
    pub fn execute(&mut self, command: ConsoleCommand) -> anyhow::Result<String> {
        match command {
            ConsoleCommand::Connect(port) => {
                self.controller
                    .notify(ControllerEvent::Connected(port.clone()));
                self.set_props(ToolbarProps::connected(port, ControllerState::Idle));
            }
            ConsoleCommand::Disconnect => {
                self.controller.notify(ControllerEvent::Disconnected);
                self.set_props(ToolbarProps::default());
            }
            ConsoleCommand::Ready(ready) => {
                self.set_props(ToolbarProps {
                    ready,
                    ..self.props.clone()
                });
            }
            ConsoleCommand::State(state) => {
                self.controller.notify(ControllerEvent::StateChanged(state));
                self.set_props(ToolbarProps {
                    active_state: state,
                    ..self.props.clone()
                });
            }
            ConsoleCommand::Progress(progress) => {
                self.controller
                    .notify(ControllerEvent::JobStatusChanged(progress));
            }
            ConsoleCommand::Press(button) => {
                if !self.toolbar.buttons().is_enabled(button) {
                    bail!("{} is disabled", button);
                }
                self.toolbar.press(button)?;
            }
            ConsoleCommand::Override(state) => {
                // The mounted toolbar subscribes to workflow events, so delivery
                // only fails once the bus has no handlers at all.
                self.announce(AppEvent::Workflow(WorkflowEvent::SetState(state)));
            }
            ConsoleCommand::Machines => return Ok(self.machines()),
            ConsoleCommand::Events => return Ok(self.events()),
            ConsoleCommand::Help => return Ok(HELP.to_string()),
            ConsoleCommand::Status | ConsoleCommand::Quit => {}
        }
        Ok(self.status())
    }

    /// Hand new props to the toolbar and announce what changed
    fn set_props(&mut self, props: ToolbarProps) {
        let old = std::mem::replace(&mut self.props, props);
        self.toolbar.update_props(self.props.clone());

        if old.port != self.props.port {
            if let Some(port) = old.port {
                self.announce(AppEvent::Connection(ConnectionEvent::Disconnected { port }));
            }
            if let Some(port) = self.props.port.clone() {
                self.announce(AppEvent::Connection(ConnectionEvent::Connected { port }));
            }
        }
        if old.ready != self.props.ready {
            self.announce(AppEvent::Connection(ConnectionEvent::ReadyChanged {
                ready: self.props.ready,
            }));
        }
        if old.active_state != self.props.active_state {
            self.announce(AppEvent::Machine(MachineEvent::StateChanged {
                old: old.active_state,
                new: self.props.active_state,
            }));
        }
    }

    fn announce(&self, event: AppEvent) {
        if let Err(e) = self.bus.publish(event.clone()) {
            tracing::debug!("{} not delivered: {}", event.description(), e);
        }
    }

    /// One-line summary of the workflow and enabled buttons
    pub fn status(&self) -> String {
        let buttons = self.toolbar.buttons();
        let enabled: Vec<&str> = ToolbarButton::ALL
            .iter()
            .filter(|b| buttons.is_enabled(**b))
            .map(|b| b.label())
            .collect();
        format!(
            "workflow={} port={} ready={} machine={} finished={} enabled=[{}]",
            self.toolbar.workflow_state(),
            self.props.port.as_deref().unwrap_or("-"),
            self.props.ready,
            self.props.active_state,
            self.toolbar.job_finished(),
            enabled.join(", ")
        )
    }

    fn events(&self) -> String {
        if !self.bus.config().enable_history {
            return "event history is disabled".to_string();
        }
        let events = self.bus.history(None);
        if events.is_empty() {
            return "no events".to_string();
        }
        events
            .iter()
            .map(|event| format!("[{}] {}", event.category(), event.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn machines(&self) -> String {
        let machines = self.records.machines();
        if machines.is_empty() {
            return "no machines".to_string();
        }
        machines
            .iter()
            .map(|m| {
                format!(
                    "{} {} [{}] x {}..{} y {}..{} z {}..{}",
                    m.id,
                    m.name,
                    if m.enabled { "on" } else { "off" },
                    m.limits.xmin,
                    m.limits.xmax,
                    m.limits.ymin,
                    m.limits.ymax,
                    m.limits.zmin,
                    m.limits.zmax
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> (Console, tokio::sync::mpsc::Receiver<cncflow_communication::JobCommand>) {
        let bus = Arc::new(EventBus::new());
        let (controller, commands) = ChannelController::new("console", 16);
        let console = Console::new(bus, Arc::new(controller), Arc::new(RecordStore::new()));
        (console, commands)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ConsoleCommand::parse("connect /dev/ttyUSB0").unwrap(),
            Some(ConsoleCommand::Connect("/dev/ttyUSB0".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse("state Hold:0").unwrap(),
            Some(ConsoleCommand::State(ControllerState::Hold))
        );
        assert_eq!(
            ConsoleCommand::parse("progress 3 10").unwrap(),
            Some(ConsoleCommand::Progress(JobProgress::new(3, 10)))
        );
        assert_eq!(
            ConsoleCommand::parse("OVERRIDE paused").unwrap(),
            Some(ConsoleCommand::Override(WorkflowState::Paused))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(ConsoleCommand::parse("connect").is_err());
        assert!(ConsoleCommand::parse("ready maybe").is_err());
        assert!(ConsoleCommand::parse("progress 1").is_err());
        assert!(ConsoleCommand::parse("jog x10").is_err());
    }

    #[test]
    fn test_disabled_button_is_refused() {
        let (mut console, mut commands) = console();
        assert!(console
            .execute(ConsoleCommand::Press(ToolbarButton::Run))
            .is_err());
        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_prop_changes_are_announced() {
        use cncflow_core::{EventCategory, EventFilter};
        use std::sync::Mutex;

        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Connection, EventCategory::Machine]),
            move |event| sink.lock().unwrap().push(event),
        );
        let (controller, _commands) = ChannelController::new("console", 16);
        let mut console = Console::new(bus, Arc::new(controller), Arc::new(RecordStore::new()));

        console
            .execute(ConsoleCommand::Connect("/dev/ttyUSB0".to_string()))
            .unwrap();
        console.execute(ConsoleCommand::Ready(true)).unwrap();
        console
            .execute(ConsoleCommand::State(ControllerState::Run))
            .unwrap();
        console.execute(ConsoleCommand::Ready(false)).unwrap();
        console.execute(ConsoleCommand::Disconnect).unwrap();

        let port = "/dev/ttyUSB0".to_string();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                AppEvent::Connection(ConnectionEvent::Connected { port: port.clone() }),
                AppEvent::Connection(ConnectionEvent::ReadyChanged { ready: true }),
                AppEvent::Machine(MachineEvent::StateChanged {
                    old: ControllerState::Disconnected,
                    new: ControllerState::Idle,
                }),
                AppEvent::Machine(MachineEvent::StateChanged {
                    old: ControllerState::Idle,
                    new: ControllerState::Run,
                }),
                AppEvent::Connection(ConnectionEvent::ReadyChanged { ready: false }),
                AppEvent::Connection(ConnectionEvent::Disconnected { port }),
                AppEvent::Machine(MachineEvent::StateChanged {
                    old: ControllerState::Run,
                    new: ControllerState::Disconnected,
                }),
            ]
        );
    }

    #[test]
    fn test_events_lists_history() {
        use cncflow_core::EventBusConfig;

        let bus = Arc::new(EventBus::with_config(EventBusConfig {
            enable_history: true,
            ..Default::default()
        }));
        let (controller, _commands) = ChannelController::new("console", 16);
        let mut console = Console::new(bus, Arc::new(controller), Arc::new(RecordStore::new()));
        console.execute(ConsoleCommand::Ready(true)).unwrap();

        assert_eq!(
            console.execute(ConsoleCommand::Events).unwrap(),
            "[Connection] Ready: yes"
        );

        let (mut quiet, _rx) = self::console();
        assert_eq!(
            quiet.execute(ConsoleCommand::Events).unwrap(),
            "event history is disabled"
        );
    }

    #[test]
    fn test_override_reaches_toolbar() {
        let (mut console, mut commands) = console();
        let reply = console
            .execute(ConsoleCommand::Override(WorkflowState::Paused))
            .unwrap();
        assert!(reply.starts_with("workflow=Paused"));
        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_job_runs_to_completion() {
        let (mut console, mut commands) = console();
        console
            .execute(ConsoleCommand::Connect("/dev/ttyUSB0".to_string()))
            .unwrap();
        console
            .execute(ConsoleCommand::Press(ToolbarButton::Run))
            .unwrap();
        console
            .execute(ConsoleCommand::State(ControllerState::Run))
            .unwrap();
        console
            .execute(ConsoleCommand::Progress(JobProgress::new(5, 5)))
            .unwrap();
        let reply = console
            .execute(ConsoleCommand::State(ControllerState::Idle))
            .unwrap();

        assert!(reply.starts_with("workflow=Idle"));
        assert_eq!(
            commands.try_recv().unwrap(),
            cncflow_communication::JobCommand::Start
        );
        assert_eq!(
            commands.try_recv().unwrap(),
            cncflow_communication::JobCommand::Stop
        );
        assert!(commands.try_recv().is_err());
    }
}
