use anyhow::Context;
use cncflow::console::HELP;
use cncflow::{init_logging, ChannelController, Config, Console, ConsoleCommand, EventBus, RecordStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_logging(&config.logging.level)?;
    tracing::info!(
        "CNCFlow {} (built {}) using {}",
        cncflow::VERSION,
        cncflow::BUILD_DATE,
        config_path.display()
    );

    let bus = Arc::new(EventBus::with_config(config.event_bus_config()));
    let records_path = config.records_path()?;
    let records = Arc::new(
        RecordStore::load_from_file(&records_path)
            .with_context(|| format!("Failed to load records from {}", records_path.display()))?
            .with_bus(bus.clone()),
    );

    let (controller, mut commands) = ChannelController::new("console", 64);
    let controller = Arc::new(controller);

    // Stand-in transport: commands are only logged
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            match command.realtime_byte() {
                Some(byte) => tracing::info!("-> {} (realtime 0x{:02x})", command, byte),
                None => tracing::info!("-> {}", command),
            }
        }
        tracing::debug!("Transport closed");
    });

    let mut events = bus.receiver();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!("[{}] {}", event.category(), event.description()),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event log skipped {} events", skipped)
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut console = Console::new(bus, controller, records);
    println!("{}", HELP);
    println!("{}", console.status());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {:#}", e);
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        match console.execute(command) {
            Ok(reply) => println!("{}", reply),
            Err(e) => println!("error: {:#}", e),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
