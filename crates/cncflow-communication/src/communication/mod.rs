//! Job command plumbing
//!
//! Commands issued by a controller client travel to the transport task as
//! [`JobCommand`] values.

pub mod channel;

use serde::{Deserialize, Serialize};

/// A job command handed to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobCommand {
    /// Start streaming the loaded job
    Start,
    /// Resume a paused job
    Resume,
    /// Pause the running job
    Pause,
    /// Stop streaming
    Stop,
    /// Unload the loaded job
    Unload,
}

impl JobCommand {
    /// GRBL realtime byte for commands that map to one (`!` feed hold, `~` cycle start).
    pub fn realtime_byte(&self) -> Option<u8> {
        match self {
            JobCommand::Pause => Some(b'!'),
            JobCommand::Resume => Some(b'~'),
            JobCommand::Start | JobCommand::Stop | JobCommand::Unload => None,
        }
    }
}

impl std::fmt::Display for JobCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobCommand::Start => write!(f, "start"),
            JobCommand::Resume => write!(f, "resume"),
            JobCommand::Pause => write!(f, "pause"),
            JobCommand::Stop => write!(f, "stop"),
            JobCommand::Unload => write!(f, "unload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_bytes() {
        assert_eq!(JobCommand::Pause.realtime_byte(), Some(b'!'));
        assert_eq!(JobCommand::Resume.realtime_byte(), Some(b'~'));
        assert_eq!(JobCommand::Start.realtime_byte(), None);
        assert_eq!(JobCommand::Unload.to_string(), "unload");
    }
}
