use crate::reading::Reading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// The last connection attempt or the established connection ended with an error
    Failed,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

/// A line destined for the on-screen log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: log::Level,
    pub text: String,
}

impl LogLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: log::Level::Info,
            text: text.into(),
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            level: log::Level::Warn,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: log::Level::Error,
            text: text.into(),
        }
    }
}

/// Everything the listener thread reports back to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum MqttMessage {
    ConnectionState(ConnectionState),
    Reading(Reading),
    Log(LogLine),
}
