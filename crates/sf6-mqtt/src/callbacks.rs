use std::sync::mpsc::Sender;

use sf6_csv::CsvSink;

use crate::{
    message::{ConnectionState, LogLine, MqttMessage},
    reading::Reading,
};

/// Why the listener stopped talking to the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectCause {
    /// The UI asked the listener to stop
    Requested,
    /// The broker closed the connection
    Broker,
    /// Setup, connect or transport error
    Error,
}

impl From<DisconnectCause> for ConnectionState {
    fn from(cause: DisconnectCause) -> Self {
        match cause {
            DisconnectCause::Requested | DisconnectCause::Broker => Self::Disconnected,
            DisconnectCause::Error => Self::Failed,
        }
    }
}

/// Hooks invoked by the listener thread.
///
/// Returning an error stops the listener, e.g. when nobody is receiving anymore.
pub trait MqttCallbacks: Send {
    fn on_connect(&mut self) -> anyhow::Result<()>;
    fn on_message(&mut self, topic: &str, payload: &[u8]) -> anyhow::Result<()>;
    fn on_disconnect(&mut self, cause: DisconnectCause) -> anyhow::Result<()>;
    fn log(&mut self, line: LogLine) -> anyhow::Result<()>;
}

/// Forwards everything to the UI over a channel, and appends valid readings to the CSV sink if one is configured
pub struct ChannelCallbacks {
    tx: Sender<MqttMessage>,
    csv: Option<CsvSink>,
}

impl ChannelCallbacks {
    pub fn new(tx: Sender<MqttMessage>, csv: Option<CsvSink>) -> Self {
        Self { tx, csv }
    }

    fn send(&self, msg: MqttMessage) -> anyhow::Result<()> {
        self.tx.send(msg)?;
        Ok(())
    }
}

impl MqttCallbacks for ChannelCallbacks {
    fn on_connect(&mut self) -> anyhow::Result<()> {
        self.send(MqttMessage::ConnectionState(ConnectionState::Connected))
    }

    fn on_message(&mut self, topic: &str, payload: &[u8]) -> anyhow::Result<()> {
        log::debug!(
            "Received on topic={topic}, payload={}",
            String::from_utf8_lossy(payload)
        );
        let reading = match Reading::from_payload(payload) {
            Ok(reading) => reading,
            Err(e) => return self.log(LogLine::warn(format!("Error parsing message: {e}"))),
        };

        if let Some(csv) = &self.csv
            && let Err(e) = csv.append(&reading.timestamp, reading.value)
        {
            log::warn!("CSV logging failed: {e}");
        }

        self.send(MqttMessage::Reading(reading))
    }

    fn on_disconnect(&mut self, cause: DisconnectCause) -> anyhow::Result<()> {
        log::info!("MQTT listener stopped: {cause:?}");
        self.send(MqttMessage::ConnectionState(cause.into()))
    }

    fn log(&mut self, line: LogLine) -> anyhow::Result<()> {
        log::log!(line.level, "{}", line.text);
        self.send(MqttMessage::Log(line))
    }
}
