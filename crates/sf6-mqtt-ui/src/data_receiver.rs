use std::{
    io,
    sync::{
        Arc,
        atomic::AtomicBool,
        mpsc::{Receiver, TryRecvError},
    },
};

use sf6_csv::CsvSink;
use sf6_mqtt::{BrokerConfig, ChannelCallbacks, MqttMessage, spawn_listener};

use crate::monitor_state::MonitorState;

/// Start a listener thread for `config` and return the receiving end of its channel
pub fn spawn_mqtt_listener(
    stop_flag: &Arc<AtomicBool>,
    config: BrokerConfig,
    csv: Option<CsvSink>,
) -> io::Result<MqttDataReceiver> {
    let (tx, rx) = std::sync::mpsc::channel();
    let topic = config.topic().to_owned();
    spawn_listener(config, Arc::clone(stop_flag), ChannelCallbacks::new(tx, csv))?;
    Ok(MqttDataReceiver::new(rx, topic))
}

pub struct MqttDataReceiver {
    topic: String,
    recv: Receiver<MqttMessage>,
    finished: bool,
}

impl MqttDataReceiver {
    pub(crate) fn new(recv: Receiver<MqttMessage>, topic: String) -> Self {
        Self {
            topic,
            recv,
            finished: false,
        }
    }

    /// Apply every pending message to `state` without blocking
    pub fn poll(&mut self, state: &mut MonitorState) {
        loop {
            match self.recv.try_recv() {
                Ok(msg) => {
                    log::trace!("Got MQTT Message: {msg:?}");
                    state.apply(msg);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    break;
                }
            }
        }
    }

    /// Returns true once the listener thread has exited and all its messages are applied
    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn subscribed_topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sf6_mqtt::{ConnectionState, Reading};
    use std::sync::mpsc;

    #[test]
    fn test_poll_drains_and_detects_finished_listener() {
        let (tx, rx) = mpsc::channel();
        let mut receiver = MqttDataReceiver::new(rx, "sf6/pressure".to_owned());
        let mut state = MonitorState::default();

        tx.send(MqttMessage::ConnectionState(ConnectionState::Connected))
            .expect("receiver alive");
        tx.send(MqttMessage::Reading(Reading::now(4.5)))
            .expect("receiver alive");
        receiver.poll(&mut state);
        assert!(!receiver.finished());
        assert_eq!(state.latest_value(), 4.5);
        assert!(state.connection().is_connected());

        tx.send(MqttMessage::ConnectionState(ConnectionState::Failed))
            .expect("receiver alive");
        drop(tx);
        receiver.poll(&mut state);
        assert!(receiver.finished());
        assert_eq!(state.connection(), ConnectionState::Failed);
    }
}
