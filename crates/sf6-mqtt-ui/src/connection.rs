use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use sf6_csv::CsvSinkConfig;
use sf6_mqtt::{BrokerConfig, ConnectionState, LogLine};

use crate::{
    data_receiver::{MqttDataReceiver, spawn_mqtt_listener},
    monitor_state::MonitorState,
};

/// Owns the active listener, if any, and the state it feeds
#[derive(Default)]
pub struct MqttConnection {
    receiver: Option<MqttDataReceiver>,
    stop_flag: Arc<AtomicBool>,
    state: MonitorState,
    workers_spawned: usize,
    /// Auto scale the history plot once there is data to scale to
    set_auto_bounds: bool,
}

impl MqttConnection {
    /// Replace the current listener with a new one started from a snapshot of `broker`
    pub fn connect(&mut self, broker: &BrokerConfig, csv: &CsvSinkConfig) {
        if let Err(e) = broker.validate() {
            self.state
                .log(LogLine::error(format!("Invalid configuration: {e}")));
            return;
        }
        self.stop_listener();

        let stop_flag = Arc::new(AtomicBool::new(false));
        match spawn_mqtt_listener(&stop_flag, broker.clone(), csv.sink()) {
            Ok(receiver) => {
                self.receiver = Some(receiver);
                self.stop_flag = stop_flag;
                self.workers_spawned += 1;
                self.set_auto_bounds = true;
                self.state.set_connection(ConnectionState::Connecting);
                self.state.log(LogLine::info("MQTT thread started"));
            }
            Err(e) => {
                self.state.set_connection(ConnectionState::Failed);
                self.state
                    .log(LogLine::error(format!("Failed to start MQTT thread: {e}")));
            }
        }
    }

    pub fn disconnect(&mut self) {
        if self.stop_listener() {
            self.state.log(LogLine::info("MQTT thread stopped"));
        }
        self.state.set_connection(ConnectionState::Disconnected);
    }

    /// Signal the listener to stop and stop receiving from it. Returns true if there was one.
    fn stop_listener(&mut self) -> bool {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.receiver.take().is_some()
    }

    pub fn poll(&mut self) {
        if let Some(receiver) = &mut self.receiver {
            receiver.poll(&mut self.state);
        }
    }

    /// Returns true while a listener thread is running
    pub fn listener_active(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| !r.finished())
    }

    /// Number of listener threads started over the lifetime of this connection
    pub fn workers_spawned(&self) -> usize {
        self.workers_spawned
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn clear_history(&mut self) {
        self.state.clear_history();
        self.set_auto_bounds = true;
    }

    /// Returns true if we're listening but have yet to receive enough data to display a plot
    fn waiting_for_initial_data(&self) -> bool {
        self.listener_active() && self.state.history().len() < 2
    }

    pub fn show_history_plot(&mut self, ui: &mut egui::Ui) {
        crate::plot::show_history_plot(ui, self.state.history(), &mut self.set_auto_bounds);
    }

    pub fn show_waiting_for_initial_data(&self, ui: &mut egui::Ui) {
        if self.waiting_for_initial_data()
            && let Some(receiver) = &self.receiver
        {
            ui.add_space(20.);
            ui.vertical_centered_justified(|ui| {
                ui.heading(format!(
                    "Waiting for 2 data points on {}",
                    receiver.subscribed_topic()
                ));
                ui.spinner();
            });
        }
    }
}

impl Drop for MqttConnection {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unreachable_broker() -> BrokerConfig {
        BrokerConfig {
            broker: "127.0.0.1".to_owned(),
            port: 1,
            use_tls: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_spawns_nothing() {
        let mut conn = MqttConnection::default();
        let broker = BrokerConfig {
            broker: String::new(),
            ..Default::default()
        };
        conn.connect(&broker, &CsvSinkConfig::default());

        assert_eq!(conn.workers_spawned(), 0);
        assert!(!conn.listener_active());
        assert_eq!(conn.state().log_buffer().len(), 1);
        assert!(
            conn.state()
                .log_buffer()
                .tail_text(1)
                .ends_with("Invalid configuration: Broker address is empty")
        );
    }

    #[test]
    fn test_reconnect_replaces_listener() {
        let mut conn = MqttConnection::default();
        let broker = unreachable_broker();
        conn.connect(&broker, &CsvSinkConfig::default());
        let first_flag = Arc::clone(&conn.stop_flag);
        conn.connect(&broker, &CsvSinkConfig::default());

        assert_eq!(conn.workers_spawned(), 2);
        assert!(first_flag.load(Ordering::SeqCst));
        assert!(!conn.stop_flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_disconnect_stops_listener() {
        let mut conn = MqttConnection::default();
        conn.connect(&unreachable_broker(), &CsvSinkConfig::default());
        let flag = Arc::clone(&conn.stop_flag);
        conn.disconnect();

        assert!(flag.load(Ordering::SeqCst));
        assert!(!conn.listener_active());
        assert_eq!(conn.state().connection(), ConnectionState::Disconnected);
        assert!(
            conn.state()
                .log_buffer()
                .tail_text(1)
                .ends_with("MQTT thread stopped")
        );
    }
}
