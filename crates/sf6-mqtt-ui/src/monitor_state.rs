use std::collections::VecDeque;

use chrono::Local;
use egui_plot::PlotPoint;
use sf6_mqtt::{ConnectionState, LogLine, MqttMessage, Reading};

/// Maximum number of lines kept in the log buffer, older lines are dropped
pub const LOG_CAPACITY: usize = 1000;
/// Number of log lines shown in the UI
pub const LOG_DISPLAY_LINES: usize = 50;

/// Timestamped log lines shown in the debug panel
#[derive(Debug, Default, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
}

impl LogBuffer {
    pub fn push(&mut self, text: &str) {
        if self.lines.len() == LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("[{}] {text}", Local::now().format("%H:%M:%S")));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(n))
            .map(String::as_str)
    }

    /// The last `n` lines joined by newlines
    pub fn tail_text(&self, n: usize) -> String {
        self.tail(n).collect::<Vec<_>>().join("\n")
    }
}

/// Everything the dashboard displays, owned by the UI thread.
///
/// Only changed by applying messages from the listener thread or by UI side log lines.
#[derive(Debug, Default)]
pub struct MonitorState {
    connection: ConnectionState,
    latest_value: f64,
    history: Vec<PlotPoint>,
    log: LogBuffer,
}

impl MonitorState {
    pub fn apply(&mut self, msg: MqttMessage) {
        match msg {
            MqttMessage::ConnectionState(state) => self.connection = state,
            MqttMessage::Reading(reading) => self.apply_reading(&reading),
            // Already mirrored to the log facade by the listener
            MqttMessage::Log(line) => self.log.push(&line.text),
        }
    }

    fn apply_reading(&mut self, reading: &Reading) {
        self.latest_value = reading.value;
        self.history
            .push(PlotPoint::new(reading.timestamp_nanos(), reading.value));
        self.log
            .push(&format!("Message received: {}", reading.value));
    }

    /// Add a line originating from the UI thread
    pub fn log(&mut self, line: LogLine) {
        log::log!(line.level, "{}", line.text);
        self.log.push(&line.text);
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn latest_value(&self) -> f64 {
        self.latest_value
    }

    pub fn history(&self) -> &[PlotPoint] {
        &self.history
    }

    pub fn log_buffer(&self) -> &LogBuffer {
        &self.log
    }

    /// Drop all history points and reset the latest value, the log is kept
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.latest_value = 0.0;
    }
}
