use egui::{Color32, RichText, TextEdit, Ui};
use sf6_mqtt::ConnectionState;

use crate::monitor_state::{LOG_DISPLAY_LINES, LogBuffer};

/// Text and colour of the connection banner
pub fn banner(state: ConnectionState) -> (&'static str, Color32) {
    match state {
        ConnectionState::Connected => ("Connected to MQTT broker", Color32::GREEN),
        ConnectionState::Failed => ("Not connected (last attempt failed)", Color32::ORANGE),
        ConnectionState::Disconnected | ConnectionState::Connecting => {
            ("Not connected", Color32::ORANGE)
        }
    }
}

pub fn show_connection_banner(ui: &mut Ui, state: ConnectionState) {
    let (text, color) = banner(state);
    ui.horizontal(|ui| {
        ui.colored_label(color, RichText::new(text).strong());
        if state == ConnectionState::Connecting {
            ui.spinner();
        }
    });
}

pub fn show_log(ui: &mut Ui, log: &LogBuffer) {
    let text = log.tail_text(LOG_DISPLAY_LINES);
    let mut text = text.as_str();
    ui.label("Debug log");
    egui::ScrollArea::vertical()
        .max_height(200.0)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add(
                TextEdit::multiline(&mut text)
                    .font(egui::TextStyle::Monospace)
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );
        });
}
