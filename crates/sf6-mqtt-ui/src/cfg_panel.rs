use std::path::PathBuf;

use egui::{RichText, TextEdit, Ui};
use serde::{Deserialize, Serialize};
use sf6_csv::CsvSinkConfig;
use sf6_mqtt::BrokerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Connect,
    Disconnect,
}

/// Broker and CSV settings as edited in the side panel
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPanel {
    pub broker: BrokerConfig,
    pub csv: CsvSinkConfig,
}

impl ConfigPanel {
    pub fn new(broker: BrokerConfig, csv: CsvSinkConfig) -> Self {
        Self { broker, csv }
    }

    /// Render the form. `worker_active` switches the connect button to "Reconnect" and enables "Disconnect".
    pub fn ui(&mut self, ui: &mut Ui, worker_active: bool) -> Option<PanelAction> {
        show_broker_group(ui, &mut self.broker);
        ui.add_space(6.0);
        show_csv_group(ui, &mut self.csv);
        ui.add_space(6.0);

        let mut action = None;
        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            let connect_label = if worker_active { "Reconnect" } else { "Connect" };
            if ui
                .add(
                    egui::Button::new(RichText::new(connect_label).strong())
                        .min_size([120.0, 30.0].into()),
                )
                .clicked()
            {
                action = Some(PanelAction::Connect);
            }
            if ui
                .add_enabled(worker_active, egui::Button::new("Disconnect"))
                .clicked()
            {
                action = Some(PanelAction::Disconnect);
            }
        });
        action
    }
}

fn show_broker_group(ui: &mut Ui, broker: &mut BrokerConfig) {
    ui.group(|ui| {
        ui.label("MQTT Broker Address");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut broker.broker)
                .on_hover_text("Hostname or IP address");
            ui.label(":");
            ui.add(egui::DragValue::new(&mut broker.port).range(1..=u16::MAX))
                .on_hover_text("8883 is the default MQTT over TLS port");
        });

        ui.label("Topic");
        ui.text_edit_singleline(&mut broker.topic);

        ui.label("Username");
        ui.text_edit_singleline(&mut broker.username);
        ui.label("Password");
        ui.add(TextEdit::singleline(&mut broker.password).password(true));

        ui.checkbox(&mut broker.use_tls, "Use TLS");
        ui.add_enabled_ui(broker.use_tls, |ui| {
            ui.label("CA certificate");
            path_edit(ui, &mut broker.ca_cert);
        });
    });
}

fn show_csv_group(ui: &mut Ui, csv: &mut CsvSinkConfig) {
    ui.group(|ui| {
        ui.checkbox(&mut csv.enabled, "Log readings to CSV");
        ui.add_enabled_ui(csv.enabled, |ui| {
            egui::Grid::new("csv_settings")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Zone");
                    ui.text_edit_singleline(&mut csv.zone);
                    ui.end_row();
                    ui.label("Sensor");
                    ui.text_edit_singleline(&mut csv.sensor);
                    ui.end_row();
                    ui.label("Directory");
                    path_edit(ui, &mut csv.directory);
                    ui.end_row();
                });
        });
    });
}

fn path_edit(ui: &mut Ui, path: &mut PathBuf) {
    let mut text = path.display().to_string();
    if ui.text_edit_singleline(&mut text).changed() {
        *path = PathBuf::from(text);
    }
}
