//! egui side of the SF6 monitor
pub mod cfg_panel;
pub mod connection;
pub mod data_receiver;
pub mod gauge;
pub mod monitor_state;
pub mod plot;
pub mod status;
mod x_axis_formatter;

pub use crate::{
    cfg_panel::{ConfigPanel, PanelAction},
    connection::MqttConnection,
    gauge::Gauge,
    monitor_state::{LogBuffer, MonitorState},
};
