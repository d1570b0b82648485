//! MQTT side of the SF6 monitor: broker settings, the listener thread and the messages it
//! sends back to the UI.

pub mod broker_config;
pub mod callbacks;
pub(crate) mod client;
pub mod message;
pub mod reading;
pub(crate) mod util;

pub use crate::{
    broker_config::{BrokerConfig, ConfigError, SetupError},
    callbacks::{ChannelCallbacks, DisconnectCause, MqttCallbacks},
    client::spawn_listener,
    message::{ConnectionState, LogLine, MqttMessage},
    reading::{Reading, ReadingError, parse_payload},
};
