use std::{io, path::PathBuf, time::Duration};

use rumqttc::{MqttOptions, Transport};
use serde::{Deserialize, Serialize};

/// Keep-alive interval sent to the broker on connect
pub const KEEP_ALIVE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Broker address is empty")]
    EmptyBroker,
    #[error("Topic is empty")]
    EmptyTopic,
    #[error("Port 0 is not a valid broker port")]
    InvalidPort,
    #[error("TLS is enabled but no CA certificate path is set")]
    MissingCaCert,
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read CA certificate '{}': {source}", .path.display())]
    CaCertificate { path: PathBuf, source: io::Error },
}

/// Everything needed to reach the broker and subscribe to the pressure topic.
///
/// The password is read from config files but never written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub broker: String,
    pub port: u16,
    pub topic: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub use_tls: bool,
    pub ca_cert: PathBuf,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            broker: "988df3573bd749bf8e37087a285287d0.s1.eu.hivemq.cloud".to_owned(),
            port: 8883,
            topic: "sf6/pressure".to_owned(),
            username: String::new(),
            password: String::new(),
            use_tls: true,
            ca_cert: PathBuf::from("baltimore.pem"),
        }
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.trim().is_empty() {
            return Err(ConfigError::EmptyBroker);
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.use_tls && self.ca_cert.as_os_str().is_empty() {
            return Err(ConfigError::MissingCaCert);
        }
        Ok(())
    }

    /// `host:port` as shown in the log
    pub fn address(&self) -> String {
        format!("{}:{}", self.broker.trim(), self.port)
    }

    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    /// Build the client options, reading the CA certificate from disk if TLS is enabled
    pub fn mqtt_options(&self, client_id: impl Into<String>) -> Result<MqttOptions, SetupError> {
        self.validate()?;

        let mut options = MqttOptions::new(client_id, self.broker.trim(), self.port);
        options.set_keep_alive(KEEP_ALIVE);

        if self.has_credentials() {
            options.set_credentials(self.username.clone(), self.password.clone());
        }

        if self.use_tls {
            let ca = std::fs::read(&self.ca_cert).map_err(|source| SetupError::CaCertificate {
                path: self.ca_cert.clone(),
                source,
            })?;
            options.set_transport(Transport::tls(ca, None, None));
        }

        Ok(options)
    }
}
