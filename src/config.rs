//! Optional `config.toml` with the initial broker and CSV settings.
//!
//! Only consulted when there is no persisted app state, plus as the source of the broker
//! password which is never persisted.

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sf6_csv::CsvSinkConfig;
use sf6_mqtt::BrokerConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub broker: BrokerConfig,
    pub csv: CsvSinkConfig,
}

impl ConfigFile {
    /// `<config_dir>/sf6-monitor/config.toml`, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the file at `path`, `Ok(None)` if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigFileError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        toml::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigFileError::Parse {
                path: path.to_owned(),
                source,
            })
    }

    /// Load from the default location, falling back to built-in defaults on any problem
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::debug!("No config directory on this platform, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(cfg)) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn test_missing_file_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        assert_eq!(ConfigFile::load_from(&dir.path().join(CONFIG_FILE_NAME))?, None);
        Ok(())
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[broker]
broker = "mqtt.example.com"
password = "secret"

[csv]
enabled = true
zone = "hall-3"
"#,
        )?;

        let cfg = ConfigFile::load_from(&path)?.ok_or("file should exist")?;
        assert_eq!(cfg.broker.broker, "mqtt.example.com");
        assert_eq!(cfg.broker.password, "secret");
        assert_eq!(cfg.broker.port, 8883);
        assert_eq!(cfg.broker.topic, "sf6/pressure");
        assert!(cfg.csv.enabled);
        assert_eq!(cfg.csv.zone, "hall-3");
        assert_eq!(cfg.csv.sensor, "sensor1");
        Ok(())
    }

    #[test]
    fn test_round_trip_without_password() -> TestResult {
        let mut cfg = ConfigFile::default();
        cfg.broker.topic = "site/a/sf6".to_owned();
        cfg.broker.password = "secret".to_owned();

        let serialized = toml::to_string(&cfg)?;
        assert!(!serialized.contains("secret"));

        let parsed: ConfigFile = toml::from_str(&serialized)?;
        cfg.broker.password.clear();
        assert_eq!(parsed, cfg);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_parse_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[broker\nport = 'x'")?;

        let err = ConfigFile::load_from(&path).expect_err("file is malformed");
        assert!(matches!(err, ConfigFileError::Parse { .. }));
        Ok(())
    }
}
