//! Append-only CSV logging of pressure readings.
//!
//! One file is kept per zone, sensor and calendar day, named
//! `<zone>_<sensor>_<DD-MM-YYYY>.csv`. Every file starts with a single
//! `timestamp,value` header line followed by one line per reading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod sink;

pub use sink::{CsvSink, CsvSinkError, HEADER};

/// User facing settings for the CSV sink, persisted with the rest of the app state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSinkConfig {
    pub enabled: bool,
    pub zone: String,
    pub sensor: String,
    pub directory: PathBuf,
}

impl Default for CsvSinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            zone: "zone1".to_owned(),
            sensor: "sensor1".to_owned(),
            directory: PathBuf::from("."),
        }
    }
}

impl CsvSinkConfig {
    /// Returns a [`CsvSink`] if CSV logging is enabled
    pub fn sink(&self) -> Option<CsvSink> {
        self.enabled
            .then(|| CsvSink::new(self.directory.clone(), &self.zone, &self.sensor))
    }
}
