use std::{
    fs::OpenOptions,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// First line of every CSV file
pub const HEADER: &str = "timestamp,value";

const FILE_DATE_FORMAT: &str = "%d-%m-%Y";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum CsvSinkError {
    #[error("Failed to open '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed to write to '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Appends readings to `<zone>_<sensor>_<DD-MM-YYYY>.csv` files in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSink {
    directory: PathBuf,
    zone: String,
    sensor: String,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>, zone: &str, sensor: &str) -> Self {
        Self {
            directory: directory.into(),
            zone: sanitize_name_part(zone),
            sensor: sanitize_name_part(sensor),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Name of the file that readings taken on `date` are written to
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "{zone}_{sensor}_{date}.csv",
            zone = self.zone,
            sensor = self.sensor,
            date = date.format(FILE_DATE_FORMAT)
        )
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(self.file_name(date))
    }

    /// Append a single `timestamp,value` line, writing the header first if the file is new or empty.
    ///
    /// The file is picked from the local calendar day of `timestamp`. Returns the path that was written.
    pub fn append<Tz: TimeZone>(
        &self,
        timestamp: &DateTime<Tz>,
        value: f64,
    ) -> Result<PathBuf, CsvSinkError> {
        let local = timestamp.with_timezone(&Local);
        let path = self.path_for(local.date_naive());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| CsvSinkError::Open {
                path: path.clone(),
                source,
            })?;

        let is_empty = file
            .metadata()
            .map_err(|source| CsvSinkError::Open {
                path: path.clone(),
                source,
            })?
            .len()
            == 0;

        let mut lines = String::new();
        if is_empty {
            log::info!("Creating CSV log {}", path.display());
            lines.push_str(HEADER);
            lines.push('\n');
        }
        lines.push_str(&format_line(&local, value));

        file.write_all(lines.as_bytes())
            .map_err(|source| CsvSinkError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

fn format_line(timestamp: &DateTime<Local>, value: f64) -> String {
    format!("{},{value}\n", timestamp.format(TIMESTAMP_FORMAT))
}

/// Zone and sensor names end up in a file name, so they may not contain path separators
fn sanitize_name_part(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect()
}
