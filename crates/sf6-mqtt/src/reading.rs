use std::{num::ParseFloatError, str::Utf8Error};

use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("payload is not valid UTF-8: {0}")]
    NotUtf8(#[from] Utf8Error),
    #[error("could not convert '{payload}' to a number: {source}")]
    NotANumber {
        payload: String,
        source: ParseFloatError,
    },
    #[error("'{0}' is not a finite number")]
    NotFinite(String),
}

/// A single pressure value in bar, stamped with the local time it was received
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub value: f64,
}

impl Reading {
    #[must_use]
    pub fn now(value: f64) -> Self {
        Self {
            timestamp: Local::now(),
            value,
        }
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, ReadingError> {
        parse_payload(payload).map(Self::now)
    }

    /// Nanoseconds since the unix epoch, the unit used on the plot x-axis
    pub fn timestamp_nanos(&self) -> f64 {
        self.timestamp.timestamp_nanos_opt().unwrap_or_default() as f64
    }
}

/// Decode a payload as UTF-8 text holding a single decimal number.
///
/// Surrounding whitespace is ignored. `NaN` and infinities are rejected.
pub fn parse_payload(payload: &[u8]) -> Result<f64, ReadingError> {
    let text = std::str::from_utf8(payload)?.trim();
    let value: f64 = text.parse().map_err(|source| ReadingError::NotANumber {
        payload: text.to_owned(),
        source,
    })?;
    if !value.is_finite() {
        return Err(ReadingError::NotFinite(text.to_owned()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn test_parse_plain_number() -> TestResult {
        assert_eq!(parse_payload(b"5.2")?, 5.2);
        assert_eq!(parse_payload(b"0")?, 0.0);
        assert_eq!(parse_payload(b"-1.5e1")?, -15.0);
        Ok(())
    }

    #[test]
    fn test_parse_trims_whitespace() -> TestResult {
        assert_eq!(parse_payload(b"  7.75\r\n")?, 7.75);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_text() {
        let err = parse_payload(b"abc").expect_err("not a number");
        assert!(matches!(err, ReadingError::NotANumber { ref payload, .. } if payload == "abc"));
        assert!(err.to_string().starts_with("could not convert 'abc'"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            parse_payload(b"   "),
            Err(ReadingError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        assert!(matches!(
            parse_payload(&[0xff, 0xfe, b'1']),
            Err(ReadingError::NotUtf8(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        for payload in [&b"NaN"[..], b"inf", b"-infinity"] {
            assert!(matches!(
                parse_payload(payload),
                Err(ReadingError::NotFinite(_))
            ));
        }
    }

    #[test]
    fn test_reading_timestamp_nanos() -> TestResult {
        let reading = Reading::from_payload(b"4.2")?;
        assert_eq!(reading.value, 4.2);
        let expected = reading.timestamp.timestamp_millis() as f64 * 1e6;
        assert!((reading.timestamp_nanos() - expected).abs() < 1e6);
        Ok(())
    }
}
