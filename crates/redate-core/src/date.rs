use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{FileError, RestoreError};

/// Format iCloud Photos writes into `originalCreationDate`.
pub const ICLOUD_INPUT_FORMAT: &str = "%A %B %d,%Y %I:%M %p GMT";
/// Day-first form used when reporting the restored date.
pub const DISPLAY_OUTPUT_FORMAT: &str = "%d.%m.%Y %H:%M";

fn default_input() -> String {
    ICLOUD_INPUT_FORMAT.to_string()
}

fn default_output() -> String {
    DISPLAY_OUTPUT_FORMAT.to_string()
}

/// Parse pattern for recorded dates and render pattern for reports (chrono syntax).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormats {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

impl DateFormats {
    /// Reject patterns chrono cannot use. `render` panics on an invalid output pattern.
    pub fn validate(&self) -> Result<(), RestoreError> {
        for (kind, pattern) in [("input", &self.input), ("output", &self.output)] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(RestoreError::InvalidFormat {
                    kind,
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse a recorded `originalCreationDate` value.
/// chrono rejects a weekday name that disagrees with the date.
pub fn parse_recorded_date(raw: &str, formats: &DateFormats) -> Result<NaiveDateTime, FileError> {
    let value = raw.trim();
    NaiveDateTime::parse_from_str(value, &formats.input).map_err(|source| FileError::InvalidDate {
        value: value.to_string(),
        format: formats.input.clone(),
        source,
    })
}

pub fn render(dt: &NaiveDateTime, formats: &DateFormats) -> String {
    dt.format(&formats.output).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(raw: &str) -> Option<String> {
        let formats = DateFormats::default();
        parse_recorded_date(raw, &formats)
            .ok()
            .map(|dt| render(&dt, &formats))
    }

    #[test]
    fn test_icloud_dates() {
        assert_eq!(
            convert("Monday January 02,2023 03:04 PM GMT").as_deref(),
            Some("02.01.2023 15:04")
        );
        assert_eq!(
            convert("Sunday June 11,2023 09:15 AM GMT").as_deref(),
            Some("11.06.2023 09:15")
        );
        assert_eq!(
            convert("Saturday December 31,2022 12:00 AM GMT").as_deref(),
            Some("31.12.2022 00:00")
        );
        assert_eq!(
            convert("  Saturday December 31,2022 12:30 PM GMT\n").as_deref(),
            Some("31.12.2022 12:30")
        );
    }

    #[test]
    fn test_malformed_dates() {
        assert!(convert("not a date").is_none());
        assert!(convert("").is_none());
        // 2023-01-02 was a Monday
        assert!(convert("Tuesday January 02,2023 03:04 PM GMT").is_none());
        assert!(convert("Monday January 02,2023 03:04 PM").is_none());
        assert!(convert("Monday January 32,2023 03:04 PM GMT").is_none());
        assert!(convert("2023-01-02 15:04").is_none());
    }

    #[test]
    fn test_custom_formats() {
        let formats = DateFormats {
            input: "%Y-%m-%d %H:%M:%S".to_string(),
            output: "%Y/%m/%d".to_string(),
        };
        let dt = parse_recorded_date("2019-09-19 05:38:57", &formats).unwrap();
        assert_eq!(render(&dt, &formats), "2019/09/19");
    }

    #[test]
    fn test_validate_formats() {
        assert!(DateFormats::default().validate().is_ok());

        let bad_output = DateFormats {
            output: "%d.%m.%Y %Q".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_output.validate(),
            Err(RestoreError::InvalidFormat { kind: "output", .. })
        ));

        let trailing = DateFormats {
            input: "%Y-%m-%d %".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            trailing.validate(),
            Err(RestoreError::InvalidFormat { kind: "input", .. })
        ));
    }

    #[test]
    fn test_invalid_date_error_names_value() {
        let err = parse_recorded_date("yesterday", &DateFormats::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains(ICLOUD_INPUT_FORMAT));
    }
}
