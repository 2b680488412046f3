//! Tabular export of weather records to CSV and XLSX.
//!
//! Records are first flattened into rows of typed [`Cell`]s with a fixed column layout
//! ([`rows::COLUMNS`]); the format encoders only decide how cells are written.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

use crate::{Error, Result, WeatherRecord};

pub mod delimited;
pub mod rows;
pub mod spreadsheet;

pub use rows::{COLUMNS, Cell};

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_MIME,
            ExportFormat::Xlsx => XLSX_MIME,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(Error::export(format!(
                "Unsupported export format '{value}'. Supported formats: csv, xlsx."
            ))),
        }
    }
}

/// Knobs for the export encoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width applied to every spreadsheet column, in character units.
    pub column_width: f64,
    /// Filename prefix; the calendar date and extension are appended.
    pub filename_prefix: String,
    /// Rendered in place of missing optional values.
    pub placeholder: String,
    /// Joins alert and recommendation lists into one cell.
    pub list_separator: String,
    /// strftime pattern for date-time cells.
    pub timestamp_format: String,
    /// Offset applied to instants before formatting (and to the filename date).
    pub utc_offset_minutes: i32,
    pub sheet_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            column_width: 20.0,
            filename_prefix: "weather_data_".to_string(),
            placeholder: "N/A".to_string(),
            list_separator: "; ".to_string(),
            timestamp_format: "%d/%m/%Y %H:%M:%S".to_string(),
            utc_offset_minutes: -180,
            sheet_name: "Weather Data".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::export(format!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))
        })
    }

    pub fn filename(&self, format: ExportFormat, now: DateTime<Utc>) -> Result<String> {
        let date = now.with_timezone(&self.offset()?).format("%Y-%m-%d");
        Ok(format!("{}{}.{}", self.filename_prefix, date, format.extension()))
    }
}

/// An encoded export, ready to hand to a transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

pub fn export(
    records: &[WeatherRecord],
    format: ExportFormat,
    config: &ExportConfig,
    now: DateTime<Utc>,
) -> Result<ExportedFile> {
    let rows = rows::project_all(records, config)?;

    let bytes = match format {
        ExportFormat::Csv => delimited::encode(&rows)?,
        ExportFormat::Xlsx => spreadsheet::encode(&rows, config)?,
    };

    let filename = config.filename(format, now)?;
    debug!(%format, rows = rows.len(), bytes = bytes.len(), %filename, "Encoded export");

    Ok(ExportedFile {
        bytes,
        filename,
        mime_type: format.mime_type(),
    })
}
