//! Flat row projection shared by every export format.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::{self, Write as _};

use crate::{Error, Result, WeatherRecord};

use super::ExportConfig;

pub const COLUMNS: [&str; 27] = [
    "Date/Time",
    "City",
    "State",
    "Country",
    "Latitude",
    "Longitude",
    "Temperature (°C)",
    "Feels Like (°C)",
    "Humidity (%)",
    "Pressure (hPa)",
    "Wind Speed (km/h)",
    "Wind Direction (°)",
    "UV Index",
    "Cloud Cover (%)",
    "Visibility (m)",
    "Weather Code",
    "Condition",
    "Precipitation (mm)",
    "Precipitation Probability (%)",
    "Min Temp (°C)",
    "Max Temp (°C)",
    "Source",
    "AI Summary",
    "AI Alerts",
    "AI Recommendations",
    "AI Trends",
    "AI Generated At",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

pub fn project_all(records: &[WeatherRecord], config: &ExportConfig) -> Result<Vec<Vec<Cell>>> {
    let offset = config.offset()?;
    records.iter().map(|r| project(r, config, offset)).collect()
}

/// One record as cells, in [`COLUMNS`] order.
pub fn project(record: &WeatherRecord, config: &ExportConfig, offset: FixedOffset) -> Result<Vec<Cell>> {
    let placeholder = || Cell::Text(config.placeholder.clone());
    let optional = |v: Option<f64>| v.map_or_else(placeholder, Cell::Number);
    let joined = |items: &Vec<String>| {
        if items.is_empty() {
            placeholder()
        } else {
            Cell::Text(items.join(&config.list_separator))
        }
    };

    let loc = &record.location;
    let cur = &record.current;

    let mut row = Vec::with_capacity(COLUMNS.len());
    row.push(Cell::Text(format_instant(record.timestamp, config, offset)?));
    row.extend([
        text(&loc.city),
        text(&loc.state),
        text(&loc.country),
        optional(loc.latitude),
        optional(loc.longitude),
        Cell::Number(cur.temperature),
        Cell::Number(cur.feels_like),
        Cell::Number(cur.humidity),
        Cell::Number(cur.pressure),
        Cell::Number(cur.wind_speed),
        Cell::Number(cur.wind_direction),
        Cell::Number(cur.uv_index),
        Cell::Number(cur.cloud_cover),
        Cell::Number(cur.visibility),
        Cell::Number(f64::from(cur.weather_code)),
        text(&cur.condition),
        Cell::Number(cur.precipitation),
        Cell::Number(cur.precipitation_probability),
        Cell::Number(record.daily.temp_min),
        Cell::Number(record.daily.temp_max),
        text(&record.source),
    ]);

    match &record.ai_insight {
        Some(insight) => row.extend([
            text(&insight.summary),
            joined(&insight.alerts),
            joined(&insight.recommendations),
            text(&insight.trends),
            Cell::Text(format_instant(insight.generated_at, config, offset)?),
        ]),
        None => row.extend(std::iter::repeat_with(placeholder).take(5)),
    }

    debug_assert_eq!(row.len(), COLUMNS.len());
    Ok(row)
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn format_instant(instant: DateTime<Utc>, config: &ExportConfig, offset: FixedOffset) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", instant.with_timezone(&offset).format(&config.timestamp_format)).map_err(|_| {
        Error::export(format!("Invalid timestamp format pattern '{}'", config.timestamp_format))
    })?;
    Ok(out)
}
