use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider label applied when an ingested record does not name its source.
pub const DEFAULT_SOURCE: &str = "open-meteo";

/// Store-assigned record key. Independent of the observation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Fresh random key, used by the reference stores on insert.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Conditions at observation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub uv_index: f64,
    pub cloud_cover: f64,
    pub visibility: f64,
    pub weather_code: i32,
    pub condition: String,
    #[serde(default)]
    pub precipitation: f64,
    #[serde(default)]
    pub precipitation_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRange {
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Narrative produced by an insight generator, before it is stamped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsightDraft {
    pub summary: String,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub trends: String,
}

/// Insight attached to a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub summary: String,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub trends: String,
    pub generated_at: DateTime<Utc>,
}

impl AiInsight {
    pub fn from_draft(draft: InsightDraft, generated_at: DateTime<Utc>) -> Self {
        Self {
            summary: draft.summary,
            alerts: draft.alerts,
            recommendations: draft.recommendations,
            trends: draft.trends,
            generated_at,
        }
    }
}

/// The fields of a record an insight generator gets to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload accepted by create-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWeatherRecord {
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub current: CurrentConditions,
    pub daily: DailyRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One persisted observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub current: CurrentConditions,
    pub daily: DailyRange,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<AiInsight>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeatherRecord {
    /// Materialize an ingested payload under a store-assigned key.
    pub fn from_new(new: NewWeatherRecord, id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp: new.timestamp,
            location: new.location,
            current: new.current,
            daily: new.daily,
            source: new.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            ai_insight: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn insight_request(&self) -> InsightRequest {
        InsightRequest {
            temperature: self.current.temperature,
            humidity: self.current.humidity,
            wind_speed: self.current.wind_speed,
            condition: self.current.condition.clone(),
            timestamp: self.timestamp,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn from_new_applies_default_source() {
        let rec = WeatherRecord::from_new(new_record("Recife", at(9), 28.0), "k1".into(), at(9));

        assert_eq!(rec.source, DEFAULT_SOURCE);
        assert_eq!(rec.id.as_str(), "k1");
        assert!(rec.ai_insight.is_none());
    }

    #[test]
    fn ingestion_payload_defaults_precipitation() {
        let json = r#"{
            "timestamp": "2024-03-10T12:00:00Z",
            "location": { "city": "Recife", "state": "PE", "country": "BR" },
            "current": {
                "temperature": 29.1, "feelsLike": 31.0, "humidity": 74, "pressure": 1011,
                "windSpeed": 14.2, "windDirection": 120, "uvIndex": 8, "cloudCover": 20,
                "visibility": 10000, "weatherCode": 1, "condition": "Mainly clear"
            },
            "daily": { "tempMin": 24.0, "tempMax": 31.5 },
            "source": "collector"
        }"#;

        let parsed: NewWeatherRecord = serde_json::from_str(json).expect("payload should parse");

        assert_eq!(parsed.current.precipitation, 0.0);
        assert_eq!(parsed.current.precipitation_probability, 0.0);
        assert_eq!(parsed.location.latitude, None);
        assert_eq!(parsed.source.as_deref(), Some("collector"));
    }

    #[test]
    fn insight_request_projects_narrative_fields() {
        let rec = record("Recife", at(9), 28.0);
        let req = rec.insight_request();

        assert_eq!(req.temperature, 28.0);
        assert_eq!(req.humidity, 60.0);
        assert_eq!(req.wind_speed, 12.5);
        assert_eq!(req.condition, "Partly cloudy");
        assert_eq!(req.timestamp, rec.timestamp);
    }
}
