// Raw dataset records as delivered by the data source
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One equipment's position history, nested as the source ships it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPositionHistory {
    pub equipment_id: String,
    #[serde(default)]
    pub positions: Vec<RawPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lon: Option<f64>,
}

impl RawPosition {
    pub fn new(date: &str, lat: Option<f64>, lon: Option<f64>) -> Self {
        Self {
            date: Some(date.to_string()),
            lat,
            lon,
        }
    }
}

/// One equipment's state transitions, nested as the source ships it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStateHistory {
    pub equipment_id: String,
    #[serde(default)]
    pub states: Vec<RawStateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStateEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipment_state_id: Option<String>,
}

impl RawStateEntry {
    pub fn new(date: &str, state_id: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            equipment_state_id: Some(state_id.to_string()),
        }
    }
}

/// Accept a number, a numeric string, or anything else (read as missing).
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Any non-string value reads as missing instead of failing the document.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Parse an ISO-8601 instant. Strings without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
