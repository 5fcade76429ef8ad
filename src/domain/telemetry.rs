// Telemetry sample domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// State name used when a history entry points at a state id missing from the catalog.
pub const UNKNOWN_STATE: &str = "Desconhecido";

/// State name reported for equipment without any state history.
pub const NO_STATE: &str = "Sem estado";

/// A valid position fix.
///
/// `timestamp` is `None` when the source date could not be parsed; the
/// sample is still placed on the map but never outranks a dated one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    pub equipment_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl PositionSample {
    pub fn new(
        equipment_id: String,
        latitude: f64,
        longitude: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            equipment_id,
            latitude,
            longitude,
            timestamp,
        }
    }
}

/// A resolved state transition. An undated entry is kept, ranked below dated ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSample {
    pub equipment_id: String,
    pub state_name: String,
    pub color: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl StateSample {
    pub fn new(
        equipment_id: String,
        state_name: String,
        color: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            equipment_id,
            state_name,
            color,
            timestamp,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.color.is_none() && self.state_name == UNKNOWN_STATE
    }
}
