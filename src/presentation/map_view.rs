// Map view model built from index queries
use crate::application::telemetry_index::TelemetryIndex;
use crate::domain::equipment::DisplayName;
use crate::domain::selection::Selection;
use crate::domain::telemetry::StateSample;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub equipment_id: String,
    pub name: DisplayName,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
    pub state_color: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Detail panel for the selected equipment. History is in index order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanel {
    pub equipment_id: String,
    pub name: DisplayName,
    pub history: Vec<StateSample>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub markers: Vec<Marker>,
    pub panel: Option<DetailPanel>,
}

/// One marker per equipment with a known position, plus the panel for `selection`.
pub fn render_map(index: &TelemetryIndex, selection: &Selection) -> MapView {
    let markers = index
        .known_equipment_ids()
        .filter_map(|equipment_id| {
            let position = index.latest_position(equipment_id)?;
            let state = index.latest_state_sample(equipment_id);
            Some(Marker {
                equipment_id: equipment_id.to_string(),
                name: index.display_name(equipment_id),
                latitude: position.latitude,
                longitude: position.longitude,
                state: index.latest_state(equipment_id).to_string(),
                state_color: state.and_then(|s| s.color.clone()),
                last_update: position.timestamp,
            })
        })
        .collect();

    let panel = selection
        .selected()
        .map(|equipment_id| detail_panel(index, equipment_id));

    MapView { markers, panel }
}

pub fn detail_panel(index: &TelemetryIndex, equipment_id: &str) -> DetailPanel {
    DetailPanel {
        equipment_id: equipment_id.to_string(),
        name: index.display_name(equipment_id),
        history: index.state_history(equipment_id).to_vec(),
    }
}
