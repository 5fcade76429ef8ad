// Telemetry index - Per-equipment latest-value and history queries
use crate::application::dataset_repository::RawDataset;
use crate::application::normalizer::normalize_positions;
use crate::application::state_resolver::resolve_states;
use crate::domain::equipment::{DisplayName, Equipment};
use crate::domain::telemetry::{PositionSample, StateSample, NO_STATE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Samples for one equipment unit, in input order, with the running latest.
///
/// The latest pointer only moves on a strictly greater timestamp, so the
/// earliest sample in input order wins a tie.
#[derive(Debug, Default)]
struct EquipmentTelemetry {
    positions: Vec<PositionSample>,
    latest_position: Option<usize>,
    states: Vec<StateSample>,
    latest_state: Option<usize>,
}

impl EquipmentTelemetry {
    fn push_position(&mut self, sample: PositionSample) {
        // Option ordering puts undated entries below every dated one.
        let newer = match self.latest_position {
            Some(idx) => sample.timestamp > self.positions[idx].timestamp,
            None => true,
        };
        self.positions.push(sample);
        if newer {
            self.latest_position = Some(self.positions.len() - 1);
        }
    }

    fn push_state(&mut self, sample: StateSample) {
        // Option ordering puts undated entries below every dated one.
        let newer = match self.latest_state {
            Some(idx) => sample.timestamp > self.states[idx].timestamp,
            None => true,
        };
        self.states.push(sample);
        if newer {
            self.latest_state = Some(self.states.len() - 1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub equipment: usize,
    pub tracked_equipment: usize,
    pub position_samples: usize,
    pub state_samples: usize,
    pub unknown_state_samples: usize,
    pub built_at: DateTime<Utc>,
}

/// Immutable query structure over one load cycle's samples.
#[derive(Debug)]
pub struct TelemetryIndex {
    equipment: Vec<Equipment>,
    equipment_by_id: HashMap<String, usize>,
    telemetry: HashMap<String, EquipmentTelemetry>,
    known_ids: Vec<String>,
    position_samples: usize,
    state_samples: usize,
    built_at: DateTime<Utc>,
}

impl TelemetryIndex {
    /// Normalize, resolve and index a fetched dataset.
    pub fn from_dataset(dataset: RawDataset) -> Self {
        let positions = normalize_positions(&dataset.positions);
        let states = resolve_states(&dataset.states, &dataset.catalog);
        Self::build(dataset.equipment, positions, states)
    }

    pub fn build(
        equipment: Vec<Equipment>,
        positions: Vec<PositionSample>,
        states: Vec<StateSample>,
    ) -> Self {
        let mut equipment_by_id = HashMap::with_capacity(equipment.len());
        for (idx, item) in equipment.iter().enumerate() {
            equipment_by_id.entry(item.id.clone()).or_insert(idx);
        }

        let position_samples = positions.len();
        let state_samples = states.len();
        let mut telemetry: HashMap<String, EquipmentTelemetry> = HashMap::new();
        let mut known_ids = Vec::new();

        for sample in positions {
            let entry = telemetry.entry(sample.equipment_id.clone()).or_default();
            if entry.positions.is_empty() {
                known_ids.push(sample.equipment_id.clone());
            }
            entry.push_position(sample);
        }

        for sample in states {
            telemetry
                .entry(sample.equipment_id.clone())
                .or_default()
                .push_state(sample);
        }

        Self {
            equipment,
            equipment_by_id,
            telemetry,
            known_ids,
            position_samples,
            state_samples,
            built_at: Utc::now(),
        }
    }

    /// Sample with the greatest timestamp, earliest in input order on ties.
    pub fn latest_position(&self, equipment_id: &str) -> Option<&PositionSample> {
        let group = self.telemetry.get(equipment_id)?;
        group.latest_position.map(|idx| &group.positions[idx])
    }

    /// Latest state name, or [`NO_STATE`] when the unit has no state history.
    pub fn latest_state(&self, equipment_id: &str) -> &str {
        self.latest_state_sample(equipment_id)
            .map(|s| s.state_name.as_str())
            .unwrap_or(NO_STATE)
    }

    pub fn latest_state_sample(&self, equipment_id: &str) -> Option<&StateSample> {
        let group = self.telemetry.get(equipment_id)?;
        group.latest_state.map(|idx| &group.states[idx])
    }

    /// All state samples for the unit in resolver order. Not sorted by time.
    pub fn state_history(&self, equipment_id: &str) -> &[StateSample] {
        self.telemetry
            .get(equipment_id)
            .map(|g| g.states.as_slice())
            .unwrap_or(&[])
    }

    pub fn position_history(&self, equipment_id: &str) -> &[PositionSample] {
        self.telemetry
            .get(equipment_id)
            .map(|g| g.positions.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct ids with at least one valid position, in first-seen order.
    pub fn known_equipment_ids(&self) -> impl Iterator<Item = &str> {
        self.known_ids.iter().map(String::as_str)
    }

    pub fn is_known(&self, equipment_id: &str) -> bool {
        self.latest_position(equipment_id).is_some()
    }

    /// Fallback only when no equipment matches. An empty name is still resolved.
    pub fn display_name(&self, equipment_id: &str) -> DisplayName {
        match self.equipment_by_id.get(equipment_id) {
            Some(&idx) => DisplayName::Resolved(self.equipment[idx].name.clone()),
            None => DisplayName::Fallback(equipment_id.to_string()),
        }
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn summary(&self) -> IndexSummary {
        let unknown_state_samples = self
            .telemetry
            .values()
            .flat_map(|g| g.states.iter())
            .filter(|s| s.is_unknown())
            .count();

        IndexSummary {
            equipment: self.equipment.len(),
            tracked_equipment: self.known_ids.len(),
            position_samples: self.position_samples,
            state_samples: self.state_samples,
            unknown_state_samples,
            built_at: self.built_at,
        }
    }
}
