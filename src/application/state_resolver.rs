// State resolver - Flattens state histories and names each transition
use crate::domain::equipment::StateDefinition;
use crate::domain::records::{parse_timestamp, RawStateHistory};
use crate::domain::telemetry::{StateSample, UNKNOWN_STATE};
use std::collections::HashMap;

/// Id lookup over the state catalog. The first entry wins when ids repeat.
#[derive(Debug)]
pub struct StateCatalog<'a> {
    by_id: HashMap<&'a str, &'a StateDefinition>,
}

impl<'a> StateCatalog<'a> {
    pub fn new(definitions: &'a [StateDefinition]) -> Self {
        let mut by_id = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if by_id.contains_key(definition.id.as_str()) {
                tracing::warn!(
                    "Duplicate state id {} in catalog, keeping first definition",
                    definition.id
                );
                continue;
            }
            by_id.insert(definition.id.as_str(), definition);
        }
        Self { by_id }
    }

    pub fn resolve(&self, state_id: &str) -> Option<&'a StateDefinition> {
        self.by_id.get(state_id).copied()
    }
}

/// Flatten per-equipment state records, naming each entry from `catalog`.
///
/// Unlike positions, nothing is dropped: an id missing from the catalog (or
/// absent from the entry) resolves to [`UNKNOWN_STATE`].
pub fn resolve_states(records: &[RawStateHistory], catalog: &[StateDefinition]) -> Vec<StateSample> {
    let catalog = StateCatalog::new(catalog);
    let mut samples = Vec::new();
    let mut unresolved = 0usize;

    for record in records {
        for entry in &record.states {
            let timestamp = entry.date.as_deref().and_then(parse_timestamp);
            let definition = entry
                .equipment_state_id
                .as_deref()
                .and_then(|id| catalog.resolve(id));

            let sample = match definition {
                Some(def) => StateSample::new(
                    record.equipment_id.clone(),
                    def.name.clone(),
                    Some(def.color.clone()),
                    timestamp,
                ),
                None => {
                    unresolved += 1;
                    tracing::debug!(
                        "Unresolved state id {:?} for {}",
                        entry.equipment_state_id,
                        record.equipment_id
                    );
                    StateSample::new(
                        record.equipment_id.clone(),
                        UNKNOWN_STATE.to_string(),
                        None,
                        timestamp,
                    )
                }
            };
            samples.push(sample);
        }
    }

    if unresolved > 0 {
        tracing::debug!("{} state entries reference unknown state ids", unresolved);
    }

    samples
}
