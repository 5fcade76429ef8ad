// Position normalizer - Flattens nested position histories into valid samples
use crate::domain::records::{parse_timestamp, RawPosition, RawPositionHistory};
use crate::domain::telemetry::PositionSample;

/// Flatten per-equipment position records, keeping source order.
///
/// Entries with a missing or non-finite coordinate are skipped. An unparseable
/// date does not drop the entry, it yields an undated sample. Partial telemetry
/// never fails the batch.
pub fn normalize_positions(records: &[RawPositionHistory]) -> Vec<PositionSample> {
    let mut samples = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        for raw in &record.positions {
            match normalize_position(&record.equipment_id, raw) {
                Some(sample) => samples.push(sample),
                None => {
                    dropped += 1;
                    tracing::debug!(
                        "Dropping malformed position for {}: lat={:?} lon={:?}",
                        record.equipment_id,
                        raw.lat,
                        raw.lon
                    );
                }
            }
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} malformed position entries", dropped);
    }

    samples
}

fn normalize_position(equipment_id: &str, raw: &RawPosition) -> Option<PositionSample> {
    let latitude = raw.lat.filter(|v| v.is_finite())?;
    let longitude = raw.lon.filter(|v| v.is_finite())?;
    let timestamp = raw.date.as_deref().and_then(parse_timestamp);

    Some(PositionSample::new(
        equipment_id.to_string(),
        latitude,
        longitude,
        timestamp,
    ))
}
