// Repository trait for the four source collections
use crate::application::errors::DatasetError;
use crate::domain::equipment::{Equipment, StateDefinition};
use crate::domain::records::{RawPositionHistory, RawStateHistory};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;

/// The source collections, named for error reporting and file lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Equipment,
    PositionHistory,
    StateCatalog,
    StateHistory,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Equipment => "equipment list",
            Resource::PositionHistory => "position history",
            Resource::StateCatalog => "state catalog",
            Resource::StateHistory => "state history",
        };
        f.write_str(name)
    }
}

/// Everything one load cycle needs, fetched as a unit.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub equipment: Vec<Equipment>,
    pub positions: Vec<RawPositionHistory>,
    pub catalog: Vec<StateDefinition>,
    pub states: Vec<RawStateHistory>,
}

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    async fn fetch_equipment(&self) -> Result<Vec<Equipment>, DatasetError>;

    async fn fetch_position_history(&self) -> Result<Vec<RawPositionHistory>, DatasetError>;

    async fn fetch_state_catalog(&self) -> Result<Vec<StateDefinition>, DatasetError>;

    async fn fetch_state_history(&self) -> Result<Vec<RawStateHistory>, DatasetError>;
}

/// Decode a JSON array body for `resource`.
pub fn decode_resource<T: DeserializeOwned>(
    resource: Resource,
    bytes: &[u8],
) -> Result<Vec<T>, DatasetError> {
    serde_json::from_slice(bytes).map_err(|source| DatasetError::Decode { resource, source })
}
