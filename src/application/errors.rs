// Error types for the dataset load cycle
use crate::application::dataset_repository::Resource;
use thiserror::Error;

/// Failure to obtain one of the four source collections. Fatal to the load cycle.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {resource}: {source}")]
    Io {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {resource}: {reason}")]
    Http { resource: Resource, reason: String },
    #[error("{resource} request failed with status {status}")]
    Status { resource: Resource, status: u16 },
    #[error("failed to decode {resource}: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    pub fn resource(&self) -> Resource {
        match self {
            DatasetError::Io { resource, .. }
            | DatasetError::Http { resource, .. }
            | DatasetError::Status { resource, .. }
            | DatasetError::Decode { resource, .. } => *resource,
        }
    }
}

/// No index can be served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no dataset has been loaded yet")]
    NotLoaded,
    #[error("dataset load failed: {0}")]
    LoadFailed(String),
}
