// File-backed dataset repository
use crate::application::dataset_repository::{decode_resource, DatasetRepository, Resource};
use crate::application::errors::DatasetError;
use crate::domain::equipment::{Equipment, StateDefinition};
use crate::domain::records::{RawPositionHistory, RawStateHistory};
use crate::infrastructure::config::ResourceFiles;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Reads the four JSON collections from one directory.
#[derive(Debug, Clone)]
pub struct FileDatasetRepository {
    dir: PathBuf,
    files: ResourceFiles,
}

impl FileDatasetRepository {
    pub fn new(dir: impl Into<PathBuf>, files: ResourceFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_resource<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, DatasetError> {
        let path = self.dir.join(self.files.file_name(resource));
        tracing::debug!("Reading {} from {}", resource, path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| DatasetError::Io { resource, source })?;

        decode_resource(resource, &bytes)
    }
}

#[async_trait]
impl DatasetRepository for FileDatasetRepository {
    async fn fetch_equipment(&self) -> Result<Vec<Equipment>, DatasetError> {
        self.read_resource(Resource::Equipment).await
    }

    async fn fetch_position_history(&self) -> Result<Vec<RawPositionHistory>, DatasetError> {
        self.read_resource(Resource::PositionHistory).await
    }

    async fn fetch_state_catalog(&self) -> Result<Vec<StateDefinition>, DatasetError> {
        self.read_resource(Resource::StateCatalog).await
    }

    async fn fetch_state_history(&self) -> Result<Vec<RawStateHistory>, DatasetError> {
        self.read_resource(Resource::StateHistory).await
    }
}
