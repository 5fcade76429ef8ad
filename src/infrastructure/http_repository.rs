// HTTP dataset repository, fetching static JSON resources
use crate::application::dataset_repository::{decode_resource, DatasetRepository, Resource};
use crate::application::errors::DatasetError;
use crate::domain::equipment::{Equipment, StateDefinition};
use crate::domain::records::{RawPositionHistory, RawStateHistory};
use crate::infrastructure::config::ResourceFiles;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDatasetRepository {
    base_url: String,
    files: ResourceFiles,
    client: reqwest::Client,
}

impl HttpDatasetRepository {
    pub fn new(base_url: String, files: ResourceFiles, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(base_url, files, client))
    }

    pub fn with_client(base_url: String, files: ResourceFiles, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            files,
            client,
        }
    }

    fn build_resource_url(&self, resource: Resource) -> String {
        let file = urlencoding::encode(self.files.file_name(resource));
        format!("{}/{}", self.base_url, file)
    }

    async fn get_resource<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, DatasetError> {
        let url = self.build_resource_url(resource);
        tracing::debug!("Fetching {} from {}", resource, url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DatasetError::Http {
                resource,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DatasetError::Status {
                resource,
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| DatasetError::Http {
            resource,
            reason: e.to_string(),
        })?;

        decode_resource(resource, &body)
    }
}

#[async_trait]
impl DatasetRepository for HttpDatasetRepository {
    async fn fetch_equipment(&self) -> Result<Vec<Equipment>, DatasetError> {
        self.get_resource(Resource::Equipment).await
    }

    async fn fetch_position_history(&self) -> Result<Vec<RawPositionHistory>, DatasetError> {
        self.get_resource(Resource::PositionHistory).await
    }

    async fn fetch_state_catalog(&self) -> Result<Vec<StateDefinition>, DatasetError> {
        self.get_resource(Resource::StateCatalog).await
    }

    async fn fetch_state_history(&self) -> Result<Vec<RawStateHistory>, DatasetError> {
        self.get_resource(Resource::StateHistory).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Router};

    async fn serve_file(Path(file): Path<String>) -> Result<String, StatusCode> {
        match file.as_str() {
            "equipment.json" => Ok(r#"[{"id":"E1","name":"CA-0001","equipmentModelId":"m1"}]"#.to_string()),
            "equipmentState.json" => Ok("[not json".to_string()),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn spawn_source() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/data/:file", get(serve_file));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/data/", addr)
    }

    fn repository(base_url: String) -> HttpDatasetRepository {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpDatasetRepository::with_client(base_url, ResourceFiles::default(), client)
    }

    #[test]
    fn test_build_resource_url() {
        let mut files = ResourceFiles::default();
        files.state_history = "state history.json".to_string();
        let repo = HttpDatasetRepository::new(
            "https://example.test/data//".to_string(),
            files,
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            repo.build_resource_url(Resource::Equipment),
            "https://example.test/data/equipment.json"
        );
        assert_eq!(
            repo.build_resource_url(Resource::StateHistory),
            "https://example.test/data/state%20history.json"
        );
    }

    #[tokio::test]
    async fn test_fetches_resource() {
        let repo = repository(spawn_source().await);

        let equipment = repo.fetch_equipment().await.unwrap();
        assert_eq!(equipment, vec![Equipment::new("E1", "CA-0001", "m1")]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let repo = repository(spawn_source().await);

        let err = repo.fetch_position_history().await.unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Status { resource: Resource::PositionHistory, status: 404 }
        ));
    }

    #[tokio::test]
    async fn test_bad_body_is_decode_error() {
        let repo = repository(spawn_source().await);

        let err = repo.fetch_state_catalog().await.unwrap_err();
        assert!(matches!(err, DatasetError::Decode { resource: Resource::StateCatalog, .. }));
    }
}
