use crate::application::dataset_repository::Resource;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    #[default]
    File,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    #[serde(default)]
    pub source: DatasetSource,
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub files: ResourceFiles,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            dir: default_dir(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            files: ResourceFiles::default(),
        }
    }
}

/// File names of the four collections, relative to the dataset dir or base URL.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ResourceFiles {
    #[serde(default = "default_equipment_file")]
    pub equipment: String,
    #[serde(default = "default_position_history_file")]
    pub position_history: String,
    #[serde(default = "default_state_catalog_file")]
    pub state_catalog: String,
    #[serde(default = "default_state_history_file")]
    pub state_history: String,
}

impl ResourceFiles {
    pub fn file_name(&self, resource: Resource) -> &str {
        match resource {
            Resource::Equipment => &self.equipment,
            Resource::PositionHistory => &self.position_history,
            Resource::StateCatalog => &self.state_catalog,
            Resource::StateHistory => &self.state_history,
        }
    }
}

impl Default for ResourceFiles {
    fn default() -> Self {
        Self {
            equipment: default_equipment_file(),
            position_history: default_position_history_file(),
            state_catalog: default_state_catalog_file(),
            state_history: default_state_history_file(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_equipment_file() -> String {
    "equipment.json".to_string()
}

fn default_position_history_file() -> String {
    "equipmentPositionHistory.json".to_string()
}

fn default_state_catalog_file() -> String {
    "equipmentState.json".to_string()
}

fn default_state_history_file() -> String {
    "equipmentStateHistory.json".to_string()
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/fleet")
}

/// Read `<base>.{toml,json,yaml,...}` if present, then `FLEET__*` environment overrides.
pub fn load_app_config_from(base: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(base).required(false))
        .add_source(
            config::Environment::with_prefix("FLEET")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("missing");

        let config = load_app_config_from(base.to_str().unwrap()).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.dataset.source, DatasetSource::File);
        assert_eq!(config.dataset.dir, PathBuf::from("data"));
        assert_eq!(config.dataset.files, ResourceFiles::default());
    }

    #[test]
    fn test_reads_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("fleet.toml"),
            r#"
[server]
bind = "127.0.0.1:9000"

[dataset]
source = "http"
base_url = "https://example.test/data"
timeout_secs = 3

[dataset.files]
equipment = "units.json"
"#,
        )
        .unwrap();
        let base = temp_dir.path().join("fleet");

        let config = load_app_config_from(base.to_str().unwrap()).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.dataset.source, DatasetSource::Http);
        assert_eq!(config.dataset.base_url.as_deref(), Some("https://example.test/data"));
        assert_eq!(config.dataset.timeout_secs, 3);
        assert_eq!(config.dataset.files.file_name(Resource::Equipment), "units.json");
        assert_eq!(
            config.dataset.files.file_name(Resource::StateHistory),
            "equipmentStateHistory.json"
        );
    }
}
