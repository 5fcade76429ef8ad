// Equipment and state catalog domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(rename = "equipmentModelId")]
    pub model_id: String,
}

impl Equipment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model_id: model_id.into(),
        }
    }
}

/// Entry of the state catalog that state-history records point into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl StateDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Result of resolving an equipment id against the metadata collection.
///
/// Callers that only need text use [`DisplayName::as_str`]; tests and the
/// view layer can tell a real name from the raw-id fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DisplayName {
    Resolved(String),
    Fallback(String),
}

impl DisplayName {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayName::Resolved(name) => name,
            DisplayName::Fallback(id) => id,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DisplayName::Fallback(_))
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
