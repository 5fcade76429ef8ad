// Detail-panel selection, owned by whoever drives the view
use serde::Deserialize;

/// Which equipment's detail panel is open, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default, rename = "selected")]
    equipment_id: Option<String>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Open the panel for `equipment_id`, replacing any previous selection.
    pub fn select(&mut self, equipment_id: impl Into<String>) {
        self.equipment_id = Some(equipment_id.into());
    }

    pub fn clear(&mut self) {
        self.equipment_id = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.equipment_id.as_deref()
    }
}
