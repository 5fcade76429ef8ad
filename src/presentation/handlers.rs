// HTTP request handlers
use crate::application::errors::SnapshotError;
use crate::application::telemetry_index::IndexSummary;
use crate::domain::equipment::Equipment;
use crate::domain::selection::Selection;
use crate::presentation::app_state::AppState;
use crate::presentation::map_view::{detail_panel, render_map};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub summary: IndexSummary,
    pub last_failure: Option<String>,
}

#[derive(Serialize)]
pub struct EquipmentEntry {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub tracked: bool,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for SnapshotError {
    fn into_response(self) -> Response {
        error_response(StatusCode::SERVICE_UNAVAILABLE, self.to_string())
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Summary of the published index, or 503 while nothing is loaded
pub async fn status(State(state): State<Arc<AppState>>) -> Response {
    match state.fleet_service.snapshot() {
        Ok(index) => Json(StatusBody {
            summary: index.summary(),
            last_failure: state.fleet_service.last_failure(),
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Markers for every positioned unit, plus the panel for `?selected=<id>`
pub async fn map_view(
    Query(selection): Query<Selection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.fleet_service.snapshot() {
        Ok(index) => Json(render_map(&index, &selection)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// State history panel for one unit
pub async fn equipment_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.fleet_service.snapshot() {
        Ok(index) => Json(detail_panel(&index, &id)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Equipment metadata, flagged with whether each unit has a known position
pub async fn list_equipment(State(state): State<Arc<AppState>>) -> Response {
    match state.fleet_service.snapshot() {
        Ok(index) => {
            let entries: Vec<EquipmentEntry> = index
                .equipment()
                .iter()
                .map(|equipment| EquipmentEntry {
                    tracked: index.is_known(&equipment.id),
                    equipment: equipment.clone(),
                })
                .collect();
            Json(entries).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Valid position samples for one unit, in source order
pub async fn position_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.fleet_service.snapshot() {
        Ok(index) => Json(index.position_history(&id).to_vec()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Run a load cycle. On failure the previous index keeps serving.
pub async fn reload(State(state): State<Arc<AppState>>) -> Response {
    match state.fleet_service.reload().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}
