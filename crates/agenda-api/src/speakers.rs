// Speaker HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use agenda_contracts::{ListResponse, Speaker};
use agenda_storage::{SpeakerRow, StorageBackend};

/// App state for speaker routes
#[derive(Clone)]
pub struct AppState {
    pub store: StorageBackend,
}

/// Create speaker routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/speakers", get(list_speakers))
        .route("/v1/speakers/{speaker_id}", get(get_speaker))
        .with_state(state)
}

fn row_to_speaker(row: SpeakerRow) -> Speaker {
    Speaker {
        id: row.id,
        name: row.name,
        parent_id: row.parent_id,
    }
}

/// GET /v1/speakers - List speakers sorted by surname
#[utoipa::path(
    get,
    path = "/v1/speakers",
    responses(
        (status = 200, description = "List of speakers", body = ListResponse<Speaker>),
        (status = 500, description = "Internal server error")
    ),
    tag = "speakers"
)]
pub async fn list_speakers(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Speaker>>, StatusCode> {
    let rows = state.store.list_speakers().await.map_err(|e| {
        tracing::error!("Failed to list speakers: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_speaker).collect(),
    )))
}

/// GET /v1/speakers/{speaker_id} - Get speaker by ID
#[utoipa::path(
    get,
    path = "/v1/speakers/{speaker_id}",
    params(
        ("speaker_id" = Uuid, Path, description = "Speaker ID")
    ),
    responses(
        (status = 200, description = "Speaker found", body = Speaker),
        (status = 404, description = "Speaker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "speakers"
)]
pub async fn get_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<Uuid>,
) -> Result<Json<Speaker>, StatusCode> {
    let row = state
        .store
        .get_speaker(speaker_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get speaker: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_speaker(row)))
}
