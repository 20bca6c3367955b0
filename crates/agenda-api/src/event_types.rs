// Event type HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use agenda_contracts::{EventType, ListResponse};
use agenda_storage::{EventTypeRow, StorageBackend};

/// App state for event type routes
#[derive(Clone)]
pub struct AppState {
    pub store: StorageBackend,
}

/// Create event type routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/event-types", get(list_event_types))
        .route("/v1/event-types/{event_type_id}", get(get_event_type))
        .with_state(state)
}

fn row_to_event_type(row: EventTypeRow) -> EventType {
    EventType {
        id: row.id,
        event_type: row.event_type,
        event_desc: row.event_desc,
        duration: row.duration,
    }
}

/// GET /v1/event-types - List event types
#[utoipa::path(
    get,
    path = "/v1/event-types",
    responses(
        (status = 200, description = "List of event types", body = ListResponse<EventType>),
        (status = 500, description = "Internal server error")
    ),
    tag = "event-types"
)]
pub async fn list_event_types(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<EventType>>, StatusCode> {
    let rows = state.store.list_event_types().await.map_err(|e| {
        tracing::error!("Failed to list event types: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_event_type).collect(),
    )))
}

/// GET /v1/event-types/{event_type_id} - Get event type by ID
#[utoipa::path(
    get,
    path = "/v1/event-types/{event_type_id}",
    params(
        ("event_type_id" = Uuid, Path, description = "Event type ID")
    ),
    responses(
        (status = 200, description = "Event type found", body = EventType),
        (status = 404, description = "Event type not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "event-types"
)]
pub async fn get_event_type(
    State(state): State<AppState>,
    Path(event_type_id): Path<Uuid>,
) -> Result<Json<EventType>, StatusCode> {
    let row = state
        .store
        .get_event_type(event_type_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get event type: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_event_type(row)))
}
