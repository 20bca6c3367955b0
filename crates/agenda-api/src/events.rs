// Event HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use agenda_contracts::{
    CreateEventRequest, ErrorResponse, Event, ListResponse, UpdateEventRequest, UpdatedEvent,
};
use agenda_core::EventError;

use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/future", get(list_future_events))
        .route("/v1/events/year/{year}", get(list_events_in_year))
        .route(
            "/v1/events/{event_id}",
            get(get_event).post(update_event).delete(delete_event),
        )
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: EventError) -> ApiError {
    let status = match &err {
        EventError::Validation(_) => StatusCode::BAD_REQUEST,
        EventError::NotFound { .. } => StatusCode::NOT_FOUND,
        EventError::Payment(_) | EventError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("event request failed: {err}");
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// POST /v1/events - Create a new event with its initial occurrences
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 400, description = "Structurally invalid payload", body = ErrorResponse),
        (status = 404, description = "Referenced entity not found", body = ErrorResponse),
        (status = 500, description = "Provider or database failure", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.service.create(req).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /v1/events/{event_id} - Reconcile an event against a submitted revision
///
/// Responds 200 whenever the content edit persisted; non-fatal problems
/// (payment-button sync, chiefly) come back in the `errors` array.
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated, possibly with non-fatal errors", body = UpdatedEvent),
        (status = 400, description = "Structurally invalid payload", body = ErrorResponse),
        (status = 404, description = "Event or referenced entity not found", body = ErrorResponse),
        (status = 500, description = "Provider or database failure", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<UpdatedEvent>, ApiError> {
    let updated = state
        .service
        .update(event_id, req)
        .await
        .map_err(error_response)?;
    Ok(Json(updated))
}

/// GET /v1/events - List all events in first-occurrence order
#[utoipa::path(
    get,
    path = "/v1/events",
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state.service.list().await.map_err(error_response)?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/future - Events with an occurrence from today onward
#[utoipa::path(
    get,
    path = "/v1/events/future",
    responses(
        (status = 200, description = "List of future events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_future_events(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state.service.list_future().await.map_err(error_response)?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/year/{year} - Events with an occurrence in a calendar year
#[utoipa::path(
    get,
    path = "/v1/events/year/{year}",
    params(
        ("year" = i32, Path, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "List of events in the year", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events_in_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state
        .service
        .list_in_year(year)
        .await
        .map_err(error_response)?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .get(event_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(EventError::not_found("event", event_id)))?;
    Ok(Json(event))
}

/// DELETE /v1/events/{event_id} - Delete an event and its occurrences
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .service
        .delete(event_id)
        .await
        .map_err(error_response)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error_response(EventError::not_found("event", event_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::{AssetStore, ButtonSpec, ButtonSync};
    use agenda_storage::{CreateEventTypeRow, CreateVenueRow, StorageBackend};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StubButtonSync;

    #[async_trait]
    impl ButtonSync for StubButtonSync {
        async fn synchronize(&self, _spec: &ButtonSpec) -> agenda_core::Result<String> {
            Ok("BTN-IT".to_string())
        }
    }

    struct StubAssetStore;

    #[async_trait]
    impl AssetStore for StubAssetStore {
        async fn blob_exists(&self, _path: &str) -> agenda_core::Result<bool> {
            Ok(true)
        }

        async fn upload_from_base64(
            &self,
            _filename: &str,
            _destination: &str,
            _data: &str,
        ) -> agenda_core::Result<()> {
            Ok(())
        }
    }

    async fn test_app() -> (Router, StorageBackend) {
        let store = StorageBackend::in_memory();
        let service = Arc::new(EventService::new(
            store.clone(),
            Arc::new(StubButtonSync),
            Arc::new(StubAssetStore),
        ));
        (routes(AppState { service }), store)
    }

    async fn seed_refs(store: &StorageBackend) -> (Uuid, Uuid) {
        let event_type = store
            .create_event_type(CreateEventTypeRow {
                event_type: "Talk".into(),
                event_desc: None,
                duration: None,
            })
            .await
            .unwrap();
        let venue = store
            .create_venue(CreateVenueRow {
                name: "Main hall".into(),
                address: "1 High Street".into(),
                directions: None,
            })
            .await
            .unwrap();
        (event_type.id, venue.id)
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_update_round_trip_over_http() {
        let (app, store) = test_app().await;
        let (event_type_id, venue_id) = seed_refs(&store).await;

        let (status, created) = post_json(
            &app,
            "/v1/events",
            json!({
                "event_type_id": event_type_id,
                "venue_id": venue_id,
                "title": "Annual lecture",
                "description": "A talk",
                "event_dates": [{"event_date": "2019-03-01 19:00"}]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let event_id = created["id"].as_str().unwrap().to_string();
        let (status, updated) = post_json(
            &app,
            &format!("/v1/events/{event_id}"),
            json!({
                "title": "Renamed lecture",
                "event_dates": [
                    {"event_date": "2019-03-01 19:00"},
                    {"event_date": "2019-03-02 19:00"}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Renamed lecture");
        assert_eq!(updated["errors"], json!([]));
        assert_eq!(updated["event_dates"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_event_date_is_400() {
        let (app, store) = test_app().await;
        let (event_type_id, venue_id) = seed_refs(&store).await;

        let (_, created) = post_json(
            &app,
            "/v1/events",
            json!({
                "event_type_id": event_type_id,
                "venue_id": venue_id,
                "title": "Annual lecture",
                "description": "A talk"
            }),
        )
        .await;
        let event_id = created["id"].as_str().unwrap().to_string();

        let (status, body) = post_json(
            &app,
            &format!("/v1/events/{event_id}"),
            json!({"event_dates": [{"event_date": "not a date"}]}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not a date"));
    }

    #[tokio::test]
    async fn test_unknown_event_is_404() {
        let (app, _store) = test_app().await;

        let (status, _) = post_json(
            &app,
            &format!("/v1/events/{}", Uuid::now_v7()),
            json!({"title": "nope"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
