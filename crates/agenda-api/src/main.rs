// Agenda API server
// Decision: Dev mode falls back to in-memory storage when DATABASE_URL is unset
// Decision: A missing payment-provider configuration disables button sync
// instead of refusing to boot; sync attempts then surface as non-fatal errors

mod assets;
mod event_types;
mod events;
mod services;
mod speakers;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use agenda_contracts::*;
use agenda_core::{AssetStore, ButtonSpec, ButtonSync, EventError};
use agenda_paypal::{ButtonSynchronizer, PaypalClient, PaypalConfig};
use agenda_storage::StorageBackend;

use crate::assets::FsAssetStore;
use crate::services::EventService;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage_mode: String,
    payments_enabled: bool,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage_mode: String,
    payments_enabled: bool,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage_mode: state.storage_mode.clone(),
        payments_enabled: state.payments_enabled,
    })
}

/// Stand-in synchronizer when the provider is not configured. Sync attempts
/// fail with a payment error, which the update path reports as non-fatal.
struct DisabledButtonSync;

#[async_trait]
impl ButtonSync for DisabledButtonSync {
    async fn synchronize(&self, spec: &ButtonSpec) -> agenda_core::Result<String> {
        Err(EventError::payment(format!(
            "payment provider not configured, button for {} not synchronized",
            spec.item_id
        )))
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::create_event,
        events::update_event,
        events::list_events,
        events::list_future_events,
        events::list_events_in_year,
        events::get_event,
        events::delete_event,
        speakers::list_speakers,
        speakers::get_speaker,
        event_types::list_event_types,
        event_types::get_event_type,
    ),
    components(
        schemas(
            Event, EventDate, EventState,
            CreateEventRequest, UpdateEventRequest, UpdatedEvent,
            EventDatePayload, SpeakerRef,
            Speaker, EventType,
            ListResponse<Event>,
            ListResponse<Speaker>,
            ListResponse<EventType>,
            ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Event management and revision reconciliation"),
        (name = "speakers", description = "Speaker lookup endpoints"),
        (name = "event-types", description = "Event type lookup endpoints")
    ),
    info(
        title = "Agenda API",
        version = "0.1.0",
        description = "Event-management backend with occurrence reconciliation and payment-button sync",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agenda_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    tracing::info!("agenda-api starting...");

    // Initialize storage
    let store = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let store = StorageBackend::postgres(&database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            store
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (dev mode)");
            StorageBackend::in_memory()
        }
    };

    // Payment provider (optional - gracefully degrade if not configured)
    let (buttons, payments_enabled): (Arc<dyn ButtonSync>, bool) = match PaypalConfig::from_env() {
        Ok(config) => {
            tracing::info!("Payment provider configured");
            (
                Arc::new(ButtonSynchronizer::new(PaypalClient::new(config))),
                true,
            )
        }
        Err(e) => {
            tracing::warn!("Payment provider not configured: {}. Button sync disabled.", e);
            (Arc::new(DisabledButtonSync), false)
        }
    };

    // Image asset storage
    let asset_root = std::env::var("ASSET_ROOT").unwrap_or_else(|_| "./assets".into());
    tracing::info!(root = %asset_root, "Asset store configured");
    let assets: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new(&asset_root));

    let service = Arc::new(EventService::new(store.clone(), buttons, assets));

    // Create module-specific states
    let events_state = events::AppState { service };
    let speakers_state = speakers::AppState {
        store: store.clone(),
    };
    let event_types_state = event_types::AppState {
        store: store.clone(),
    };
    let health_state = HealthState {
        storage_mode: if store.is_dev_mode() {
            "in-memory".to_string()
        } else {
            "postgres".to_string()
        },
        payments_enabled,
    };

    // Load CORS allowed origins from environment (optional)
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(events::routes(events_state))
        .merge(speakers::routes(speakers_state))
        .merge(event_types::routes(event_types_state));

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = "0.0.0.0:9000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
