// Event type DTOs for public API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A category of event ("Talk", "Workshop", ...)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventType {
    pub id: Uuid,
    pub event_type: String,
    pub event_desc: Option<String>,
    pub duration: Option<i32>,
}
