// Speaker DTOs for public API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A speaker. `parent_id` nests at most one level.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}
