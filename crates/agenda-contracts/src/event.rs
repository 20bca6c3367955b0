// Event DTOs for public API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use agenda_core::EventState;

use crate::speaker::Speaker;

/// An event with its full occurrence list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub event_type_id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    pub sub_title: Option<String>,
    pub description: String,
    /// Opaque reference to the externally-hosted payment button
    pub booking_code: Option<String>,
    pub image_filename: Option<String>,
    pub fee: Option<i32>,
    pub conc_fee: Option<i32>,
    pub multi_day_fee: Option<i32>,
    pub multi_day_conc_fee: Option<i32>,
    pub event_state: EventState,
    pub event_dates: Vec<EventDate>,
    pub created_at: DateTime<Utc>,
}

/// One occurrence of an event.
/// `event_datetime` is rendered at minute precision (`YYYY-MM-DD HH:MM`),
/// the same form clients submit and the diff engine keys on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDate {
    pub id: Uuid,
    pub event_id: Uuid,
    #[schema(example = "2019-03-01 19:00")]
    pub event_datetime: String,
    pub end_time: Option<String>,
    pub speakers: Vec<Speaker>,
}

/// Speaker reference inside a submitted occurrence
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpeakerRef {
    pub speaker_id: Uuid,
}

/// A client-submitted occurrence
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDatePayload {
    /// Date+time of the occurrence, minute precision
    #[schema(example = "2019-03-01 19:00")]
    pub event_date: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub speakers: Vec<SpeakerRef>,
}

/// Request to create an event with its initial occurrences
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub event_type_id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    pub description: String,
    #[serde(default)]
    pub fee: Option<i32>,
    #[serde(default)]
    pub conc_fee: Option<i32>,
    #[serde(default)]
    pub multi_day_fee: Option<i32>,
    #[serde(default)]
    pub multi_day_conc_fee: Option<i32>,
    #[serde(default)]
    pub event_state: Option<EventState>,
    #[serde(default)]
    pub event_dates: Vec<EventDatePayload>,
    #[serde(default)]
    pub image_filename: Option<String>,
    /// Base64-encoded image payload
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Request to update an event.
/// `event_dates` is the complete desired occurrence set; persisted
/// occurrences omitted from it are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub event_type_id: Option<Uuid>,
    #[serde(default)]
    pub venue_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub booking_code: Option<String>,
    #[serde(default)]
    pub fee: Option<i32>,
    #[serde(default)]
    pub conc_fee: Option<i32>,
    #[serde(default)]
    pub multi_day_fee: Option<i32>,
    #[serde(default)]
    pub multi_day_conc_fee: Option<i32>,
    #[serde(default)]
    pub event_state: Option<EventState>,
    #[serde(default)]
    pub event_dates: Vec<EventDatePayload>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Update response: the updated event plus non-fatal errors collected along
/// the way (payment-button sync failures, primarily). HTTP status is 200
/// whenever the content edit persisted, even with a non-empty errors list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub errors: Vec<String>,
}
