// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub event_type_id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    pub sub_title: Option<String>,
    pub description: String,
    pub booking_code: Option<String>,
    pub image_filename: Option<String>,
    pub fee: Option<i32>,
    pub conc_fee: Option<i32>,
    pub multi_day_fee: Option<i32>,
    pub multi_day_conc_fee: Option<i32>,
    pub event_state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub event_type_id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    pub sub_title: Option<String>,
    pub description: String,
    pub booking_code: Option<String>,
    pub image_filename: Option<String>,
    pub fee: Option<i32>,
    pub conc_fee: Option<i32>,
    pub multi_day_fee: Option<i32>,
    pub multi_day_conc_fee: Option<i32>,
    pub event_state: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventRow {
    pub event_type_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub description: Option<String>,
    pub booking_code: Option<String>,
    pub image_filename: Option<String>,
    pub fee: Option<i32>,
    pub conc_fee: Option<i32>,
    pub multi_day_fee: Option<i32>,
    pub multi_day_conc_fee: Option<i32>,
    pub event_state: Option<String>,
}

// ============================================
// Occurrence (event date) models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventDateRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_datetime: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventDateRow {
    pub event_id: Uuid,
    pub event_datetime: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub speaker_ids: Vec<Uuid>,
}

// ============================================
// Speaker models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct SpeakerRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSpeakerRow {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

// ============================================
// Event type models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventTypeRow {
    pub id: Uuid,
    pub event_type: String,
    pub event_desc: Option<String>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventTypeRow {
    pub event_type: String,
    pub event_desc: Option<String>,
    pub duration: Option<i32>,
}

// ============================================
// Venue models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct VenueRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub directions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateVenueRow {
    pub name: String,
    pub address: String,
    pub directions: Option<String>,
}
