// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Provides the same API as the Postgres repository backed by HashMaps, so
// the server and the coordinator tests can run without a database. All data
// is lost on restart.

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::*;

#[derive(Default)]
pub struct InMemoryDatabase {
    events: RwLock<HashMap<Uuid, EventRow>>,
    event_dates: RwLock<HashMap<Uuid, EventDateRow>>,
    date_speakers: RwLock<HashMap<Uuid, Vec<Uuid>>>,
    speakers: RwLock<HashMap<Uuid, SpeakerRow>>,
    event_types: RwLock<HashMap<Uuid, EventTypeRow>>,
    venues: RwLock<HashMap<Uuid, VenueRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn sorted_events(rows: Vec<EventRow>) -> Vec<EventRow> {
        let mut rows = rows;
        rows.sort_by_key(|row| row.created_at);
        rows
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = EventRow {
            id: Uuid::now_v7(),
            event_type_id: input.event_type_id,
            venue_id: input.venue_id,
            title: input.title,
            sub_title: input.sub_title,
            description: input.description,
            booking_code: input.booking_code,
            image_filename: input.image_filename,
            fee: input.fee,
            conc_fee: input.conc_fee,
            multi_day_fee: input.multi_day_fee,
            multi_day_conc_fee: input.multi_day_conc_fee,
            event_state: input.event_state,
            created_at: Self::now(),
        };
        self.events.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        Ok(Self::sorted_events(
            self.events.read().values().cloned().collect(),
        ))
    }

    pub async fn list_events_in_year(&self, year: i32) -> Result<Vec<EventRow>> {
        let dates = self.event_dates.read();
        let rows = self
            .events
            .read()
            .values()
            .filter(|event| {
                dates
                    .values()
                    .any(|d| d.event_id == event.id && d.event_datetime.year() == year)
            })
            .cloned()
            .collect();
        Ok(Self::sorted_events(rows))
    }

    pub async fn list_future_events(&self) -> Result<Vec<EventRow>> {
        let today = Self::now().date_naive().and_hms_opt(0, 0, 0).unwrap();
        let dates = self.event_dates.read();
        let rows = self
            .events
            .read()
            .values()
            .filter(|event| {
                dates
                    .values()
                    .any(|d| d.event_id == event.id && d.event_datetime >= today)
            })
            .cloned()
            .collect();
        Ok(Self::sorted_events(rows))
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        let mut events = self.events.write();
        let Some(row) = events.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(event_type_id) = input.event_type_id {
            row.event_type_id = event_type_id;
        }
        if let Some(venue_id) = input.venue_id {
            row.venue_id = venue_id;
        }
        if let Some(title) = input.title {
            row.title = title;
        }
        if let Some(sub_title) = input.sub_title {
            row.sub_title = Some(sub_title);
        }
        if let Some(description) = input.description {
            row.description = description;
        }
        if let Some(booking_code) = input.booking_code {
            row.booking_code = Some(booking_code);
        }
        if let Some(image_filename) = input.image_filename {
            row.image_filename = Some(image_filename);
        }
        if let Some(fee) = input.fee {
            row.fee = Some(fee);
        }
        if let Some(conc_fee) = input.conc_fee {
            row.conc_fee = Some(conc_fee);
        }
        if let Some(multi_day_fee) = input.multi_day_fee {
            row.multi_day_fee = Some(multi_day_fee);
        }
        if let Some(multi_day_conc_fee) = input.multi_day_conc_fee {
            row.multi_day_conc_fee = Some(multi_day_conc_fee);
        }
        if let Some(event_state) = input.event_state {
            row.event_state = event_state;
        }

        Ok(Some(row.clone()))
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let removed = self.events.write().remove(&id).is_some();
        if removed {
            let mut dates = self.event_dates.write();
            let mut speakers = self.date_speakers.write();
            let owned: Vec<Uuid> = dates
                .values()
                .filter(|d| d.event_id == id)
                .map(|d| d.id)
                .collect();
            for date_id in owned {
                dates.remove(&date_id);
                speakers.remove(&date_id);
            }
        }
        Ok(removed)
    }

    // ============================================
    // Occurrences (event dates)
    // ============================================

    pub async fn create_event_date(&self, input: CreateEventDateRow) -> Result<EventDateRow> {
        let row = EventDateRow {
            id: Uuid::now_v7(),
            event_id: input.event_id,
            event_datetime: input.event_datetime,
            end_time: input.end_time,
            created_at: Self::now(),
        };
        self.event_dates.write().insert(row.id, row.clone());
        self.date_speakers.write().insert(row.id, input.speaker_ids);
        Ok(row)
    }

    pub async fn list_event_dates(&self, event_id: Uuid) -> Result<Vec<EventDateRow>> {
        let mut rows: Vec<EventDateRow> = self
            .event_dates
            .read()
            .values()
            .filter(|d| d.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.event_datetime);
        Ok(rows)
    }

    pub async fn event_date_speaker_ids(&self, event_date_id: Uuid) -> Result<Vec<Uuid>> {
        let mut ids = self
            .date_speakers
            .read()
            .get(&event_date_id)
            .cloned()
            .unwrap_or_default();
        ids.sort();
        Ok(ids)
    }

    pub async fn replace_event_date_speakers(
        &self,
        event_date_id: Uuid,
        speaker_ids: &[Uuid],
    ) -> Result<()> {
        self.date_speakers
            .write()
            .insert(event_date_id, speaker_ids.to_vec());
        Ok(())
    }

    // ============================================
    // Speakers
    // ============================================

    pub async fn create_speaker(&self, input: CreateSpeakerRow) -> Result<SpeakerRow> {
        let row = SpeakerRow {
            id: Uuid::now_v7(),
            name: input.name,
            parent_id: input.parent_id,
            created_at: Self::now(),
        };
        self.speakers.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>> {
        Ok(self.speakers.read().get(&id).cloned())
    }

    pub async fn list_speakers(&self) -> Result<Vec<SpeakerRow>> {
        let mut rows: Vec<SpeakerRow> = self.speakers.read().values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    // ============================================
    // Event types
    // ============================================

    pub async fn create_event_type(&self, input: CreateEventTypeRow) -> Result<EventTypeRow> {
        let row = EventTypeRow {
            id: Uuid::now_v7(),
            event_type: input.event_type,
            event_desc: input.event_desc,
            duration: input.duration,
            created_at: Self::now(),
        };
        self.event_types.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_event_type(&self, id: Uuid) -> Result<Option<EventTypeRow>> {
        Ok(self.event_types.read().get(&id).cloned())
    }

    pub async fn list_event_types(&self) -> Result<Vec<EventTypeRow>> {
        let mut rows: Vec<EventTypeRow> = self.event_types.read().values().cloned().collect();
        rows.sort_by(|a, b| a.event_type.cmp(&b.event_type));
        Ok(rows)
    }

    // ============================================
    // Venues
    // ============================================

    pub async fn create_venue(&self, input: CreateVenueRow) -> Result<VenueRow> {
        let row = VenueRow {
            id: Uuid::now_v7(),
            name: input.name,
            address: input.address,
            directions: input.directions,
            created_at: Self::now(),
        };
        self.venues.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_venue(&self, id: Uuid) -> Result<Option<VenueRow>> {
        Ok(self.venues.read().get(&id).cloned())
    }
}
