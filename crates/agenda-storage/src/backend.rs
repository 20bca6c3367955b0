// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// A unified StorageBackend that works with either PostgreSQL (production)
// or in-memory storage (dev mode and coordinator tests).

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use agenda_core::{EventError, Speaker, SpeakerResolver};

use crate::memory::InMemoryDatabase;
use crate::models::*;
use crate::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Get the PostgreSQL pool if using PostgreSQL backend
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        match self {
            Self::Postgres(db) => db.create_event(input).await,
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_events().await,
            Self::InMemory(db) => db.list_events().await,
        }
    }

    pub async fn list_events_in_year(&self, year: i32) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_events_in_year(year).await,
            Self::InMemory(db) => db.list_events_in_year(year).await,
        }
    }

    pub async fn list_future_events(&self) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_future_events().await,
            Self::InMemory(db) => db.list_future_events().await,
        }
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.update_event(id, input).await,
            Self::InMemory(db) => db.update_event(id, input).await,
        }
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_event(id).await,
            Self::InMemory(db) => db.delete_event(id).await,
        }
    }

    // ============================================
    // Occurrences (event dates)
    // ============================================

    pub async fn create_event_date(&self, input: CreateEventDateRow) -> Result<EventDateRow> {
        match self {
            Self::Postgres(db) => db.create_event_date(input).await,
            Self::InMemory(db) => db.create_event_date(input).await,
        }
    }

    pub async fn list_event_dates(&self, event_id: Uuid) -> Result<Vec<EventDateRow>> {
        match self {
            Self::Postgres(db) => db.list_event_dates(event_id).await,
            Self::InMemory(db) => db.list_event_dates(event_id).await,
        }
    }

    pub async fn event_date_speaker_ids(&self, event_date_id: Uuid) -> Result<Vec<Uuid>> {
        match self {
            Self::Postgres(db) => db.event_date_speaker_ids(event_date_id).await,
            Self::InMemory(db) => db.event_date_speaker_ids(event_date_id).await,
        }
    }

    pub async fn replace_event_date_speakers(
        &self,
        event_date_id: Uuid,
        speaker_ids: &[Uuid],
    ) -> Result<()> {
        match self {
            Self::Postgres(db) => {
                db.replace_event_date_speakers(event_date_id, speaker_ids)
                    .await
            }
            Self::InMemory(db) => {
                db.replace_event_date_speakers(event_date_id, speaker_ids)
                    .await
            }
        }
    }

    // ============================================
    // Speakers
    // ============================================

    pub async fn create_speaker(&self, input: CreateSpeakerRow) -> Result<SpeakerRow> {
        match self {
            Self::Postgres(db) => db.create_speaker(input).await,
            Self::InMemory(db) => db.create_speaker(input).await,
        }
    }

    pub async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>> {
        match self {
            Self::Postgres(db) => db.get_speaker(id).await,
            Self::InMemory(db) => db.get_speaker(id).await,
        }
    }

    /// Speakers sorted by surname (last whitespace-separated token)
    pub async fn list_speakers(&self) -> Result<Vec<SpeakerRow>> {
        let mut rows = match self {
            Self::Postgres(db) => db.list_speakers().await?,
            Self::InMemory(db) => db.list_speakers().await?,
        };
        rows.sort_by_key(|speaker| {
            speaker
                .name
                .rsplit(' ')
                .next()
                .unwrap_or_default()
                .to_string()
        });
        Ok(rows)
    }

    // ============================================
    // Event types
    // ============================================

    pub async fn create_event_type(&self, input: CreateEventTypeRow) -> Result<EventTypeRow> {
        match self {
            Self::Postgres(db) => db.create_event_type(input).await,
            Self::InMemory(db) => db.create_event_type(input).await,
        }
    }

    pub async fn get_event_type(&self, id: Uuid) -> Result<Option<EventTypeRow>> {
        match self {
            Self::Postgres(db) => db.get_event_type(id).await,
            Self::InMemory(db) => db.get_event_type(id).await,
        }
    }

    pub async fn list_event_types(&self) -> Result<Vec<EventTypeRow>> {
        match self {
            Self::Postgres(db) => db.list_event_types().await,
            Self::InMemory(db) => db.list_event_types().await,
        }
    }

    // ============================================
    // Venues
    // ============================================

    pub async fn create_venue(&self, input: CreateVenueRow) -> Result<VenueRow> {
        match self {
            Self::Postgres(db) => db.create_venue(input).await,
            Self::InMemory(db) => db.create_venue(input).await,
        }
    }

    pub async fn get_venue(&self, id: Uuid) -> Result<Option<VenueRow>> {
        match self {
            Self::Postgres(db) => db.get_venue(id).await,
            Self::InMemory(db) => db.get_venue(id).await,
        }
    }
}

#[async_trait]
impl SpeakerResolver for StorageBackend {
    async fn speaker_by_id(&self, id: Uuid) -> agenda_core::Result<Option<Speaker>> {
        let row = self.get_speaker(id).await.map_err(EventError::Storage)?;
        Ok(row.map(|row| Speaker {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
        }))
    }
}
