// Occurrence sets
//
// An occurrence is one concrete date/time instance of an event. Within one
// event no two occurrences share a slot: identity is the timestamp rendered
// at minute precision, enforced by the diff engine rather than storage.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::{EventError, Result};

/// Slot key format: timestamp at minute precision
pub const SLOT_KEY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the matching key for an occurrence timestamp.
/// Two occurrences with the same key are the same slot regardless of any
/// other field.
pub fn slot_key(datetime: &NaiveDateTime) -> String {
    datetime.format(SLOT_KEY_FORMAT).to_string()
}

/// Parse a client-submitted occurrence timestamp.
/// Accepts minute precision (`2019-03-01 19:00`) and second precision
/// (`2019-03-01 19:00:00`); anything else is a validation error.
pub fn parse_event_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, SLOT_KEY_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| EventError::validation(format!("malformed event date: {value}")))
}

/// A client-submitted occurrence, before persistence.
/// Speaker references are duplicate-free by speaker identity and
/// order-insignificant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOccurrence {
    pub event_datetime: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub speaker_ids: Vec<Uuid>,
}

impl SubmittedOccurrence {
    pub fn new(
        event_datetime: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        speaker_ids: Vec<Uuid>,
    ) -> Self {
        Self {
            event_datetime,
            end_time,
            speaker_ids: dedup_speakers(speaker_ids),
        }
    }

    pub fn slot(&self) -> String {
        slot_key(&self.event_datetime)
    }
}

/// A persisted occurrence as read back from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOccurrence {
    pub id: Uuid,
    pub event_datetime: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub speaker_ids: Vec<Uuid>,
}

impl PersistedOccurrence {
    pub fn slot(&self) -> String {
        slot_key(&self.event_datetime)
    }
}

/// Drop duplicate speaker ids, keeping first occurrence order
pub(crate) fn dedup_speakers(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
