// Domain vocabulary shared by the API and storage layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EventError, Result};

/// Moderation state of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    Draft,
    Approved,
    Rejected,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Draft => "draft",
            EventState::Approved => "approved",
            EventState::Rejected => "rejected",
        }
    }
}

impl From<&str> for EventState {
    fn from(s: &str) -> Self {
        match s {
            "approved" => EventState::Approved,
            "rejected" => EventState::Rejected,
            _ => EventState::Draft,
        }
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A speaker record. Parent references nest at most one level: a speaker
/// with a parent must not itself be referenced as a parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Fee and conc_fee must be both present or both absent
pub fn validate_pricing(fee: Option<i32>, conc_fee: Option<i32>) -> Result<()> {
    match (fee, conc_fee) {
        (Some(_), Some(_)) | (None, None) => Ok(()),
        _ => Err(EventError::validation(
            "fee and conc_fee must be set together",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_state_round_trip() {
        for state in [EventState::Draft, EventState::Approved, EventState::Rejected] {
            assert_eq!(EventState::from(state.as_str()), state);
        }
    }

    #[test]
    fn test_event_state_unknown_defaults_to_draft() {
        assert_eq!(EventState::from("archived"), EventState::Draft);
    }

    #[test]
    fn test_validate_pricing() {
        assert!(validate_pricing(None, None).is_ok());
        assert!(validate_pricing(Some(5), Some(3)).is_ok());
        assert!(validate_pricing(Some(5), None).is_err());
        assert!(validate_pricing(None, Some(3)).is_err());
    }
}
