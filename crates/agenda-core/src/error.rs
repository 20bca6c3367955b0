// Error types for event reconciliation

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors that can occur while processing an event mutation
#[derive(Debug, Error)]
pub enum EventError {
    /// Structurally invalid input, rejected before any mutation runs
    #[error("invalid request: {0}")]
    Validation(String),

    /// A referenced entity does not exist; reconciliation cannot proceed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The payment provider rejected an operation or a match precondition failed.
    /// Non-fatal on the update-pricing path, fatal everywhere else.
    #[error("{0}")]
    Payment(String),

    /// Underlying store failure; never downgraded
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl EventError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EventError::Validation(msg.into())
    }

    /// Create a not-found error for a referenced entity
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        EventError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a payment provider error
    pub fn payment(msg: impl Into<String>) -> Self {
        EventError::Payment(msg.into())
    }
}
