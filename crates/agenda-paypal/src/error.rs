// Error types for the hosted-button API

use thiserror::Error;

/// Errors surfaced by the payment provider.
/// None of these are retried here; the caller decides whether they are fatal.
#[derive(Debug, Error)]
pub enum PaypalError {
    /// The provider answered with a non-success ACK; carries the provider's
    /// own message text
    #[error("Paypal error: {message}")]
    Rejected { message: String },

    /// A caller required an existing button (import mode) and no candidate
    /// matched the item id
    #[error("Paypal error: button for {item_id} not found")]
    ButtonNotFound { item_id: String },

    /// A field the protocol guarantees was absent from the response
    #[error("Paypal error: missing {0} in response")]
    MissingField(&'static str),

    /// Transport-level failure; surfaces directly, no retry
    #[error("Paypal request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
