// PayPal hosted-button synchronization
//
// The provider exposes no stable foreign key for buttons, so ownership is
// recovered by searching a recent time window and matching the item number
// embedded in each candidate's metadata. That heuristic lives behind the
// ButtonLookup seam; ButtonSynchronizer layers the create-or-update protocol
// on top of it.

pub mod client;
pub mod error;
pub mod nvp;
pub mod sync;

pub use client::{PaypalClient, PaypalConfig, SEARCH_BACK_DAYS};
pub use error::PaypalError;
pub use sync::ButtonSynchronizer;
