// Agenda core
//
// Domain model and pure logic for the event backend:
// - occurrence sets and the timestamp-keyed diff engine
// - pricing snapshots and the payment-button tier builder
// - trait seams for storage, speaker resolution, button sync, and assets

pub mod error;
pub mod event;
pub mod occurrence;
pub mod pricing;
pub mod reconcile;
pub mod traits;

pub use error::{EventError, Result};
pub use event::{validate_pricing, EventState, Speaker};
pub use occurrence::{parse_event_datetime, slot_key, PersistedOccurrence, SubmittedOccurrence};
pub use pricing::{PricingSnapshot, PricingTier, PricingTierSet, MEMBER_TIER_PRICE};
pub use reconcile::{reconcile, OccurrencePlan, SlotUpdate};
pub use traits::{
    resolve_speakers, AssetStore, ButtonLookup, ButtonRef, ButtonSpec, ButtonSync, SpeakerResolver,
};
