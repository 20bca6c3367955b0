// Trait seams between the coordinator and its collaborators
//
// The reconciliation coordinator is written against these traits so the
// fragile pieces (provider string-matching, blob storage) can be swapped or
// faked independently of the flow.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{EventError, Result};
use crate::event::Speaker;
use crate::pricing::PricingTierSet;

/// Resolves speaker identifiers to speaker records. Pure lookup; owns no
/// lifecycle.
#[async_trait]
pub trait SpeakerResolver: Send + Sync {
    async fn speaker_by_id(&self, id: Uuid) -> Result<Option<Speaker>>;
}

/// Resolve every submitted speaker id, failing the whole set on the first
/// unresolvable one. The caller sees a not-found error naming the offending
/// identifier, never a partial speaker list.
pub async fn resolve_speakers(
    resolver: &dyn SpeakerResolver,
    ids: &[Uuid],
) -> Result<Vec<Speaker>> {
    let mut speakers = Vec::with_capacity(ids.len());
    for id in ids {
        match resolver.speaker_by_id(*id).await? {
            Some(speaker) => speakers.push(speaker),
            None => return Err(EventError::not_found("speaker", id)),
        }
    }
    Ok(speakers)
}

/// Opaque reference to an externally-hosted payment button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRef(pub String);

/// Find the provider-side button belonging to one of our events.
/// The production implementation runs the search+fetch+match sequence; the
/// heuristic lives entirely behind this seam.
#[async_trait]
pub trait ButtonLookup: Send + Sync {
    async fn find_by_owner_id(&self, owner_id: &str) -> Result<Option<ButtonRef>>;
}

/// Everything the synchronizer needs to bring a button in line with an
/// event's current pricing
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    /// Our event identity, embedded verbatim in the button metadata
    pub item_id: String,
    pub title: String,
    pub tiers: PricingTierSet,
    /// Known button reference; when set, the sync is an explicit update and
    /// the search/match sequence is skipped
    pub booking_code: Option<String>,
    /// Import mode: the button must already exist provider-side, and a
    /// failed match is fatal instead of falling through to create
    pub require_existing: bool,
}

/// Make the external payment button match the event's pricing, returning the
/// provider-assigned button identifier.
#[async_trait]
pub trait ButtonSync: Send + Sync {
    async fn synchronize(&self, spec: &ButtonSpec) -> Result<String>;
}

/// Blob storage for event images
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn blob_exists(&self, path: &str) -> Result<bool>;

    /// Upload base64-encoded data under `destination`; `filename` is the
    /// client-supplied name, kept for logging only
    async fn upload_from_base64(&self, filename: &str, destination: &str, data: &str)
        -> Result<()>;
}
