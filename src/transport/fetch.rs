//! # Bulk-fetch seam.
//!
//! The HTTP transport itself lives outside this crate; the core talks to it
//! through [`FetchEmoteSet`]. A production implementation issues the
//! provider `GET` keyed by `(owner_identifier, channel_identifier)` and
//! deserializes the JSON body into [`ChannelEmotePayload`]; tests plug in
//! fakes returning canned payloads.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::sync::ChannelContext;
use crate::transport::wire::ChannelEmotePayload;

/// Contract for the bulk emote-set fetch.
///
/// A non-200 response or malformed body surfaces as [`SyncError::Fetch`] /
/// [`SyncError::Payload`]; the synchronizer does not retry.
#[async_trait]
pub trait FetchEmoteSet: Send + Sync + 'static {
    /// Fetches the active emote set for the given channel.
    async fn fetch(&self, channel: &ChannelContext) -> Result<ChannelEmotePayload, SyncError>;
}
