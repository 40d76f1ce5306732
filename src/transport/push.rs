//! # Push-connection seam.
//!
//! The server-push transport (EventSource/WebSocket plumbing) lives outside
//! this crate; the core talks to it through [`Connect`]. A connection is an
//! ephemeral resource scoped to the `(emote_set_id, user_id)` pair captured
//! at bulk-fetch time: it yields raw JSON messages in delivery order until
//! it ends, and carries a best-effort closer.
//!
//! ## Rules
//! - Exactly one connection per synchronizer at a time; the old one is
//!   closed before a new one opens.
//! - Close failures are swallowed by the caller; the resource may already
//!   be defunct.
//! - Message-level reconnection of the byte transport is the transport's
//!   own business; when the stream ends, the synchronizer reopens through
//!   [`Connect`] with backoff.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SyncError;
use crate::sync::PushScope;

/// Contract for opening a push connection.
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    /// Opens a push stream scoped to the given `(emote_set_id, user_id)`.
    async fn connect(&self, scope: &PushScope) -> Result<PushConnection, SyncError>;
}

/// Best-effort closer for a push connection.
///
/// Closing is advisory cleanup, not a correctness dependency; callers
/// ignore the result.
#[async_trait]
pub trait ClosePush: Send + 'static {
    /// Closes the connection.
    async fn close(self: Box<Self>) -> Result<(), SyncError>;
}

/// An open push connection: ordered raw messages plus its closer.
pub struct PushConnection {
    /// Raw JSON messages in delivery order; the stream ends when the
    /// connection is gone.
    pub messages: BoxStream<'static, String>,
    /// Best-effort closer.
    pub closer: Box<dyn ClosePush>,
}

/// No-op closer for transports whose stream drop is the close.
pub struct DropClose;

#[async_trait]
impl ClosePush for DropClose {
    async fn close(self: Box<Self>) -> Result<(), SyncError> {
        Ok(())
    }
}
