//! Error types used by the synchronization core.
//!
//! Everything here is non-fatal by design: the worst outcome of any failure
//! is "no live emotes" for the affected provider. Errors are reported on the
//! bus or logged, never escalated to the host process.
//!
//! Taxonomy:
//! - [`SyncError::Fetch`] — the bulk-fetch request failed (network, non-200,
//!   unreadable body).
//! - [`SyncError::Connect`] — the push connection could not be opened.
//! - [`SyncError::Payload`] — a single message or response had an unexpected
//!   JSON shape; isolated to that message.
//! - [`SyncError::Stale`] — a response arrived for a rebuild cycle that has
//!   already been superseded; the payload is discarded.

use thiserror::Error;

/// # Errors produced by catalog synchronization.
///
/// None of these is retryable by the core itself beyond the push-listener
/// reconnect loop; a fresh channel or settings signal restarts the cycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SyncError {
    /// Bulk emote-set fetch failed.
    #[error("bulk fetch failed: {message}")]
    Fetch {
        /// Transport-level description of the failure.
        message: String,
    },

    /// Opening the push connection failed.
    #[error("push connect failed: {message}")]
    Connect {
        /// Transport-level description of the failure.
        message: String,
    },

    /// A payload did not match the expected wire shape.
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A response resolved after its rebuild cycle was superseded.
    #[error("stale response for superseded generation {generation}")]
    Stale {
        /// Generation the response was issued for.
        generation: u64,
    },
}

impl SyncError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use emotesync::SyncError;
    ///
    /// let err = SyncError::Fetch { message: "timeout".into() };
    /// assert_eq!(err.as_label(), "sync_fetch_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SyncError::Fetch { .. } => "sync_fetch_failed",
            SyncError::Connect { .. } => "sync_connect_failed",
            SyncError::Payload(_) => "sync_malformed_payload",
            SyncError::Stale { .. } => "sync_stale_response",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SyncError::Fetch { message } => format!("fetch: {message}"),
            SyncError::Connect { message } => format!("connect: {message}"),
            SyncError::Payload(err) => format!("payload: {err}"),
            SyncError::Stale { generation } => format!("stale: generation {generation}"),
        }
    }

    /// Convenience constructor for transport fetch failures.
    pub fn fetch(message: impl Into<String>) -> Self {
        SyncError::Fetch {
            message: message.into(),
        }
    }

    /// Convenience constructor for transport connect failures.
    pub fn connect(message: impl Into<String>) -> Self {
        SyncError::Connect {
            message: message.into(),
        }
    }
}
