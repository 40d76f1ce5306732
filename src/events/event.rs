//! # Catalog events published on the bus.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Catalog events**: structural changes consumers react to by re-reading
//!   the registry (`CatalogUpdated`), plus user-facing `Notification` texts.
//! - **Context signals**: `ChannelUpdated` and `FeatureToggled`, produced by
//!   external collaborators (page watcher, settings store) and consumed by
//!   synchronizers.
//! - **Sync diagnostics**: lifecycle of the bulk fetch and push connection.
//!
//! The [`Event`] struct carries optional metadata (provider, notification
//! text, failure reason, channel context) set per kind.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically, assigned at construction on the publishing task.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::emotes::Provider;
use crate::sync::ChannelContext;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of catalog events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Catalog events ===
    /// A catalog changed structurally; consumers re-read the registry.
    ///
    /// Sets:
    /// - `provider`: owning provider
    /// - `at` / `seq`
    CatalogUpdated,

    /// Human-readable text for display to the user (emote added/removed).
    ///
    /// Sets:
    /// - `provider`: owning provider
    /// - `text`: display string
    /// - `at` / `seq`
    Notification,

    // === Context signals (consumed, not produced, by this crate) ===
    /// The active channel changed.
    ///
    /// Sets:
    /// - `channel`: new channel context (absent = no active channel)
    /// - `at` / `seq`
    ChannelUpdated,

    /// The emote feature flag toggled.
    ///
    /// Sets:
    /// - `enabled`: new flag value
    /// - `at` / `seq`
    FeatureToggled,

    // === Sync diagnostics ===
    /// A bulk fetch started for the active channel.
    ///
    /// Sets:
    /// - `provider`
    /// - `at` / `seq`
    SyncStarted,

    /// A bulk fetch failed; the catalog stays empty.
    ///
    /// Sets:
    /// - `provider`
    /// - `reason`: failure message
    /// - `at` / `seq`
    SyncFailed,

    /// The push connection is open; deltas will flow.
    ///
    /// Sets:
    /// - `provider`
    /// - `at` / `seq`
    PushConnected,

    /// The push connection ended or could not be opened.
    ///
    /// Sets:
    /// - `provider`
    /// - `reason`: failure message, when one exists
    /// - `at` / `seq`
    PushLost,
}

/// Catalog event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Provider the event concerns, if applicable.
    pub provider: Option<Provider>,
    /// Human-readable display text (`Notification`).
    pub text: Option<Arc<str>>,
    /// Human-readable failure reason (`SyncFailed`, `PushLost`).
    pub reason: Option<Arc<str>>,
    /// Channel context (`ChannelUpdated`); absent means no active channel.
    pub channel: Option<ChannelContext>,
    /// New feature-flag value (`FeatureToggled`).
    pub enabled: Option<bool>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            provider: None,
            text: None,
            reason: None,
            channel: None,
            enabled: None,
        }
    }

    /// Attaches the provider the event concerns.
    #[inline]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Attaches a display text.
    #[inline]
    pub fn with_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attaches a failure reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a channel context.
    #[inline]
    pub fn with_channel(mut self, channel: ChannelContext) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Attaches a feature-flag value.
    #[inline]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Creates a `CatalogUpdated` event for a provider.
    #[inline]
    pub fn catalog_updated(provider: Provider) -> Self {
        Event::new(EventKind::CatalogUpdated).with_provider(provider)
    }

    /// Creates a `Notification` event with display text.
    #[inline]
    pub fn notification(provider: Provider, text: impl Into<Arc<str>>) -> Self {
        Event::new(EventKind::Notification)
            .with_provider(provider)
            .with_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::CatalogUpdated);
        let b = Event::new(EventKind::CatalogUpdated);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::notification(Provider::SevenTv, "added");
        assert_eq!(ev.kind, EventKind::Notification);
        assert_eq!(ev.provider, Some(Provider::SevenTv));
        assert_eq!(ev.text.as_deref(), Some("added"));
    }
}
