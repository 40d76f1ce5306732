//! # Channel and push-connection identity.
//!
//! [`ChannelContext`] names the currently active channel as reported by the
//! host page; [`PushScope`] is the `(emote_set_id, user_id)` pair captured
//! from a bulk-fetch response, addressing the push stream for that set.

use std::sync::Arc;

/// Identity of the active channel.
///
/// `platform` is the host platform identifier (e.g. `twitch`, `youtube`),
/// `id` the platform-side channel identifier. Both are opaque to this core;
/// the fetch transport composes them into the provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContext {
    /// Host platform identifier.
    pub platform: Arc<str>,
    /// Platform-side channel identifier.
    pub id: Arc<str>,
}

impl ChannelContext {
    /// Creates a channel context.
    pub fn new(platform: impl Into<Arc<str>>, id: impl Into<Arc<str>>) -> Self {
        Self {
            platform: platform.into(),
            id: id.into(),
        }
    }
}

/// Address of a push stream, captured at bulk-fetch time.
///
/// A new scope is captured on every rebuild; connections for an old scope
/// are closed before a new one opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushScope {
    /// Emote-set identifier from the fetch response.
    pub emote_set_id: Arc<str>,
    /// User identifier from the fetch response.
    pub user_id: Arc<str>,
}

impl PushScope {
    /// Creates a push scope.
    pub fn new(emote_set_id: impl Into<Arc<str>>, user_id: impl Into<Arc<str>>) -> Self {
        Self {
            emote_set_id: emote_set_id.into(),
            user_id: user_id.into(),
        }
    }
}
