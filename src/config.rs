//! # Synchronizer configuration.
//!
//! Provides [`SyncConfig`], the per-synchronizer settings bundle passed to
//! [`Synchronizer::spawn`](crate::sync::Synchronizer::spawn).
//!
//! ## Sentinel values
//! - `max_reconnect_attempts = 0` → unlimited reconnect attempts

use crate::policies::BackoffPolicy;

/// Configuration for one channel-emote synchronizer.
///
/// ## Field semantics
/// - `enabled`: initial feature-flag state; later toggles arrive as
///   `FeatureToggled` events or through the handle
/// - `reconnect`: delay policy between push-connection reconnect attempts
/// - `max_reconnect_attempts`: cap on consecutive failed reconnects
///   (`0` = unlimited); the counter resets on a successful connect
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Whether live emotes are enabled at construction time.
    pub enabled: bool,

    /// Backoff policy for reopening a lost push connection.
    pub reconnect: BackoffPolicy,

    /// Maximum consecutive reconnect attempts before giving up until the
    /// next channel or settings signal. `0` = unlimited.
    pub max_reconnect_attempts: u32,
}

impl Default for SyncConfig {
    /// Returns a config with the feature enabled, default backoff
    /// (1s doubling, capped at 60s), and at most 10 reconnect attempts.
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect: BackoffPolicy::default(),
            max_reconnect_attempts: 10,
        }
    }
}

impl SyncConfig {
    /// Returns the reconnect-attempt cap as an `Option`, mapping the `0`
    /// sentinel to `None` (unlimited).
    pub fn reconnect_cap(&self) -> Option<u32> {
        match self.max_reconnect_attempts {
            0 => None,
            n => Some(n),
        }
    }
}
