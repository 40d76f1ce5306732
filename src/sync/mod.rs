//! Channel emote synchronization.
//!
//! This module owns the live half of the crate: the state machine that
//! keeps one provider's catalog consistent with the channel's emote set.
//!
//! ## Contents
//! - [`Synchronizer`], [`SyncHandle`] — command-loop state machine and its
//!   cloneable handle (also a bus subscriber for channel/flag signals)
//! - [`ChannelContext`], [`PushScope`] — channel and connection identity
//! - delta application (crate-private) — pushed/pulled/updated rules
//!
//! ## Lifecycle
//! ```text
//! channel/flag signal ──► rebuild: close connection, clear catalog
//!        │
//!        └─► bulk fetch ──ok──► populate (skip unlisted) ──► open push
//!                 │                                            │
//!                 └─err─► empty catalog, wait for next signal  │
//!                                                              ▼
//!                                   deltas applied per message, one at a
//!                                   time; catalog.updated + notifications
//! ```

mod channel;
mod delta;
mod synchronizer;

pub use channel::{ChannelContext, PushScope};
pub use synchronizer::{SyncHandle, Synchronizer};
