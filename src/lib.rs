//! # emotesync
//!
//! **emotesync** keeps a locally cached, keyed collection of chat emotes
//! consistent with its provider: an initial bulk fetch rebuilds the catalog,
//! then an incremental push stream delivers add/remove/rename deltas that
//! are applied one message at a time. Consumers learn about changes through
//! a process-wide event bus.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────┐      ┌───────────────┐
//!     │ FetchEmoteSet │      │    Connect    │   (transport seams,
//!     │  (bulk fetch) │      │ (push stream) │    implemented outside)
//!     └──────┬────────┘      └──────┬────────┘
//!            ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Synchronizer (per provider, command loop)                        │
//! │  - Idle / Syncing / Live state machine                            │
//! │  - generation counter (stale responses, dead connections)         │
//! │  - delta application (pushed / pulled / updated)                  │
//! │  - reconnect with BackoffPolicy + JitterPolicy                    │
//! └──────┬───────────────────────────────┬────────────────────────────┘
//!        │ owns, mutates                 │ publishes
//!        ▼                               ▼
//! ┌──────────────┐              ┌────────────────────┐
//! │   Catalog    │              │        Bus         │
//! │ code → Emote │              │ ordered, isolated  │
//! └──────┬───────┘              └───────┬────────────┘
//!        │ reads                        │ Subscriber::handle(&Event)
//!        ▼                        ┌─────┴─────┬───────────┐
//! ┌──────────────────┐            ▼           ▼           ▼
//! │ CatalogRegistry  │        LogWriter   rendering   SyncHandle
//! │ (priority order) │                                (channel/flag
//! └──────────────────┘                                 signals in)
//! ```
//!
//! ### Lifecycle
//! ```text
//! channel changed / flag toggled
//!   └─► close push connection (errors swallowed) ─► clear catalog
//!         ├─ disabled or no channel ─► Idle (stay empty)
//!         └─ else ─► bulk fetch ──ok──► populate, skip unlisted
//!                        │                 └─► open push ─► Live
//!                        └─err─► log, stay empty, no retry
//!
//! while Live:
//!   user.update        ─► full resync (run the lifecycle again)
//!   emote_set.update   ─► apply deltas, publish catalog.updated
//!                         + one notification per affected entry
//!   stream ends        ─► reconnect with backoff, catalog kept
//! ```
//!
//! ## Guarantees
//! - One command at a time: catalog mutation and bus publication never
//!   interleave with another push message.
//! - Stale bulk-fetch responses for a superseded channel are detected via
//!   a generation counter and discarded.
//! - A malformed push message is dropped alone; the connection and the
//!   catalog survive.
//! - No failure in this crate is fatal: the degraded mode is always
//!   "no live emotes", never a crash.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use emotesync::{
//!     Bus, CatalogRegistry, ChannelContext, Event, EventKind, LogWriter,
//!     SyncConfig, Synchronizer, SEVENTV_CHANNEL,
//! };
//! # use emotesync::{FetchEmoteSet, Connect};
//! # async fn demo(fetcher: Arc<dyn FetchEmoteSet>, connector: Arc<dyn Connect>) {
//! let bus = Bus::new();
//! bus.subscribe(Arc::new(LogWriter));
//!
//! let handle = Synchronizer::spawn(
//!     &SEVENTV_CHANNEL,
//!     SyncConfig::default(),
//!     fetcher,
//!     connector,
//!     bus.clone(),
//! );
//!
//! let mut registry = CatalogRegistry::new();
//! registry.register(handle.provider(), handle.catalog());
//!
//! // external signals arrive on the bus
//! bus.subscribe(Arc::new(handle.clone()));
//! bus.publish(
//!     &Event::new(EventKind::ChannelUpdated)
//!         .with_channel(ChannelContext::new("twitch", "12345")),
//! )
//! .await;
//! # }
//! ```

mod config;
mod emotes;
mod error;
mod events;
mod policies;
mod subscribers;
mod sync;
mod transport;

pub use config::SyncConfig;
pub use emotes::{
    Catalog, CatalogRef, CatalogRegistry, Category, Emote, EmoteOwner, Provider, SEVENTV_CHANNEL,
};
pub use error::SyncError;
pub use events::{Bus, Event, EventKind};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscribers::{LogWriter, Subscriber};
pub use sync::{ChannelContext, PushScope, SyncHandle, Synchronizer};
pub use transport::{
    ChannelEmotePayload, ClosePush, Connect, DropClose, EmoteData, EmoteEntry, EmoteSetPayload,
    FetchEmoteSet, OldValue, OwnerPayload, PushBody, PushConnection, PushKind, PushMessage,
    PushedEntry, PushedValue, PulledEntry, UpdatedEntry, UserPayload,
};
