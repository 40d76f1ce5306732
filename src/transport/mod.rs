//! Transport boundary: wire payload model and seam traits.
//!
//! The byte-level transports (HTTP fetch, server-push stream) are external
//! collaborators. This module defines what the core consumes from them:
//!
//! ## Contents
//! - [`FetchEmoteSet`] — bulk-fetch seam returning a [`ChannelEmotePayload`]
//! - [`Connect`], [`PushConnection`], [`ClosePush`] — push-stream seam
//! - wire types — serde model of fetch responses and push messages

mod fetch;
mod push;
mod wire;

pub use fetch::FetchEmoteSet;
pub use push::{ClosePush, Connect, DropClose, PushConnection};
pub use wire::{
    ChannelEmotePayload, EmoteData, EmoteEntry, EmoteSetPayload, OldValue, OwnerPayload, PushBody,
    PushKind, PushMessage, PushedEntry, PushedValue, PulledEntry, UpdatedEntry, UserPayload,
};
