//! Catalog events: types and the publish/subscribe bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! announce catalog changes, channel-context changes, and sync diagnostics
//! to interested consumers (rendering, notifications).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — ordered, panic-isolated fan-out to registered subscribers
//!
//! ## Quick reference
//! - **Publishers**: `Synchronizer` (catalog changes, notifications, sync
//!   diagnostics) and external collaborators (channel/settings signals).
//! - **Consumers**: anything implementing
//!   [`Subscriber`](crate::subscribers::Subscriber) — including the
//!   synchronizer handle itself, which reacts to `ChannelUpdated` and
//!   `FeatureToggled`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
