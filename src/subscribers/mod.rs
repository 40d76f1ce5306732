//! # Event subscribers.
//!
//! This module provides the [`Subscriber`] trait and a built-in stdout
//! implementation for handling events delivered through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Synchronizer ── publish(Event) ──► Bus ──► in-order delivery
//!                                               │
//!                                               ├──► Subscriber::handle(&Event)
//!                                               │         │
//!                                               │    ┌────┴────┬─────────┐
//!                                               │    ▼         ▼         ▼
//!                                               │  LogWriter  Render   Custom
//!                                               │
//!                                               └──► SyncHandle (channel/flag signals)
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use emotesync::{Subscriber, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Notifier;
//!
//! #[async_trait]
//! impl Subscriber for Notifier {
//!     async fn handle(&self, event: &Event) {
//!         if event.kind == EventKind::Notification {
//!             // surface event.text to the user...
//!         }
//!     }
//! }
//! ```

mod log;
mod subscriber;

pub use log::LogWriter;
pub use subscriber::Subscriber;
