//! Emote data model: records, per-provider catalogs, and the registry.
//!
//! ## Contents
//! - [`Emote`], [`EmoteOwner`], [`Category`], [`Provider`] — the immutable
//!   record and its static provider descriptors
//! - [`Catalog`], [`CatalogRef`] — ordered `code → Emote` storage for one
//!   (provider, channel) pair
//! - [`CatalogRegistry`] — read-only priority-ordered aggregation
//!
//! ## Quick wiring
//! ```text
//! Synchronizer (owns, mutates) ──► Catalog ◄── CatalogRegistry (reads)
//!                                     │
//!                              Emote records (immutable,
//!                              category shared by reference)
//! ```

mod catalog;
mod record;
mod registry;

pub use catalog::{Catalog, CatalogRef};
pub use record::{Category, Emote, EmoteOwner, Provider, SEVENTV_CHANNEL};
pub use registry::CatalogRegistry;
