//! # Catalog: ordered `code → Emote` mapping for one (provider, channel) pair.
//!
//! The catalog is the unit of storage and lookup. It is created empty when a
//! synchronizer is constructed, cleared and fully rebuilt on every channel or
//! settings change, and mutated only by delta application in between.
//!
//! ## Rules
//! - `code` is unique within a catalog; the most recent `set` wins.
//! - `id` is the stable join key used to find a record whose code changed.
//! - Iteration follows insertion order (deterministic for display; no other
//!   semantic weight).
//! - Deleting an absent code is a no-op, never an error.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::emotes::record::Emote;

/// Shared handle to a catalog.
///
/// Mutation happens only on the owning synchronizer's control task; readers
/// (the registry, consumers reacting to `CatalogUpdated`) take short read
/// locks and clone the records they need.
pub type CatalogRef = Arc<RwLock<Catalog>>;

/// Ordered mapping from emote code to [`Emote`], scoped to exactly one
/// (provider, channel) pair. Never shared across channels.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: IndexMap<Arc<str>, Emote>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates an empty catalog behind a shared handle.
    pub fn shared() -> CatalogRef {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Inserts or overwrites a record, keyed by its code. Last write wins.
    pub fn set(&mut self, record: Emote) {
        self.entries.insert(Arc::clone(&record.code), record);
    }

    /// Removes the record stored under `code`, if present. No-op otherwise.
    ///
    /// Uses a shifting removal so iteration order stays the insertion order
    /// of the surviving entries.
    pub fn delete(&mut self, code: &str) -> Option<Emote> {
        self.entries.shift_remove(code)
    }

    /// Removes all entries. Used before a full rebuild.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Looks up a record by its current code.
    pub fn get_by_code(&self, code: &str) -> Option<&Emote> {
        self.entries.get(code)
    }

    /// Looks up a record by its stable id.
    ///
    /// Linear scan over current entries; catalog sizes are bounded by a
    /// single channel's emote set, so this stays cheap.
    pub fn find_by_id(&self, id: &str) -> Option<&Emote> {
        self.entries.values().find(|emote| &*emote.id == id)
    }

    /// Iterates records in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Emote> {
        self.entries.values()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
