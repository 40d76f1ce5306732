//! # CatalogRegistry: one queryable surface over per-provider catalogs.
//!
//! Synchronizers own and mutate their catalogs; the registry only reads.
//! Catalogs are registered once at startup and queried in fixed
//! provider-priority order (the [`Provider`] discriminant order), so a code
//! collision across providers resolves deterministically to the
//! highest-priority provider.
//!
//! Lookups clone the matched record ([`Emote`] is cheap to clone) so no lock
//! is held while the caller works with the result.

use std::sync::PoisonError;

use crate::emotes::catalog::CatalogRef;
use crate::emotes::record::{Emote, Provider};

/// Read-only aggregation of per-provider catalogs.
#[derive(Default)]
pub struct CatalogRegistry {
    catalogs: Vec<(Provider, CatalogRef)>,
}

impl CatalogRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider's catalog, keeping the list in priority order.
    ///
    /// Intended for startup wiring; registering the same provider twice
    /// keeps both handles (first one wins on lookup).
    pub fn register(&mut self, provider: Provider, catalog: CatalogRef) {
        let at = self
            .catalogs
            .partition_point(|(existing, _)| *existing <= provider);
        self.catalogs.insert(at, (provider, catalog));
    }

    /// Looks up a record by code, querying catalogs in priority order.
    pub fn lookup_by_code(&self, code: &str) -> Option<Emote> {
        self.catalogs.iter().find_map(|(_, catalog)| {
            let guard = catalog.read().unwrap_or_else(PoisonError::into_inner);
            guard.get_by_code(code).cloned()
        })
    }

    /// Looks up a record by stable id, querying catalogs in priority order.
    pub fn lookup_by_id(&self, id: &str) -> Option<Emote> {
        self.catalogs.iter().find_map(|(_, catalog)| {
            let guard = catalog.read().unwrap_or_else(PoisonError::into_inner);
            guard.find_by_id(id).cloned()
        })
    }

    /// Returns all records, concatenated across catalogs in priority order.
    pub fn all_entries(&self) -> Vec<Emote> {
        self.catalogs
            .iter()
            .flat_map(|(_, catalog)| {
                let guard = catalog.read().unwrap_or_else(PoisonError::into_inner);
                guard.values().cloned().collect::<Vec<_>>()
            })
            .collect()
    }

    /// Number of registered catalogs.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// True if no catalog has been registered.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
