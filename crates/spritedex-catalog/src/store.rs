//! Atomic whole-catalog replacement.
//!
//! Readers take a snapshot (`Arc<Resolver>`) and keep using it for as long
//! as they like. A reload builds the replacement completely before swapping
//! a single pointer, so a reader sees either the old catalog or the new one
//! and never a mixture.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::LoadFailure;
use crate::loader::load_catalog_with_profile;
use crate::profile::LoadProfile;
use crate::query::Resolver;
use crate::table::TileTable;

/// Result of a successful [`CatalogStore::reload`].
#[derive(Debug, Clone)]
pub enum ReloadOutcome {
    /// The new table has the same fingerprint as the current catalog.
    Unchanged,
    /// The catalog was replaced.
    Swapped {
        /// The catalog visible before the swap.
        previous: Arc<Resolver>,
        /// The catalog visible after the swap.
        current: Arc<Resolver>,
    },
}

/// Shared holder of the current catalog.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Resolver>>,
}

impl CatalogStore {
    /// Creates a store holding `resolver`.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    /// Returns the catalog visible right now.
    pub fn snapshot(&self) -> Arc<Resolver> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the catalog, returning the one it replaced.
    pub fn replace(&self, resolver: Resolver) -> Arc<Resolver> {
        let next = Arc::new(resolver);
        let mut current = self.current.write();
        std::mem::replace(&mut *current, next)
    }

    /// Loads `table` and swaps it in if it differs from the current catalog.
    ///
    /// A table that fails to load leaves the current catalog in place. The
    /// fingerprint comparison and the swap happen under one write lock, so
    /// concurrent reloads of the same table swap exactly once.
    pub fn reload(
        &self,
        table: &TileTable,
        profile: &LoadProfile,
    ) -> Result<ReloadOutcome, LoadFailure> {
        let catalog = load_catalog_with_profile(table, profile).inspect_err(|failure| {
            warn!(
                sheet = %table.name,
                errors = failure.errors.len(),
                "reload rejected; keeping current catalog"
            );
        })?;

        let current = Arc::new(Resolver::new(catalog));
        let previous = {
            let mut slot = self.current.write();
            if slot.fingerprint() == current.fingerprint() {
                drop(slot);
                info!(sheet = %current.catalog().name(), "reload skipped; catalog unchanged");
                return Ok(ReloadOutcome::Unchanged);
            }
            std::mem::replace(&mut *slot, Arc::clone(&current))
        };

        info!(
            sheet = %current.catalog().name(),
            from = &previous.fingerprint()[..16],
            to = &current.fingerprint()[..16],
            "catalog swapped"
        );

        Ok(ReloadOutcome::Swapped { previous, current })
    }
}
