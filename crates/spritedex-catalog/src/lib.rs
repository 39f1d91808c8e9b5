//! Spritedex Tile Catalog Library
//!
//! This crate loads a sprite sheet tile table once, validates it, and answers
//! runtime queries of the form "which tile does this creature show, facing
//! this way, after this much time?".
//!
//! # Overview
//!
//! - **Loading**: a raw [`TileTable`] (native JSON or converted from a Tiled
//!   tileset) is validated in a single pass. Every problem is reported at once
//!   as a [`LoadFailure`]; a table that passes becomes an immutable [`Catalog`].
//! - **Indexing**: an [`AttributeIndex`] maps appearances, subclasses, and
//!   names to tile ids.
//! - **Sampling**: frame selection is a pure function of elapsed time handed
//!   in by the caller.
//!
//! # Example
//!
//! ```
//! use spritedex_catalog::{Direction, EntityKind, Resolver, Subclass, TileId, TileRecord, TileTable};
//!
//! let table = TileTable::builder(6, 1)
//!     .tile(TileRecord::creature(3, "boy", "down", "player").named("Bob").with_strip(3, 160))
//!     .fill_plain()
//!     .build();
//!
//! let resolver = Resolver::from_table(&table).unwrap();
//! let bob = resolver
//!     .resolve(EntityKind::Creature, "boy", Direction::Down, Some(Subclass::Player))
//!     .unwrap();
//!
//! assert_eq!(bob.current_frame(0), TileId(3));
//! assert_eq!(bob.current_frame(160), TileId(4));
//! assert_eq!(bob.current_frame(480), TileId(3));
//! ```
//!
//! # Modules
//!
//! - [`table`]: Raw tile table types and builder
//! - [`tiled`]: Tiled JSON tileset adapter
//! - [`loader`]: Validation and catalog construction
//! - [`catalog`]: The validated catalog
//! - [`index`]: Attribute lookups
//! - [`clock`]: Animation sampling
//! - [`query`]: Resolver and tile handles
//! - [`store`]: Atomic catalog replacement

pub mod catalog;
pub mod clock;
pub mod error;
mod hash;
pub mod index;
pub mod loader;
pub mod profile;
pub mod query;
pub mod store;
pub mod table;
pub mod tile;
pub mod tiled;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at the crate root
pub use catalog::{Catalog, SheetInfo, TileRect};
pub use clock::{sample, Animation};
pub use error::{
    CatalogError, ErrorCategory, ErrorCode, LoadError, LoadFailure, LoadReport, LoadWarning,
    Location, QueryError, WarningCode,
};
pub use index::{build_index, AttributeIndex};
pub use loader::{load_catalog, load_catalog_with_profile, validate_table, MAX_TILE_COUNT};
pub use profile::{LoadProfile, Severity, SoftFinding};
pub use query::{current_frame, AppearanceQuery, Resolver, TileHandle};
pub use store::{CatalogStore, ReloadOutcome};
pub use table::{FrameRecord, ImageRef, TileRecord, TileTable, TileTableBuilder};
pub use tile::{
    CreatureAttributes, Direction, EntityKind, Frame, Subclass, Tile, TileAttributes, TileId,
};
pub use tiled::{TiledFrame, TiledProperty, TiledTile, TiledTileset};
