//! Read-only query façade combining the catalog, its index, and the clock.

use std::collections::BTreeMap;

use tracing::trace;

use crate::catalog::{Catalog, TileRect};
use crate::error::{CatalogError, QueryError};
use crate::index::AttributeIndex;
use crate::loader::load_catalog;
use crate::table::TileTable;
use crate::tile::{CreatureAttributes, Direction, EntityKind, Subclass, Tile, TileId};

/// A catalog paired with its attribute index.
///
/// The resolver never mutates either and never substitutes a default
/// appearance: lookups that miss return `None` and the caller decides what to
/// draw instead.
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Catalog,
    index: AttributeIndex,
}

impl Resolver {
    /// Builds the index for `catalog` and wraps both.
    pub fn new(catalog: Catalog) -> Self {
        let index = AttributeIndex::build(&catalog);
        Self { catalog, index }
    }

    /// Loads `table` with the default profile and builds a resolver for it.
    pub fn from_table(table: &TileTable) -> Result<Self, CatalogError> {
        Ok(Self::new(load_catalog(table)?))
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The underlying attribute index.
    pub fn index(&self) -> &AttributeIndex {
        &self.index
    }

    /// Content fingerprint of the underlying catalog.
    pub fn fingerprint(&self) -> &str {
        self.catalog.fingerprint()
    }

    /// Resolves an appearance to a tile.
    ///
    /// When `subclass` is `None` the lowest-id tile matching
    /// `(kind, imageset, direction)` is returned.
    pub fn resolve(
        &self,
        kind: EntityKind,
        imageset: &str,
        direction: Direction,
        subclass: Option<Subclass>,
    ) -> Option<TileHandle<'_>> {
        let id = self.index.resolve(kind, imageset, direction, subclass);
        trace!(%kind, imageset, %direction, ?subclass, ?id, "resolve");
        self.tile(id?)
    }

    /// Resolves a parsed appearance query.
    pub fn resolve_query(&self, query: &AppearanceQuery) -> Option<TileHandle<'_>> {
        self.resolve(query.kind, &query.imageset, query.direction, query.subclass)
    }

    /// Looks up a tile by id.
    pub fn tile(&self, id: TileId) -> Option<TileHandle<'_>> {
        self.catalog.tile(id).map(|tile| TileHandle {
            catalog: &self.catalog,
            tile,
        })
    }

    /// The lowest-id tile carrying `name`.
    pub fn by_name(&self, name: &str) -> Option<TileHandle<'_>> {
        self.tile(self.index.by_name(name)?)
    }

    /// Every tile of a subclass, in id order.
    pub fn with_subclass(&self, subclass: Subclass) -> impl Iterator<Item = TileHandle<'_>> + '_ {
        self.index
            .with_subclass(subclass)
            .iter()
            .filter_map(move |&id| self.tile(id))
    }

    /// Every tile satisfying `predicate`, in id order.
    pub fn matching<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = TileHandle<'a>> + 'a
    where
        P: Fn(&Tile) -> bool + 'a,
    {
        self.catalog
            .tiles()
            .iter()
            .filter(move |&tile| predicate(tile))
            .map(move |tile| TileHandle {
                catalog: &self.catalog,
                tile,
            })
    }

    /// The first tile for each direction an imageset faces.
    pub fn directions(
        &self,
        kind: EntityKind,
        imageset: &str,
    ) -> BTreeMap<Direction, TileHandle<'_>> {
        self.index
            .directions(kind, imageset)
            .into_iter()
            .filter_map(|(direction, id)| self.tile(id).map(|handle| (direction, handle)))
            .collect()
    }
}

/// A resolved tile, borrowed from a resolver.
#[derive(Clone, Copy)]
pub struct TileHandle<'a> {
    catalog: &'a Catalog,
    tile: &'a Tile,
}

impl<'a> TileHandle<'a> {
    /// The tile id.
    pub fn id(&self) -> TileId {
        self.tile.id
    }

    /// The full tile.
    pub fn tile(&self) -> &'a Tile {
        self.tile
    }

    /// Creature attributes, if this is a creature tile.
    pub fn creature(&self) -> Option<&'a CreatureAttributes> {
        self.tile.creature()
    }

    /// Returns true if this is a creature of the given subclass.
    pub fn is(&self, subclass: Subclass) -> bool {
        self.tile.is(subclass)
    }

    /// The tile to draw after `elapsed_ms`.
    ///
    /// Animated tiles loop forever; a static tile always returns its own id.
    pub fn current_frame(&self, elapsed_ms: u64) -> TileId {
        self.tile.frame_at(elapsed_ms)
    }

    /// Pixel rectangle of this tile in the sheet image.
    pub fn rect(&self) -> TileRect {
        self.rect_of(self.tile.id)
    }

    /// Pixel rectangle of the frame to draw after `elapsed_ms`.
    pub fn current_frame_rect(&self, elapsed_ms: u64) -> TileRect {
        self.rect_of(self.current_frame(elapsed_ms))
    }

    fn rect_of(&self, id: TileId) -> TileRect {
        // Frames always reference catalog tiles, so the lookup cannot miss.
        self.catalog.tile_rect(id).unwrap_or(TileRect {
            x: 0,
            y: 0,
            width: self.catalog.sheet().tile_width,
            height: self.catalog.sheet().tile_height,
        })
    }
}

impl PartialEq for TileHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.catalog, other.catalog) && self.tile.id == other.tile.id
    }
}

impl Eq for TileHandle<'_> {}

impl std::fmt::Debug for TileHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileHandle")
            .field("sheet", &self.catalog.name())
            .field("tile", self.tile)
            .finish()
    }
}

/// Returns the tile to draw for `handle` after `elapsed_ms`.
pub fn current_frame(handle: &TileHandle<'_>, elapsed_ms: u64) -> TileId {
    handle.current_frame(elapsed_ms)
}

/// A typed appearance query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppearanceQuery {
    /// Entity kind.
    pub kind: EntityKind,
    /// Imageset (skin).
    pub imageset: String,
    /// Facing direction.
    pub direction: Direction,
    /// Optional subclass; `None` resolves to the lowest-id match.
    pub subclass: Option<Subclass>,
}

impl AppearanceQuery {
    /// Creates a query from typed parts.
    pub fn new(
        kind: EntityKind,
        imageset: impl Into<String>,
        direction: Direction,
        subclass: Option<Subclass>,
    ) -> Self {
        Self {
            kind,
            imageset: imageset.into(),
            direction,
            subclass,
        }
    }

    /// Parses a query from strings.
    ///
    /// Fails only when a part cannot be interpreted. A well-formed query for
    /// an appearance the catalog lacks parses fine and resolves to `None`.
    pub fn parse(
        kind: &str,
        imageset: &str,
        direction: &str,
        subclass: Option<&str>,
    ) -> Result<Self, QueryError> {
        let kind = kind.parse::<EntityKind>()?;
        if imageset.trim().is_empty() {
            return Err(QueryError::EmptyImageset);
        }
        let direction = direction.parse::<Direction>()?;
        let subclass = subclass.map(str::parse::<Subclass>).transpose()?;
        Ok(Self::new(kind, imageset, direction, subclass))
    }
}

impl std::fmt::Display for AppearanceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.imageset, self.direction)?;
        if let Some(subclass) = self.subclass {
            write!(f, "/{}", subclass)?;
        }
        Ok(())
    }
}
