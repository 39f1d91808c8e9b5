//! Attribute lookup structures over a catalog.
//!
//! The index is built once from a [`Catalog`] and never changes afterwards.
//! Every list it holds is in ascending tile-id order, which is what makes the
//! under-specified lookups deterministic: when a query leaves out the
//! subclass, the lowest-id tile matching the rest of the query wins.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::catalog::Catalog;
use crate::tile::{Direction, EntityKind, Subclass, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    subclass: Subclass,
    tile: TileId,
}

/// Tiles sharing one imageset, split by facing direction.
#[derive(Debug, Clone, Default)]
struct ImagesetEntry {
    tiles: Vec<TileId>,
    by_direction: [Vec<Candidate>; 4],
}

fn slot(direction: Direction) -> usize {
    match direction {
        Direction::Down => 0,
        Direction::Left => 1,
        Direction::Right => 2,
        Direction::Up => 3,
    }
}

/// Lookup tables for appearance, subclass, name, and imageset queries.
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    appearances: HashMap<EntityKind, HashMap<String, ImagesetEntry>>,
    by_subclass: HashMap<Subclass, Vec<TileId>>,
    by_name: HashMap<String, Vec<TileId>>,
}

/// Builds the attribute index for a catalog.
pub fn build_index(catalog: &Catalog) -> AttributeIndex {
    AttributeIndex::build(catalog)
}

impl AttributeIndex {
    /// Builds the index from a catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();

        // Catalog tiles are in id order, so pushing keeps every list sorted.
        for tile in catalog.tiles() {
            let Some(kind) = tile.attributes.entity_kind() else {
                continue;
            };
            let Some(creature) = tile.creature() else {
                continue;
            };

            let entry = index
                .appearances
                .entry(kind)
                .or_default()
                .entry(creature.imageset.clone())
                .or_default();
            entry.tiles.push(tile.id);
            entry.by_direction[slot(creature.direction)].push(Candidate {
                subclass: creature.subclass,
                tile: tile.id,
            });

            index
                .by_subclass
                .entry(creature.subclass)
                .or_default()
                .push(tile.id);

            if let Some(name) = &creature.name {
                index.by_name.entry(name.clone()).or_default().push(tile.id);
            }
        }

        debug!(
            sheet = %catalog.name(),
            imagesets = index.appearances.values().map(HashMap::len).sum::<usize>(),
            names = index.by_name.len(),
            "attribute index built"
        );

        index
    }

    fn candidates(&self, kind: EntityKind, imageset: &str, direction: Direction) -> &[Candidate] {
        self.appearances
            .get(&kind)
            .and_then(|sets| sets.get(imageset))
            .map(|entry| entry.by_direction[slot(direction)].as_slice())
            .unwrap_or(&[])
    }

    /// Resolves an appearance to a tile id.
    ///
    /// With a subclass this is an exact lookup on the full
    /// `(kind, imageset, direction, subclass)` tuple. Without one, the
    /// lowest-id tile matching `(kind, imageset, direction)` is returned.
    /// Returns `None` when nothing matches.
    pub fn resolve(
        &self,
        kind: EntityKind,
        imageset: &str,
        direction: Direction,
        subclass: Option<Subclass>,
    ) -> Option<TileId> {
        match subclass {
            Some(subclass) => self.resolve_exact(kind, imageset, direction, subclass),
            None => self.resolve_first(kind, imageset, direction),
        }
    }

    /// Exact lookup on the full appearance tuple.
    pub fn resolve_exact(
        &self,
        kind: EntityKind,
        imageset: &str,
        direction: Direction,
        subclass: Subclass,
    ) -> Option<TileId> {
        self.candidates(kind, imageset, direction)
            .iter()
            .find(|c| c.subclass == subclass)
            .map(|c| c.tile)
    }

    /// Loose lookup ignoring subclass; first match in tile-id order.
    pub fn resolve_first(
        &self,
        kind: EntityKind,
        imageset: &str,
        direction: Direction,
    ) -> Option<TileId> {
        self.candidates(kind, imageset, direction)
            .first()
            .map(|c| c.tile)
    }

    /// All tiles of a subclass, ascending.
    pub fn with_subclass(&self, subclass: Subclass) -> &[TileId] {
        self.by_subclass
            .get(&subclass)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The lowest-id tile carrying `name`.
    pub fn by_name(&self, name: &str) -> Option<TileId> {
        self.named(name).first().copied()
    }

    /// Every tile carrying `name`, ascending.
    pub fn named(&self, name: &str) -> &[TileId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every tile of an imageset across all directions, ascending.
    pub fn imageset_tiles(&self, kind: EntityKind, imageset: &str) -> &[TileId] {
        self.appearances
            .get(&kind)
            .and_then(|sets| sets.get(imageset))
            .map(|entry| entry.tiles.as_slice())
            .unwrap_or(&[])
    }

    /// The first tile for each direction an imageset faces.
    ///
    /// Directions the imageset has no tile for are absent from the map.
    pub fn directions(&self, kind: EntityKind, imageset: &str) -> BTreeMap<Direction, TileId> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                self.resolve_first(kind, imageset, direction)
                    .map(|tile| (direction, tile))
            })
            .collect()
    }

    /// Imagesets known for a kind, sorted.
    pub fn imagesets(&self, kind: EntityKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .appearances
            .get(&kind)
            .map(|sets| sets.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Entity names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
