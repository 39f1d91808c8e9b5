//! The immutable, validated tile catalog.

use serde::{Deserialize, Serialize};

use crate::error::LoadWarning;
use crate::table::ImageRef;
use crate::tile::{Tile, TileId};

/// Pixel rectangle of one tile within the sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Sheet-level metadata carried over from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    /// Sheet name.
    pub name: String,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Source image, if declared.
    pub image: Option<ImageRef>,
}

/// A validated collection of all tiles of one sprite sheet.
///
/// Only produced by [`load_catalog`](crate::loader::load_catalog). Tiles are
/// stored densely by id, so `tiles()[n].id == TileId(n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    sheet: SheetInfo,
    tiles: Vec<Tile>,
    warnings: Vec<LoadWarning>,
    fingerprint: String,
}

impl Catalog {
    pub(crate) fn new(sheet: SheetInfo, tiles: Vec<Tile>, warnings: Vec<LoadWarning>) -> Self {
        let fingerprint = crate::hash::catalog_fingerprint(&sheet, &tiles);
        Self {
            sheet,
            tiles,
            warnings,
            fingerprint,
        }
    }

    /// Sheet-level metadata.
    pub fn sheet(&self) -> &SheetInfo {
        &self.sheet
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.sheet.name
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if the catalog has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Looks up a tile by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// All tiles in id order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles that carry an animation, in id order.
    pub fn animated(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_animated())
    }

    /// Creature tiles, in id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.creature().is_some())
    }

    /// Pixel rectangle of a tile within the sheet image.
    pub fn tile_rect(&self, id: TileId) -> Option<TileRect> {
        self.tile(id)?;
        // The loader rejects sheets whose pixel size overflows u32.
        let columns = self.sheet.columns;
        Some(TileRect {
            x: (id.0 % columns) * self.sheet.tile_width,
            y: (id.0 / columns) * self.sheet.tile_height,
            width: self.sheet.tile_width,
            height: self.sheet.tile_height,
        })
    }

    /// Tile to draw for tile `id` after `elapsed_ms`.
    pub fn frame_at(&self, id: TileId, elapsed_ms: u64) -> Option<TileId> {
        self.tile(id).map(|t| t.frame_at(elapsed_ms))
    }

    /// Warnings reported while loading.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// BLAKE3 content fingerprint (64 lowercase hex characters).
    ///
    /// Two catalogs with equal fingerprints describe the same sheet.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
