//! Raw tile table types.
//!
//! A [`TileTable`] is the parsed-but-unvalidated shape of a sprite sheet
//! description: grid dimensions plus one record per tile. Values are kept as
//! loosely typed as the source formats allow (signed ids, string attribute
//! bags) so that the loader can report every problem instead of failing on
//! the first one during deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A complete raw tile table for one sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileTable {
    /// Sheet name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Tile width in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_width: u32,

    /// Tile height in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_height: u32,

    /// Number of tile columns in the sheet.
    pub columns: u32,

    /// Number of tile rows in the sheet.
    pub rows: u32,

    /// Source image the tiles are cut from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    /// One record per tile, in any order.
    pub tiles: Vec<TileRecord>,
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_tile_size() -> u32 {
    16
}

/// Reference to the sheet image. The catalog never opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image path as written by the authoring tool.
    pub source: String,
    /// Image width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Image height in pixels.
    #[serde(default)]
    pub height: u32,
}

/// One raw tile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileRecord {
    /// Tile id. Signed so that negative ids can be reported rather than
    /// rejected by the parser.
    pub id: i64,

    /// Optional kind tag (e.g., "creature").
    #[serde(
        default,
        alias = "type",
        alias = "class",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    /// Attribute bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    /// Ordered animation frames; absent for a static tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Vec<FrameRecord>>,
}

/// One raw animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameRecord {
    /// Tile shown during this frame.
    pub tile_id: i64,
    /// Display duration in milliseconds.
    pub duration_ms: i64,
}

impl TileTable {
    /// Creates a new table builder for a grid of the given size.
    pub fn builder(columns: u32, rows: u32) -> TileTableBuilder {
        TileTableBuilder::new(columns, rows)
    }

    /// Parses a table from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the table to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of cells declared by the grid.
    pub fn declared_tile_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

impl TileRecord {
    /// A record with no kind, attributes, or animation.
    pub fn plain(id: i64) -> Self {
        Self {
            id,
            kind: None,
            properties: BTreeMap::new(),
            animation: None,
        }
    }

    /// A creature record carrying the three required attributes.
    pub fn creature(
        id: i64,
        imageset: impl Into<String>,
        direction: impl Into<String>,
        subclass: impl Into<String>,
    ) -> Self {
        Self::plain(id)
            .with_kind("creature")
            .with_property("imageset", imageset)
            .with_property("direction", direction)
            .with_property("subclass", subclass)
    }

    /// Sets the kind tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets one attribute.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets the `name` attribute.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.with_property("name", name)
    }

    /// Sets the animation frames from `(tile_id, duration_ms)` pairs.
    pub fn with_animation(mut self, frames: &[(i64, i64)]) -> Self {
        self.animation = Some(
            frames
                .iter()
                .map(|&(tile_id, duration_ms)| FrameRecord {
                    tile_id,
                    duration_ms,
                })
                .collect(),
        );
        self
    }

    /// Sets an animation over `count` consecutive tiles starting at this
    /// record's id, each shown for `duration_ms`.
    pub fn with_strip(self, count: i64, duration_ms: i64) -> Self {
        let frames: Vec<(i64, i64)> = (0..count).map(|i| (self.id + i, duration_ms)).collect();
        self.with_animation(&frames)
    }
}

/// Builder for constructing tile tables programmatically.
#[derive(Debug)]
pub struct TileTableBuilder {
    table: TileTable,
}

impl TileTableBuilder {
    /// Creates a new builder for a grid of the given size.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            table: TileTable {
                name: default_name(),
                tile_width: default_tile_size(),
                tile_height: default_tile_size(),
                columns,
                rows,
                image: None,
                tiles: Vec::new(),
            },
        }
    }

    /// Sets the sheet name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.table.name = name.into();
        self
    }

    /// Sets the tile size in pixels.
    pub fn tile_size(mut self, width: u32, height: u32) -> Self {
        self.table.tile_width = width;
        self.table.tile_height = height;
        self
    }

    /// Sets the sheet image reference.
    pub fn image(mut self, source: impl Into<String>, width: u32, height: u32) -> Self {
        self.table.image = Some(ImageRef {
            source: source.into(),
            width,
            height,
        });
        self
    }

    /// Adds a tile record.
    pub fn tile(mut self, record: TileRecord) -> Self {
        self.table.tiles.push(record);
        self
    }

    /// Adds plain records for every grid id that has no record yet.
    pub fn fill_plain(mut self) -> Self {
        let present: std::collections::HashSet<i64> =
            self.table.tiles.iter().map(|t| t.id).collect();
        let count = self.table.declared_tile_count() as i64;
        for id in 0..count {
            if !present.contains(&id) {
                self.table.tiles.push(TileRecord::plain(id));
            }
        }
        self
    }

    /// Builds the table, ordering records by id.
    pub fn build(mut self) -> TileTable {
        self.table.tiles.sort_by_key(|t| t.id);
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_from_json_applies_defaults() {
        let json = r#"{
            "columns": 2,
            "rows": 1,
            "tiles": [
                { "id": 0, "type": "creature",
                  "properties": { "imageset": "boy", "direction": "down", "subclass": "player" },
                  "animation": [ { "tile_id": 0, "duration_ms": 160 }, { "tile_id": 1, "duration_ms": 160 } ] },
                { "id": 1 }
            ]
        }"#;

        let table = TileTable::from_json(json).unwrap();
        assert_eq!(table.name, "untitled");
        assert_eq!(table.tile_width, 16);
        assert_eq!(table.tile_height, 16);
        assert_eq!(table.tiles.len(), 2);
        assert_eq!(table.tiles[0].kind.as_deref(), Some("creature"));
        assert_eq!(table.tiles[0].properties["imageset"], "boy");
        assert_eq!(table.tiles[0].animation.as_ref().unwrap().len(), 2);
        assert!(table.tiles[1].animation.is_none());
    }

    #[test]
    fn table_rejects_unknown_fields() {
        let json = r#"{ "columns": 1, "rows": 1, "tiles": [], "layers": [] }"#;
        assert!(TileTable::from_json(json).is_err());
    }

    #[test]
    fn builder_fills_and_sorts() {
        let table = TileTable::builder(3, 2)
            .name("characters")
            .tile(TileRecord::creature(3, "boy", "down", "player").with_strip(3, 160))
            .fill_plain()
            .build();

        assert_eq!(table.name, "characters");
        assert_eq!(table.tiles.len(), 6);
        let ids: Vec<i64> = table.tiles.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

        let strip = table.tiles[3].animation.as_ref().unwrap();
        assert_eq!(
            strip,
            &vec![
                FrameRecord { tile_id: 3, duration_ms: 160 },
                FrameRecord { tile_id: 4, duration_ms: 160 },
                FrameRecord { tile_id: 5, duration_ms: 160 },
            ]
        );
    }

    #[test]
    fn table_json_round_trip_preserves_records() {
        let table = TileTable::builder(1, 1)
            .image("characters.png", 16, 16)
            .tile(TileRecord::creature(0, "doll", "down", "human").named("Dolly"))
            .build();

        let json = table.to_json_pretty().unwrap();
        let parsed = TileTable::from_json(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
