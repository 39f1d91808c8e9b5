//! Tiled tileset adapter, for both the XML (`.tsx`) and JSON (`.tsj`) dialects.
//!
//! Tiled writes a tileset as grid metadata plus entries only for tiles that
//! carry data (a class, properties, or an animation). [`TiledTileset::into_table`]
//! turns that sparse form into a dense [`TileTable`] the loader can validate:
//!
//! - ids in `[0, tilecount)` without an entry become plain records;
//! - typed property values (`bool`, `int`, `float`, ...) are stringified;
//! - duplicate or out-of-range ids are passed through untouched so the loader
//!   reports them instead of the adapter hiding them.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::loader::MAX_TILE_COUNT;
use crate::table::{FrameRecord, ImageRef, TileRecord, TileTable};

/// A Tiled tileset as written to `.tsj` or `.tsx`.
///
/// Unknown keys and attributes (`margin`, `spacing`, `tiledversion`, ...)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledTileset {
    /// Tileset name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Tile width in pixels.
    #[serde(default = "default_tile_size")]
    pub tilewidth: u32,
    /// Tile height in pixels.
    #[serde(default = "default_tile_size")]
    pub tileheight: u32,
    /// Number of tiles in the tileset.
    #[serde(default)]
    pub tilecount: u32,
    /// Number of tile columns.
    #[serde(default)]
    pub columns: u32,
    /// Image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Image width in pixels.
    #[serde(default)]
    pub imagewidth: u32,
    /// Image height in pixels.
    #[serde(default)]
    pub imageheight: u32,
    /// Entries for tiles that carry data.
    #[serde(default)]
    pub tiles: Vec<TiledTile>,
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_tile_size() -> u32 {
    16
}

/// One tile entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledTile {
    /// Local tile id.
    pub id: i64,
    /// Class of the tile. Tiled 1.9+ writes `class`, older versions `type`.
    #[serde(rename = "type", alias = "class", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Custom properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<TiledProperty>,
    /// Animation frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Vec<TiledFrame>>,
}

/// A typed custom property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledProperty {
    /// Property name.
    pub name: String,
    /// Declared type (`string`, `int`, `bool`, ...); informational only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Property value.
    #[serde(default)]
    pub value: Value,
}

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiledFrame {
    /// Local id of the tile shown.
    pub tileid: i64,
    /// Duration in milliseconds.
    pub duration: i64,
}

impl TiledTileset {
    /// Parses a tileset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a tileset from Tiled's XML (`.tsx`) form.
    ///
    /// Property values are kept as the strings Tiled wrote; multi-line string
    /// properties store their value as element text instead of an attribute.
    pub fn from_xml(xml: &str) -> Result<Self, CatalogError> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();
        if !root.has_tag_name("tileset") {
            return Err(CatalogError::TiledXml(format!(
                "root element is <{}>, expected <tileset>",
                root.tag_name().name()
            )));
        }

        let image = root.children().find(|n| n.has_tag_name("image"));
        let tiles = root
            .children()
            .filter(|n| n.has_tag_name("tile"))
            .map(xml_tile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: root.attribute("name").map_or_else(default_name, str::to_string),
            tilewidth: xml_attr(root, "tilewidth")?.unwrap_or_else(default_tile_size),
            tileheight: xml_attr(root, "tileheight")?.unwrap_or_else(default_tile_size),
            tilecount: xml_attr(root, "tilecount")?.unwrap_or_default(),
            columns: xml_attr(root, "columns")?.unwrap_or_default(),
            image: image.and_then(|n| n.attribute("source")).map(str::to_string),
            imagewidth: image
                .map(|n| xml_attr(n, "width"))
                .transpose()?
                .flatten()
                .unwrap_or_default(),
            imageheight: image
                .map(|n| xml_attr(n, "height"))
                .transpose()?
                .flatten()
                .unwrap_or_default(),
            tiles,
        })
    }

    /// Number of grid rows implied by the tile count and column count.
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        self.tilecount.div_ceil(self.columns)
    }

    /// Converts to a dense tile table.
    pub fn into_table(self) -> TileTable {
        let rows = self.rows();
        let count = u64::from(self.tilecount);

        let mut tiles: Vec<TileRecord> = self.tiles.into_iter().map(TileRecord::from).collect();

        // Padding stops at the declared tile count, not the rounded-up grid, so
        // a ragged last row shows up as a count mismatch. Oversized counts are
        // left sparse; the loader rejects them anyway.
        if count <= MAX_TILE_COUNT {
            let present: HashSet<i64> = tiles.iter().map(|t| t.id).collect();
            tiles.extend(
                (0..count as i64)
                    .filter(|id| !present.contains(id))
                    .map(TileRecord::plain),
            );
        }
        tiles.sort_by_key(|t| t.id);

        let image = self.image.map(|source| ImageRef {
            source,
            width: self.imagewidth,
            height: self.imageheight,
        });

        TileTable {
            name: self.name,
            tile_width: self.tilewidth,
            tile_height: self.tileheight,
            columns: self.columns,
            rows,
            image,
            tiles,
        }
    }
}

impl From<TiledTile> for TileRecord {
    fn from(tile: TiledTile) -> Self {
        let properties: BTreeMap<String, String> = tile
            .properties
            .into_iter()
            .map(|p| (p.name, stringify(p.value)))
            .collect();

        TileRecord {
            id: tile.id,
            kind: tile.kind.filter(|k| !k.is_empty()),
            properties,
            animation: tile.animation.map(|frames| {
                frames
                    .into_iter()
                    .map(|f| FrameRecord {
                        tile_id: f.tileid,
                        duration_ms: f.duration,
                    })
                    .collect()
            }),
        }
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn xml_tile(node: roxmltree::Node<'_, '_>) -> Result<TiledTile, CatalogError> {
    let properties = node
        .children()
        .filter(|n| n.has_tag_name("properties"))
        .flat_map(|n| n.children().filter(|p| p.has_tag_name("property")))
        .map(|p| TiledProperty {
            name: p.attribute("name").unwrap_or_default().to_string(),
            property_type: p.attribute("type").map(str::to_string),
            value: Value::String(
                p.attribute("value")
                    .or_else(|| p.text())
                    .unwrap_or_default()
                    .to_string(),
            ),
        })
        .collect();

    let animation = node
        .children()
        .find(|n| n.has_tag_name("animation"))
        .map(|anim| {
            anim.children()
                .filter(|n| n.has_tag_name("frame"))
                .map(|frame| {
                    Ok(TiledFrame {
                        tileid: xml_required(frame, "tileid")?,
                        duration: xml_required(frame, "duration")?,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()
        })
        .transpose()?;

    Ok(TiledTile {
        id: xml_required(node, "id")?,
        kind: node
            .attribute("type")
            .or_else(|| node.attribute("class"))
            .map(str::to_string),
        properties,
        animation,
    })
}

fn xml_attr<T: FromStr>(
    node: roxmltree::Node<'_, '_>,
    name: &str,
) -> Result<Option<T>, CatalogError> {
    node.attribute(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                CatalogError::TiledXml(format!(
                    "<{}> attribute '{}' is not a valid number: '{}'",
                    node.tag_name().name(),
                    name,
                    raw
                ))
            })
        })
        .transpose()
}

fn xml_required<T: FromStr>(
    node: roxmltree::Node<'_, '_>,
    name: &str,
) -> Result<T, CatalogError> {
    xml_attr(node, name)?.ok_or_else(|| {
        CatalogError::TiledXml(format!(
            "<{}> is missing attribute '{}'",
            node.tag_name().name(),
            name
        ))
    })
}
