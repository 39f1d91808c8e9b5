//! Input abstraction for reading tile tables from native or Tiled files.
//!
//! Files are dispatched by extension. `.tsj` is a Tiled JSON tileset and
//! `.tsx` a Tiled XML tileset; a `.json` file is a Tiled tileset if its
//! top-level object carries a `tilecount` key (Tiled's own JSON export) and
//! a native table otherwise.

use serde::{Deserialize, Serialize};
use spritedex_catalog::{TileTable, TiledTileset};
use std::path::{Path, PathBuf};

/// Recognized Tiled JSON tileset extensions.
pub const TILED_EXTENSIONS: &[&str] = &["tsj"];

/// Recognized Tiled XML tileset extensions.
pub const TILED_XML_EXTENSIONS: &[&str] = &["tsx"];

/// Recognized JSON extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Identifies the source format of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Native spritedex tile table.
    Table,
    /// Tiled JSON tileset.
    Tiled,
    /// Tiled XML tileset.
    #[serde(rename = "tiled-xml")]
    TiledXml,
}

impl SourceKind {
    /// Returns the string representation for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Table => "table",
            SourceKind::Tiled => "tiled",
            SourceKind::TiledXml => "tiled-xml",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A table read from disk, with its provenance.
#[derive(Debug)]
pub struct LoadedTable {
    /// The raw, unvalidated table.
    pub table: TileTable,
    /// Source format.
    pub source_kind: SourceKind,
    /// BLAKE3 hash of the file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while reading a table file.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown file extension.
    UnknownExtension { extension: Option<String> },

    /// JSON parsing failed.
    JsonParse { message: String },

    /// XML parsing failed, or the document is not a tileset.
    XmlParse { message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(
                    f,
                    "unknown file extension '.{}' (expected .json, .tsj or .tsx)",
                    ext
                ),
                None => write!(f, "file has no extension (expected .json, .tsj or .tsx)"),
            },
            InputError::JsonParse { message } => {
                write!(f, "JSON parse error: {}", message)
            }
            InputError::XmlParse { message } => {
                write!(f, "XML parse error: {}", message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reads a table from a file path, dispatching by extension.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use spritedex_cli::input::load_table;
///
/// let loaded = load_table(Path::new("characters.tsx")).unwrap();
/// println!("Read {} table", loaded.source_kind);
/// ```
pub fn load_table(path: &Path) -> Result<LoadedTable, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    let forced = match extension.as_deref() {
        Some(ext) if TILED_EXTENSIONS.contains(&ext) => Some(SourceKind::Tiled),
        Some(ext) if TILED_XML_EXTENSIONS.contains(&ext) => Some(SourceKind::TiledXml),
        Some(ext) if JSON_EXTENSIONS.contains(&ext) => None,
        _ => return Err(InputError::UnknownExtension { extension }),
    };

    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let source_kind = match forced {
        Some(kind) => kind,
        None => sniff(&content)?,
    };
    let table = parse_table(&content, source_kind)?;

    tracing::debug!(
        path = %path.display(),
        source = %source_kind,
        records = table.tiles.len(),
        "table read"
    );

    Ok(LoadedTable {
        table,
        source_kind,
        source_hash,
    })
}

/// Parses table content of a known format.
pub fn parse_table(content: &str, source_kind: SourceKind) -> Result<TileTable, InputError> {
    match source_kind {
        SourceKind::Table => TileTable::from_json(content).map_err(json_error),
        SourceKind::Tiled => TiledTileset::from_json(content)
            .map(TiledTileset::into_table)
            .map_err(json_error),
        SourceKind::TiledXml => TiledTileset::from_xml(content)
            .map(TiledTileset::into_table)
            .map_err(|e| InputError::XmlParse {
                message: e.to_string(),
            }),
    }
}

fn json_error(error: impl std::fmt::Display) -> InputError {
    InputError::JsonParse {
        message: error.to_string(),
    }
}

fn sniff(content: &str) -> Result<SourceKind, InputError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| InputError::JsonParse {
            message: e.to_string(),
        })?;
    if value.get("tilecount").is_some() {
        Ok(SourceKind::Tiled)
    } else {
        Ok(SourceKind::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: &str = r#"{
        "name": "tiny",
        "columns": 2,
        "rows": 1,
        "tiles": [ { "id": 0 }, { "id": 1 } ]
    }"#;

    const TILED: &str = r#"{
        "name": "tiny",
        "columns": 2,
        "tilecount": 2,
        "tilewidth": 16,
        "tileheight": 16,
        "tiles": [ { "id": 1, "type": "creature", "properties": [
            { "name": "direction", "type": "string", "value": "up" },
            { "name": "imageset", "type": "string", "value": "bat" },
            { "name": "subclass", "type": "string", "value": "mob" }
        ] } ]
    }"#;

    const TILED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="tiny" tilewidth="16" tileheight="16" tilecount="2" columns="2">
 <tile id="1" type="creature">
  <properties>
   <property name="direction" value="up"/>
   <property name="imageset" value="bat"/>
   <property name="subclass" value="mob"/>
  </properties>
 </tile>
</tileset>
"#;

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Table.to_string(), "table");
        assert_eq!(SourceKind::Tiled.as_str(), "tiled");
        assert_eq!(SourceKind::TiledXml.to_string(), "tiled-xml");
        assert_eq!(
            serde_json::to_value(SourceKind::TiledXml).unwrap(),
            "tiled-xml"
        );
    }

    #[test]
    fn test_load_native_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.json");
        std::fs::write(&path, NATIVE).unwrap();

        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.source_kind, SourceKind::Table);
        assert_eq!(loaded.table.tiles.len(), 2);
        assert_eq!(loaded.source_hash.len(), 64);
    }

    #[test]
    fn test_tiled_json_is_sniffed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.json");
        std::fs::write(&path, TILED).unwrap();

        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.source_kind, SourceKind::Tiled);
        assert_eq!(loaded.table.rows, 1);
        assert_eq!(loaded.table.tiles[1].kind.as_deref(), Some("creature"));
    }

    #[test]
    fn test_tsj_extension_is_tiled() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.tsj");
        std::fs::write(&path, TILED).unwrap();
        assert_eq!(load_table(&path).unwrap().source_kind, SourceKind::Tiled);
    }

    #[test]
    fn test_tsx_extension_is_tiled_xml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.tsx");
        std::fs::write(&path, TILED_XML).unwrap();

        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.source_kind, SourceKind::TiledXml);
        assert_eq!(loaded.table.tiles.len(), 2);
        assert_eq!(loaded.table.tiles[1].properties["imageset"], "bat");
    }

    #[test]
    fn test_malformed_xml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.tsx");
        std::fs::write(&path, "<tileset columns=").unwrap();
        assert!(matches!(load_table(&path), Err(InputError::XmlParse { .. })));

        std::fs::write(&path, "<map/>").unwrap();
        assert!(matches!(load_table(&path), Err(InputError::XmlParse { .. })));
    }

    #[test]
    fn test_load_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.tmx");
        std::fs::write(&path, "<map/>").unwrap();

        let result = load_table(&path);
        assert!(matches!(
            result,
            Err(InputError::UnknownExtension { extension: Some(ref ext) }) if ext == "tmx"
        ));
    }

    #[test]
    fn test_load_file_not_found() {
        let result = load_table(Path::new("/nonexistent/table.json"));
        assert!(matches!(result, Err(InputError::FileRead { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ \"columns\": ").unwrap();
        assert!(matches!(
            load_table(&path),
            Err(InputError::JsonParse { .. })
        ));
    }
}
