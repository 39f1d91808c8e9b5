//! Spritedex End-to-End Test Infrastructure
//!
//! This crate holds integration tests that exercise the catalog and CLI
//! crates together against the sheet fixtures in `fixtures/`:
//!
//! - `characters.json`: native table, 12x8 grid of 16px tiles
//! - `characters.tsj`: the same sheet as a Tiled JSON tileset
//! - `characters.tsx`: the same sheet as a Tiled XML tileset
//! - `characters-raw.tsx`: the sheet as first drawn in Tiled, with animation
//!   strips but no kinds or properties
//!
//! Rows 0-3 face down, left, right and up; rows 4-7 repeat the directions for
//! a second block of skins. Each creature tile leads a 3-frame strip at 160ms.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spritedex-tests
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use spritedex_catalog::{load_catalog, Catalog, TileTable, TiledTileset};
use tempfile::TempDir;

/// Skins in the first block (rows 0-3), left to right.
pub const FIRST_BLOCK: [&str; 4] = ["doll", "boy", "oldman", "girl"];

/// Skins in the second block (rows 4-7), left to right.
pub const SECOND_BLOCK: [&str; 4] = ["skeleton", "slime", "bat", "knight"];

/// Frame duration used throughout the fixture sheet.
pub const FRAME_MS: u64 = 160;

/// Directory holding the fixture files.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Reads a fixture file as a string.
pub fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// The native characters table.
pub fn characters_table() -> TileTable {
    TileTable::from_json(&read_fixture("characters.json")).expect("characters.json parses")
}

/// The Tiled characters tileset.
pub fn characters_tileset() -> TiledTileset {
    TiledTileset::from_json(&read_fixture("characters.tsj")).expect("characters.tsj parses")
}

/// The native characters table, loaded.
pub fn characters_catalog() -> Catalog {
    load_catalog(&characters_table()).expect("characters.json loads")
}

/// Id of the creature tile for a skin slot facing a direction row.
///
/// `block` is 0 or 1, `slot` 0-3 within the block, `row` 0-3 (down, left,
/// right, up).
pub fn creature_tile(block: u32, slot: u32, row: u32) -> u32 {
    (block * 4 + row) * 12 + slot * 3
}

/// A scratch directory for CLI input and output files.
pub struct Scratch {
    pub dir: TempDir,
}

impl Scratch {
    /// Creates an empty scratch directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Path of a file inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes a file and returns its path as a string.
    pub fn write(&self, name: &str, content: &str) -> String {
        let path = self.path(name);
        fs::write(&path, content).expect("Failed to write scratch file");
        path.to_string_lossy().into_owned()
    }

    /// Writes a table as native JSON and returns its path as a string.
    pub fn write_table(&self, name: &str, table: &TileTable) -> String {
        self.write(name, &table.to_json_pretty().expect("table serializes"))
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}
