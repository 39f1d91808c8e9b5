//! Inspect command implementation
//!
//! Summarizes a catalog: grid, fingerprint, subclasses, imagesets and the
//! directions each one faces, and named entities.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use spritedex_catalog::{build_index, Catalog, EntityKind, Subclass};
use std::collections::BTreeMap;
use std::process::ExitCode;

use super::json_output::CommandOutput;
use super::{open_catalog, print_diagnostics, warnings_to_json, Opened};

/// One imageset and the first tile for each direction it faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesetSummary {
    /// Imageset name
    pub imageset: String,
    /// Number of creature tiles using this imageset
    pub tiles: usize,
    /// Direction name to tile id
    pub directions: BTreeMap<String, u32>,
}

/// Result payload of `inspect --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectResult {
    /// Sheet name
    pub sheet: String,
    /// Source format ("table" or "tiled")
    pub source_kind: String,
    /// BLAKE3 hash of the source file
    pub source_hash: String,
    /// Grid columns
    pub columns: u32,
    /// Grid rows
    pub rows: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Sheet image path, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Number of tiles
    pub tiles: usize,
    /// Number of animated tiles
    pub animated: usize,
    /// Number of creature tiles
    pub creatures: usize,
    /// Catalog fingerprint
    pub fingerprint: String,
    /// Creature tile count per subclass
    pub subclasses: BTreeMap<String, usize>,
    /// Imagesets, sorted by name
    pub imagesets: Vec<ImagesetSummary>,
    /// Entity name to tile ids
    pub named: BTreeMap<String, Vec<u32>>,
}

impl InspectResult {
    fn from_opened(opened: &Opened) -> Self {
        let catalog: &Catalog = &opened.catalog;
        let index = build_index(catalog);
        let sheet = catalog.sheet();

        let subclasses = Subclass::ALL
            .into_iter()
            .map(|s| (s.as_str().to_string(), index.with_subclass(s).len()))
            .collect();

        let imagesets = index
            .imagesets(EntityKind::Creature)
            .into_iter()
            .map(|imageset| ImagesetSummary {
                imageset: imageset.to_string(),
                tiles: index.imageset_tiles(EntityKind::Creature, imageset).len(),
                directions: index
                    .directions(EntityKind::Creature, imageset)
                    .into_iter()
                    .map(|(direction, tile)| (direction.as_str().to_string(), tile.0))
                    .collect(),
            })
            .collect();

        let named = index
            .names()
            .into_iter()
            .map(|name| {
                let ids = index.named(name).iter().map(|id| id.0).collect();
                (name.to_string(), ids)
            })
            .collect();

        Self {
            sheet: sheet.name.clone(),
            source_kind: opened.source_kind.as_str().to_string(),
            source_hash: opened.source_hash.clone(),
            columns: sheet.columns,
            rows: sheet.rows,
            tile_width: sheet.tile_width,
            tile_height: sheet.tile_height,
            image: sheet.image.as_ref().map(|i| i.source.clone()),
            tiles: catalog.len(),
            animated: catalog.animated().count(),
            creatures: catalog.creatures().count(),
            fingerprint: catalog.fingerprint().to_string(),
            subclasses,
            imagesets,
            named,
        }
    }
}

/// Run the inspect command
///
/// # Arguments
/// * `table_path` - Path to the table file (native JSON or Tiled)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 if the table does not load
pub fn run(table_path: &str, json_output: bool) -> Result<ExitCode> {
    let Some(opened) = open_catalog(table_path, json_output)? else {
        return Ok(ExitCode::from(1));
    };
    let summary = InspectResult::from_opened(&opened);

    if json_output {
        CommandOutput::success(summary, warnings_to_json(opened.catalog.warnings())).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Sheet:".cyan().bold(), summary.sheet);
    println!(
        "{} {} ({})",
        "Source:".dimmed(),
        summary.source_kind,
        &summary.source_hash[..16]
    );
    println!(
        "{} {}x{} tiles of {}x{} px{}",
        "Grid:".dimmed(),
        summary.columns,
        summary.rows,
        summary.tile_width,
        summary.tile_height,
        summary
            .image
            .as_ref()
            .map(|i| format!(" from {}", i))
            .unwrap_or_default()
    );
    println!(
        "{} {} total, {} animated, {} creatures",
        "Tiles:".dimmed(),
        summary.tiles,
        summary.animated,
        summary.creatures
    );
    println!("{} {}", "Fingerprint:".dimmed(), summary.fingerprint);

    println!("\n{}", "Subclasses:".bold());
    for (subclass, count) in &summary.subclasses {
        println!("  {:<8} {}", subclass, count);
    }

    println!("\n{}", "Imagesets:".bold());
    for entry in &summary.imagesets {
        let directions: Vec<String> = entry
            .directions
            .iter()
            .map(|(direction, tile)| format!("{}={}", direction, tile))
            .collect();
        println!(
            "  {:<12} {} tile(s)  {}",
            entry.imageset.green(),
            entry.tiles,
            directions.join(" ").dimmed()
        );
    }

    if !summary.named.is_empty() {
        println!("\n{}", "Named:".bold());
        for (name, ids) in &summary.named {
            let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
            println!("  {:<12} {}", name.green(), ids.join(", "));
        }
    }

    print_diagnostics(&[], opened.catalog.warnings());

    Ok(ExitCode::SUCCESS)
}
