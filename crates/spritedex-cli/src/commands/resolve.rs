//! Resolve command implementation
//!
//! Maps an appearance (kind, imageset, direction, subclass) to the tile that
//! depicts it and the frame shown at a given elapsed time.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use spritedex_catalog::{AppearanceQuery, Resolver, TileHandle, TileRect};
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError};
use super::{open_catalog, warnings_to_json};

/// Appearance requested on the command line, as typed.
#[derive(Debug, Clone, Copy)]
pub struct QueryArgs<'a> {
    pub kind: &'a str,
    pub imageset: &'a str,
    pub direction: &'a str,
    pub subclass: Option<&'a str>,
}

/// Result payload of `resolve --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResult {
    /// Query in `kind/imageset/direction[/subclass]` form
    pub query: String,
    /// Resolved tile id
    pub tile: u32,
    /// Tile drawn at `elapsed_ms`
    pub frame: u32,
    /// Elapsed time the frame was sampled at
    pub elapsed_ms: u64,
    /// Sheet rectangle of the resolved tile
    pub rect: TileRect,
    /// Sheet rectangle of the current frame
    pub frame_rect: TileRect,
    /// Whether the tile is animated
    pub animated: bool,
    /// Loop length in milliseconds (animated tiles only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_length_ms: Option<u64>,
    /// Entity name, if the tile carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Subclass of the resolved tile
    pub subclass: String,
}

impl ResolveResult {
    fn from_handle(query: &AppearanceQuery, handle: TileHandle<'_>, elapsed_ms: u64) -> Self {
        let tile = handle.tile();
        let creature = handle.creature();
        Self {
            query: query.to_string(),
            tile: handle.id().0,
            frame: handle.current_frame(elapsed_ms).0,
            elapsed_ms,
            rect: handle.rect(),
            frame_rect: handle.current_frame_rect(elapsed_ms),
            animated: tile.is_animated(),
            cycle_length_ms: tile.animation.as_ref().map(|a| a.cycle_length_ms()),
            name: creature.and_then(|c| c.name.clone()),
            subclass: creature
                .map(|c| c.subclass.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Run the resolve command
///
/// # Arguments
/// * `table_path` - Path to the table file (native JSON or Tiled)
/// * `args` - Appearance to resolve
/// * `elapsed_ms` - Elapsed animation time to sample the frame at
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if resolved, 1 on a bad table or query, 2 if nothing matches
pub fn run(
    table_path: &str,
    args: QueryArgs<'_>,
    elapsed_ms: u64,
    json_output: bool,
) -> Result<ExitCode> {
    let query = match AppearanceQuery::parse(args.kind, args.imageset, args.direction, args.subclass)
    {
        Ok(query) => query,
        Err(e) if json_output => {
            let error = JsonError::new(error_codes::INVALID_QUERY, e.to_string());
            CommandOutput::<ResolveResult>::failure(vec![error], vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => anyhow::bail!("invalid query: {}", e),
    };

    let Some(opened) = open_catalog(table_path, json_output)? else {
        return Ok(ExitCode::from(1));
    };
    let warnings = warnings_to_json(opened.catalog.warnings());
    let resolver = Resolver::new(opened.catalog);

    let Some(handle) = resolver.resolve_query(&query) else {
        let message = format!("no tile depicts {}", query);
        if json_output {
            let error = JsonError::new(error_codes::NOT_FOUND, message);
            CommandOutput::<ResolveResult>::failure(vec![error], warnings).print()?;
        } else {
            println!("{} {}", "NOT FOUND".yellow().bold(), message);
        }
        return Ok(ExitCode::from(2));
    };

    let result = ResolveResult::from_handle(&query, handle, elapsed_ms);

    if json_output {
        CommandOutput::success(result, warnings).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Query:".cyan().bold(), result.query);
    println!(
        "{} {}{}",
        "Tile:".dimmed(),
        result.tile.to_string().green().bold(),
        result
            .name
            .as_ref()
            .map(|n| format!(" ({})", n))
            .unwrap_or_default()
    );
    println!("{} {}", "Subclass:".dimmed(), result.subclass);
    println!(
        "{} x={} y={} {}x{}",
        "Rect:".dimmed(),
        result.rect.x,
        result.rect.y,
        result.rect.width,
        result.rect.height
    );
    match result.cycle_length_ms {
        Some(cycle) => println!(
            "{} frame {} at {}ms (x={} y={}, loop {}ms)",
            "Animated:".dimmed(),
            result.frame,
            result.elapsed_ms,
            result.frame_rect.x,
            result.frame_rect.y,
            cycle
        ),
        None => println!("{} static", "Animated:".dimmed()),
    }

    Ok(ExitCode::SUCCESS)
}
