//! Sample command implementation
//!
//! Prints the frame a tile shows over a range of elapsed times.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use spritedex_catalog::{Catalog, Tile, TileId};
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError};
use super::{open_catalog, warnings_to_json};

/// Most samples a single invocation will print.
pub const MAX_SAMPLES: u64 = 10_000;

/// One point of a frame timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Elapsed time in milliseconds
    pub elapsed_ms: u64,
    /// Tile drawn at that time
    pub frame: u32,
}

/// Result payload of `sample --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Sampled tile
    pub tile: u32,
    /// Whether the tile is animated
    pub animated: bool,
    /// Loop length in milliseconds (animated tiles only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_length_ms: Option<u64>,
    /// Sample step in milliseconds
    pub step_ms: u64,
    /// Frame timeline
    pub samples: Vec<SamplePoint>,
}

/// Sampling window requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    /// First elapsed time sampled
    pub from: u64,
    /// End of the window (exclusive); defaults to one loop after `from`
    pub to: Option<u64>,
    /// Step between samples; defaults to the shortest frame duration
    pub step: Option<u64>,
}

/// Builds the timeline for one tile.
pub fn timeline(tile: &Tile, range: SampleRange) -> Result<SampleResult, JsonError> {
    let cycle = tile.animation.as_ref().map(|a| a.cycle_length_ms());
    let shortest = tile
        .animation
        .as_ref()
        .and_then(|a| a.frames().iter().map(|f| u64::from(f.duration_ms.get())).min());

    let step = range.step.or(shortest).unwrap_or(1);
    if step == 0 {
        return Err(JsonError::new(
            error_codes::INVALID_RANGE,
            "step must be positive",
        ));
    }

    let to = range
        .to
        .unwrap_or_else(|| range.from.saturating_add(cycle.unwrap_or(1)));
    if to <= range.from {
        return Err(JsonError::new(
            error_codes::INVALID_RANGE,
            format!("range end {} must be after its start {}", to, range.from),
        ));
    }

    let count = (to - range.from).div_ceil(step);
    if count > MAX_SAMPLES {
        return Err(JsonError::new(
            error_codes::INVALID_RANGE,
            format!(
                "range would produce {} samples (maximum {}); raise --step",
                count, MAX_SAMPLES
            ),
        ));
    }

    let samples = (0..count)
        .map(|i| range.from + i * step)
        .map(|elapsed_ms| SamplePoint {
            elapsed_ms,
            frame: tile.frame_at(elapsed_ms).0,
        })
        .collect();

    Ok(SampleResult {
        tile: tile.id.0,
        animated: tile.is_animated(),
        cycle_length_ms: cycle,
        step_ms: step,
        samples,
    })
}

/// Run the sample command
///
/// # Arguments
/// * `table_path` - Path to the table file (native JSON or Tiled)
/// * `tile` - Tile id to sample
/// * `range` - Sampling window
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on a bad table or range, 2 if the tile does not exist
pub fn run(table_path: &str, tile: u32, range: SampleRange, json_output: bool) -> Result<ExitCode> {
    let Some(opened) = open_catalog(table_path, json_output)? else {
        return Ok(ExitCode::from(1));
    };
    let catalog: &Catalog = &opened.catalog;
    let warnings = warnings_to_json(catalog.warnings());

    let Some(found) = catalog.tile(TileId(tile)) else {
        let message = format!(
            "tile {} does not exist (catalog has {} tiles)",
            tile,
            catalog.len()
        );
        if json_output {
            let error = JsonError::new(error_codes::NOT_FOUND, message);
            CommandOutput::<SampleResult>::failure(vec![error], warnings).print()?;
        } else {
            println!("{} {}", "NOT FOUND".yellow().bold(), message);
        }
        return Ok(ExitCode::from(2));
    };

    let result = match timeline(found, range) {
        Ok(result) => result,
        Err(error) if json_output => {
            CommandOutput::<SampleResult>::failure(vec![error], warnings).print()?;
            return Ok(ExitCode::from(1));
        }
        Err(error) => anyhow::bail!(error.message),
    };

    if json_output {
        CommandOutput::success(result, warnings).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    match result.cycle_length_ms {
        Some(cycle) => println!(
            "{} tile {} loops every {}ms",
            "Animated:".cyan().bold(),
            result.tile,
            cycle
        ),
        None => println!("{} tile {} is static", "Static:".cyan().bold(), result.tile),
    }

    let mut previous = None;
    for point in &result.samples {
        let marker = if previous == Some(point.frame) {
            " ".normal()
        } else {
            "*".green()
        };
        println!("  {} {:>8}ms  {}", marker, point.elapsed_ms, point.frame);
        previous = Some(point.frame);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spritedex_catalog::{load_catalog, TileRecord, TileTable};

    fn catalog() -> Catalog {
        let table = TileTable::builder(6, 1)
            .tile(TileRecord::creature(3, "boy", "down", "player").with_animation(&[
                (3, 100),
                (4, 200),
                (5, 100),
            ]))
            .fill_plain()
            .build();
        load_catalog(&table).unwrap()
    }

    fn frames(result: &SampleResult) -> Vec<(u64, u32)> {
        result
            .samples
            .iter()
            .map(|p| (p.elapsed_ms, p.frame))
            .collect()
    }

    #[test]
    fn default_range_covers_one_loop() {
        let catalog = catalog();
        let tile = catalog.tile(TileId(3)).unwrap();
        let range = SampleRange {
            from: 0,
            to: None,
            step: None,
        };

        let result = timeline(tile, range).unwrap();
        assert_eq!(result.cycle_length_ms, Some(400));
        assert_eq!(result.step_ms, 100);
        assert_eq!(
            frames(&result),
            vec![(0, 3), (100, 4), (200, 4), (300, 5)]
        );
    }

    #[test]
    fn explicit_range_wraps() {
        let catalog = catalog();
        let tile = catalog.tile(TileId(3)).unwrap();
        let range = SampleRange {
            from: 350,
            to: Some(500),
            step: Some(50),
        };

        let result = timeline(tile, range).unwrap();
        assert_eq!(
            frames(&result),
            vec![(350, 5), (400, 3), (450, 3)]
        );
    }

    #[test]
    fn static_tile_samples_once() {
        let catalog = catalog();
        let tile = catalog.tile(TileId(0)).unwrap();
        let range = SampleRange {
            from: 0,
            to: None,
            step: None,
        };

        let result = timeline(tile, range).unwrap();
        assert!(!result.animated);
        assert_eq!(frames(&result), vec![(0, 0)]);
    }

    #[test]
    fn bad_ranges_are_rejected() {
        let catalog = catalog();
        let tile = catalog.tile(TileId(3)).unwrap();

        let zero_step = SampleRange {
            from: 0,
            to: Some(10),
            step: Some(0),
        };
        assert_eq!(
            timeline(tile, zero_step).unwrap_err().code,
            error_codes::INVALID_RANGE
        );

        let backwards = SampleRange {
            from: 10,
            to: Some(0),
            step: None,
        };
        assert!(timeline(tile, backwards).is_err());

        let too_many = SampleRange {
            from: 0,
            to: Some(u64::MAX),
            step: Some(1),
        };
        assert!(timeline(tile, too_many).is_err());
    }

    #[test]
    fn missing_tile_exits_two() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("walkers.json");
        let table = TileTable::builder(1, 1).tile(TileRecord::plain(0)).build();
        std::fs::write(&path, table.to_json_pretty().unwrap()).unwrap();

        let range = SampleRange {
            from: 0,
            to: None,
            step: None,
        };
        let path = path.to_str().unwrap();
        assert_eq!(run(path, 5, range, true).unwrap(), ExitCode::from(2));
        assert_eq!(run(path, 0, range, false).unwrap(), ExitCode::SUCCESS);
    }
}
