//! Validate command implementation
//!
//! Loads a tile table and reports every error and warning in one pass.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use spritedex_catalog::load_catalog_with_profile;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{input_error_to_json, load_error_to_json, CommandOutput};
use super::{print_diagnostics, resolve_profile, warnings_to_json};
use crate::input::{load_table, LoadedTable};

/// Result payload of `validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResult {
    /// Sheet name
    pub sheet: String,
    /// Source format ("table" or "tiled")
    pub source_kind: String,
    /// BLAKE3 hash of the source file
    pub source_hash: String,
    /// Load profile used
    pub profile: String,
    /// Number of tiles
    pub tiles: usize,
    /// Catalog fingerprint
    pub fingerprint: String,
    /// Validation duration in milliseconds
    pub duration_ms: u64,
}

/// Run the validate command
///
/// # Arguments
/// * `table_path` - Path to the table file (native JSON or Tiled)
/// * `profile_name` - Optional load profile name (default, strict, lenient)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(table_path: &str, profile_name: Option<&str>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(table_path, profile_name)
    } else {
        run_human(table_path, profile_name)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(table_path: &str, profile_name: Option<&str>) -> Result<ExitCode> {
    let start = Instant::now();

    let profile = resolve_profile(profile_name).map_err(|e| anyhow::anyhow!(e.message))?;

    println!("{} {}", "Validating:".cyan().bold(), table_path);
    if profile_name.is_some() {
        println!("{} {}", "Profile:".dimmed(), profile.name);
    }

    let LoadedTable {
        table,
        source_kind,
        source_hash,
    } = load_table(Path::new(table_path))
        .with_context(|| format!("Failed to read table file: {}", table_path))?;

    println!(
        "{} {} ({})",
        "Source:".dimmed(),
        source_kind.as_str(),
        &source_hash[..16]
    );

    let outcome = load_catalog_with_profile(&table, &profile);
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(catalog) => {
            print_diagnostics(&[], catalog.warnings());
            println!(
                "\n{} {} tiles in a {}x{} grid",
                "Sheet:".dimmed(),
                catalog.len(),
                catalog.sheet().columns,
                catalog.sheet().rows
            );
            println!("{} {}", "Fingerprint:".dimmed(), catalog.fingerprint());
            println!(
                "\n{} Table is valid ({}ms)",
                "SUCCESS".green().bold(),
                duration_ms
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            print_diagnostics(&failure.errors, &failure.warnings);
            println!(
                "\n{} Table has {} error(s) ({}ms)",
                "FAILED".red().bold(),
                failure.errors.len(),
                duration_ms
            );
            Ok(ExitCode::from(1))
        }
    }
}

/// Run validate with machine-readable JSON output
fn run_json(table_path: &str, profile_name: Option<&str>) -> Result<ExitCode> {
    let start = Instant::now();

    let profile = match resolve_profile(profile_name) {
        Ok(profile) => profile,
        Err(error) => {
            CommandOutput::<ValidateResult>::failure(vec![error], vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
    };

    let loaded = match load_table(Path::new(table_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            let error = input_error_to_json(&e, Some(table_path));
            CommandOutput::<ValidateResult>::failure(vec![error], vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
    };

    let output = match load_catalog_with_profile(&loaded.table, &profile) {
        Ok(catalog) => {
            let result = ValidateResult {
                sheet: catalog.name().to_string(),
                source_kind: loaded.source_kind.as_str().to_string(),
                source_hash: loaded.source_hash,
                profile: profile.name.clone(),
                tiles: catalog.len(),
                fingerprint: catalog.fingerprint().to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            };
            CommandOutput::success(result, warnings_to_json(catalog.warnings()))
        }
        Err(failure) => CommandOutput::failure(
            failure.errors.iter().map(load_error_to_json).collect(),
            warnings_to_json(&failure.warnings),
        ),
    };

    output.print()?;

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spritedex_catalog::{TileRecord, TileTable};

    fn write_table(dir: &tempfile::TempDir, filename: &str, table: &TileTable) -> String {
        let path = dir.path().join(filename);
        std::fs::write(&path, table.to_json_pretty().unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn valid_table() -> TileTable {
        TileTable::builder(3, 1)
            .name("walkers")
            .tile(TileRecord::creature(0, "boy", "down", "player").with_strip(3, 160))
            .fill_plain()
            .build()
    }

    #[test]
    fn validate_accepts_valid_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_table(&tmp, "walkers.json", &valid_table());

        assert_eq!(run(&path, None, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&path, None, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_rejects_dangling_frame() {
        let tmp = tempfile::tempdir().unwrap();
        let mut table = valid_table();
        table.tiles[0] = table.tiles[0].clone().with_animation(&[(0, 160), (7, 160)]);
        let path = write_table(&tmp, "broken.json", &table);

        assert_eq!(run(&path, None, false).unwrap(), ExitCode::from(1));
        assert_eq!(run(&path, None, true).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn validate_strict_profile_escalates_warnings() {
        let tmp = tempfile::tempdir().unwrap();
        let mut table = valid_table();
        table.tiles[0] = table.tiles[0].clone().with_property("speed", "3");
        let path = write_table(&tmp, "speedy.json", &table);

        assert_eq!(run(&path, None, true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            run(&path, Some("strict"), true).unwrap(),
            ExitCode::from(1)
        );
    }

    #[test]
    fn validate_unknown_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_table(&tmp, "walkers.json", &valid_table());

        assert_eq!(run(&path, Some("pedantic"), true).unwrap(), ExitCode::from(1));
        assert!(run(&path, Some("pedantic"), false).is_err());
    }

    #[test]
    fn validate_missing_file() {
        assert!(run("/nonexistent/table.json", None, false).is_err());
        assert_eq!(
            run("/nonexistent/table.json", None, true).unwrap(),
            ExitCode::from(1)
        );
    }
}
