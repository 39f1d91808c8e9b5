//! Convert command implementation
//!
//! Rewrites a Tiled tileset (or a native table) as a pretty-printed native
//! tile table.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use spritedex_catalog::{validate_table, LoadProfile};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{input_error_to_json, load_error_to_json, CommandOutput};
use super::{print_diagnostics, warnings_to_json};
use crate::input::load_table;

/// Result payload of `convert --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResult {
    /// Source format ("table" or "tiled")
    pub source_kind: String,
    /// BLAKE3 hash of the input file
    pub source_hash: String,
    /// Output file written
    pub output: String,
    /// Number of tile records written
    pub records: usize,
    /// Whether the written table loads cleanly
    pub valid: bool,
}

/// Run the convert command
///
/// # Arguments
/// * `input` - Path to the input file (Tiled `.tsj`/`.tsx` or native `.json`)
/// * `output` - Path of the native table to write
/// * `allow_invalid` - Write the table even if it would not load
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if written, 1 if the input is unreadable or invalid
pub fn run(input: &str, output: &str, allow_invalid: bool, json_output: bool) -> Result<ExitCode> {
    let loaded = match load_table(Path::new(input)) {
        Ok(loaded) => loaded,
        Err(e) if json_output => {
            let error = input_error_to_json(&e, Some(input));
            CommandOutput::<ConvertResult>::failure(vec![error], vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read input file: {}", input))
        }
    };

    let report = validate_table(&loaded.table, &LoadProfile::default());
    let valid = report.is_ok();

    if !valid && !allow_invalid {
        if json_output {
            CommandOutput::<ConvertResult>::failure(
                report.errors.iter().map(load_error_to_json).collect(),
                warnings_to_json(&report.warnings),
            )
            .print()?;
        } else {
            print_diagnostics(&report.errors, &report.warnings);
            println!(
                "\n{} {} does not load; pass --allow-invalid to write it anyway",
                "FAILED".red().bold(),
                input
            );
        }
        return Ok(ExitCode::from(1));
    }

    let json = loaded
        .table
        .to_json_pretty()
        .context("Failed to serialize table")?;
    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write output file: {}", output))?;

    tracing::info!(input, output, records = loaded.table.tiles.len(), valid, "table converted");

    let result = ConvertResult {
        source_kind: loaded.source_kind.as_str().to_string(),
        source_hash: loaded.source_hash,
        output: output.to_string(),
        records: loaded.table.tiles.len(),
        valid,
    };

    if json_output {
        CommandOutput::success(result, warnings_to_json(&report.warnings)).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    print_diagnostics(&report.errors, &report.warnings);
    println!(
        "{} {} ({}) -> {} ({} records)",
        "Converted:".cyan().bold(),
        input,
        result.source_kind,
        result.output,
        result.records
    );
    if !valid {
        println!(
            "{} written table has {} error(s)",
            "WARNING".yellow().bold(),
            report.errors.len()
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spritedex_catalog::{load_catalog, TileTable};

    const TILED: &str = r#"{
        "name": "bats",
        "columns": 3,
        "tilecount": 3,
        "tilewidth": 16,
        "tileheight": 16,
        "tiles": [ {
            "id": 0,
            "type": "creature",
            "properties": [
                { "name": "direction", "type": "string", "value": "up" },
                { "name": "imageset", "type": "string", "value": "bat" },
                { "name": "subclass", "type": "string", "value": "mob" }
            ],
            "animation": [
                { "tileid": 0, "duration": 100 },
                { "tileid": 1, "duration": 100 },
                { "tileid": 2, "duration": 100 }
            ]
        } ]
    }"#;

    #[test]
    fn convert_writes_native_table() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("bats.tsj");
        let output = tmp.path().join("out").join("bats.json");
        fs::write(&input, TILED).unwrap();

        let code = run(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            false,
            false,
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let written = TileTable::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.name, "bats");
        assert_eq!(written.tiles.len(), 3);
        let catalog = load_catalog(&written).unwrap();
        assert_eq!(catalog.animated().count(), 1);
    }

    #[test]
    fn convert_refuses_invalid_table() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("bats.tsj");
        let output = tmp.path().join("bats.json");
        fs::write(&input, TILED.replace("\"tileid\": 2", "\"tileid\": 9")).unwrap();

        let input = input.to_str().unwrap();
        let output_str = output.to_str().unwrap();
        assert_eq!(run(input, output_str, false, true).unwrap(), ExitCode::from(1));
        assert!(!output.exists());

        assert_eq!(run(input, output_str, true, false).unwrap(), ExitCode::SUCCESS);
        assert!(output.exists());
    }

    #[test]
    fn convert_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("out.json");
        assert!(run("/nonexistent/bats.tsj", output.to_str().unwrap(), false, false).is_err());
    }
}
