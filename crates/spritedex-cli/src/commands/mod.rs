//! CLI command implementations

pub mod convert;
pub mod inspect;
pub mod json_output;
pub mod resolve;
pub mod sample;
pub mod validate;

use anyhow::{Context, Result};
use colored::Colorize;
use spritedex_catalog::{
    load_catalog_with_profile, Catalog, LoadError, LoadProfile, LoadWarning, Location,
};
use std::path::Path;

use crate::input::{load_table, SourceKind};
use json_output::{
    error_codes, input_error_to_json, load_error_to_json, load_warning_to_json, CommandOutput,
    JsonError, JsonWarning,
};

/// A table that was read and loaded successfully.
pub(crate) struct Opened {
    pub catalog: Catalog,
    pub source_kind: SourceKind,
    pub source_hash: String,
}

/// Looks up a load profile by name (`None` selects the default).
pub(crate) fn resolve_profile(name: Option<&str>) -> Result<LoadProfile, JsonError> {
    match name {
        None => Ok(LoadProfile::default()),
        Some(name) => LoadProfile::by_name(name).ok_or_else(|| {
            JsonError::new(
                error_codes::UNKNOWN_PROFILE,
                format!(
                    "unknown load profile: {} (expected {})",
                    name,
                    LoadProfile::names().join(", ")
                ),
            )
        }),
    }
}

/// Reads and loads a table for a query-style command.
///
/// Returns `Ok(None)` when the table could not be loaded; the failure has
/// already been printed in the requested format.
pub(crate) fn open_catalog(table_path: &str, json: bool) -> Result<Option<Opened>> {
    let loaded = match load_table(Path::new(table_path)) {
        Ok(loaded) => loaded,
        Err(e) if json => {
            let error = input_error_to_json(&e, Some(table_path));
            CommandOutput::<()>::failure(vec![error], vec![]).print()?;
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read table file: {}", table_path))
        }
    };

    match load_catalog_with_profile(&loaded.table, &LoadProfile::default()) {
        Ok(catalog) => Ok(Some(Opened {
            catalog,
            source_kind: loaded.source_kind,
            source_hash: loaded.source_hash,
        })),
        Err(failure) => {
            if json {
                CommandOutput::<()>::failure(
                    failure.errors.iter().map(load_error_to_json).collect(),
                    failure.warnings.iter().map(load_warning_to_json).collect(),
                )
                .print()?;
            } else {
                println!(
                    "{} {} does not load ({} error(s))",
                    "FAILED".red().bold(),
                    table_path,
                    failure.errors.len()
                );
                print_diagnostics(&failure.errors, &failure.warnings);
                println!(
                    "\n{} run `spritedex validate --table {}` for details",
                    "hint:".dimmed(),
                    table_path
                );
            }
            Ok(None)
        }
    }
}

/// Converts catalog warnings for JSON output.
pub(crate) fn warnings_to_json(warnings: &[LoadWarning]) -> Vec<JsonWarning> {
    warnings.iter().map(load_warning_to_json).collect()
}

/// Prints load errors and warnings.
pub(crate) fn print_diagnostics(errors: &[LoadError], warnings: &[LoadWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                location_suffix(&error.location).dimmed(),
                error.message
            );
        }
    }

    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in warnings {
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                location_suffix(&warning.location).dimmed(),
                warning.message
            );
        }
    }
}

fn location_suffix(location: &Location) -> String {
    let text = location.to_string();
    if text.is_empty() {
        text
    } else {
        format!(" at {}", text)
    }
}
