//! JSON output types for machine-readable CLI output.
//!
//! Every command that accepts `--json` prints a single [`CommandOutput`]
//! envelope to stdout. The envelope shape is shared; the `result` payload is
//! command specific.

use serde::{Deserialize, Serialize};
use spritedex_catalog::{LoadError, LoadWarning};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Catalog load errors pass through with their own `E0xx` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Unknown load profile
    pub const UNKNOWN_PROFILE: &str = "CLI_004";
    /// Query could not be interpreted
    pub const INVALID_QUERY: &str = "CLI_005";
    /// Query matched no tile
    pub const NOT_FOUND: &str = "CLI_006";
    /// Invalid sampling range
    pub const INVALID_RANGE: &str = "CLI_007";
    /// XML parse error
    pub const XML_PARSE: &str = "CLI_008";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E009")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Raw id of the offending tile record (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<i64>,
    /// Field within the record or table (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            tile: None,
            path: None,
            file: None,
        }
    }

    /// Sets the field path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Raw id of the offending tile record (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<i64>,
    /// Field within the record or table (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// The envelope printed by every `--json` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Warnings reported while loading the table
    pub warnings: Vec<JsonWarning>,
    /// Command result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }

    /// Serializes and prints the output to stdout.
    pub fn print(&self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Converts an input error into a JSON error.
pub fn input_error_to_json(error: &InputError, file: Option<&str>) -> JsonError {
    let code = match error {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::UnknownExtension { .. } => error_codes::UNKNOWN_EXTENSION,
        InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        InputError::XmlParse { .. } => error_codes::XML_PARSE,
    };
    let json = JsonError::new(code, error.to_string());
    match file {
        Some(file) => json.with_file(file),
        None => json,
    }
}

/// Converts a catalog load error into a JSON error.
pub fn load_error_to_json(error: &LoadError) -> JsonError {
    JsonError {
        code: error.code.code().to_string(),
        message: error.message.clone(),
        tile: error.location.tile,
        path: error.location.field.clone(),
        file: None,
    }
}

/// Converts a catalog load warning into a JSON warning.
pub fn load_warning_to_json(warning: &LoadWarning) -> JsonWarning {
    JsonWarning {
        code: warning.code.code().to_string(),
        message: warning.message.clone(),
        tile: warning.location.tile,
        path: warning.location.field.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spritedex_catalog::{ErrorCode, Location, WarningCode};

    #[test]
    fn test_load_error_to_json() {
        let error = LoadError::at(
            ErrorCode::DanglingFrameReference,
            "animation frame references tile 99, which does not exist",
            Location::tile(3, "animation[1].tile_id"),
        );
        let json = load_error_to_json(&error);
        assert_eq!(json.code, "E009");
        assert_eq!(json.tile, Some(3));
        assert_eq!(json.path.as_deref(), Some("animation[1].tile_id"));
    }

    #[test]
    fn test_load_warning_to_json() {
        let warning = LoadWarning::at(
            WarningCode::UnknownAttribute,
            "attribute 'speed' is not recognized on creature tiles",
            Location::tile(0, "properties.speed"),
        );
        let json = load_warning_to_json(&warning);
        assert_eq!(json.code, "W001");
        assert_eq!(json.tile, Some(0));
    }

    #[test]
    fn test_input_error_to_json() {
        let error = InputError::UnknownExtension {
            extension: Some("tmx".to_string()),
        };
        let json = input_error_to_json(&error, Some("world.tmx"));
        assert_eq!(json.code, error_codes::UNKNOWN_EXTENSION);
        assert_eq!(json.file.as_deref(), Some("world.tmx"));

        let error = InputError::XmlParse {
            message: "unexpected end of stream".to_string(),
        };
        assert_eq!(input_error_to_json(&error, None).code, "CLI_008");
    }

    #[test]
    fn test_envelope_omits_missing_result() {
        let output: CommandOutput<u32> =
            CommandOutput::failure(vec![JsonError::new(error_codes::NOT_FOUND, "none")], vec![]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("result").is_none());
        assert_eq!(value["errors"][0]["code"], "CLI_006");
        assert!(value["errors"][0].get("tile").is_none());
    }
}
