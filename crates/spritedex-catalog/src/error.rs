//! Error types for tile table validation and catalog queries.

use thiserror::Error;

/// Error codes reported while loading a tile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Grid errors (E001-E002)
    /// E001: Grid has zero columns or rows
    InvalidGrid,
    /// E002: Record count does not match rows x columns
    TileCountMismatch,

    // Identity errors (E003-E005)
    /// E003: Tile id appears more than once
    DuplicateTileId,
    /// E004: Tile id outside [0, tile count)
    TileIdOutOfRange,
    /// E005: Tile id in range has no record
    MissingTileId,

    // Attribute errors (E006-E007)
    /// E006: Creature tile lacks a required attribute
    MissingAttribute,
    /// E007: Attribute value cannot be parsed
    InvalidAttributeValue,

    // Animation errors (E008-E010)
    /// E008: Animation declared with no frames
    EmptyAnimation,
    /// E009: Animation frame references a nonexistent tile
    DanglingFrameReference,
    /// E010: Animation frame duration is zero or negative
    NonPositiveDuration,

    // Findings escalated by a strict load profile (E011-E014)
    /// E011: Creature tile carries an attribute that is not recognized
    UnknownAttribute,
    /// E012: Tile kind is not recognized
    UnrecognizedKind,
    /// E013: Two tiles share kind, imageset, direction and subclass
    DuplicateAppearance,
    /// E014: Tile has attributes but no kind
    AttributesWithoutKind,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidGrid => "E001",
            ErrorCode::TileCountMismatch => "E002",
            ErrorCode::DuplicateTileId => "E003",
            ErrorCode::TileIdOutOfRange => "E004",
            ErrorCode::MissingTileId => "E005",
            ErrorCode::MissingAttribute => "E006",
            ErrorCode::InvalidAttributeValue => "E007",
            ErrorCode::EmptyAnimation => "E008",
            ErrorCode::DanglingFrameReference => "E009",
            ErrorCode::NonPositiveDuration => "E010",
            ErrorCode::UnknownAttribute => "E011",
            ErrorCode::UnrecognizedKind => "E012",
            ErrorCode::DuplicateAppearance => "E013",
            ErrorCode::AttributesWithoutKind => "E014",
        }
    }

    /// Returns the coarse category this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::DanglingFrameReference => ErrorCategory::DanglingFrameReference,
            ErrorCode::NonPositiveDuration => ErrorCategory::ZeroOrNegativeDuration,
            _ => ErrorCategory::MalformedRecord,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Coarse grouping of load errors.
///
/// Every category is fatal to catalog construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Duplicate or out-of-range ids, grid mismatches, missing or bad attributes.
    MalformedRecord,
    /// An animation frame points at a tile that does not exist.
    DanglingFrameReference,
    /// An animation frame has a duration of zero or less.
    ZeroOrNegativeDuration,
}

/// Warning codes reported while loading a tile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Creature tile carries an attribute that is not recognized
    UnknownAttribute,
    /// W002: Tile kind is not recognized; tile is treated as plain
    UnrecognizedKind,
    /// W003: Two tiles share kind, imageset, direction and subclass
    DuplicateAppearance,
    /// W004: Tile has attributes but no kind; attributes carry no semantics
    AttributesWithoutKind,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::UnknownAttribute => "W001",
            WarningCode::UnrecognizedKind => "W002",
            WarningCode::DuplicateAppearance => "W003",
            WarningCode::AttributesWithoutKind => "W004",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where in the table a diagnostic points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Raw id of the offending tile record, if the diagnostic is about one.
    pub tile: Option<i64>,
    /// Field within the record or table (e.g., "animation\[1\].duration_ms").
    pub field: Option<String>,
}

impl Location {
    /// A location naming only a table-level field.
    pub fn table(field: impl Into<String>) -> Self {
        Self {
            tile: None,
            field: Some(field.into()),
        }
    }

    /// A location naming a field of one tile record.
    pub fn tile(tile: i64, field: impl Into<String>) -> Self {
        Self {
            tile: Some(tile),
            field: Some(field.into()),
        }
    }

    fn is_empty(&self) -> bool {
        self.tile.is_none() && self.field.is_none()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.tile, &self.field) {
            (Some(tile), Some(field)) => write!(f, "tile {}, field {}", tile, field),
            (Some(tile), None) => write!(f, "tile {}", tile),
            (None, Some(field)) => write!(f, "field {}", field),
            (None, None) => Ok(()),
        }
    }
}

/// A load error with code, message, and the tile/field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Offending tile and field.
    pub location: Location,
}

impl LoadError {
    /// Creates a new load error without a location.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: Location::default(),
        }
    }

    /// Creates a new load error pointing at a location.
    pub fn at(code: ErrorCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            message: message.into(),
            location,
        }
    }

    /// Returns the taxonomy category of this error.
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{}: {} (at {})", self.code, self.message, self.location)
        }
    }
}

impl std::error::Error for LoadError {}

/// A load warning with code, message, and the tile/field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Offending tile and field.
    pub location: Location,
}

impl LoadWarning {
    /// Creates a new load warning pointing at a location.
    pub fn at(code: WarningCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            message: message.into(),
            location,
        }
    }
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{}: {} (at {})", self.code, self.message, self.location)
        }
    }
}

/// Every finding produced by one validation pass over a tile table.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// List of load errors.
    pub errors: Vec<LoadError>,
    /// List of load warnings.
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// Adds an error to the report.
    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: LoadWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if any error has the given code.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Converts to a Result, returning the failure if there are errors.
    pub fn into_result(self) -> Result<Vec<LoadWarning>, LoadFailure> {
        if self.is_ok() {
            Ok(self.warnings)
        } else {
            Err(LoadFailure {
                errors: self.errors,
                warnings: self.warnings,
            })
        }
    }
}

/// A tile table that failed to load.
///
/// Carries every error found in the pass, not just the first.
#[derive(Debug, Clone, Error)]
#[error("tile table failed to load with {} error(s)", errors.len())]
pub struct LoadFailure {
    /// All errors found.
    pub errors: Vec<LoadError>,
    /// Warnings found alongside the errors.
    pub warnings: Vec<LoadWarning>,
}

impl LoadFailure {
    /// Returns true if any error has the given code.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Returns true if any error falls in the given category.
    pub fn has_category(&self, category: ErrorCategory) -> bool {
        self.errors.iter().any(|e| e.category() == category)
    }
}

/// Top-level error type for reading tables from serialized sources.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The XML is well formed but is not a Tiled tileset.
    #[error("invalid Tiled tileset: {0}")]
    TiledXml(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table parsed but did not validate.
    #[error(transparent)]
    Invalid(#[from] LoadFailure),
}

/// A string-typed appearance query that could not be interpreted.
///
/// Distinct from a query that is well formed but matches nothing, which is
/// reported as `None` by the lookup functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The kind is not one the catalog understands.
    #[error("unknown entity kind '{0}' (expected creature)")]
    UnknownKind(String),

    /// The direction is not down/left/right/up.
    #[error("unknown direction '{0}' (expected down, left, right, or up)")]
    UnknownDirection(String),

    /// The subclass is not npc/human/player/mob.
    #[error("unknown subclass '{0}' (expected npc, human, player, or mob)")]
    UnknownSubclass(String),

    /// The imageset is empty.
    #[error("imageset must not be empty")]
    EmptyImageset,
}
