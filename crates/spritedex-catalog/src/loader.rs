//! Tile table validation and catalog construction.
//!
//! Loading is a single pass that records every problem it finds. A table
//! either produces a complete [`Catalog`] or a [`LoadFailure`] listing all of
//! its errors; no partially loaded catalog is ever returned.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;
use std::str::FromStr;

use tracing::{debug, info};

use crate::catalog::{Catalog, SheetInfo};
use crate::clock::Animation;
use crate::error::{
    ErrorCode, LoadError, LoadFailure, LoadReport, LoadWarning, Location, QueryError,
};
use crate::profile::{LoadProfile, Severity, SoftFinding};
use crate::table::{TileRecord, TileTable};
use crate::tile::{
    keys, CreatureAttributes, Direction, EntityKind, Frame, Subclass, Tile, TileAttributes,
    TileId,
};

/// Largest grid (rows x columns) the loader accepts.
pub const MAX_TILE_COUNT: u64 = 1 << 20;

/// Validates a table and returns every finding without building a catalog.
///
/// # Example
/// ```
/// use spritedex_catalog::{validate_table, LoadProfile, TileRecord, TileTable};
///
/// let table = TileTable::builder(3, 1)
///     .tile(TileRecord::creature(0, "boy", "down", "player").with_strip(3, 160))
///     .fill_plain()
///     .build();
///
/// let report = validate_table(&table, &LoadProfile::default());
/// assert!(report.is_ok());
/// ```
pub fn validate_table(table: &TileTable, profile: &LoadProfile) -> LoadReport {
    Pass::new(table, profile).run().report
}

/// Loads a table with the default profile.
pub fn load_catalog(table: &TileTable) -> Result<Catalog, LoadFailure> {
    load_catalog_with_profile(table, &LoadProfile::default())
}

/// Loads a table, reporting soft findings according to `profile`.
pub fn load_catalog_with_profile(
    table: &TileTable,
    profile: &LoadProfile,
) -> Result<Catalog, LoadFailure> {
    let Outcome { report, slots } = Pass::new(table, profile).run();

    let warnings = report.into_result().inspect_err(|failure| {
        debug!(
            sheet = %table.name,
            errors = failure.errors.len(),
            warnings = failure.warnings.len(),
            "tile table rejected"
        );
    })?;

    let tiles = slots
        .into_iter()
        .collect::<Option<Vec<Tile>>>()
        .ok_or_else(|| LoadFailure {
            errors: vec![LoadError::new(
                ErrorCode::MissingTileId,
                "tile table has ids without a usable record",
            )],
            warnings: Vec::new(),
        })?;

    let sheet = SheetInfo {
        name: table.name.clone(),
        tile_width: table.tile_width,
        tile_height: table.tile_height,
        columns: table.columns,
        rows: table.rows,
        image: table.image.clone(),
    };
    let catalog = Catalog::new(sheet, tiles, warnings);

    info!(
        sheet = %catalog.name(),
        tiles = catalog.len(),
        animated = catalog.animated().count(),
        creatures = catalog.creatures().count(),
        warnings = catalog.warnings().len(),
        fingerprint = &catalog.fingerprint()[..16],
        "catalog loaded"
    );

    Ok(catalog)
}

struct Outcome {
    report: LoadReport,
    /// One slot per grid id, filled from the first valid record with that id.
    slots: Vec<Option<Tile>>,
}

struct Pass<'a> {
    table: &'a TileTable,
    profile: &'a LoadProfile,
    report: LoadReport,
}

impl<'a> Pass<'a> {
    fn new(table: &'a TileTable, profile: &'a LoadProfile) -> Self {
        Self {
            table,
            profile,
            report: LoadReport::default(),
        }
    }

    fn run(mut self) -> Outcome {
        let table = self.table;
        debug!(
            sheet = %table.name,
            records = table.tiles.len(),
            columns = table.columns,
            rows = table.rows,
            profile = %self.profile.name,
            "validating tile table"
        );

        let count = self.check_grid();
        let known = count.map(|count| self.check_ids(count));

        let mut slots: Vec<Option<Tile>> = match count {
            Some(count) => std::iter::repeat_with(|| None).take(count as usize).collect(),
            None => Vec::new(),
        };

        for record in &table.tiles {
            let Some(tile) = self.check_record(record, known.as_ref()) else {
                continue;
            };
            if let Some(slot) = slots.get_mut(tile.id.index()) {
                if slot.is_none() {
                    *slot = Some(tile);
                }
            }
        }

        self.check_duplicate_appearances(&slots);

        debug!(
            errors = self.report.errors.len(),
            warnings = self.report.warnings.len(),
            "validation pass finished"
        );

        Outcome {
            report: self.report,
            slots,
        }
    }

    /// Returns the declared tile count, or `None` if the grid is unusable.
    fn check_grid(&mut self) -> Option<u64> {
        let table = self.table;
        let mut usable = true;

        if table.columns == 0 {
            self.error(
                ErrorCode::InvalidGrid,
                "columns must be positive",
                Location::table("columns"),
            );
            usable = false;
        }
        if table.rows == 0 {
            self.error(
                ErrorCode::InvalidGrid,
                "rows must be positive",
                Location::table("rows"),
            );
            usable = false;
        }
        if table.tile_width == 0 || table.tile_height == 0 {
            self.error(
                ErrorCode::InvalidGrid,
                format!(
                    "tile size must be positive, got {}x{}",
                    table.tile_width, table.tile_height
                ),
                Location::table("tile_width"),
            );
        }

        // Pixel rectangles are computed in u32, so the sheet itself must fit.
        let sheet_width = u64::from(table.columns) * u64::from(table.tile_width);
        let sheet_height = u64::from(table.rows) * u64::from(table.tile_height);
        if sheet_width > u64::from(u32::MAX) || sheet_height > u64::from(u32::MAX) {
            self.error(
                ErrorCode::InvalidGrid,
                format!(
                    "sheet of {}x{} pixels does not fit in 32 bits",
                    sheet_width, sheet_height
                ),
                Location::table("tile_width"),
            );
            usable = false;
        }

        let count = table.declared_tile_count();
        if usable && count > MAX_TILE_COUNT {
            self.error(
                ErrorCode::InvalidGrid,
                format!(
                    "grid of {}x{} tiles exceeds the maximum of {} tiles",
                    table.columns, table.rows, MAX_TILE_COUNT
                ),
                Location::table("rows"),
            );
            usable = false;
        }
        if !usable {
            return None;
        }

        if table.tiles.len() as u64 != count {
            self.error(
                ErrorCode::TileCountMismatch,
                format!(
                    "expected {} records for a {}x{} grid, found {}",
                    count,
                    table.columns,
                    table.rows,
                    table.tiles.len()
                ),
                Location::table("tiles"),
            );
        }

        Some(count)
    }

    /// Checks id uniqueness, range, and coverage. Returns the ids present.
    fn check_ids(&mut self, count: u64) -> HashSet<i64> {
        let table = self.table;
        let mut first_index: HashMap<i64, usize> = HashMap::new();

        for (i, record) in table.tiles.iter().enumerate() {
            if record.id < 0 || record.id as u64 >= count {
                self.error(
                    ErrorCode::TileIdOutOfRange,
                    format!("tile id {} is outside [0, {})", record.id, count),
                    Location::tile(record.id, "id"),
                );
                continue;
            }
            match first_index.get(&record.id) {
                Some(&first) => self.error(
                    ErrorCode::DuplicateTileId,
                    format!(
                        "tile id {} appears more than once (records {} and {})",
                        record.id, first, i
                    ),
                    Location::tile(record.id, "id"),
                ),
                None => {
                    first_index.insert(record.id, i);
                }
            }
        }

        for id in 0..count as i64 {
            if !first_index.contains_key(&id) {
                self.error(
                    ErrorCode::MissingTileId,
                    format!("no record for tile id {}", id),
                    Location {
                        tile: Some(id),
                        field: None,
                    },
                );
            }
        }

        first_index.into_keys().collect()
    }

    fn check_record(&mut self, record: &TileRecord, known: Option<&HashSet<i64>>) -> Option<Tile> {
        let kind = record.kind.as_deref().filter(|k| !k.is_empty());
        let attributes = self.check_attributes(record, kind);
        let animation = self.check_animation(record, known);

        let in_range = known.is_some_and(|known| known.contains(&record.id));
        let id = u32::try_from(record.id).ok().filter(|_| in_range)?;

        Some(Tile {
            id: TileId(id),
            kind: kind.map(str::to_string),
            attributes: attributes?,
            animation: animation?,
            properties: record.properties.clone(),
        })
    }

    /// Returns `None` if the attributes were invalid (and reported).
    fn check_attributes(&mut self, record: &TileRecord, kind: Option<&str>) -> Option<TileAttributes> {
        let Some(kind) = kind else {
            if !record.properties.is_empty() {
                self.soft(
                    SoftFinding::AttributesWithoutKind,
                    format!(
                        "tile has {} attribute(s) but no kind; they carry no semantics",
                        record.properties.len()
                    ),
                    Location::tile(record.id, "properties"),
                );
            }
            return Some(TileAttributes::Plain);
        };

        match kind.parse::<EntityKind>() {
            Ok(EntityKind::Creature) => self.check_creature(record).map(TileAttributes::Creature),
            Err(_) => {
                self.soft(
                    SoftFinding::UnrecognizedKind,
                    format!("kind '{}' is not recognized; tile is treated as plain", kind),
                    Location::tile(record.id, "kind"),
                );
                Some(TileAttributes::Plain)
            }
        }
    }

    fn check_creature(&mut self, record: &TileRecord) -> Option<CreatureAttributes> {
        let props = &record.properties;

        for key in keys::REQUIRED {
            if !props.contains_key(key) {
                self.error(
                    ErrorCode::MissingAttribute,
                    format!("creature tile is missing required attribute '{}'", key),
                    Location::tile(record.id, format!("properties.{}", key)),
                );
            }
        }

        for key in props.keys().filter(|k| !keys::is_recognized(k)) {
            self.soft(
                SoftFinding::UnknownAttribute,
                format!("attribute '{}' is not recognized on creature tiles", key),
                Location::tile(record.id, format!("properties.{}", key)),
            );
        }

        let direction = self.parse_attribute::<Direction>(record, keys::DIRECTION);
        let subclass = self.parse_attribute::<Subclass>(record, keys::SUBCLASS);
        let imageset = self.non_empty_attribute(record, keys::IMAGESET);
        let name = match props.get(keys::NAME) {
            Some(_) => Some(self.non_empty_attribute(record, keys::NAME)?),
            None => None,
        };

        Some(CreatureAttributes {
            direction: direction?,
            imageset: imageset?,
            subclass: subclass?,
            name,
        })
    }

    fn parse_attribute<T>(&mut self, record: &TileRecord, key: &str) -> Option<T>
    where
        T: FromStr<Err = QueryError>,
    {
        let value = record.properties.get(key)?;
        match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.error(
                    ErrorCode::InvalidAttributeValue,
                    e.to_string(),
                    Location::tile(record.id, format!("properties.{}", key)),
                );
                None
            }
        }
    }

    fn non_empty_attribute(&mut self, record: &TileRecord, key: &str) -> Option<String> {
        let value = record.properties.get(key)?;
        if value.trim().is_empty() {
            self.error(
                ErrorCode::InvalidAttributeValue,
                format!("attribute '{}' must not be empty", key),
                Location::tile(record.id, format!("properties.{}", key)),
            );
            return None;
        }
        Some(value.clone())
    }

    /// Outer `None` means the animation was invalid (and reported); inner
    /// `None` means the tile is static.
    fn check_animation(
        &mut self,
        record: &TileRecord,
        known: Option<&HashSet<i64>>,
    ) -> Option<Option<Animation>> {
        let Some(frames) = &record.animation else {
            return Some(None);
        };

        if frames.is_empty() {
            self.error(
                ErrorCode::EmptyAnimation,
                "animation has no frames",
                Location::tile(record.id, "animation"),
            );
            return None;
        }

        let mut valid = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            let exists = match known {
                Some(known) => known.contains(&frame.tile_id),
                None => u32::try_from(frame.tile_id).is_ok(),
            };
            if !exists {
                self.error(
                    ErrorCode::DanglingFrameReference,
                    format!(
                        "animation frame references tile {}, which does not exist",
                        frame.tile_id
                    ),
                    Location::tile(record.id, format!("animation[{}].tile_id", i)),
                );
            }

            let duration = if frame.duration_ms <= 0 {
                self.error(
                    ErrorCode::NonPositiveDuration,
                    format!("frame duration must be positive, got {}", frame.duration_ms),
                    Location::tile(record.id, format!("animation[{}].duration_ms", i)),
                );
                None
            } else {
                let duration = u32::try_from(frame.duration_ms).ok().and_then(NonZeroU32::new);
                if duration.is_none() {
                    self.error(
                        ErrorCode::InvalidAttributeValue,
                        format!(
                            "frame duration {} exceeds the maximum of {} ms",
                            frame.duration_ms,
                            u32::MAX
                        ),
                        Location::tile(record.id, format!("animation[{}].duration_ms", i)),
                    );
                }
                duration
            };

            let tile = u32::try_from(frame.tile_id).ok().filter(|_| exists);
            if let (Some(tile), Some(duration_ms)) = (tile, duration) {
                valid.push(Frame {
                    tile: TileId(tile),
                    duration_ms,
                });
            }
        }

        if valid.len() != frames.len() {
            return None;
        }
        Animation::new(valid).map(Some)
    }

    fn check_duplicate_appearances(&mut self, slots: &[Option<Tile>]) {
        let mut seen: HashMap<(&str, Direction, Subclass), TileId> = HashMap::new();

        for tile in slots.iter().flatten() {
            let Some(creature) = tile.creature() else {
                continue;
            };
            let key = (
                creature.imageset.as_str(),
                creature.direction,
                creature.subclass,
            );
            match seen.get(&key) {
                Some(first) => self.soft(
                    SoftFinding::DuplicateAppearance,
                    format!(
                        "creature {}/{}/{} is also defined by tile {}; lookups resolve to tile {}",
                        creature.imageset, creature.direction, creature.subclass, first, first
                    ),
                    Location::tile(i64::from(tile.id.0), "properties"),
                ),
                None => {
                    seen.insert(key, tile.id);
                }
            }
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, location: Location) {
        self.report.add_error(LoadError::at(code, message, location));
    }

    fn soft(&mut self, finding: SoftFinding, message: String, location: Location) {
        match self.profile.severity(finding) {
            Severity::Ignore => {}
            Severity::Warn => self.report.add_warning(LoadWarning::at(
                finding.warning_code(),
                message,
                location,
            )),
            Severity::Deny => {
                self.report
                    .add_error(LoadError::at(finding.error_code(), message, location))
            }
        }
    }
}
