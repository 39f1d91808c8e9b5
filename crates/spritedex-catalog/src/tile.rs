//! Validated tile types.
//!
//! These are the closed, typed forms of the loosely-typed records found in a
//! [`TileTable`](crate::table::TileTable). They are only produced by the
//! loader, so every value here has already passed validation.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::clock::Animation;
use crate::error::QueryError;

/// Stable identity of a tile within one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Returns the id as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        TileId(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Facing direction of a creature tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// All directions, in sheet column order.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// Returns the direction as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// Behavioral category of a creature, independent of its skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subclass {
    Npc,
    Human,
    Player,
    Mob,
}

impl Subclass {
    /// All subclasses.
    pub const ALL: [Subclass; 4] = [
        Subclass::Npc,
        Subclass::Human,
        Subclass::Player,
        Subclass::Mob,
    ];

    /// Returns the subclass as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subclass::Npc => "npc",
            Subclass::Human => "human",
            Subclass::Player => "player",
            Subclass::Mob => "mob",
        }
    }
}

impl std::fmt::Display for Subclass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Subclass {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npc" => Ok(Subclass::Npc),
            "human" => Ok(Subclass::Human),
            "player" => Ok(Subclass::Player),
            "mob" => Ok(Subclass::Mob),
            _ => Err(QueryError::UnknownSubclass(s.to_string())),
        }
    }
}

/// Tile kinds that carry semantic attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A character or monster with direction, imageset and subclass.
    Creature,
}

impl EntityKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Creature => "creature",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creature" => Ok(EntityKind::Creature),
            _ => Err(QueryError::UnknownKind(s.to_string())),
        }
    }
}

/// Attribute keys recognized on creature tiles.
pub mod keys {
    pub const DIRECTION: &str = "direction";
    pub const IMAGESET: &str = "imageset";
    pub const SUBCLASS: &str = "subclass";
    pub const NAME: &str = "name";

    /// Keys every creature tile must carry.
    pub const REQUIRED: [&str; 3] = [DIRECTION, IMAGESET, SUBCLASS];

    /// Returns true if the key has meaning on a creature tile.
    pub fn is_recognized(key: &str) -> bool {
        matches!(key, DIRECTION | IMAGESET | SUBCLASS | NAME)
    }
}

/// One still image of an animation, with its display duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Tile drawn for this frame.
    pub tile: TileId,
    /// Display duration in milliseconds.
    pub duration_ms: NonZeroU32,
}

impl Frame {
    /// Creates a frame. Returns `None` for a zero duration.
    pub fn new(tile: impl Into<TileId>, duration_ms: u32) -> Option<Self> {
        NonZeroU32::new(duration_ms).map(|duration_ms| Self {
            tile: tile.into(),
            duration_ms,
        })
    }
}

/// Semantic attributes of a creature tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureAttributes {
    /// Facing direction.
    pub direction: Direction,
    /// Skin / appearance family (e.g., "boy", "skeleton").
    pub imageset: String,
    /// Behavioral category.
    pub subclass: Subclass,
    /// Unique character name, present only for named entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Semantic attributes of a tile, by kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileAttributes {
    /// A creature tile with validated attributes.
    Creature(CreatureAttributes),
    /// A decorative or background tile with no semantics.
    Plain,
}

impl TileAttributes {
    /// Returns the entity kind, if the tile has one.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            TileAttributes::Creature(_) => Some(EntityKind::Creature),
            TileAttributes::Plain => None,
        }
    }
}

/// A validated tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Stable tile id.
    pub id: TileId,
    /// Kind tag exactly as written in the source, if any.
    pub kind: Option<String>,
    /// Typed attributes.
    pub attributes: TileAttributes,
    /// Looping animation; `None` for a static tile.
    pub animation: Option<Animation>,
    /// The full raw attribute bag from the source record.
    pub properties: BTreeMap<String, String>,
}

impl Tile {
    /// Returns the creature attributes if this is a creature tile.
    pub fn creature(&self) -> Option<&CreatureAttributes> {
        match &self.attributes {
            TileAttributes::Creature(creature) => Some(creature),
            TileAttributes::Plain => None,
        }
    }

    /// Returns true if the tile has an animation.
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// Returns true if this is a creature of the given subclass.
    pub fn is(&self, subclass: Subclass) -> bool {
        self.creature().is_some_and(|c| c.subclass == subclass)
    }

    /// Returns the tile to draw after `elapsed_ms`.
    ///
    /// A static tile is its own sole frame.
    pub fn frame_at(&self, elapsed_ms: u64) -> TileId {
        match &self.animation {
            Some(animation) => animation.sample(elapsed_ms),
            None => self.id,
        }
    }
}
