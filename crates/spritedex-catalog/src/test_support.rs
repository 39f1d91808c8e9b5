//! Shared tables for unit tests.

use crate::table::{TileRecord, TileTable};

/// A 6x1 sheet:
///
/// | id | tile |
/// |----|------|
/// | 0  | creature doll/down/npc, static |
/// | 1  | creature doll/down/human, static |
/// | 2  | plain |
/// | 3  | creature boy/down/player "Bob", frames 3,4,5 at 160ms |
/// | 4  | plain |
/// | 5  | plain |
pub(crate) fn scenario_table() -> TileTable {
    TileTable::builder(6, 1)
        .name("scenario")
        .tile(TileRecord::creature(0, "doll", "down", "npc"))
        .tile(TileRecord::creature(1, "doll", "down", "human"))
        .tile(
            TileRecord::creature(3, "boy", "down", "player")
                .named("Bob")
                .with_strip(3, 160),
        )
        .fill_plain()
        .build()
}

/// A 12x2 sheet in the four-characters-per-row layout: each row holds one
/// direction, each character takes three columns.
///
/// Row 0 faces down, row 1 faces left. Characters are doll (human),
/// boy (player "Bob"), skeleton (mob), and bat (mob).
pub(crate) fn two_row_table() -> TileTable {
    let skins = [
        ("doll", "human", None),
        ("boy", "player", Some("Bob")),
        ("skeleton", "mob", None),
        ("bat", "mob", None),
    ];
    let directions = ["down", "left"];

    let mut builder = TileTable::builder(12, 2).name("two-row");
    for (row, direction) in directions.iter().enumerate() {
        for (slot, (imageset, subclass, name)) in skins.iter().enumerate() {
            let id = (row * 12 + slot * 3) as i64;
            let mut record =
                TileRecord::creature(id, *imageset, *direction, *subclass).with_strip(3, 160);
            if let Some(name) = name {
                record = record.named(*name);
            }
            builder = builder.tile(record);
        }
    }
    builder.fill_plain().build()
}
