//! Catalog content fingerprinting.
//!
//! The fingerprint is a BLAKE3 hash over a deterministic byte encoding of the
//! validated catalog:
//!
//! ```text
//! fingerprint = hex(BLAKE3(sheet || tile_0 || tile_1 || ...))
//! ```
//!
//! Strings are length-prefixed and integers little-endian, so no two distinct
//! catalogs share an encoding. Record order in the source table does not
//! matter because tiles are encoded in id order.

use crate::catalog::SheetInfo;
use crate::tile::Tile;

/// Computes the fingerprint of a sheet and its tiles.
pub(crate) fn catalog_fingerprint(sheet: &SheetInfo, tiles: &[Tile]) -> String {
    let mut hasher = blake3::Hasher::new();

    write_str(&mut hasher, &sheet.name);
    write_u32(&mut hasher, sheet.tile_width);
    write_u32(&mut hasher, sheet.tile_height);
    write_u32(&mut hasher, sheet.columns);
    write_u32(&mut hasher, sheet.rows);
    match &sheet.image {
        Some(image) => {
            hasher.update(&[1]);
            write_str(&mut hasher, &image.source);
            write_u32(&mut hasher, image.width);
            write_u32(&mut hasher, image.height);
        }
        None => {
            hasher.update(&[0]);
        }
    }

    write_u32(&mut hasher, tiles.len() as u32);
    for tile in tiles {
        write_tile(&mut hasher, tile);
    }

    hasher.finalize().to_hex().to_string()
}

fn write_tile(hasher: &mut blake3::Hasher, tile: &Tile) {
    write_u32(hasher, tile.id.0);

    match &tile.kind {
        Some(kind) => {
            hasher.update(&[1]);
            write_str(hasher, kind);
        }
        None => {
            hasher.update(&[0]);
        }
    }

    // BTreeMap iteration is sorted by key.
    write_u32(hasher, tile.properties.len() as u32);
    for (key, value) in &tile.properties {
        write_str(hasher, key);
        write_str(hasher, value);
    }

    match &tile.animation {
        Some(animation) => {
            write_u32(hasher, animation.len() as u32);
            for frame in animation.frames() {
                write_u32(hasher, frame.tile.0);
                write_u32(hasher, frame.duration_ms.get());
            }
        }
        None => write_u32(hasher, 0),
    }
}

fn write_u32(hasher: &mut blake3::Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_str(hasher: &mut blake3::Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}
