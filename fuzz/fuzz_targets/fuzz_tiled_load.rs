#![no_main]

use libfuzzer_sys::fuzz_target;
use spritedex_catalog::{load_catalog, TiledTileset};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Either dialect; the leading byte of a real export tells them apart.
    let parsed = if text.trim_start().starts_with('<') {
        TiledTileset::from_xml(text)
    } else {
        TiledTileset::from_json(text)
    };
    let Ok(tileset) = parsed else {
        return;
    };
    let _ = load_catalog(&tileset.into_table());
});
