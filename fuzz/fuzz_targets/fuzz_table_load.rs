#![no_main]

use libfuzzer_sys::fuzz_target;
use spritedex_catalog::{load_catalog, AppearanceQuery, Resolver, TileTable};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = TileTable::from_json(text) else {
        return;
    };
    let Ok(catalog) = load_catalog(&table) else {
        return;
    };

    for tile in catalog.tiles() {
        let _ = tile.frame_at(u64::MAX);
        let _ = catalog.tile_rect(tile.id);
    }

    let resolver = Resolver::new(catalog);
    if let Ok(query) = AppearanceQuery::parse("creature", "boy", "down", None) {
        let _ = resolver.resolve_query(&query);
    }
});
