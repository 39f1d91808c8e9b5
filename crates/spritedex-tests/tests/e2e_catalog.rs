//! End-to-end catalog tests against the characters fixture.
//!
//! ```bash
//! cargo test -p spritedex-tests --test e2e_catalog
//! ```

use pretty_assertions::assert_eq;

use spritedex_catalog::{
    build_index, current_frame, load_catalog, load_catalog_with_profile, AppearanceQuery,
    Direction, EntityKind, ErrorCategory, ErrorCode, LoadProfile, Resolver, Subclass, TileId,
    TileRecord,
};
use spritedex_tests::{
    characters_catalog, characters_table, creature_tile, FIRST_BLOCK, FRAME_MS, SECOND_BLOCK,
};

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_fixture_loads_cleanly() {
    let catalog = characters_catalog();

    assert_eq!(catalog.name(), "characters");
    assert_eq!(catalog.len(), 96);
    assert_eq!(catalog.creatures().count(), 32);
    assert_eq!(catalog.animated().count(), 32);
    assert!(catalog.warnings().is_empty());
}

#[test]
fn test_every_id_is_resolvable() {
    let catalog = characters_catalog();
    for id in 0..96 {
        let tile = catalog.tile(TileId(id)).unwrap();
        assert_eq!(tile.id, TileId(id));
    }
    assert!(catalog.tile(TileId(96)).is_none());
}

#[test]
fn test_duplicate_id_aborts_load() {
    let mut table = characters_table();
    table.tiles[10] = TileRecord::plain(9);

    let failure = load_catalog(&table).unwrap_err();
    assert!(failure.has_error(ErrorCode::DuplicateTileId));
    assert!(failure.has_category(ErrorCategory::MalformedRecord));
}

#[test]
fn test_dangling_frames_are_all_reported() {
    let mut table = characters_table();
    table.tiles[0] = table.tiles[0]
        .clone()
        .with_animation(&[(0, 160), (500, 160)]);
    table.tiles[3] = table.tiles[3]
        .clone()
        .with_animation(&[(3, 160), (600, 160)]);

    let failure = load_catalog(&table).unwrap_err();
    let dangling: Vec<Option<i64>> = failure
        .errors
        .iter()
        .filter(|e| e.code.category() == ErrorCategory::DanglingFrameReference)
        .map(|e| e.location.tile)
        .collect();
    assert_eq!(dangling, vec![Some(0), Some(3)]);
}

#[test]
fn test_one_pass_reports_mixed_errors() {
    let mut table = characters_table();
    table.tiles[0] = table.tiles[0].clone().with_animation(&[(0, 0)]);
    table.tiles[3].properties.remove("subclass");

    let failure = load_catalog(&table).unwrap_err();
    assert!(failure.has_category(ErrorCategory::ZeroOrNegativeDuration));
    assert!(failure.has_error(ErrorCode::MissingAttribute));
}

#[test]
fn test_strict_profile_rejects_unknown_attribute() {
    let mut table = characters_table();
    table.tiles[6] = table.tiles[6].clone().with_property("speed", "fast");

    let catalog = load_catalog(&table).unwrap();
    assert_eq!(catalog.warnings().len(), 1);

    let failure = load_catalog_with_profile(&table, &LoadProfile::strict()).unwrap_err();
    assert!(failure.has_error(ErrorCode::UnknownAttribute));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_every_skin_faces_every_direction() {
    let catalog = characters_catalog();
    let index = build_index(&catalog);

    for (block, skins) in [FIRST_BLOCK, SECOND_BLOCK].iter().enumerate() {
        for (slot, skin) in skins.iter().enumerate() {
            for (row, direction) in Direction::ALL.iter().enumerate() {
                let expected = creature_tile(block as u32, slot as u32, row as u32);
                assert_eq!(
                    index.resolve(EntityKind::Creature, skin, *direction, None),
                    Some(TileId(expected)),
                    "{} facing {}",
                    skin,
                    direction
                );
            }
        }
    }
}

#[test]
fn test_bob_walk_cycle() {
    let resolver = Resolver::new(characters_catalog());
    let bob = resolver
        .resolve(
            EntityKind::Creature,
            "boy",
            Direction::Down,
            Some(Subclass::Player),
        )
        .unwrap();

    assert_eq!(bob.id(), TileId(3));
    assert_eq!(bob.creature().unwrap().name.as_deref(), Some("Bob"));
    let frames: Vec<u32> = [0, FRAME_MS, 2 * FRAME_MS, 3 * FRAME_MS]
        .iter()
        .map(|&t| current_frame(&bob, t).0)
        .collect();
    assert_eq!(frames, vec![3, 4, 5, 3]);
}

#[test]
fn test_named_lookup_and_subclass_listing() {
    let resolver = Resolver::new(characters_catalog());

    assert_eq!(resolver.by_name("Mira").unwrap().id(), TileId(9));
    assert!(resolver.by_name("Nobody").is_none());

    let mobs: Vec<u32> = resolver
        .with_subclass(Subclass::Mob)
        .map(|h| h.id().0)
        .collect();
    assert_eq!(mobs.len(), 12);
    assert_eq!(mobs[..3].to_vec(), vec![48, 51, 54]);
}

#[test]
fn test_wrong_subclass_is_not_found() {
    let resolver = Resolver::new(characters_catalog());
    let query = AppearanceQuery::parse("creature", "bat", "up", Some("player")).unwrap();
    assert!(resolver.resolve_query(&query).is_none());

    let query = AppearanceQuery::parse("creature", "unknown-skin", "down", None).unwrap();
    assert!(resolver.resolve_query(&query).is_none());
}

#[test]
fn test_frame_rects_follow_the_strip() {
    let resolver = Resolver::new(characters_catalog());
    let knight = resolver
        .resolve(EntityKind::Creature, "knight", Direction::Up, None)
        .unwrap();

    // Row 7, column 9.
    assert_eq!(knight.id(), TileId(93));
    let rect = knight.rect();
    assert_eq!((rect.x, rect.y), (144, 112));
    let rect = knight.current_frame_rect(2 * FRAME_MS);
    assert_eq!((rect.x, rect.y), (176, 112));
}

#[test]
fn test_directions_summary() {
    let resolver = Resolver::new(characters_catalog());
    let slime = resolver.directions(EntityKind::Creature, "slime");

    let ids: Vec<(Direction, u32)> = slime.iter().map(|(d, h)| (*d, h.id().0)).collect();
    assert_eq!(
        ids,
        vec![
            (Direction::Down, 51),
            (Direction::Left, 63),
            (Direction::Right, 75),
            (Direction::Up, 87),
        ]
    );
}
