//! CLI command tests against the fixture files.
//!
//! Commands are invoked through the library entry points the binary
//! dispatches to, and checked by exit code and written output.
//!
//! ```bash
//! cargo test -p spritedex-tests --test cli_commands
//! ```

use std::process::ExitCode;

use pretty_assertions::assert_eq;

use spritedex_catalog::{load_catalog, TileTable};
use spritedex_cli::commands::resolve::QueryArgs;
use spritedex_cli::commands::sample::{timeline, SampleRange};
use spritedex_cli::commands::{convert, inspect, resolve, sample, validate};
use spritedex_tests::{characters_catalog, characters_table, fixture_path, Scratch};

fn fixture(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}

#[test]
fn test_validate_fixtures() {
    for name in ["characters.json", "characters.tsj", "characters.tsx"] {
        let path = fixture(name);
        assert_eq!(validate::run(&path, None, true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            validate::run(&path, Some("strict"), false).unwrap(),
            ExitCode::SUCCESS
        );
    }
}

#[test]
fn test_validate_broken_copy() {
    let scratch = Scratch::new();
    let mut table = characters_table();
    table.tiles.swap_remove(40);
    let path = scratch.write_table("broken.json", &table);

    assert_eq!(validate::run(&path, None, true).unwrap(), ExitCode::from(1));
    assert_eq!(inspect::run(&path, true).unwrap(), ExitCode::from(1));
}

#[test]
fn test_inspect_fixture() {
    assert_eq!(
        inspect::run(&fixture("characters.tsj"), false).unwrap(),
        ExitCode::SUCCESS
    );
}

#[test]
fn test_resolve_fixture() {
    let path = fixture("characters.json");
    let bob = QueryArgs {
        kind: "creature",
        imageset: "boy",
        direction: "left",
        subclass: Some("player"),
    };
    assert_eq!(resolve::run(&path, bob, 160, true).unwrap(), ExitCode::SUCCESS);

    let ghost = QueryArgs {
        imageset: "ghost",
        ..bob
    };
    assert_eq!(resolve::run(&path, ghost, 0, true).unwrap(), ExitCode::from(2));

    let bad_kind = QueryArgs {
        kind: "vehicle",
        ..bob
    };
    assert_eq!(resolve::run(&path, bad_kind, 0, true).unwrap(), ExitCode::from(1));
}

#[test]
fn test_sample_fixture_timeline() {
    let catalog = characters_catalog();
    let bat = catalog.tile(spritedex_catalog::TileId(54)).unwrap();
    let range = SampleRange {
        from: 0,
        to: Some(960),
        step: Some(160),
    };

    let result = timeline(bat, range).unwrap();
    let frames: Vec<u32> = result.samples.iter().map(|p| p.frame).collect();
    assert_eq!(frames, vec![54, 55, 56, 54, 55, 56]);

    let path = fixture("characters.json");
    assert_eq!(sample::run(&path, 54, range, true).unwrap(), ExitCode::SUCCESS);
    assert_eq!(sample::run(&path, 500, range, true).unwrap(), ExitCode::from(2));
}

#[test]
fn test_convert_tiled_fixture() {
    let scratch = Scratch::new();
    let output = scratch.path("converted.json");

    let code = convert::run(
        &fixture("characters.tsj"),
        output.to_str().unwrap(),
        false,
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let written = TileTable::from_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, characters_table());
    assert_eq!(
        load_catalog(&written).unwrap().fingerprint(),
        characters_catalog().fingerprint()
    );
}

#[test]
fn test_convert_tiled_xml_fixture() {
    let scratch = Scratch::new();
    let output = scratch.path("from-xml.json");

    let code = convert::run(
        &fixture("characters.tsx"),
        output.to_str().unwrap(),
        false,
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let written = TileTable::from_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, characters_table());
}
