use std::fs;
use std::path::Path;

use lantern_content::ContentFactory;
use lantern_core::{FieldMap, ListenerRegistry, TileCoordinate, TileId, TileSet, TileSetId};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_data(dir: &Path) {
    write(dir, "config.toml", "tile_size = 16.0\n");
    write(
        dir,
        "properties.toml",
        r#"
        [1]
        tileSetID = 1

        [7]
        tileSetID = 1
        tileSetName = "sign"
        collision = "1"
        "#,
    );
    write(
        dir,
        "tilesets.ron",
        r#"[
            (id: 1, name: "town", first_gid: 1, columns: 8, count: 64, tile_width: 16, tile_height: 16),
        ]"#,
    );
    write(
        dir,
        "characters.ron",
        r#"{
            "hero": (
                up: [["hero_up_1", "hero_up_2"]],
                down: [["hero_down_1", "hero_down_2"]],
                left: [["hero_left_1", "hero_left_2"]],
                right: [["hero_right_1", "hero_right_2"]],
            ),
        }"#,
    );
    write(
        dir,
        "maps/town.ron",
        "(dimensions: (4, 3), default_tile: 1, objects: [(2, 1, 7)])",
    );
}

#[test]
fn loads_every_table() {
    let dir = tempfile::tempdir().unwrap();
    sample_data(dir.path());
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().unwrap();
    assert_eq!(config.tile_size, 16.0);
    assert_eq!(config.default_speed, 0.2);

    let properties = factory.load_properties().unwrap();
    assert_eq!(properties[&TileId(7)].tileset_name(), Some("sign"));

    let tilesets = factory.load_tilesets().unwrap();
    assert_eq!(tilesets[&TileSetId(1)].name(), "town");

    let characters = factory.load_characters().unwrap();
    assert_eq!(characters["hero"].standing(lantern_core::Direction::Left), Some("hero_left_2"));

    let map = factory.load_map("town").unwrap();
    assert_eq!((map.width, map.height), (4, 3));
    assert_eq!(map.placement[&TileCoordinate::new(2, 1)], TileId(7));
}

#[test]
fn loaded_tables_build_a_field() {
    let dir = tempfile::tempdir().unwrap();
    sample_data(dir.path());
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().unwrap();
    let map = factory.load_map("town").unwrap();
    let generator = ListenerRegistry::<()>::new();
    let field = FieldMap::from_tables(
        &map.tiles,
        &map.placement,
        &factory.load_properties().unwrap(),
        &factory.load_tilesets().unwrap(),
        &generator,
        config.tile_size,
    )
    .unwrap();

    assert_eq!(field.len(), 12 + 1);
    assert!(!field.can_pass(TileCoordinate::new(2, 1)));
    assert!(field.find_by_name("sign_12").is_some());
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());

    let err = factory.load_map("nowhere").unwrap_err();
    assert!(err.to_string().contains("nowhere.ron"));
}

#[test]
fn duplicate_tileset_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "tilesets.ron",
        r#"[
            (id: 1, name: "a", first_gid: 1, columns: 1, count: 1, tile_width: 8, tile_height: 8),
            (id: 1, name: "b", first_gid: 2, columns: 1, count: 1, tile_width: 8, tile_height: 8),
        ]"#,
    );

    assert!(ContentFactory::new(dir.path()).load_tilesets().is_err());
}

#[test]
fn invalid_tile_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config.toml", "tile_size = 0.0\n");

    assert!(ContentFactory::new(dir.path()).load_config().is_err());
}
