use std::fs;
use std::path::Path;

use lantern_content::ContentFactory;
use lantern_core::{Direction, TileCoordinate};
use lantern_runtime::FieldSession;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn village(dir: &Path) {
    write(dir, "config.toml", "tile_size = 16.0\ndefault_speed = 0.3\n");
    write(
        dir,
        "properties.toml",
        r#"
        [1]
        tileSetID = 1

        [7]
        tileSetID = 1
        tileSetName = "elder"
        collision = true
        event = "talk,0100,Welcome"
        "#,
    );
    write(
        dir,
        "tilesets.ron",
        r#"[
            (id: 1, name: "village", first_gid: 1, columns: 8, count: 64, tile_width: 16, tile_height: 16),
        ]"#,
    );
    write(
        dir,
        "characters.ron",
        r#"{
            "hero": (
                up: [["hero_up_1", "hero_up_2"], ["hero_up_3", "hero_up_4"]],
                down: [["hero_down_1", "hero_down_2"]],
                left: [["hero_left_1", "hero_left_2"]],
                right: [["hero_right_1", "hero_right_2"]],
            ),
        }"#,
    );
    write(
        dir,
        "maps/village.ron",
        "(dimensions: (3, 4), default_tile: 1, objects: [(1, 3, 7)])",
    );
}

#[test]
fn loaded_village_supports_a_conversation() {
    let dir = tempfile::tempdir().unwrap();
    village(dir.path());
    let content = ContentFactory::new(dir.path());

    let config = content.load_config().unwrap();
    let map = content.load_map("village").unwrap();
    let characters = content.load_characters().unwrap();
    let mut session = FieldSession::builder()
        .config(config)
        .build(
            &map.tiles,
            &map.placement,
            &content.load_properties().unwrap(),
            &content.load_tilesets().unwrap(),
        )
        .unwrap();
    let hero = session
        .spawn_player("hero", characters.get("hero").cloned(), TileCoordinate::new(1, 1))
        .unwrap();

    let token = session.walk(Direction::Up).unwrap();
    session.complete_action(token).unwrap();

    assert_eq!(session.player_coordinate().unwrap(), TileCoordinate::new(1, 2));
    let object = session.world().map().object(hero).unwrap();
    assert_eq!(object.speed(), 0.3);
    assert_eq!(object.step_index(), 1);

    assert_eq!(session.interact().unwrap(), 1);
    assert_eq!(session.player_direction().unwrap(), Direction::Up);
    assert!(session.world().dialog().is_visible());
}
