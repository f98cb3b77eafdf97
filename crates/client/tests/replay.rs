use std::fs;
use std::path::Path;

use lantern_client::{ClientConfig, Command, load_session, replay, run};
use lantern_core::{Direction, TileCoordinate};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn town(dir: &Path) {
    write(dir, "config.toml", "tile_size = 32.0\n");
    write(
        dir,
        "properties.toml",
        r#"
        [1]
        tileSetID = 1

        [4]
        tileSetID = 1
        tileSetName = "sign"
        collision = true
        event = "talk,0010,Lantern village"

        [5]
        tileSetID = 1
        tileSetName = "well"
        collision = true
        "#,
    );
    write(
        dir,
        "tilesets.ron",
        r#"[
            (id: 1, name: "town", first_gid: 1, columns: 8, count: 64, tile_width: 32, tile_height: 32),
        ]"#,
    );
    write(dir, "characters.ron", "{}");
    write(
        dir,
        "maps/town.ron",
        "(dimensions: (4, 4), default_tile: 1, objects: [(2, 2, 4), (0, 1, 5)])",
    );
}

fn config(dir: &Path) -> ClientConfig {
    ClientConfig {
        data_dir: dir.to_path_buf(),
        map: "town".into(),
        script: None,
        log_dir: None,
        player_name: "hero".into(),
        player_start: TileCoordinate::new(0, 0),
    }
}

#[test]
fn script_reads_the_sign() {
    let dir = tempfile::tempdir().unwrap();
    town(dir.path());
    write(dir.path(), "walk.txt", "right\nup\nup   # onto the sign's event cell\nact\n");
    let mut config = config(dir.path());
    config.script = Some(dir.path().join("walk.txt"));

    let report = run(&config).unwrap();

    assert_eq!(report.commands, 4);
    assert_eq!(report.refused, 0);
    assert_eq!(report.player_at, TileCoordinate::new(1, 2));
    assert_eq!(report.facing, Direction::Right);
    assert!(report.dialog_open);
}

#[test]
fn blocked_steps_are_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    town(dir.path());
    let mut session = load_session(&config(dir.path())).unwrap();

    let report = replay(
        &mut session,
        &[
            Command::Walk(Direction::Up),
            Command::Walk(Direction::Left),
            Command::Close,
        ],
    )
    .unwrap();

    assert_eq!(report.refused, 2);
    assert_eq!(report.player_at, TileCoordinate::new(0, 0));
    assert_eq!(report.facing, Direction::Left);
    assert!(!report.dialog_open);
}

#[test]
fn missing_maps_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    town(dir.path());
    let mut config = config(dir.path());
    config.map = "castle".into();

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("castle.ron"));
}
