//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use lantern_core::TileCoordinate;

/// Everything the headless client needs to replay a session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub map: String,
    /// Input script to replay. Without one the client only loads the map.
    pub script: Option<PathBuf>,
    /// Directory for the log file. `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    pub player_name: String,
    pub player_start: TileCoordinate,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            map: "town".to_owned(),
            script: None,
            log_dir: default_log_dir(),
            player_name: "hero".to_owned(),
            player_start: TileCoordinate::new(0, 0),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LANTERN_DATA_DIR` - Content directory (default: `data`)
    /// - `LANTERN_MAP` - Map name under `maps/` (default: `town`)
    /// - `LANTERN_SCRIPT` - Input script to replay (default: none)
    /// - `LANTERN_LOG_DIR` - Log directory (default: platform cache dir)
    /// - `LANTERN_PLAYER` - Character name in `characters.ron` (default: `hero`)
    /// - `LANTERN_PLAYER_X`, `LANTERN_PLAYER_Y` - Player start cell (default: 0, 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("LANTERN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(map) = env::var("LANTERN_MAP") {
            config.map = map;
        }
        config.script = env::var("LANTERN_SCRIPT").ok().map(PathBuf::from);
        if let Ok(dir) = env::var("LANTERN_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Ok(name) = env::var("LANTERN_PLAYER") {
            config.player_name = name;
        }
        if let Some(x) = read_env::<i32>("LANTERN_PLAYER_X") {
            config.player_start.x = x;
        }
        if let Some(y) = read_env::<i32>("LANTERN_PLAYER_Y") {
            config.player_start.y = y;
        }

        config
    }
}

/// Platform cache directory, e.g. `~/.cache/lantern/logs` on Linux.
fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "lantern").map(|dirs| dirs.cache_dir().join("logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
