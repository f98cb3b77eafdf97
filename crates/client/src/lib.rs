//! Headless Lantern client.
//!
//! Loads a map from a content directory, places the player and replays a
//! scripted input sequence against a [`lantern_runtime::HeadlessScene`]. The
//! headless renderer finishes every action at once, so the client reports
//! each started motion back to the session right after the command that
//! started it.

pub mod config;
pub mod script;

use std::fmt;

use anyhow::{Context, Result};
use lantern_content::ContentFactory;
use lantern_core::{Direction, GameError, TileCoordinate};
use lantern_runtime::{FieldSession, SessionError};
use tracing::{debug, info, warn};

pub use config::ClientConfig;
pub use script::Command;

/// State of the session once the script has run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub commands: usize,
    /// Commands refused without side effects, e.g. walking into a wall.
    pub refused: usize,
    pub player_at: TileCoordinate,
    pub facing: Direction,
    pub dialog_open: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} commands ({} refused); player at {} facing {}; dialog {}",
            self.commands,
            self.refused,
            self.player_at,
            self.facing,
            if self.dialog_open { "open" } else { "closed" }
        )
    }
}

/// Loads the configured map and builds a session with the player placed.
pub fn load_session(config: &ClientConfig) -> Result<FieldSession> {
    let content = ContentFactory::new(&config.data_dir);
    let field = content.load_config()?;
    let map = content.load_map(&config.map)?;
    let properties = content.load_properties()?;
    let tilesets = content.load_tilesets()?;
    let characters = content.load_characters()?;
    info!(
        map = %config.map,
        width = map.width,
        height = map.height,
        "content loaded from {}",
        content.data_dir().display()
    );

    let mut session = FieldSession::builder()
        .config(field)
        .build(&map.tiles, &map.placement, &properties, &tilesets)
        .with_context(|| format!("failed to build map `{}`", config.map))?;

    let images = characters.get(&config.player_name).cloned();
    if images.is_none() {
        warn!(player = %config.player_name, "no image set for player; drawing without frames");
    }
    session
        .spawn_player(&config.player_name, images, config.player_start)
        .context("failed to place the player")?;
    Ok(session)
}

/// Runs `commands` in order. Recoverable refusals are logged and skipped;
/// anything else stops the replay.
pub fn replay(session: &mut FieldSession, commands: &[Command]) -> Result<Report> {
    let mut refused = 0;
    for (step, command) in commands.iter().enumerate() {
        debug!(step, %command, "command");
        match execute(session, *command) {
            Ok(()) => {}
            Err(error) if error.severity().is_recoverable() => {
                info!(step, %command, %error, "command refused");
                refused += 1;
            }
            Err(error) => {
                return Err(error).with_context(|| format!("command {} (`{command}`) failed", step + 1));
            }
        }
        settle(session)?;
    }

    Ok(Report {
        commands: commands.len(),
        refused,
        player_at: session.player_coordinate()?,
        facing: session.player_direction()?,
        dialog_open: session.world().dialog().is_visible(),
    })
}

fn execute(session: &mut FieldSession, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Walk(direction) => session.walk(direction).map(drop),
        Command::Act => session.interact().map(drop),
        Command::Close => session.hide_dialog(),
    }
}

/// Reports every pending motion as finished, including motions started by
/// chained listeners while settling.
fn settle(session: &mut FieldSession) -> Result<()> {
    while let Some(token) = session.pending_motions().first().copied() {
        session.complete_action(token)?;
    }
    Ok(())
}

/// Loads the session and replays the configured script, if any.
pub fn run(config: &ClientConfig) -> Result<Report> {
    let mut session = load_session(config)?;
    let commands = match &config.script {
        Some(path) => script::load(path)?,
        None => Vec::new(),
    };
    info!(commands = commands.len(), "replaying script");
    replay(&mut session, &commands)
}
