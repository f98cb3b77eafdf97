//! Scripted player input.
//!
//! One command per line; blank lines and `#` comments are ignored.
//!
//! ```text
//! # walk to the sign and read it
//! left
//! up
//! act
//! close
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use lantern_core::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Walk one tile, or turn if the way is blocked.
    Walk(Direction),
    /// Action button on the player's cell.
    Act,
    /// Dismiss the dialog box.
    Close,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "act" | "interact" => Ok(Self::Act),
            "close" | "hide" => Ok(Self::Close),
            other => other
                .parse::<Direction>()
                .map(Self::Walk)
                .map_err(|_| format!("unknown command `{other}`")),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk(direction) => write!(f, "{direction}"),
            Self::Act => f.write_str("act"),
            Self::Close => f.write_str("close"),
        }
    }
}

pub fn parse(source: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => commands.push(command),
            Err(reason) => bail!("line {}: {reason}", index + 1),
        }
    }
    Ok(commands)
}

pub fn load(path: &Path) -> Result<Vec<Command>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&source).with_context(|| format!("invalid script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let commands = parse("# start\nUp\n\nleft  # turn\nact\nclose\n").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Walk(Direction::Up),
                Command::Walk(Direction::Left),
                Command::Act,
                Command::Close,
            ]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse("up\njump\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("jump"));
    }
}
