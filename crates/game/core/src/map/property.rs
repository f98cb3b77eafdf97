//! Object-definition attributes and the event declarations they carry.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use bitflags::bitflags;

use crate::direction::Direction;
use crate::ids::{TileId, TileSetId};

pub const KEY_TILESET_ID: &str = "tileSetID";
pub const KEY_TILESET_NAME: &str = "tileSetName";
pub const KEY_COLLISION: &str = "collision";
pub const KEY_EVENT: &str = "event";

/// Attribute table of one object definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileProperty {
    attributes: BTreeMap<String, String>,
}

impl TileProperty {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Raw `tileSetID` attribute.
    pub fn tileset_id_raw(&self) -> Option<&str> {
        self.get(KEY_TILESET_ID)
    }

    /// Parsed `tileSetID`. `None` when absent, `Some(Err(raw))` when the
    /// value is not an integer.
    pub fn tileset_id(&self) -> Option<Result<TileSetId, &str>> {
        let raw = self.tileset_id_raw()?;
        Some(raw.trim().parse::<u32>().map(TileSetId).map_err(|_| raw))
    }

    pub fn tileset_name(&self) -> Option<&str> {
        self.get(KEY_TILESET_NAME)
    }

    /// `collision == "1"` marks the carrying cell blocking.
    pub fn has_collision(&self) -> bool {
        self.get(KEY_COLLISION).is_some_and(|value| value.trim() == "1")
    }

    pub fn event(&self) -> Option<&str> {
        self.get(KEY_EVENT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TileProperty {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub type PropertyTable = HashMap<TileId, TileProperty>;

bitflags! {
    /// Neighbour cells that receive a ghost event object, in the order the
    /// declaration's four-character mask lists them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PlacementMask: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl PlacementMask {
    pub const fn of(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
        }
    }

    /// Enabled directions, in UP, DOWN, LEFT, RIGHT order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(Self::of(*direction)))
    }
}

impl FromStr for PlacementMask {
    type Err = EventSpecError;

    fn from_str(mask: &str) -> Result<Self, Self::Err> {
        let bits: Vec<char> = mask.chars().collect();
        if bits.len() != Direction::ALL.len() || bits.iter().any(|c| !matches!(c, '0' | '1')) {
            return Err(EventSpecError::InvalidMask(mask.to_owned()));
        }
        Ok(Direction::ALL
            .into_iter()
            .zip(bits)
            .filter(|(_, bit)| *bit == '1')
            .fold(Self::empty(), |mask, (direction, _)| mask | Self::of(direction)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EventSpecError {
    #[error("event declaration `{0}` needs at least an event type and a placement mask")]
    TooFewFields(String),

    #[error("event declaration `{0}` has an empty event type")]
    MissingEventType(String),

    #[error("placement mask `{0}` must be exactly four `0`/`1` characters")]
    InvalidMask(String),
}

/// Parsed `event` attribute.
///
/// Objects declare `eventType,MMMM,args...` where `MMMM` is the
/// [`PlacementMask`]. Tiles declare `eventType,args...` and keep the
/// listener on themselves, so their mask is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSpec {
    pub event_type: String,
    pub placement: PlacementMask,
    pub args: Vec<String>,
}

impl EventSpec {
    /// Parses a tile-level declaration (no placement mask).
    pub fn parse_local(raw: &str) -> Result<Self, EventSpecError> {
        let mut fields = raw.split(',').map(str::trim);
        let event_type = event_type(raw, fields.next())?;
        Ok(Self {
            event_type,
            placement: PlacementMask::empty(),
            args: fields.map(str::to_owned).collect(),
        })
    }
}

impl FromStr for EventSpec {
    type Err = EventSpecError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [kind, mask, args @ ..] = fields.as_slice() else {
            return Err(EventSpecError::TooFewFields(raw.to_owned()));
        };
        Ok(Self {
            event_type: event_type(raw, Some(*kind))?,
            placement: mask.parse()?,
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        })
    }
}

fn event_type(raw: &str, field: Option<&str>) -> Result<String, EventSpecError> {
    field
        .filter(|kind| !kind.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| EventSpecError::MissingEventType(raw.to_owned()))
}
