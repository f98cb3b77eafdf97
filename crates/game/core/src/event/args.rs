use std::collections::BTreeMap;

use crate::coord::TileCoordinate;
use crate::direction::Direction;

/// Structured payload passed to every listener of a trigger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventArgs {
    /// Cell the interaction was resolved to.
    pub coordinate: Option<TileCoordinate>,
    /// Facing of the actor that caused the trigger.
    pub direction: Option<Direction>,
    params: BTreeMap<String, String>,
}

impl EventArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at(mut self, coordinate: TileCoordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    #[must_use]
    pub fn facing(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
