//! Tile-grid and sheet (pixel) coordinates.
//!
//! A [`TileCoordinate`] names one cell of the field grid. A [`SheetCoordinate`]
//! is the pixel-space point the renderer uses for that cell: the centre of the
//! cell, with `y` growing upward. The mapping between the two is a pure
//! function of the tile size.

use std::fmt;

use crate::direction::Direction;

/// Discrete grid position expressed in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinate {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step toward `direction`.
    pub fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the direction of a pure one-axis step from `self` to `other`.
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }

    /// Pixel position of the centre of this cell.
    pub fn to_sheet(self, tile_size: f32) -> SheetCoordinate {
        SheetCoordinate::new(
            (self.x as f32 + 0.5) * tile_size,
            (self.y as f32 + 0.5) * tile_size,
        )
    }
}

impl From<(i32, i32)> for TileCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Point in pixel space on the field sheet.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetCoordinate {
    pub x: f32,
    pub y: f32,
}

impl SheetCoordinate {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Cell containing this point. Points on a cell border belong to the
    /// cell above/right of it.
    pub fn to_tile(self, tile_size: f32) -> TileCoordinate {
        TileCoordinate::new(
            (self.x / tile_size).floor() as i32,
            (self.y / tile_size).floor() as i32,
        )
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: Self) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for SheetCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
