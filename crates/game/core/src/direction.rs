/// Facing and stepping direction on the field grid.
///
/// Sheet `y` grows upward, so `Up` is `(0, +1)`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Bitmask order used by event placement strings: UP, DOWN, LEFT, RIGHT.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Resolves a pure axis-aligned delta of any length. Zero and diagonal
    /// deltas have no direction.
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Up),
            (0, -1) => Some(Direction::Down),
            _ => None,
        }
    }

    /// Same as [`Direction::from_delta`] for pixel-space deltas.
    pub fn from_sheet_delta(dx: f32, dy: f32) -> Option<Self> {
        if dx > 0.0 && dy == 0.0 {
            Some(Direction::Right)
        } else if dx < 0.0 && dy == 0.0 {
            Some(Direction::Left)
        } else if dx == 0.0 && dy > 0.0 {
            Some(Direction::Up)
        } else if dx == 0.0 && dy < 0.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn reverse_is_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.reverse().reverse(), direction);
            assert_ne!(direction.reverse(), direction);
        }
    }

    #[test]
    fn from_delta_rejects_diagonal_and_zero() {
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, -3), Some(Direction::Down));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Direction::from_str("UP").unwrap(), Direction::Up);
        assert_eq!(Direction::from_str("right").unwrap(), Direction::Right);
        assert!(Direction::from_str("north").is_err());
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
