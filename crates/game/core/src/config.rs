/// Field constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    /// Edge length of one tile in sheet pixels.
    pub tile_size: f32,
    /// Seconds an object takes to cross one tile.
    pub default_speed: f32,
}

impl FieldConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TILE_SIZE: f32 = 32.0;
    pub const DEFAULT_SPEED: f32 = 0.2;

    pub fn new() -> Self {
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            default_speed: Self::DEFAULT_SPEED,
        }
    }

    pub fn with_tile_size(tile_size: f32) -> Self {
        Self {
            tile_size,
            ..Self::new()
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new()
    }
}
