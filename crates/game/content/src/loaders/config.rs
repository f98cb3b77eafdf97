//! Field configuration loader.

use std::path::Path;

use lantern_core::FieldConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for field configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<FieldConfig> {
        let content = read_file(path)?;
        let config: FieldConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.tile_size.is_finite() && config.tile_size > 0.0) {
            anyhow::bail!("tile_size must be a positive number, got {}", config.tile_size);
        }
        if !(config.default_speed.is_finite() && config.default_speed >= 0.0) {
            anyhow::bail!(
                "default_speed must be a non-negative number, got {}",
                config.default_speed
            );
        }

        Ok(config)
    }
}
