//! Readers for the RON and TOML files a field is built from.
//!
//! Every loader returns the table type `lantern-core` consumes directly, so
//! the runtime never sees file formats.

pub mod characters;
pub mod config;
pub mod factory;
pub mod map;
pub mod properties;
pub mod tilesets;

pub use characters::CharacterLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::{MapData, MapLoader};
pub use properties::PropertyLoader;
pub use tilesets::TileSetLoader;

use std::path::Path;

use anyhow::Context;

pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
