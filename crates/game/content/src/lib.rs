//! Data-driven field content and loaders.
//!
//! This crate reads the tables a field is built from out of RON/TOML data
//! files:
//! - Field configuration (TOML)
//! - Object-definition properties (TOML)
//! - Grid tilesets (RON)
//! - Character walking frames (RON)
//! - Map layouts: tile layer and object placement (RON)
//!
//! All loaders produce `lantern-core` types directly.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterLoader, ConfigLoader, ContentFactory, LoadResult, MapData, MapLoader,
    PropertyLoader, TileSetLoader,
};
