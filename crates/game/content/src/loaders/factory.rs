//! One data directory, every table a field needs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lantern_core::{FieldConfig, ImageSet, PropertyTable, TileSetTable};

use crate::loaders::{
    CharacterLoader, ConfigLoader, LoadResult, MapData, MapLoader, PropertyLoader, TileSetLoader,
};

/// Reads field content from a fixed layout:
///
/// ```text
/// <data_dir>/config.toml       FieldConfig
/// <data_dir>/properties.toml   object definitions keyed by tile id
/// <data_dir>/tilesets.ron      tile sheets
/// <data_dir>/characters.ron    walking frames per character name
/// <data_dir>/maps/<name>.ron   tile grids
/// ```
#[derive(Clone, Debug)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    const MAPS: &'static str = "maps";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn load_config(&self) -> LoadResult<FieldConfig> {
        ConfigLoader::load(&self.file("config.toml"))
    }

    pub fn load_properties(&self) -> LoadResult<PropertyTable> {
        PropertyLoader::load(&self.file("properties.toml"))
    }

    pub fn load_tilesets(&self) -> LoadResult<TileSetTable> {
        TileSetLoader::load(&self.file("tilesets.ron"))
    }

    /// Character name to image set, used when spawning walkers.
    pub fn load_characters(&self) -> LoadResult<HashMap<String, ImageSet>> {
        CharacterLoader::load(&self.file("characters.ron"))
    }

    /// `name` is the file stem under `maps/`.
    pub fn load_map(&self, name: &str) -> LoadResult<MapData> {
        MapLoader::load(&self.map_path(name))
    }

    fn map_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(Self::MAPS).join(name).with_extension("ron")
    }
}
