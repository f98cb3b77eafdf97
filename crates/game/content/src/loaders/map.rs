//! Map data loader.
//!
//! Loads the tile layer and the object placement of one map from a RON file.

use std::path::Path;

use lantern_core::{ObjectPlacement, TileCoordinate, TileId, TileLayer};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    /// Tile id for every cell not listed in `tiles`.
    #[serde(default)]
    default_tile: u32,
    #[serde(default)]
    tiles: Vec<(i32, i32, u32)>, // (x, y, tile id)
    #[serde(default)]
    objects: Vec<(i32, i32, u32)>, // (x, y, object-definition id)
}

/// Tables of one map, ready for [`lantern_core::FieldMap::from_tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapData {
    pub width: u32,
    pub height: u32,
    pub tiles: TileLayer,
    pub placement: ObjectPlacement,
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load map data from a RON file.
    ///
    /// Every cell inside the dimensions becomes a tile; cells without an
    /// explicit object get placement `0`.
    pub fn load(path: &Path) -> LoadResult<MapData> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MapData> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;
        let (width, height) = data.dimensions;

        // Fill entire map with the default tile and no objects first
        let mut tiles = TileLayer::new();
        let mut placement = ObjectPlacement::new();
        for y in 0..height {
            for x in 0..width {
                let coordinate = TileCoordinate::new(x as i32, y as i32);
                tiles.insert(coordinate, TileId(data.default_tile));
                placement.insert(coordinate, TileId::EMPTY);
            }
        }

        // Then override with explicitly defined cells
        for (x, y, id) in data.tiles {
            let coordinate = TileCoordinate::new(x, y);
            let Some(cell) = tiles.get_mut(&coordinate) else {
                anyhow::bail!("Tile at {} is outside the {}x{} map", coordinate, width, height);
            };
            *cell = TileId(id);
        }
        for (x, y, id) in data.objects {
            let coordinate = TileCoordinate::new(x, y);
            let Some(cell) = placement.get_mut(&coordinate) else {
                anyhow::bail!("Object at {} is outside the {}x{} map", coordinate, width, height);
            };
            *cell = TileId(id);
        }

        Ok(MapData {
            width,
            height,
            tiles,
            placement,
        })
    }
}
