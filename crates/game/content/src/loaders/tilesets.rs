//! Tileset definition loader.

use std::path::Path;

use lantern_core::{GridTileSet, TileSetTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for grid tilesets from RON files.
///
/// ```ron
/// [
///     (id: 1, name: "town", first_gid: 1, columns: 8, count: 64, tile_width: 32, tile_height: 32),
/// ]
/// ```
pub struct TileSetLoader;

impl TileSetLoader {
    pub fn load(path: &Path) -> LoadResult<TileSetTable> {
        let content = read_file(path)?;
        let tilesets: Vec<GridTileSet> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tilesets RON: {}", e))?;

        let mut table = TileSetTable::new();
        for tileset in tilesets {
            if tileset.columns == 0 {
                anyhow::bail!("Tileset `{}` must have at least one column", tileset.name);
            }
            let id = tileset.id;
            if table.insert(id, Box::new(tileset)).is_some() {
                anyhow::bail!("Tileset id {} is defined more than once", id);
            }
        }

        Ok(table)
    }
}
