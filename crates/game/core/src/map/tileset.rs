//! Tileset capability: turns a tile id into an image region.

use std::collections::HashMap;

use crate::ids::{TileId, TileSetId};
use crate::render::ImageRegion;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CropError {
    #[error("tile {tile} is outside tileset `{tileset}`")]
    OutOfRange { tileset: String, tile: TileId },

    #[error("tileset `{tileset}` has no columns")]
    NoColumns { tileset: String },
}

/// Source of tile images.
pub trait TileSet {
    fn name(&self) -> &str;

    fn crop(&self, tile: TileId) -> Result<ImageRegion, CropError>;
}

pub type TileSetTable = HashMap<TileSetId, Box<dyn TileSet>>;

/// Tileset laid out as a uniform grid, numbered row by row from `first_gid`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTileSet {
    pub id: TileSetId,
    pub name: String,
    pub first_gid: u32,
    pub columns: u32,
    pub count: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl TileSet for GridTileSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn crop(&self, tile: TileId) -> Result<ImageRegion, CropError> {
        if self.columns == 0 {
            return Err(CropError::NoColumns {
                tileset: self.name.clone(),
            });
        }
        let local = tile
            .0
            .checked_sub(self.first_gid)
            .filter(|local| *local < self.count)
            .ok_or_else(|| CropError::OutOfRange {
                tileset: self.name.clone(),
                tile,
            })?;
        Ok(ImageRegion {
            tileset: self.id,
            x: (local % self.columns) * self.tile_width,
            y: (local / self.columns) * self.tile_height,
            width: self.tile_width,
            height: self.tile_height,
        })
    }
}
