//! Map-object model: tiles, objects and items placed on the field, the
//! motion state machine of objects, and the factory building them from
//! map tables.

mod actor;
pub mod factory;
mod field;
mod item;
mod map_object;
mod motion;
pub mod property;
pub mod tileset;
mod tile;

pub use actor::{ImageSet, Object};
pub use factory::{FactoryError, ObjectFactory, ObjectLayer, ObjectPlacement, TileLayer};
pub use field::{FieldError, FieldMap};
pub use item::Item;
pub use map_object::{MapObject, MapObjectKind};
pub use motion::{Completion, MotionCallback, MotionError};
pub use property::{EventSpec, EventSpecError, PlacementMask, PropertyTable, TileProperty};
pub use tile::Tile;
pub use tileset::{CropError, GridTileSet, TileSet, TileSetTable};
