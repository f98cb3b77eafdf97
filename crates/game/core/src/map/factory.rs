//! Builds tiles, objects and ghost event objects from map tables.
//!
//! Every build is all-or-nothing: the factory returns a fresh [`ObjectLayer`]
//! and leaves installing it to the caller, so a failure part-way through a
//! map never leaves half of it applied.

use std::collections::{BTreeMap, BTreeSet};

use crate::coord::TileCoordinate;
use crate::error::{ErrorSeverity, GameError};
use crate::event::{GeneratorError, ListenerGenerator};
use crate::ids::{ObjectId, TileId, TileSetId};
use crate::render::Texture;

use super::property::{EventSpec, EventSpecError, PropertyTable, TileProperty};
use super::tileset::{CropError, TileSetTable};
use super::{MapObject, Object, Tile};

/// Tile id per cell. Every key is a cell of the map.
pub type TileLayer = BTreeMap<TileCoordinate, TileId>;

/// Object-definition id per cell; `0` means no object.
pub type ObjectPlacement = BTreeMap<TileCoordinate, TileId>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("coordinate {coordinate} of the tile layer has no object placement")]
    MissingPlacement { coordinate: TileCoordinate },

    #[error("object id {tile_id} placed at {coordinate} has no property entry")]
    MissingProperty {
        tile_id: TileId,
        coordinate: TileCoordinate,
    },

    #[error("tileSetID is not defined in object id {tile_id}'s property")]
    MissingTileSetId { tile_id: TileId },

    #[error("tileSetID `{value}` of object id {tile_id} is not an integer")]
    InvalidTileSetId { tile_id: TileId, value: String },

    #[error("tileset {tileset} referenced by object id {tile_id} is not defined")]
    MissingTileSet { tile_id: TileId, tileset: TileSetId },

    #[error("failed to crop image of object id {tile_id}: {source}")]
    CropFailed {
        tile_id: TileId,
        #[source]
        source: CropError,
    },

    #[error("tileSetName is not defined in object id {tile_id}'s property")]
    MissingTileSetName { tile_id: TileId },

    #[error("object id {tile_id} has a malformed event: {source}")]
    MalformedEvent {
        tile_id: TileId,
        #[source]
        source: EventSpecError,
    },

    #[error("failed to generate event listener for object id {tile_id}: {source}")]
    ListenerGeneration {
        tile_id: TileId,
        #[source]
        source: GeneratorError,
    },

    #[error("event of object id {tile_id} would be placed at {coordinate}, outside the map")]
    GhostOutOfBounds {
        tile_id: TileId,
        coordinate: TileCoordinate,
    },
}

impl GameError for FactoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPlacement { .. } => "FACTORY_MISSING_PLACEMENT",
            Self::MissingProperty { .. } => "FACTORY_MISSING_PROPERTY",
            Self::MissingTileSetId { .. } => "FACTORY_MISSING_TILESET_ID",
            Self::InvalidTileSetId { .. } => "FACTORY_INVALID_TILESET_ID",
            Self::MissingTileSet { .. } => "FACTORY_MISSING_TILESET",
            Self::CropFailed { .. } => "FACTORY_CROP_FAILED",
            Self::MissingTileSetName { .. } => "FACTORY_MISSING_TILESET_NAME",
            Self::MalformedEvent { .. } => "FACTORY_MALFORMED_EVENT",
            Self::ListenerGeneration { .. } => "FACTORY_LISTENER_GENERATION",
            Self::GhostOutOfBounds { .. } => "FACTORY_GHOST_OUT_OF_BOUNDS",
        }
    }
}

/// Map objects produced by one build, in creation order.
///
/// Entry `i` is meant to receive arena id `first_id + i`; parents of ghosts
/// already refer to those ids.
pub struct ObjectLayer<C> {
    pub first_id: ObjectId,
    pub entries: Vec<(TileCoordinate, MapObject<C>)>,
    /// Cells whose tile must be marked blocking.
    pub blocking: BTreeSet<TileCoordinate>,
}

impl<C> ObjectLayer<C> {
    fn new(first_id: ObjectId) -> Self {
        Self {
            first_id,
            entries: Vec::new(),
            blocking: BTreeSet::new(),
        }
    }

    fn next_id(&self) -> ObjectId {
        ObjectId(self.first_id.0 + self.entries.len() as u32)
    }

    fn push(&mut self, coordinate: TileCoordinate, object: MapObject<C>) -> ObjectId {
        let id = self.next_id();
        self.entries.push((coordinate, object));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Objects placed at `coordinate`, in creation order.
    pub fn at(&self, coordinate: TileCoordinate) -> impl Iterator<Item = &MapObject<C>> {
        self.entries
            .iter()
            .filter(move |(at, _)| *at == coordinate)
            .map(|(_, object)| object)
    }
}

/// Borrowed view over the tables a map is built from.
pub struct ObjectFactory<'a, C> {
    properties: &'a PropertyTable,
    tilesets: &'a TileSetTable,
    generator: &'a dyn ListenerGenerator<C>,
    tile_size: f32,
}

impl<'a, C> ObjectFactory<'a, C> {
    pub fn new(
        properties: &'a PropertyTable,
        tilesets: &'a TileSetTable,
        generator: &'a dyn ListenerGenerator<C>,
        tile_size: f32,
    ) -> Self {
        Self {
            properties,
            tilesets,
            generator,
            tile_size,
        }
    }

    /// Creates one [`Tile`] per cell of `tiles`.
    ///
    /// Cells with tile id `0` become bare tiles. Other ids need a property
    /// entry naming their tileset; `collision` blocks the tile and an
    /// `eventType,args...` declaration attaches a listener to the tile itself.
    pub fn create_tiles(
        &self,
        tiles: &TileLayer,
        first_id: ObjectId,
    ) -> Result<ObjectLayer<C>, FactoryError> {
        let mut layer = ObjectLayer::new(first_id);
        for (&coordinate, &tile_id) in tiles {
            let mut tile = Tile::new(tile_id, coordinate, self.tile_size);
            if tile_id.is_empty() {
                layer.push(coordinate, MapObject::tile(tile));
                continue;
            }

            let property = self.property(tile_id, coordinate)?;
            tile = tile.with_texture(self.crop(tile_id, property)?);
            let mut object = MapObject::tile(tile);
            if property.has_collision() {
                object.set_collision();
            }
            if let Some(raw) = property.event() {
                let spec = EventSpec::parse_local(raw)
                    .map_err(|source| FactoryError::MalformedEvent { tile_id, source })?;
                let listener = self
                    .generator
                    .generate(&spec.event_type, None, &spec.args)
                    .map_err(|source| FactoryError::ListenerGeneration { tile_id, source })?;
                object.add_event(listener);
            }
            layer.push(coordinate, object);
        }
        Ok(layer)
    }

    /// Creates the objects named by `placement` for every cell of `tiles`.
    ///
    /// Objects get the unique name `{tileSetName}_{id}`. A `collision`
    /// attribute blocks the tile underneath (reported in
    /// [`ObjectLayer::blocking`]). An `eventType,MMMM,args...` declaration
    /// places a ghost on each neighbour enabled in the mask, carrying a
    /// listener generated with the direction pointing back to the object.
    pub fn create_objects(
        &self,
        tiles: &TileLayer,
        placement: &ObjectPlacement,
        first_id: ObjectId,
    ) -> Result<ObjectLayer<C>, FactoryError> {
        let mut layer = ObjectLayer::new(first_id);
        for &coordinate in tiles.keys() {
            let tile_id = *placement
                .get(&coordinate)
                .ok_or(FactoryError::MissingPlacement { coordinate })?;
            if tile_id.is_empty() {
                continue;
            }

            let property = self.property(tile_id, coordinate)?;
            let texture = self.crop(tile_id, property)?;
            let tileset_name = property
                .tileset_name()
                .ok_or(FactoryError::MissingTileSetName { tile_id })?;

            let id = layer.next_id();
            let object = Object::new(
                format!("{tileset_name}_{}", id.0),
                coordinate.to_sheet(self.tile_size),
                None,
            )
            .with_texture(texture);
            layer.push(coordinate, MapObject::object(object));

            if property.has_collision() {
                layer.blocking.insert(coordinate);
            }

            if let Some(raw) = property.event() {
                let spec: EventSpec = raw
                    .parse()
                    .map_err(|source| FactoryError::MalformedEvent { tile_id, source })?;
                self.place_ghosts(&mut layer, tiles, tile_id, id, coordinate, &spec)?;
            }
        }
        Ok(layer)
    }

    fn place_ghosts(
        &self,
        layer: &mut ObjectLayer<C>,
        tiles: &TileLayer,
        tile_id: TileId,
        parent: ObjectId,
        origin: TileCoordinate,
        spec: &EventSpec,
    ) -> Result<(), FactoryError> {
        for direction in spec.placement.directions() {
            let coordinate = origin.neighbor(direction);
            if !tiles.contains_key(&coordinate) {
                return Err(FactoryError::GhostOutOfBounds {
                    tile_id,
                    coordinate,
                });
            }
            let listener = self
                .generator
                .generate(&spec.event_type, Some(direction.reverse()), &spec.args)
                .map_err(|source| FactoryError::ListenerGeneration { tile_id, source })?;
            layer.push(
                coordinate,
                MapObject::ghost(coordinate.to_sheet(self.tile_size), listener, parent),
            );
        }
        Ok(())
    }

    fn property(
        &self,
        tile_id: TileId,
        coordinate: TileCoordinate,
    ) -> Result<&'a TileProperty, FactoryError> {
        self.properties
            .get(&tile_id)
            .ok_or(FactoryError::MissingProperty {
                tile_id,
                coordinate,
            })
    }

    fn crop(&self, tile_id: TileId, property: &TileProperty) -> Result<Texture, FactoryError> {
        let tileset_id = match property.tileset_id() {
            None => return Err(FactoryError::MissingTileSetId { tile_id }),
            Some(Err(value)) => {
                return Err(FactoryError::InvalidTileSetId {
                    tile_id,
                    value: value.to_owned(),
                });
            }
            Some(Ok(id)) => id,
        };
        let tileset = self
            .tilesets
            .get(&tileset_id)
            .ok_or(FactoryError::MissingTileSet {
                tile_id,
                tileset: tileset_id,
            })?;
        tileset
            .crop(tile_id)
            .map(Texture::Region)
            .map_err(|source| FactoryError::CropFailed { tile_id, source })
    }
}
