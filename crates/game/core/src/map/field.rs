//! The field: arena of every map object plus per-cell indices.

use std::collections::{BTreeMap, HashMap};

use crate::coord::{SheetCoordinate, TileCoordinate};
use crate::error::{ErrorSeverity, GameError};
use crate::event::{ListenerGenerator, ListenerHandle};
use crate::ids::{ObjectId, TileId};
use crate::render::{ActionToken, InputGate, NodeHandle, RenderScene};

use super::factory::{FactoryError, ObjectFactory, ObjectLayer, ObjectPlacement, TileLayer};
use super::motion::{Completion, MotionCallback, MotionError};
use super::property::PropertyTable;
use super::tileset::TileSetTable;
use super::{Item, MapObject, MapObjectKind, Object};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error("no tile at {coordinate}")]
    NoTileAt { coordinate: TileCoordinate },

    #[error("object name `{name}` is already in use")]
    DuplicateName { name: String },

    #[error("map object {0} does not exist")]
    UnknownObject(ObjectId),

    #[error("layer was built for id {expected} but the field continues at {actual}")]
    StaleLayer { expected: ObjectId, actual: ObjectId },
}

impl GameError for FieldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Factory(error) => error.severity(),
            Self::NoTileAt { .. } | Self::DuplicateName { .. } => ErrorSeverity::Validation,
            Self::UnknownObject(_) | Self::StaleLayer { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Factory(error) => error.error_code(),
            Self::NoTileAt { .. } => "FIELD_NO_TILE",
            Self::DuplicateName { .. } => "FIELD_DUPLICATE_NAME",
            Self::UnknownObject(_) => "FIELD_UNKNOWN_OBJECT",
            Self::StaleLayer { .. } => "FIELD_STALE_LAYER",
        }
    }
}

/// Owns every map object of one map. Objects are addressed by [`ObjectId`]
/// and never removed, so ids stay valid for the lifetime of the field.
pub struct FieldMap<C> {
    tile_size: f32,
    objects: Vec<MapObject<C>>,
    locations: Vec<TileCoordinate>,
    tiles: BTreeMap<TileCoordinate, ObjectId>,
    occupants: BTreeMap<TileCoordinate, Vec<ObjectId>>,
    names: HashMap<String, ObjectId>,
}

impl<C> FieldMap<C> {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            objects: Vec::new(),
            locations: Vec::new(),
            tiles: BTreeMap::new(),
            occupants: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Builds a whole map: tiles first, then the object layer on top.
    pub fn from_tables(
        tiles: &TileLayer,
        placement: &ObjectPlacement,
        properties: &PropertyTable,
        tilesets: &TileSetTable,
        generator: &dyn ListenerGenerator<C>,
        tile_size: f32,
    ) -> Result<Self, FieldError> {
        let mut field = Self::new(tile_size);
        let factory = ObjectFactory::new(properties, tilesets, generator, tile_size);
        let tile_layer = factory.create_tiles(tiles, field.next_id())?;
        field.install(tile_layer)?;
        let object_layer = factory.create_objects(tiles, placement, field.next_id())?;
        field.install(object_layer)?;
        Ok(field)
    }

    /// Builds the object layer against this field's tiles and installs it.
    /// Nothing changes if any object fails to build.
    pub fn load_objects(
        &mut self,
        placement: &ObjectPlacement,
        properties: &PropertyTable,
        tilesets: &TileSetTable,
        generator: &dyn ListenerGenerator<C>,
    ) -> Result<usize, FieldError> {
        let factory = ObjectFactory::new(properties, tilesets, generator, self.tile_size);
        let layer = factory.create_objects(&self.tile_layer(), placement, self.next_id())?;
        let count = layer.len();
        self.install(layer)?;
        Ok(count)
    }

    /// Adds a factory-built layer. The layer is validated in full before
    /// anything is applied.
    pub fn install(&mut self, layer: ObjectLayer<C>) -> Result<(), FieldError> {
        let expected = self.next_id();
        if layer.first_id != expected {
            return Err(FieldError::StaleLayer {
                expected: layer.first_id,
                actual: expected,
            });
        }

        let mut new_names = HashMap::new();
        for (index, (coordinate, object)) in layer.entries.iter().enumerate() {
            let is_tile = matches!(object.kind(), MapObjectKind::Tile(_));
            if !is_tile && !self.tiles.contains_key(coordinate) && !layer_has_tile(&layer, coordinate) {
                return Err(FieldError::NoTileAt {
                    coordinate: *coordinate,
                });
            }
            if let Some(name) = object.name().filter(|name| !name.is_empty()) {
                let id = ObjectId(expected.0 + index as u32);
                if self.names.contains_key(name) || new_names.insert(name.to_owned(), id).is_some() {
                    return Err(FieldError::DuplicateName {
                        name: name.to_owned(),
                    });
                }
            }
        }
        if let Some(coordinate) = layer
            .blocking
            .iter()
            .find(|coordinate| !self.tiles.contains_key(*coordinate))
        {
            return Err(FieldError::NoTileAt {
                coordinate: *coordinate,
            });
        }

        for (coordinate, object) in layer.entries {
            self.push(coordinate, object);
        }
        self.names.extend(new_names);
        for coordinate in layer.blocking {
            if let Some(tile) = self.tiles.get(&coordinate).copied() {
                self.objects[tile.index()].set_collision();
            }
        }
        Ok(())
    }

    /// Places a hand-made object (player, NPC) at `coordinate`.
    pub fn spawn(
        &mut self,
        object: Object<C>,
        coordinate: TileCoordinate,
    ) -> Result<ObjectId, FieldError> {
        self.place(MapObject::object(object), coordinate)
    }

    /// Drops `item` on `coordinate`. Items never block the cell.
    pub fn place_item(&mut self, item: Item, coordinate: TileCoordinate) -> Result<ObjectId, FieldError> {
        self.place(MapObject::item(item), coordinate)
    }

    fn place(&mut self, object: MapObject<C>, coordinate: TileCoordinate) -> Result<ObjectId, FieldError> {
        if !self.tiles.contains_key(&coordinate) {
            return Err(FieldError::NoTileAt { coordinate });
        }
        let name = object.name().unwrap_or_default().to_owned();
        if !name.is_empty() && self.names.contains_key(&name) {
            return Err(FieldError::DuplicateName { name });
        }
        let id = self.push(coordinate, object);
        if !name.is_empty() {
            self.names.insert(name, id);
        }
        Ok(id)
    }

    fn push(&mut self, coordinate: TileCoordinate, object: MapObject<C>) -> ObjectId {
        let id = self.next_id();
        if matches!(object.kind(), MapObjectKind::Tile(_)) {
            self.tiles.insert(coordinate, id);
        } else {
            self.occupants.entry(coordinate).or_default().push(id);
        }
        self.objects.push(object);
        self.locations.push(coordinate);
        id
    }

    pub fn next_id(&self) -> ObjectId {
        ObjectId(self.objects.len() as u32)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&MapObject<C>> {
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut MapObject<C>> {
        self.objects.get_mut(id.index())
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object<C>> {
        self.get(id).and_then(MapObject::as_object)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object<C>> {
        self.get_mut(id).and_then(MapObject::as_object_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &MapObject<C>)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index as u32), object))
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    /// Cell the object is indexed at.
    pub fn coordinate_of(&self, id: ObjectId) -> Option<TileCoordinate> {
        self.locations.get(id.index()).copied()
    }

    pub fn has_tile(&self, coordinate: TileCoordinate) -> bool {
        self.tiles.contains_key(&coordinate)
    }

    pub fn tile_at(&self, coordinate: TileCoordinate) -> Option<ObjectId> {
        self.tiles.get(&coordinate).copied()
    }

    /// Non-tile objects at `coordinate`, in placement order.
    pub fn objects_at(&self, coordinate: TileCoordinate) -> &[ObjectId] {
        self.occupants
            .get(&coordinate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether something may step onto `coordinate`: the cell must be a tile
    /// and neither the tile nor anything on it may have collision.
    pub fn can_pass(&self, coordinate: TileCoordinate) -> bool {
        let Some(tile) = self.tile_at(coordinate) else {
            return false;
        };
        std::iter::once(tile)
            .chain(self.objects_at(coordinate).iter().copied())
            .filter_map(|id| self.get(id))
            .all(MapObject::can_pass)
    }

    /// Listeners at `coordinate`: the tile's first, then each object's in
    /// placement order.
    pub fn listeners_at(&self, coordinate: TileCoordinate) -> Vec<(ObjectId, ListenerHandle<C>)> {
        self.tile_at(coordinate)
            .into_iter()
            .chain(self.objects_at(coordinate).iter().copied())
            .filter_map(|id| self.get(id).map(|object| (id, object)))
            .flat_map(|(id, object)| {
                object
                    .events()
                    .iter()
                    .map(move |listener| (id, listener.clone()))
            })
            .collect()
    }

    /// The tile layer as a table, for rebuilding objects on this field.
    pub fn tile_layer(&self) -> TileLayer {
        self.tiles
            .iter()
            .filter_map(|(coordinate, id)| {
                let tile = self.get(*id)?.as_tile()?;
                Some((*coordinate, tile.id()))
            })
            .collect::<BTreeMap<TileCoordinate, TileId>>()
    }

    /// Attaches a render node for every visible map object under `root`.
    pub fn attach_nodes(&mut self, scene: &mut dyn RenderScene, root: Option<NodeHandle>) -> usize {
        self.objects
            .iter_mut()
            .filter_map(|object| object.add_to(scene, root))
            .count()
    }

    /// Starts moving object `id` one walk to `destination`.
    pub fn begin_move(
        &mut self,
        id: ObjectId,
        destination: TileCoordinate,
        scene: &mut dyn RenderScene,
        input: &mut InputGate,
        callback: Option<MotionCallback<C>>,
    ) -> Result<ActionToken, MotionError> {
        let target = destination.to_sheet(self.tile_size);
        let object = self
            .object_mut(id)
            .ok_or(MotionError::NotAnObject { id })?;
        let origin = object.position();
        let actions = object.get_action_to(origin, target);
        object.run_action(actions, target, scene, input, callback)
    }

    /// Ends the motion of object `id`; see [`Completion`].
    pub fn finish_move(
        &mut self,
        id: ObjectId,
        token: ActionToken,
        input: &mut InputGate,
    ) -> Result<Completion<C>, MotionError> {
        self.object_mut(id)
            .ok_or(MotionError::NotAnObject { id })?
            .complete_action(token, input)
    }

    /// Commits the logical position of object `id` and re-indexes it.
    pub fn commit_position(
        &mut self,
        id: ObjectId,
        destination: SheetCoordinate,
    ) -> Result<(), FieldError> {
        let coordinate = destination.to_tile(self.tile_size);
        let object = self
            .object_mut(id)
            .ok_or(FieldError::UnknownObject(id))?;
        object.commit_position(destination);
        self.relocate(id, coordinate);
        Ok(())
    }

    fn relocate(&mut self, id: ObjectId, to: TileCoordinate) {
        let Some(from) = self.coordinate_of(id) else {
            return;
        };
        if from == to {
            return;
        }
        if let Some(ids) = self.occupants.get_mut(&from) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.occupants.remove(&from);
            }
        }
        self.occupants.entry(to).or_default().push(id);
        self.locations[id.index()] = to;
    }
}

fn layer_has_tile<C>(layer: &ObjectLayer<C>, coordinate: &TileCoordinate) -> bool {
    layer
        .entries
        .iter()
        .any(|(at, object)| at == coordinate && matches!(object.kind(), MapObjectKind::Tile(_)))
}

impl<C> std::fmt::Debug for FieldMap<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMap")
            .field("tile_size", &self.tile_size)
            .field("objects", &self.objects.len())
            .field("tiles", &self.tiles.len())
            .finish_non_exhaustive()
    }
}
