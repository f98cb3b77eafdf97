use crate::coord::SheetCoordinate;
use crate::event::ListenerHandle;
use crate::ids::ObjectId;
use crate::render::{NodeHandle, RenderScene};

use super::{Item, Object, Tile};

/// Variant-specific part of a [`MapObject`].
pub enum MapObjectKind<C> {
    Tile(Tile),
    Object(Object<C>),
    Item(Item),
}

/// Anything placed on the field: a tile, an object or an item.
///
/// `collision`, `events` and `parent` are fixed while the map is built and
/// only read afterwards. `parent` is an index into the owning field's arena
/// and does not keep the parent alive.
pub struct MapObject<C> {
    collision: bool,
    events: Vec<ListenerHandle<C>>,
    parent: Option<ObjectId>,
    kind: MapObjectKind<C>,
}

impl<C> MapObject<C> {
    pub fn new(kind: MapObjectKind<C>) -> Self {
        Self {
            collision: false,
            events: Vec::new(),
            parent: None,
            kind,
        }
    }

    pub fn tile(tile: Tile) -> Self {
        Self::new(MapObjectKind::Tile(tile))
    }

    pub fn object(object: Object<C>) -> Self {
        Self::new(MapObjectKind::Object(object))
    }

    pub fn item(item: Item) -> Self {
        Self::new(MapObjectKind::Item(item))
    }

    /// Nameless, imageless object carrying a single listener on behalf of
    /// `parent`.
    pub fn ghost(position: SheetCoordinate, listener: ListenerHandle<C>, parent: ObjectId) -> Self {
        let mut ghost = Self::object(Object::new("", position, None));
        ghost.events.push(listener);
        ghost.parent = Some(parent);
        ghost
    }

    pub fn kind(&self) -> &MapObjectKind<C> {
        &self.kind
    }

    pub fn has_collision(&self) -> bool {
        self.collision
    }

    pub fn set_collision(&mut self) {
        self.collision = true;
    }

    /// Whether other objects may enter this object's cell.
    pub fn can_pass(&self) -> bool {
        !self.collision
    }

    /// Listeners in the order they were attached.
    pub fn events(&self) -> &[ListenerHandle<C>] {
        &self.events
    }

    pub fn add_event(&mut self, listener: ListenerHandle<C>) {
        self.events.push(listener);
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: ObjectId) {
        self.parent = Some(parent);
    }

    pub fn is_ghost(&self) -> bool {
        self.parent.is_some() && self.as_object().is_some_and(|object| object.name().is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            MapObjectKind::Tile(_) => None,
            MapObjectKind::Object(object) => Some(object.name()),
            MapObjectKind::Item(item) => Some(item.name()),
        }
    }

    /// Logical sheet position.
    pub fn position(&self) -> SheetCoordinate {
        match &self.kind {
            MapObjectKind::Tile(tile) => tile.position(),
            MapObjectKind::Object(object) => object.position(),
            MapObjectKind::Item(item) => item.position(),
        }
    }

    pub fn node(&self) -> Option<NodeHandle> {
        match &self.kind {
            MapObjectKind::Tile(tile) => tile.node(),
            MapObjectKind::Object(object) => object.node(),
            MapObjectKind::Item(item) => item.node(),
        }
    }

    pub fn as_tile(&self) -> Option<&Tile> {
        match &self.kind {
            MapObjectKind::Tile(tile) => Some(tile),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object<C>> {
        match &self.kind {
            MapObjectKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object<C>> {
        match &mut self.kind {
            MapObjectKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match &self.kind {
            MapObjectKind::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Attaches the render node. Ghosts stay invisible and get none.
    pub fn add_to(
        &mut self,
        scene: &mut dyn RenderScene,
        parent: Option<NodeHandle>,
    ) -> Option<NodeHandle> {
        if self.is_ghost() {
            return None;
        }
        Some(match &mut self.kind {
            MapObjectKind::Tile(tile) => tile.add_to(scene, parent),
            MapObjectKind::Object(object) => object.add_to(scene, parent),
            MapObjectKind::Item(item) => item.add_to(scene, parent),
        })
    }
}

impl<C> std::fmt::Debug for MapObject<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            MapObjectKind::Tile(_) => "tile",
            MapObjectKind::Object(_) => "object",
            MapObjectKind::Item(_) => "item",
        };
        f.debug_struct("MapObject")
            .field("kind", &kind)
            .field("name", &self.name())
            .field("collision", &self.collision)
            .field("events", &self.events.len())
            .field("parent", &self.parent)
            .finish()
    }
}
