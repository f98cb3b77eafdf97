use crate::coord::{SheetCoordinate, TileCoordinate};
use crate::ids::TileId;
use crate::render::{NodeHandle, NodeSpec, RenderScene, Texture};

/// One cell of the tile layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    id: TileId,
    coordinate: TileCoordinate,
    position: SheetCoordinate,
    texture: Option<Texture>,
    node: Option<NodeHandle>,
}

impl Tile {
    pub fn new(id: TileId, coordinate: TileCoordinate, tile_size: f32) -> Self {
        Self {
            id,
            coordinate,
            position: coordinate.to_sheet(tile_size),
            texture: None,
            node: None,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn coordinate(&self) -> TileCoordinate {
        self.coordinate
    }

    pub fn position(&self) -> SheetCoordinate {
        self.position
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    pub fn add_to(&mut self, scene: &mut dyn RenderScene, parent: Option<NodeHandle>) -> NodeHandle {
        if let Some(old) = self.node.take() {
            scene.remove_child(old);
        }
        let node = scene.add_child(
            parent,
            NodeSpec::Sprite {
                name: format!("tile_{}_{}", self.coordinate.x, self.coordinate.y),
                texture: self.texture.clone(),
                position: self.position,
                anchor: (0.5, 0.5),
                size: None,
            },
        );
        self.node = Some(node);
        node
    }
}
