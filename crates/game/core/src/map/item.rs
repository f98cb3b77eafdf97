use crate::coord::SheetCoordinate;
use crate::render::{NodeHandle, NodeSpec, RenderScene, Texture};

/// Stationary pickup or decoration. Never moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    name: String,
    position: SheetCoordinate,
    texture: Texture,
    node: Option<NodeHandle>,
}

impl Item {
    pub fn new(name: impl Into<String>, position: SheetCoordinate, texture: Texture) -> Self {
        Self {
            name: name.into(),
            position,
            texture,
            node: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> SheetCoordinate {
        self.position
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
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
                name: self.name.clone(),
                texture: Some(self.texture.clone()),
                position: self.position,
                anchor: (0.5, 0.5),
                size: None,
            },
        );
        self.node = Some(node);
        node
    }
}
