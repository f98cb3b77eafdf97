//! In-memory scene used by unit tests.

use std::collections::BTreeMap;

use crate::coord::SheetCoordinate;

use super::{ActionToken, NodeHandle, NodeSpec, RenderScene, SpriteAction, Texture};

#[derive(Debug)]
pub struct MockNode {
    pub spec: NodeSpec,
    pub parent: Option<NodeHandle>,
    pub texture: Option<Texture>,
    pub position: SheetCoordinate,
    pub alpha: f32,
    pub hidden: bool,
    pub z: f32,
}

#[derive(Debug, Default)]
pub struct MockScene {
    pub nodes: BTreeMap<NodeHandle, MockNode>,
    pub actions: Vec<(ActionToken, NodeHandle, SpriteAction)>,
    next_node: u64,
    next_action: u64,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: NodeHandle) -> &MockNode {
        &self.nodes[&handle]
    }

    pub fn children_of(&self, parent: NodeHandle) -> impl Iterator<Item = (&NodeHandle, &MockNode)> {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.parent == Some(parent))
    }

    pub fn actions_on(&self, handle: NodeHandle) -> Vec<&SpriteAction> {
        self.actions
            .iter()
            .filter(|(_, node, _)| *node == handle)
            .map(|(_, _, action)| action)
            .collect()
    }
}

impl RenderScene for MockScene {
    fn add_child(&mut self, parent: Option<NodeHandle>, spec: NodeSpec) -> NodeHandle {
        self.next_node += 1;
        let handle = NodeHandle(self.next_node);
        let (texture, position, alpha) = match &spec {
            NodeSpec::Sprite {
                texture, position, ..
            } => (texture.clone(), *position, 1.0),
            NodeSpec::Label {
                position, alpha, ..
            } => (None, *position, *alpha),
            NodeSpec::Box { position, .. } => (None, *position, 1.0),
        };
        self.nodes.insert(
            handle,
            MockNode {
                spec,
                parent,
                texture,
                position,
                alpha,
                hidden: false,
                z: 0.0,
            },
        );
        handle
    }

    fn remove_child(&mut self, node: NodeHandle) {
        self.nodes.remove(&node);
        self.actions.retain(|(_, target, _)| *target != node);
    }

    fn run_action(&mut self, node: NodeHandle, action: SpriteAction) -> ActionToken {
        self.next_action += 1;
        let token = ActionToken(self.next_action);
        self.actions.push((token, node, action));
        token
    }

    fn remove_all_actions(&mut self, node: NodeHandle) {
        self.actions.retain(|(_, target, _)| *target != node);
    }

    fn set_texture(&mut self, node: NodeHandle, texture: &Texture) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.texture = Some(texture.clone());
        }
    }

    fn set_position(&mut self, node: NodeHandle, position: SheetCoordinate) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.position = position;
        }
    }

    fn set_alpha(&mut self, node: NodeHandle, alpha: f32) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.alpha = alpha;
        }
    }

    fn set_hidden(&mut self, node: NodeHandle, hidden: bool) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.hidden = hidden;
        }
    }

    fn set_z_position(&mut self, node: NodeHandle, z: f32) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.z = z;
        }
    }

    fn node_position(&self, node: NodeHandle) -> Option<SheetCoordinate> {
        self.nodes.get(&node).map(|entry| entry.position)
    }
}
