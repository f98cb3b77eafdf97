//! Scene implementation without a display.
//!
//! Actions finish visually the moment they are submitted: translations,
//! textures and alpha are applied immediately, while the token stays pending
//! until its owner calls [`RenderScene::finish_action`] or the node goes
//! away. This keeps the logical/visual split observable without a frame
//! loop.

use std::collections::BTreeMap;

use lantern_core::{
    ActionToken, NodeHandle, NodeSpec, RenderScene, SheetCoordinate, SpriteAction, Texture,
};

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessNode {
    pub spec: NodeSpec,
    pub parent: Option<NodeHandle>,
    pub texture: Option<Texture>,
    pub position: SheetCoordinate,
    pub alpha: f32,
    pub hidden: bool,
    pub z: f32,
}

#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<NodeHandle, HeadlessNode>,
    running: BTreeMap<ActionToken, NodeHandle>,
    next_node: u64,
    next_action: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&HeadlessNode> {
        self.nodes.get(&handle)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Tokens of submitted actions nobody has finished yet.
    pub fn running(&self) -> impl Iterator<Item = ActionToken> + '_ {
        self.running.keys().copied()
    }

    fn apply(&mut self, node: NodeHandle, action: &SpriteAction) {
        let Some(entry) = self.nodes.get_mut(&node) else {
            return;
        };
        let (dx, dy) = action.translation();
        entry.position = SheetCoordinate::new(entry.position.x + dx, entry.position.y + dy);
        if let Some(alpha) = action.final_alpha() {
            entry.alpha = alpha;
        }
        if let Some(texture) = last_frame(action) {
            entry.texture = Some(texture);
        }
    }
}

fn last_frame(action: &SpriteAction) -> Option<Texture> {
    match action {
        SpriteAction::Animate { frames, .. } => frames.last().cloned(),
        SpriteAction::Group(children) | SpriteAction::Sequence(children) => {
            children.iter().filter_map(last_frame).last()
        }
        _ => None,
    }
}

impl RenderScene for HeadlessScene {
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
            HeadlessNode {
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
        let mut doomed = vec![node];
        while let Some(handle) = doomed.pop() {
            self.nodes.remove(&handle);
            self.running.retain(|_, target| *target != handle);
            doomed.extend(
                self.nodes
                    .iter()
                    .filter(|(_, child)| child.parent == Some(handle))
                    .map(|(child, _)| *child),
            );
        }
    }

    fn run_action(&mut self, node: NodeHandle, action: SpriteAction) -> ActionToken {
        self.next_action += 1;
        let token = ActionToken(self.next_action);
        self.apply(node, &action);
        if action.duration().is_some() {
            self.running.insert(token, node);
        }
        token
    }

    fn remove_all_actions(&mut self, node: NodeHandle) {
        self.running.retain(|_, target| *target != node);
    }

    fn finish_action(&mut self, token: ActionToken) {
        self.running.remove(&token);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(position: SheetCoordinate) -> NodeSpec {
        NodeSpec::Sprite {
            name: "hero".into(),
            texture: None,
            position,
            anchor: (0.5, 0.0),
            size: None,
        }
    }

    #[test]
    fn actions_apply_immediately_and_stay_pending() {
        let mut scene = HeadlessScene::new();
        let node = scene.add_child(None, sprite(SheetCoordinate::ZERO));

        let token = scene.run_action(
            node,
            SpriteAction::Sequence(vec![SpriteAction::Group(vec![
                SpriteAction::Animate {
                    frames: vec![Texture::named("a"), Texture::named("b")],
                    time_per_frame: 0.1,
                },
                SpriteAction::MoveBy {
                    dx: 32.0,
                    dy: 0.0,
                    duration: 0.2,
                },
            ])]),
        );

        let entry = scene.node(node).unwrap();
        assert_eq!(entry.position, SheetCoordinate::new(32.0, 0.0));
        assert_eq!(entry.texture, Some(Texture::named("b")));
        assert_eq!(scene.running().collect::<Vec<_>>(), vec![token]);
        scene.finish_action(token);
        assert_eq!(scene.running().count(), 0);
    }

    #[test]
    fn endless_actions_are_not_tracked() {
        let mut scene = HeadlessScene::new();
        let node = scene.add_child(None, sprite(SheetCoordinate::ZERO));

        scene.run_action(
            node,
            SpriteAction::RepeatForever(Box::new(SpriteAction::Wait { duration: 0.5 })),
        );

        assert_eq!(scene.running().count(), 0);
    }

    #[test]
    fn removing_a_parent_removes_children() {
        let mut scene = HeadlessScene::new();
        let parent = scene.add_child(None, sprite(SheetCoordinate::ZERO));
        let child = scene.add_child(Some(parent), sprite(SheetCoordinate::ZERO));
        scene.add_child(Some(child), sprite(SheetCoordinate::ZERO));

        scene.remove_child(parent);

        assert_eq!(scene.node_count(), 0);
    }
}
