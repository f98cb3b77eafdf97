//! Movable/animated objects placed on the field.

use crate::coord::SheetCoordinate;
use crate::direction::Direction;
use crate::render::{
    ActionToken, InputGate, NodeHandle, NodeSpec, RenderScene, SpriteAction, Texture,
};

use super::motion::{Completion, MotionCallback, MotionError, MotionState, PendingMotion};

/// Walking frames per direction. Each direction holds frame sets indexed by
/// the object's step index; each frame set is a list of asset names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSet {
    pub up: Vec<Vec<String>>,
    pub down: Vec<Vec<String>>,
    pub left: Vec<Vec<String>>,
    pub right: Vec<Vec<String>>,
}

impl ImageSet {
    pub fn frames(&self, direction: Direction) -> &[Vec<String>] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Frame shown while standing still facing `direction`: the second frame
    /// of the first set, or the first frame if the set is shorter.
    pub fn standing(&self, direction: Direction) -> Option<&str> {
        let first = self.frames(direction).first()?;
        first.get(1).or_else(|| first.first()).map(String::as_str)
    }
}

/// An object on the field: characters, decorations and ghost event markers.
///
/// `position` is the logical position, committed only when a motion has
/// completed. The render node may be anywhere between the old and the new
/// position while the motion runs.
pub struct Object<C> {
    name: String,
    direction: Direction,
    speed: f32,
    position: SheetCoordinate,
    step_index: usize,
    images: Option<ImageSet>,
    texture: Option<Texture>,
    node: Option<NodeHandle>,
    motion: MotionState<C>,
}

impl<C> Object<C> {
    pub fn new(name: impl Into<String>, position: SheetCoordinate, images: Option<ImageSet>) -> Self {
        let texture = images
            .as_ref()
            .and_then(|set| set.standing(Direction::Down))
            .map(Texture::named);
        Self {
            name: name.into(),
            direction: Direction::Down,
            speed: crate::config::FieldConfig::DEFAULT_SPEED,
            position,
            step_index: 0,
            images,
            texture,
            node: None,
            motion: MotionState::Idle,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn position(&self) -> SheetCoordinate {
        self.position
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn images(&self) -> Option<&ImageSet> {
        self.images.as_ref()
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, MotionState::Moving(_))
    }

    /// Token of the motion in flight, if any.
    pub fn pending_action(&self) -> Option<ActionToken> {
        match &self.motion {
            MotionState::Moving(pending) => Some(pending.token),
            MotionState::Idle => None,
        }
    }

    /// Creates this object's render node under `parent`.
    pub fn add_to(&mut self, scene: &mut dyn RenderScene, parent: Option<NodeHandle>) -> NodeHandle {
        if let Some(old) = self.node.take() {
            scene.remove_child(old);
        }
        let node = scene.add_child(
            parent,
            NodeSpec::Sprite {
                name: self.name.clone(),
                texture: self.texture.clone(),
                position: self.position,
                anchor: (0.5, 0.0),
                size: None,
            },
        );
        self.node = Some(node);
        node
    }

    /// Builds the walk from `origin` to `destination`.
    ///
    /// A pure one-axis delta turns the object and consumes the frame set for
    /// the current step index, alternating the step for the next call. Other
    /// deltas, and objects without an image set, animate with the current
    /// texture only.
    pub fn get_action_to(
        &mut self,
        origin: SheetCoordinate,
        destination: SheetCoordinate,
    ) -> Vec<SpriteAction> {
        let (dx, dy) = origin.delta_to(destination);

        let walk_frames = match (&self.images, Direction::from_sheet_delta(dx, dy)) {
            (Some(images), Some(direction)) => {
                self.direction = direction;
                images.frames(direction).get(self.step_index).map(|set| {
                    set.iter().map(|name| Texture::named(name.as_str())).collect::<Vec<_>>()
                })
            }
            _ => None,
        };

        let frames = match walk_frames {
            Some(frames) if !frames.is_empty() => {
                self.step_index = self.step_index.abs_diff(1);
                self.texture = frames.last().cloned();
                frames
            }
            _ => self.texture.iter().cloned().collect(),
        };

        vec![SpriteAction::Group(vec![
            SpriteAction::Animate {
                frames,
                time_per_frame: self.speed / 2.0,
            },
            SpriteAction::MoveBy {
                dx,
                dy,
                duration: self.speed,
            },
        ])]
    }

    /// Starts `actions` as one sequence on the render node and suspends
    /// input until [`Object::complete_action`] is called with the returned
    /// token.
    pub fn run_action(
        &mut self,
        actions: Vec<SpriteAction>,
        destination: SheetCoordinate,
        scene: &mut dyn RenderScene,
        input: &mut InputGate,
        callback: Option<MotionCallback<C>>,
    ) -> Result<ActionToken, MotionError> {
        if self.is_moving() {
            return Err(MotionError::AlreadyMoving {
                name: self.name.clone(),
            });
        }
        let node = self.node.ok_or_else(|| MotionError::NoRenderNode {
            name: self.name.clone(),
        })?;

        input.suspend();
        let token = scene.run_action(node, SpriteAction::Sequence(actions));
        self.motion = MotionState::Moving(PendingMotion {
            token,
            destination,
            callback,
        });
        Ok(token)
    }

    /// Ends the motion identified by `token` and restores input. The
    /// logical position is not touched; see [`Completion`].
    pub fn complete_action(
        &mut self,
        token: ActionToken,
        input: &mut InputGate,
    ) -> Result<Completion<C>, MotionError> {
        match std::mem::replace(&mut self.motion, MotionState::Idle) {
            MotionState::Moving(pending) if pending.token == token => {
                input.resume();
                Ok(Completion {
                    destination: pending.destination,
                    callback: pending.callback,
                })
            }
            MotionState::Moving(pending) => {
                let expected = pending.token;
                self.motion = MotionState::Moving(pending);
                Err(MotionError::TokenMismatch {
                    expected,
                    actual: token,
                })
            }
            MotionState::Idle => Err(MotionError::NotMoving {
                name: self.name.clone(),
            }),
        }
    }

    pub fn commit_position(&mut self, destination: SheetCoordinate) {
        self.position = destination;
    }

    /// Turns the object without animating.
    pub fn set_direction(&mut self, direction: Direction, scene: &mut dyn RenderScene) {
        self.direction = direction;
        let Some(frame) = self.images.as_ref().and_then(|set| set.standing(direction)) else {
            return;
        };
        let texture = Texture::named(frame);
        if let Some(node) = self.node {
            scene.set_texture(node, &texture);
        }
        self.texture = Some(texture);
    }

    /// On-screen position of the render node, which differs from
    /// [`Object::position`] while a motion runs.
    pub fn realtime_position(&self, scene: &dyn RenderScene) -> Option<SheetCoordinate> {
        scene.node_position(self.node?)
    }

    pub fn set_z_position(&self, scene: &mut dyn RenderScene, z: f32) {
        if let Some(node) = self.node {
            scene.set_z_position(node, z);
        }
    }
}

impl<C> std::fmt::Debug for Object<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("position", &self.position)
            .field("step_index", &self.step_index)
            .field("moving", &self.is_moving())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::coord::TileCoordinate;
    use crate::render::test_helpers::MockScene;

    const TILE: f32 = 32.0;

    fn walker() -> ImageSet {
        let frames = |dir: &str| {
            vec![
                vec![format!("{dir}_l1"), format!("{dir}_l2")],
                vec![format!("{dir}_r1"), format!("{dir}_r2")],
            ]
        };
        ImageSet {
            up: frames("up"),
            down: frames("down"),
            left: frames("left"),
            right: frames("right"),
        }
    }

    fn sheet(x: i32, y: i32) -> SheetCoordinate {
        TileCoordinate::new(x, y).to_sheet(TILE)
    }

    fn animate_frames(actions: &[SpriteAction]) -> Vec<Texture> {
        match &actions[0] {
            SpriteAction::Group(children) => match &children[0] {
                SpriteAction::Animate { frames, .. } => frames.clone(),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn step_right_selects_right_frames_and_alternates() {
        let mut object: Object<()> = Object::new("hero", sheet(5, 5), Some(walker()));

        let first = object.get_action_to(sheet(5, 5), sheet(6, 5));
        assert_eq!(object.direction(), Direction::Right);
        assert_eq!(
            animate_frames(&first),
            vec![Texture::named("right_l1"), Texture::named("right_l2")]
        );
        assert_eq!(first[0].translation(), (TILE, 0.0));
        assert_eq!(object.step_index(), 1);

        let second = object.get_action_to(sheet(6, 5), sheet(7, 5));
        assert_eq!(
            animate_frames(&second),
            vec![Texture::named("right_r1"), Texture::named("right_r2")]
        );
        assert_eq!(object.step_index(), 0);
    }

    #[test]
    fn timing_follows_speed() {
        let mut object: Object<()> =
            Object::new("hero", sheet(0, 0), Some(walker())).with_speed(0.4);
        let actions = object.get_action_to(sheet(0, 0), sheet(0, 1));

        let SpriteAction::Group(children) = &actions[0] else {
            panic!("expected group");
        };
        assert!(matches!(
            children[0],
            SpriteAction::Animate { time_per_frame, .. } if time_per_frame == 0.2
        ));
        assert!(matches!(
            children[1],
            SpriteAction::MoveBy { dx, dy, duration } if dx == 0.0 && dy == TILE && duration == 0.4
        ));
        assert_eq!(object.direction(), Direction::Up);
    }

    #[test]
    fn diagonal_keeps_direction_and_texture() {
        let mut object: Object<()> = Object::new("hero", sheet(0, 0), Some(walker()));
        let before = object.texture().cloned();

        let actions = object.get_action_to(sheet(0, 0), sheet(1, 1));

        assert_eq!(object.direction(), Direction::Down);
        assert_eq!(object.step_index(), 0);
        assert_eq!(animate_frames(&actions), before.into_iter().collect::<Vec<_>>());
        assert_eq!(actions[0].translation(), (TILE, TILE));
    }

    #[test]
    fn static_object_translates_with_single_texture() {
        let texture = Texture::named("barrel");
        let mut object: Object<()> =
            Object::new("barrel", sheet(1, 1), None).with_texture(texture.clone());

        let actions = object.get_action_to(sheet(1, 1), sheet(1, 0));

        assert_eq!(animate_frames(&actions), vec![texture]);
        assert_eq!(object.direction(), Direction::Down);
        assert_eq!(actions[0].translation(), (0.0, -TILE));
    }

    #[test]
    fn run_action_commits_position_only_after_completion() {
        let mut scene = MockScene::new();
        let mut input = InputGate::new();
        let mut object: Object<Vec<&'static str>> =
            Object::new("hero", sheet(5, 5), Some(walker()));
        object.add_to(&mut scene, None);

        let origin = object.position();
        let destination = sheet(6, 5);
        let actions = object.get_action_to(origin, destination);
        let token = object
            .run_action(
                actions,
                destination,
                &mut scene,
                &mut input,
                Some(Box::new(|log: &mut Vec<&'static str>| {
                    log.push("callback");
                    Ok(())
                })),
            )
            .unwrap();

        assert!(object.is_moving());
        assert!(!input.is_enabled());
        assert_eq!(object.position(), origin);

        let completion = object.complete_action(token, &mut input).unwrap();
        assert!(input.is_enabled());
        assert_eq!(object.position(), origin);

        let mut log = Vec::new();
        let (committed, result) = completion.run_callback(&mut log);
        result.unwrap();
        assert_eq!(log, vec!["callback"]);
        object.commit_position(committed);

        assert_eq!(object.position(), destination);
        assert!(!object.is_moving());
    }

    #[test]
    fn second_motion_is_refused_while_moving() {
        let mut scene = MockScene::new();
        let mut input = InputGate::new();
        let mut object: Object<()> = Object::new("hero", sheet(0, 0), Some(walker()));
        object.add_to(&mut scene, None);

        let actions = object.get_action_to(sheet(0, 0), sheet(1, 0));
        object
            .run_action(actions.clone(), sheet(1, 0), &mut scene, &mut input, None)
            .unwrap();
        let err = object
            .run_action(actions, sheet(2, 0), &mut scene, &mut input, None)
            .unwrap_err();

        assert!(matches!(err, MotionError::AlreadyMoving { .. }));
        assert_eq!(input.depth(), 1);
        assert_eq!(scene.actions.len(), 1);
    }

    #[test]
    fn mismatched_token_keeps_motion_in_flight() {
        let mut scene = MockScene::new();
        let mut input = InputGate::new();
        let mut object: Object<()> = Object::new("hero", sheet(0, 0), None);
        object.add_to(&mut scene, None);

        let token = object
            .run_action(Vec::new(), sheet(0, 1), &mut scene, &mut input, None)
            .unwrap();
        let err = object
            .complete_action(ActionToken(token.0 + 1), &mut input)
            .map(|_| ())
            .unwrap_err();

        assert!(matches!(err, MotionError::TokenMismatch { .. }));
        assert!(object.is_moving());
        assert!(!input.is_enabled());

        let err = Object::<()>::new("idle", sheet(0, 0), None)
            .complete_action(token, &mut input)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, MotionError::NotMoving { .. }));
    }

    #[test]
    fn run_action_requires_render_node() {
        let mut scene = MockScene::new();
        let mut input = InputGate::new();
        let mut ghost: Object<()> = Object::new("", sheet(0, 0), None);

        let err = ghost
            .run_action(Vec::new(), sheet(0, 1), &mut scene, &mut input, None)
            .unwrap_err();

        assert!(matches!(err, MotionError::NoRenderNode { .. }));
        assert!(input.is_enabled());
    }

    #[test]
    fn set_direction_switches_to_standing_frame() {
        let mut scene = MockScene::new();
        let mut object: Object<()> = Object::new("hero", sheet(0, 0), Some(walker()));
        let node = object.add_to(&mut scene, None);

        object.set_direction(Direction::Left, &mut scene);

        assert_eq!(object.direction(), Direction::Left);
        assert_eq!(scene.node(node).texture, Some(Texture::named("left_l2")));
        assert_eq!(object.position(), sheet(0, 0));
        assert!(scene.actions.is_empty());
    }

    #[test]
    fn callback_sees_pre_move_position_through_context() {
        // The callback runs before the commit, so a context reading the
        // logical position observes the origin.
        let seen = Rc::new(Cell::new(None));
        let mut scene = MockScene::new();
        let mut input = InputGate::new();
        let mut object: Object<Option<SheetCoordinate>> = Object::new("hero", sheet(0, 0), None);
        object.add_to(&mut scene, None);

        let origin = object.position();
        let probe = Rc::clone(&seen);
        let token = object
            .run_action(
                Vec::new(),
                sheet(0, 1),
                &mut scene,
                &mut input,
                Some(Box::new(move |ctx: &mut Option<SheetCoordinate>| {
                    probe.set(*ctx);
                    Ok(())
                })),
            )
            .unwrap();

        let completion = object.complete_action(token, &mut input).unwrap();
        let mut ctx = Some(object.position());
        let (destination, result) = completion.run_callback(&mut ctx);
        result.unwrap();
        object.commit_position(destination);

        assert_eq!(seen.get(), Some(origin));
        assert_eq!(object.position(), sheet(0, 1));
    }
}
