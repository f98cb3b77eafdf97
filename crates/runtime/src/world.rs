//! State handed to listener callbacks as their context.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::SessionError;

use lantern_core::{
    ActionToken, DialogError, DialogPosition, DialogPresenter, Direction, EventError, FieldError,
    FieldMap, ImageSet, InputGate, Item, MotionCallback, MotionError, Object, ObjectId,
    RenderScene, TalkSide, Texture, TileCoordinate,
};

/// z position given to characters so they draw above tiles and items.
const CHARACTER_Z: f32 = 10.0;
const ITEM_Z: f32 = 5.0;

/// Everything a listener may touch: the field, the input gate, the scene and
/// the dialog box. Motions started here are remembered by token so the
/// session can route completions back to the right object.
pub struct FieldWorld {
    map: FieldMap<FieldWorld>,
    input: InputGate,
    scene: Box<dyn RenderScene>,
    dialog: DialogPresenter,
    player: Option<ObjectId>,
    motions: BTreeMap<ActionToken, ObjectId>,
}

impl FieldWorld {
    /// Takes ownership of a built field and attaches every visible object and
    /// the dialog box to `scene`.
    pub fn new(
        mut map: FieldMap<FieldWorld>,
        mut scene: Box<dyn RenderScene>,
        mut dialog: DialogPresenter,
    ) -> Self {
        let attached = map.attach_nodes(scene.as_mut(), None);
        dialog.add_to(scene.as_mut(), None);
        debug!(objects = map.len(), attached, "field attached to scene");
        Self {
            map,
            input: InputGate::new(),
            scene,
            dialog,
            player: None,
            motions: BTreeMap::new(),
        }
    }

    pub fn map(&self) -> &FieldMap<FieldWorld> {
        &self.map
    }

    pub fn input(&self) -> &InputGate {
        &self.input
    }

    pub fn scene(&self) -> &dyn RenderScene {
        self.scene.as_ref()
    }

    pub fn dialog(&self) -> &DialogPresenter {
        &self.dialog
    }

    pub fn player(&self) -> Option<ObjectId> {
        self.player
    }

    /// Tokens of motions still waiting for their completion report.
    pub fn pending_motions(&self) -> impl Iterator<Item = ActionToken> + '_ {
        self.motions.keys().copied()
    }

    /// Places a character at `at` and gives it a render node.
    pub fn spawn_character(
        &mut self,
        name: &str,
        images: Option<ImageSet>,
        speed: f32,
        at: TileCoordinate,
    ) -> Result<ObjectId, FieldError> {
        let position = at.to_sheet(self.map.tile_size());
        let object = Object::new(name, position, images).with_speed(speed);
        let id = self.map.spawn(object, at)?;
        if let Some(object) = self.map.object_mut(id) {
            object.add_to(self.scene.as_mut(), None);
            object.set_z_position(self.scene.as_mut(), CHARACTER_Z);
        }
        debug!(%name, %at, ?id, "character spawned");
        Ok(id)
    }

    pub fn place_item(
        &mut self,
        name: &str,
        texture: Texture,
        at: TileCoordinate,
    ) -> Result<ObjectId, FieldError> {
        let item = Item::new(name, at.to_sheet(self.map.tile_size()), texture);
        let id = self.map.place_item(item, at)?;
        let node = self
            .map
            .get_mut(id)
            .and_then(|object| object.add_to(self.scene.as_mut(), None));
        if let Some(node) = node {
            self.scene.set_z_position(node, ITEM_Z);
        }
        debug!(%name, %at, ?id, "item placed");
        Ok(id)
    }

    pub(crate) fn set_player(&mut self, id: ObjectId) {
        self.player = Some(id);
    }

    /// Turns object `id` toward `direction` without moving it.
    pub fn face(&mut self, id: ObjectId, direction: Direction) -> Result<(), EventError> {
        let object = self.map.object_mut(id).ok_or(EventError::NotMovable(id))?;
        object.set_direction(direction, self.scene.as_mut());
        trace!(?id, %direction, "object turned");
        Ok(())
    }

    /// Starts moving object `id` one tile toward `direction`.
    ///
    /// The object turns first. Passability is then checked against the
    /// logical position, which only changes once the motion completes.
    pub fn move_object(
        &mut self,
        id: ObjectId,
        direction: Direction,
        callback: Option<MotionCallback<FieldWorld>>,
    ) -> Result<ActionToken, EventError> {
        let from = self
            .map
            .coordinate_of(id)
            .ok_or(EventError::ObjectNotFound(id))?;
        let object = self.map.object(id).ok_or(EventError::NotMovable(id))?;
        if object.is_moving() {
            return Err(MotionError::AlreadyMoving {
                name: object.name().to_owned(),
            }
            .into());
        }

        self.face(id, direction)?;
        let destination = from.neighbor(direction);
        if !self.map.can_pass(destination) {
            debug!(?id, %destination, "move blocked");
            return Err(EventError::Blocked { destination });
        }

        let token = self.map.begin_move(
            id,
            destination,
            self.scene.as_mut(),
            &mut self.input,
            callback,
        )?;
        self.motions.insert(token, id);
        debug!(?id, %from, %destination, %token, "motion started");
        Ok(token)
    }

    /// Resolves a completion report. Input is resumed, the callback runs
    /// against this world, and only then is the logical position committed.
    /// A failing callback is reported after the commit.
    pub(crate) fn complete_motion(&mut self, token: ActionToken) -> crate::Result<ObjectId> {
        let id = self
            .motions
            .remove(&token)
            .ok_or(SessionError::UnknownActionToken(token))?;
        let completion = match self.map.finish_move(id, token, &mut self.input) {
            Ok(completion) => completion,
            Err(error) => {
                self.motions.insert(token, id);
                return Err(error.into());
            }
        };
        self.scene.finish_action(token);
        let (destination, outcome) = completion.run_callback(self);
        self.map.commit_position(id, destination)?;
        debug!(?id, %token, input_enabled = self.input.is_enabled(), "motion completed");
        outcome?;
        Ok(id)
    }

    pub fn show_dialog(
        &mut self,
        text: &str,
        side: TalkSide,
        position: DialogPosition,
    ) -> Result<(), DialogError> {
        let layout = self.dialog.draw_text(self.scene.as_mut(), text, side)?;
        self.dialog.show(self.scene.as_mut(), position)?;
        debug!(glyphs = layout.glyphs.len(), pages = layout.pages, %side, %position, "dialog shown");
        Ok(())
    }

    pub fn hide_dialog(&mut self) -> Result<(), DialogError> {
        self.dialog.clear_text(self.scene.as_mut());
        self.dialog.hide(self.scene.as_mut())?;
        debug!("dialog hidden");
        Ok(())
    }
}

impl fmt::Debug for FieldWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldWorld")
            .field("map", &self.map)
            .field("input", &self.input)
            .field("dialog", &self.dialog)
            .field("player", &self.player)
            .field("motions", &self.motions)
            .finish_non_exhaustive()
    }
}
