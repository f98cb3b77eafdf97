//! Session coordinator.
//!
//! The session owns the [`FieldWorld`] and turns player input into
//! triggers: the action button resolves to a cell, the listeners found there
//! run in order, and any listeners they chain are queued until input is
//! enabled again. Motion completions reported by the scene flow back through
//! [`FieldSession::complete_action`].

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use lantern_core::{
    ActionToken, DialogGeometry, DialogPosition, DialogPresenter, Direction, EventArgs,
    EventDispatcher, EventError, FieldConfig, FieldMap, GeneratorError, ImageSet, ListenerHandle,
    ListenerRegistry, ObjectId, ObjectPlacement, PropertyTable, RenderScene, TalkSide, Texture,
    TileCoordinate, TileLayer, TileSetTable,
};

use crate::error::{Result, SessionError};
use crate::events::builtin_registry;
use crate::scene::HeadlessScene;
use crate::world::FieldWorld;

/// Listener waiting for input to be re-enabled.
struct Chained {
    sender: Option<ObjectId>,
    args: EventArgs,
    listener: ListenerHandle<FieldWorld>,
}

pub struct FieldSession {
    config: FieldConfig,
    world: FieldWorld,
    chained: VecDeque<Chained>,
}

impl FieldSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn new(config: FieldConfig, world: FieldWorld) -> Self {
        Self {
            config,
            world,
            chained: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn world(&self) -> &FieldWorld {
        &self.world
    }

    /// Places the player character. Later calls replace which object the
    /// session treats as the player.
    pub fn spawn_player(
        &mut self,
        name: &str,
        images: Option<ImageSet>,
        at: TileCoordinate,
    ) -> Result<ObjectId> {
        let id = self
            .world
            .spawn_character(name, images, self.config.default_speed, at)?;
        self.world.set_player(id);
        info!(%name, %at, "player spawned");
        Ok(id)
    }

    /// Places a non-player character.
    pub fn spawn_character(
        &mut self,
        name: &str,
        images: Option<ImageSet>,
        at: TileCoordinate,
    ) -> Result<ObjectId> {
        Ok(self
            .world
            .spawn_character(name, images, self.config.default_speed, at)?)
    }

    /// Drops an item on the field. Walkers pass over it.
    pub fn place_item(&mut self, name: &str, texture: Texture, at: TileCoordinate) -> Result<ObjectId> {
        Ok(self.world.place_item(name, texture, at)?)
    }

    fn player(&self) -> Result<ObjectId> {
        self.world.player().ok_or(SessionError::NoPlayer)
    }

    /// Logical cell of the player. It changes only when a step completes.
    pub fn player_coordinate(&self) -> Result<TileCoordinate> {
        let player = self.player()?;
        self.world
            .map()
            .coordinate_of(player)
            .ok_or(SessionError::ObjectNotFound(player))
    }

    pub fn player_direction(&self) -> Result<Direction> {
        let player = self.player()?;
        self.world
            .map()
            .object(player)
            .map(|object| object.direction())
            .ok_or(SessionError::ObjectNotFound(player))
    }

    pub fn input_enabled(&self) -> bool {
        self.world.input().is_enabled()
    }

    /// Tokens of motions the scene has yet to report as finished.
    pub fn pending_motions(&self) -> Vec<ActionToken> {
        self.world.pending_motions().collect()
    }

    /// Number of chained listeners waiting for input.
    pub fn queued_listeners(&self) -> usize {
        self.chained.len()
    }

    fn ensure_input(&self) -> Result<()> {
        if self.world.input().is_enabled() {
            Ok(())
        } else {
            Err(SessionError::InputSuspended)
        }
    }

    /// Action button: triggers the listeners on the player's own cell.
    pub fn interact(&mut self) -> Result<usize> {
        let coordinate = self.player_coordinate()?;
        self.interact_at(coordinate)
    }

    /// Triggers every listener found at `coordinate`, tile listeners first,
    /// with the player as sender. Stops at the first failing listener.
    /// Returns how many listeners were triggered.
    pub fn interact_at(&mut self, coordinate: TileCoordinate) -> Result<usize> {
        self.ensure_input()?;
        let sender = self.world.player();
        let listeners: Vec<_> = self
            .world
            .map()
            .listeners_at(coordinate)
            .into_iter()
            .map(|(_, listener)| listener)
            .collect();
        if listeners.is_empty() {
            debug!(%coordinate, "nothing to interact with");
            return Ok(0);
        }

        let mut args = EventArgs::new().at(coordinate);
        if let Ok(direction) = self.player_direction() {
            args = args.facing(direction);
        }
        info!(%coordinate, listeners = listeners.len(), "interaction");
        self.fire(sender, &args, &listeners)?;
        self.drain_chain()?;
        Ok(listeners.len())
    }

    /// Player step: turns toward `direction` and, if the neighbouring cell
    /// is passable from the player's logical position, starts the walk.
    pub fn walk(&mut self, direction: Direction) -> Result<ActionToken> {
        self.ensure_input()?;
        let player = self.player()?;
        match self.world.move_object(player, direction, None) {
            Ok(token) => Ok(token),
            Err(EventError::Blocked { destination }) => Err(SessionError::Blocked { destination }),
            Err(error) => Err(error.into()),
        }
    }

    /// Reports that the scene finished the action behind `token`.
    ///
    /// Input is restored before the motion callback runs and the logical
    /// position is committed after it. Chained listeners then run while
    /// input stays enabled.
    pub fn complete_action(&mut self, token: ActionToken) -> Result<()> {
        let id = self.world.complete_motion(token)?;
        debug!(?id, %token, queued = self.chained.len(), "action completed");
        self.drain_chain()
    }

    pub fn show_dialog(
        &mut self,
        text: &str,
        side: TalkSide,
        position: DialogPosition,
    ) -> Result<()> {
        Ok(self.world.show_dialog(text, side, position)?)
    }

    pub fn hide_dialog(&mut self) -> Result<()> {
        Ok(self.world.hide_dialog()?)
    }

    fn fire(
        &mut self,
        sender: Option<ObjectId>,
        args: &EventArgs,
        listeners: &[ListenerHandle<FieldWorld>],
    ) -> Result<()> {
        let mut dispatcher = EventDispatcher::new();
        for listener in listeners {
            if !dispatcher.add(listener) {
                warn!(label = listener.label(), "listener is held by another dispatcher; skipped");
            }
        }
        let outcome = dispatcher.trigger(&mut self.world, sender, args);
        dispatcher.remove_all();

        let chained = outcome.inspect_err(|error| {
            warn!(%error, "listener failed");
        })?;
        self.chained
            .extend(chained.into_iter().map(|listener| Chained {
                sender,
                args: args.clone(),
                listener,
            }));
        Ok(())
    }

    fn drain_chain(&mut self) -> Result<()> {
        while self.world.input().is_enabled() {
            let Some(next) = self.chained.pop_front() else {
                break;
            };
            debug!(label = next.listener.label(), "running chained listener");
            if let Err(error) = self.fire(next.sender, &next.args, std::slice::from_ref(&next.listener)) {
                // A failed chain ends there; its remaining links must not leak
                // into the next interaction.
                if !self.chained.is_empty() {
                    warn!(dropped = self.chained.len(), "chain aborted");
                    self.chained.clear();
                }
                return Err(error);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FieldSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSession")
            .field("config", &self.config)
            .field("world", &self.world)
            .field("queued", &self.chained.len())
            .finish()
    }
}

/// Builder for [`FieldSession`].
pub struct SessionBuilder {
    config: FieldConfig,
    frame: (f32, f32),
    dialog_icon: Texture,
    scene: Option<Box<dyn RenderScene>>,
    registry: ListenerRegistry<FieldWorld>,
}

impl SessionBuilder {
    pub const DEFAULT_FRAME: (f32, f32) = (320.0, 480.0);

    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            frame: Self::DEFAULT_FRAME,
            dialog_icon: Texture::named("player.png"),
            scene: None,
            registry: builtin_registry(),
        }
    }

    pub fn config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Visible frame size the dialog box is laid out against.
    pub fn frame(mut self, width: f32, height: f32) -> Self {
        self.frame = (width, height);
        self
    }

    pub fn dialog_icon(mut self, icon: Texture) -> Self {
        self.dialog_icon = icon;
        self
    }

    /// Renderer to drive. Defaults to a [`HeadlessScene`].
    pub fn scene(mut self, scene: Box<dyn RenderScene>) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Adds or replaces an event type next to the built-in ones.
    pub fn event<F>(mut self, event_type: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(Option<Direction>, &[String]) -> std::result::Result<ListenerHandle<FieldWorld>, GeneratorError>
            + 'static,
    {
        self.registry.register(event_type, constructor);
        self
    }

    /// Builds the field from map tables and attaches it to the scene.
    pub fn build(
        self,
        tiles: &TileLayer,
        placement: &ObjectPlacement,
        properties: &PropertyTable,
        tilesets: &TileSetTable,
    ) -> Result<FieldSession> {
        let map = FieldMap::from_tables(
            tiles,
            placement,
            properties,
            tilesets,
            &self.registry,
            self.config.tile_size,
        )
        .inspect_err(|error| warn!(%error, "field construction failed"))?;

        let (width, height) = self.frame;
        let dialog = DialogPresenter::new(DialogGeometry::new(width, height), self.dialog_icon);
        let scene = self
            .scene
            .unwrap_or_else(|| Box::new(HeadlessScene::new()));
        let world = FieldWorld::new(map, scene, dialog);
        info!(
            objects = world.map().len(),
            tile_size = self.config.tile_size,
            "session ready"
        );
        Ok(FieldSession::new(self.config, world))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
