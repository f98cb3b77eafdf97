//! Interaction kernel of a tile-based RPG field.
//!
//! `lantern-core` owns the rules that must stay consistent while sprite
//! actions run asynchronously: the event dispatcher and its listeners, the
//! map-object model with its motion state machine, the factory that builds
//! objects and directional ghost events from map tables, and the paged
//! dialog box. Rendering is reached only through [`render::RenderScene`];
//! nothing in this crate performs I/O or logs.
pub mod config;
pub mod coord;
pub mod dialog;
pub mod direction;
pub mod error;
pub mod event;
pub mod ids;
pub mod map;
pub mod render;

pub use config::FieldConfig;
pub use coord::{SheetCoordinate, TileCoordinate};
pub use dialog::{DialogError, DialogGeometry, DialogPosition, DialogPresenter, TalkSide};
pub use direction::Direction;
pub use error::{ErrorSeverity, GameError};
pub use event::{
    EventArgs, EventDispatcher, EventError, EventListener, GeneratorError, Invocation,
    ListenerGenerator, ListenerHandle, ListenerId, ListenerRegistry,
};
pub use ids::{ObjectId, TileId, TileSetId};
pub use map::{
    Completion, CropError, EventSpec, FactoryError, FieldError, FieldMap, GridTileSet, ImageSet,
    Item, MapObject, MapObjectKind, MotionCallback, MotionError, Object, ObjectFactory,
    ObjectLayer, ObjectPlacement, PlacementMask, PropertyTable, Tile, TileLayer, TileProperty,
    TileSet, TileSetTable,
};
pub use render::{
    ActionToken, ImageRegion, InputGate, NodeHandle, NodeSpec, RenderScene, SpriteAction, Texture,
};
