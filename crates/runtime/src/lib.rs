//! Session layer for the Lantern field.
//!
//! This crate wires `lantern-core` into something a driver can run: it owns
//! the field, the input gate, the scene and the dialog box, resolves player
//! input into triggers, and routes completion reports from the renderer back
//! to the moving objects.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the coordinator and its builder
//! - [`world`] is the context every listener callback receives
//! - [`events`] provides the built-in event types (`talk`, `step`, `hide`)
//! - [`scene`] is a renderer without a display, used by the client and tests
pub mod error;
pub mod events;
pub mod scene;
pub mod session;
pub mod world;

pub use error::{Result, SessionError};
pub use events::builtin_registry;
pub use scene::{HeadlessNode, HeadlessScene};
pub use session::{FieldSession, SessionBuilder};
pub use world::FieldWorld;
