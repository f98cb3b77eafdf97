//! Narrow capability boundary towards the scene-graph renderer.
//!
//! The core never inspects render nodes. Map objects and the dialog
//! presenter own opaque [`NodeHandle`]s and issue commands through
//! [`RenderScene`]. Actions run asynchronously on the renderer's side; the
//! renderer reports completion back to the session with the
//! [`ActionToken`] it returned from [`RenderScene::run_action`].

mod action;
mod input;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use action::SpriteAction;
pub use input::InputGate;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::coord::SheetCoordinate;
use crate::ids::TileSetId;

/// Opaque handle to a node living in the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub u64);

/// Identifies one submitted action so its completion can be matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionToken(pub u64);

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Sub-image of a tileset, as produced by cropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRegion {
    pub tileset: TileSetId,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Texture {
    /// Asset looked up by name (character frames, icons).
    Named(String),
    /// Region cropped from a tileset image.
    Region(ImageRegion),
}

impl Texture {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Node description passed to [`RenderScene::add_child`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeSpec {
    Sprite {
        name: String,
        texture: Option<Texture>,
        position: SheetCoordinate,
        /// Unit anchor point; `(0.5, 0.0)` is bottom centre.
        anchor: (f32, f32),
        size: Option<(f32, f32)>,
    },
    Label {
        text: String,
        font_size: f32,
        position: SheetCoordinate,
        alpha: f32,
    },
    Box {
        width: f32,
        height: f32,
        corner_radius: f32,
        position: SheetCoordinate,
    },
}

/// Commands the core issues to the renderer.
pub trait RenderScene {
    fn add_child(&mut self, parent: Option<NodeHandle>, node: NodeSpec) -> NodeHandle;

    fn remove_child(&mut self, node: NodeHandle);

    /// Starts `action` on `node`. The renderer reports completion later with
    /// the returned token.
    fn run_action(&mut self, node: NodeHandle, action: SpriteAction) -> ActionToken;

    fn remove_all_actions(&mut self, node: NodeHandle);

    /// The owner has consumed the completion of `token`; anything the
    /// renderer kept for it can go.
    fn finish_action(&mut self, _token: ActionToken) {}

    fn set_texture(&mut self, node: NodeHandle, texture: &Texture);

    fn set_position(&mut self, node: NodeHandle, position: SheetCoordinate);

    fn set_alpha(&mut self, node: NodeHandle, alpha: f32);

    fn set_hidden(&mut self, node: NodeHandle, hidden: bool);

    fn set_z_position(&mut self, node: NodeHandle, z: f32);

    /// Current on-screen position, possibly mid-animation.
    fn node_position(&self, node: NodeHandle) -> Option<SheetCoordinate>;
}

/// Lets a frame loop keep its own handle to the scene it lends the session.
impl<S: RenderScene + ?Sized> RenderScene for Rc<RefCell<S>> {
    fn add_child(&mut self, parent: Option<NodeHandle>, node: NodeSpec) -> NodeHandle {
        self.borrow_mut().add_child(parent, node)
    }

    fn remove_child(&mut self, node: NodeHandle) {
        self.borrow_mut().remove_child(node);
    }

    fn run_action(&mut self, node: NodeHandle, action: SpriteAction) -> ActionToken {
        self.borrow_mut().run_action(node, action)
    }

    fn remove_all_actions(&mut self, node: NodeHandle) {
        self.borrow_mut().remove_all_actions(node);
    }

    fn finish_action(&mut self, token: ActionToken) {
        self.borrow_mut().finish_action(token);
    }

    fn set_texture(&mut self, node: NodeHandle, texture: &Texture) {
        self.borrow_mut().set_texture(node, texture);
    }

    fn set_position(&mut self, node: NodeHandle, position: SheetCoordinate) {
        self.borrow_mut().set_position(node, position);
    }

    fn set_alpha(&mut self, node: NodeHandle, alpha: f32) {
        self.borrow_mut().set_alpha(node, alpha);
    }

    fn set_hidden(&mut self, node: NodeHandle, hidden: bool) {
        self.borrow_mut().set_hidden(node, hidden);
    }

    fn set_z_position(&mut self, node: NodeHandle, z: f32) {
        self.borrow_mut().set_z_position(node, z);
    }

    fn node_position(&self, node: NodeHandle) -> Option<SheetCoordinate> {
        self.borrow().node_position(node)
    }
}
