use crate::coord::SheetCoordinate;
use crate::error::{ErrorSeverity, GameError};
use crate::event::EventError;
use crate::ids::ObjectId;
use crate::render::ActionToken;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MotionError {
    #[error("object `{name}` is already moving")]
    AlreadyMoving { name: String },

    #[error("object `{name}` has no motion in flight")]
    NotMoving { name: String },

    #[error("completion for {actual} does not match in-flight {expected}")]
    TokenMismatch {
        expected: ActionToken,
        actual: ActionToken,
    },

    #[error("object `{name}` has no render node")]
    NoRenderNode { name: String },

    #[error("map object {id} is not a movable object")]
    NotAnObject { id: ObjectId },
}

impl GameError for MotionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyMoving { .. } => ErrorSeverity::Recoverable,
            Self::NoRenderNode { .. } | Self::NotAnObject { .. } => ErrorSeverity::Validation,
            Self::NotMoving { .. } | Self::TokenMismatch { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyMoving { .. } => "MOTION_ALREADY_MOVING",
            Self::NotMoving { .. } => "MOTION_NOT_MOVING",
            Self::TokenMismatch { .. } => "MOTION_TOKEN_MISMATCH",
            Self::NoRenderNode { .. } => "MOTION_NO_RENDER_NODE",
            Self::NotAnObject { .. } => "MOTION_NOT_AN_OBJECT",
        }
    }
}

/// Callback run once a motion has visually completed.
pub type MotionCallback<C> = Box<dyn FnOnce(&mut C) -> Result<(), EventError>>;

/// Motion in flight on one object.
pub(super) struct PendingMotion<C> {
    pub(super) token: ActionToken,
    pub(super) destination: SheetCoordinate,
    pub(super) callback: Option<MotionCallback<C>>,
}

pub(super) enum MotionState<C> {
    Idle,
    Moving(PendingMotion<C>),
}

/// Result of completing a motion, handed to the session.
///
/// The session restores input (already done by
/// [`super::Object::complete_action`]), then runs the callback against its
/// own context, and only then commits `destination` as the object's logical
/// position.
pub struct Completion<C> {
    pub destination: SheetCoordinate,
    pub callback: Option<MotionCallback<C>>,
}

impl<C> Completion<C> {
    /// Runs the callback, if any, and returns the destination to commit.
    pub fn run_callback(self, context: &mut C) -> (SheetCoordinate, Result<(), EventError>) {
        let result = match self.callback {
            Some(callback) => callback(context),
            None => Ok(()),
        };
        (self.destination, result)
    }
}
