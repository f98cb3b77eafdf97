//! Unified error type surfaced by the session API.
//!
//! Wraps failures from the field, the motion state machine, listeners and
//! the dialog presenter so drivers can bubble them up with consistent context.
use thiserror::Error;

use lantern_core::{
    ActionToken, DialogError, ErrorSeverity, EventError, FieldError, GameError, MotionError,
    ObjectId, TileCoordinate,
};

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error("input is suspended while an action is running")]
    InputSuspended,

    #[error("session has no player; spawn one first")]
    NoPlayer,

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("{0} does not belong to a motion started by this session")]
    UnknownActionToken(ActionToken),

    #[error("destination {destination} is blocked")]
    Blocked { destination: TileCoordinate },
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Field(error) => error.severity(),
            Self::Event(error) => error.severity(),
            Self::Motion(error) => error.severity(),
            Self::Dialog(_) | Self::NoPlayer => ErrorSeverity::Validation,
            Self::InputSuspended | Self::Blocked { .. } => ErrorSeverity::Recoverable,
            Self::ObjectNotFound(_) | Self::UnknownActionToken(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Field(error) => error.error_code(),
            Self::Event(error) => error.error_code(),
            Self::Motion(error) => error.error_code(),
            Self::Dialog(_) => "SESSION_DIALOG",
            Self::InputSuspended => "SESSION_INPUT_SUSPENDED",
            Self::NoPlayer => "SESSION_NO_PLAYER",
            Self::ObjectNotFound(_) => "SESSION_OBJECT_NOT_FOUND",
            Self::UnknownActionToken(_) => "SESSION_UNKNOWN_ACTION_TOKEN",
            Self::Blocked { .. } => "SESSION_BLOCKED",
        }
    }
}
