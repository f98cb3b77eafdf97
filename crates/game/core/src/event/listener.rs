use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::coord::TileCoordinate;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::ObjectId;
use crate::map::MotionError;

use super::EventArgs;

/// Identity issued by an [`super::EventDispatcher`] on registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Shared handle to a listener. The same handle is held by the map object
/// that carries the event and by the dispatcher it is registered with.
pub type ListenerHandle<C> = Rc<EventListener<C>>;

type Callback<C> = dyn Fn(&mut Invocation<'_, C>) -> Result<(), EventError>;

/// Failure raised by a listener callback. [`super::EventDispatcher::trigger`]
/// returns it to the caller unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EventError {
    #[error("event `{event}` requires a sender")]
    MissingSender { event: String },

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("object {0} cannot move")]
    NotMovable(ObjectId),

    #[error("destination {destination} is blocked")]
    Blocked { destination: TileCoordinate },

    #[error("input is suspended while an action is running")]
    InputSuspended,

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("event `{event}` rejected: {reason}")]
    Rejected { event: String, reason: String },
}

impl EventError {
    pub fn rejected(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            event: event.into(),
            reason: reason.into(),
        }
    }
}

impl GameError for EventError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Blocked { .. } | Self::InputSuspended => ErrorSeverity::Recoverable,
            Self::MissingSender { .. } | Self::Rejected { .. } => ErrorSeverity::Validation,
            Self::ObjectNotFound(_) | Self::NotMovable(_) => ErrorSeverity::Internal,
            Self::Motion(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSender { .. } => "EVENT_MISSING_SENDER",
            Self::ObjectNotFound(_) => "EVENT_OBJECT_NOT_FOUND",
            Self::NotMovable(_) => "EVENT_NOT_MOVABLE",
            Self::Blocked { .. } => "EVENT_BLOCKED",
            Self::InputSuspended => "EVENT_INPUT_SUSPENDED",
            Self::Motion(error) => error.error_code(),
            Self::Rejected { .. } => "EVENT_REJECTED",
        }
    }
}

/// A single bound callback with a dispatcher-issued identity.
///
/// `id()` is `Some` exactly while the listener is registered with a
/// dispatcher, which also limits it to one dispatcher at a time.
pub struct EventListener<C> {
    label: String,
    id: Cell<Option<ListenerId>>,
    callback: Box<Callback<C>>,
}

impl<C> EventListener<C> {
    pub fn new<F>(label: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut Invocation<'_, C>) -> Result<(), EventError> + 'static,
    {
        Self {
            label: label.into(),
            id: Cell::new(None),
            callback: Box::new(callback),
        }
    }

    /// Builds a listener already wrapped in a shareable handle.
    pub fn handle<F>(label: impl Into<String>, callback: F) -> ListenerHandle<C>
    where
        F: Fn(&mut Invocation<'_, C>) -> Result<(), EventError> + 'static,
    {
        Rc::new(Self::new(label, callback))
    }

    /// Event type or other human-readable tag, used in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id.get()
    }

    pub fn is_registered(&self) -> bool {
        self.id.get().is_some()
    }

    pub(super) fn set_id(&self, id: Option<ListenerId>) {
        self.id.set(id);
    }

    pub fn invoke(&self, invocation: &mut Invocation<'_, C>) -> Result<(), EventError> {
        (self.callback)(invocation)
    }
}

impl<C> fmt::Debug for EventListener<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("label", &self.label)
            .field("id", &self.id.get())
            .finish_non_exhaustive()
    }
}

/// Per-call context handed to a listener callback.
///
/// Replaces a stored listener → dispatcher back-pointer: a listener that wants
/// follow-up listeners to run asks for it through [`Invocation::chain`], and
/// the dispatcher hands the chained listeners back to its caller.
pub struct Invocation<'a, C> {
    context: &'a mut C,
    sender: Option<ObjectId>,
    args: &'a EventArgs,
    listener: ListenerId,
    chained: Vec<ListenerHandle<C>>,
}

impl<'a, C> Invocation<'a, C> {
    pub fn new(
        context: &'a mut C,
        sender: Option<ObjectId>,
        args: &'a EventArgs,
        listener: ListenerId,
    ) -> Self {
        Self {
            context,
            sender,
            args,
            listener,
            chained: Vec::new(),
        }
    }

    pub fn context(&mut self) -> &mut C {
        self.context
    }

    /// Object (usually the player) that caused the trigger.
    pub fn sender(&self) -> Option<ObjectId> {
        self.sender
    }

    pub fn args(&self) -> &EventArgs {
        self.args
    }

    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }

    /// Requests `listener` to run after the current trigger completes.
    pub fn chain(&mut self, listener: ListenerHandle<C>) {
        self.chained.push(listener);
    }

    pub(super) fn into_chained(self) -> Vec<ListenerHandle<C>> {
        self.chained
    }
}
