//! Publish/subscribe interaction events.
//!
//! Each event-triggering site owns its own [`EventDispatcher`] rather than
//! sharing a global bus. Listeners are shared [`ListenerHandle`]s whose id
//! records which dispatcher (if any) currently holds them.
//!
//! Callbacks receive an [`Invocation`] carrying the caller's context `C`, the
//! sender and the [`EventArgs`] payload.

mod args;
mod dispatcher;
mod generator;
mod listener;

pub use args::EventArgs;
pub use dispatcher::EventDispatcher;
pub use generator::{
    Arity, GeneratorError, ListenerConstructor, ListenerGenerator, ListenerRegistry, check_arity,
    required_param,
};
pub use listener::{EventError, EventListener, Invocation, ListenerHandle, ListenerId};
