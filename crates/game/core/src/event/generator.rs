//! Construction of listeners from event-type names found in map data.

use std::collections::HashMap;
use std::fmt;

use crate::direction::Direction;
use crate::error::{ErrorSeverity, GameError};

use super::ListenerHandle;

/// Expected number of arguments for an event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("unknown event type `{0}`")]
    UnknownEventType(String),

    #[error("event `{event}` expects {expected} arguments, got {actual}")]
    WrongArgumentCount {
        event: String,
        expected: Arity,
        actual: usize,
    },

    #[error("event `{event}` argument {index} (`{value}`) is malformed: {reason}")]
    MalformedArgument {
        event: String,
        index: usize,
        value: String,
        reason: String,
    },

    #[error("event `{event}` requires argument {index}")]
    MissingArgument { event: String, index: usize },
}

impl GameError for GeneratorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEventType(_) => "GENERATOR_UNKNOWN_EVENT_TYPE",
            Self::WrongArgumentCount { .. } => "GENERATOR_WRONG_ARGUMENT_COUNT",
            Self::MalformedArgument { .. } => "GENERATOR_MALFORMED_ARGUMENT",
            Self::MissingArgument { .. } => "GENERATOR_MISSING_ARGUMENT",
        }
    }
}

/// Checks `params` against `arity` for `event`.
pub fn check_arity(event: &str, params: &[String], arity: Arity) -> Result<(), GeneratorError> {
    if arity.accepts(params.len()) {
        Ok(())
    } else {
        Err(GeneratorError::WrongArgumentCount {
            event: event.to_owned(),
            expected: arity,
            actual: params.len(),
        })
    }
}

/// Returns the non-empty argument at `index`.
pub fn required_param<'a>(
    event: &str,
    params: &'a [String],
    index: usize,
) -> Result<&'a str, GeneratorError> {
    params
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| GeneratorError::MissingArgument {
            event: event.to_owned(),
            index,
        })
}

/// Capability that turns an event type into a bound listener.
///
/// `direction_to_parent` points from the cell carrying the listener back to
/// the object that declared the event. It is `None` for events attached
/// directly to the declaring tile.
pub trait ListenerGenerator<C> {
    fn generate(
        &self,
        event_type: &str,
        direction_to_parent: Option<Direction>,
        params: &[String],
    ) -> Result<ListenerHandle<C>, GeneratorError>;
}

pub type ListenerConstructor<C> =
    Box<dyn Fn(Option<Direction>, &[String]) -> Result<ListenerHandle<C>, GeneratorError>>;

/// Lookup table from event type name to listener constructor.
pub struct ListenerRegistry<C> {
    constructors: HashMap<String, ListenerConstructor<C>>,
}

impl<C> ListenerRegistry<C> {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` under `event_type`, replacing any previous one.
    pub fn register<F>(&mut self, event_type: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(Option<Direction>, &[String]) -> Result<ListenerHandle<C>, GeneratorError> + 'static,
    {
        self.constructors
            .insert(event_type.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.constructors.contains_key(event_type)
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<C> Default for ListenerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ListenerGenerator<C> for ListenerRegistry<C> {
    fn generate(
        &self,
        event_type: &str,
        direction_to_parent: Option<Direction>,
        params: &[String],
    ) -> Result<ListenerHandle<C>, GeneratorError> {
        let constructor = self
            .constructors
            .get(event_type)
            .ok_or_else(|| GeneratorError::UnknownEventType(event_type.to_owned()))?;
        constructor(direction_to_parent, params)
    }
}
