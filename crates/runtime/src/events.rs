//! Built-in event types understood by map data.
//!
//! | event  | arguments                | effect                                          |
//! |--------|--------------------------|-------------------------------------------------|
//! | `talk` | text, commas preserved   | sender faces the declaring object, dialog shows |
//! | `step` | one or more directions   | sender walks one tile per direction             |
//! | `hide` | none                     | dialog hides                                    |
//!
//! Multi-step walks move one tile per trigger and chain the remainder, so the
//! next step waits until the previous motion has completed.

use lantern_core::event::{Arity, check_arity};
use lantern_core::{
    DialogPosition, Direction, EventError, EventListener, GeneratorError, Invocation,
    ListenerHandle, ListenerRegistry, TalkSide,
};

use crate::world::FieldWorld;

pub const TALK: &str = "talk";
pub const STEP: &str = "step";
pub const HIDE: &str = "hide";

/// Registry holding every built-in event type.
pub fn builtin_registry() -> ListenerRegistry<FieldWorld> {
    let mut registry = ListenerRegistry::new();
    registry
        .register(TALK, talk)
        .register(STEP, step)
        .register(HIDE, hide);
    registry
}

fn talk(
    direction_to_parent: Option<Direction>,
    params: &[String],
) -> Result<ListenerHandle<FieldWorld>, GeneratorError> {
    check_arity(TALK, params, Arity::AtLeast(1))?;
    let text = params.join(",");
    if text.trim().is_empty() {
        return Err(GeneratorError::MissingArgument {
            event: TALK.to_owned(),
            index: 0,
        });
    }

    Ok(EventListener::handle(TALK, move |invocation: &mut Invocation<'_, FieldWorld>| {
        let sender = invocation.sender();
        let world = invocation.context();
        if let (Some(sender), Some(direction)) = (sender, direction_to_parent) {
            world.face(sender, direction)?;
        }
        world
            .show_dialog(&text, TalkSide::Middle, DialogPosition::Bottom)
            .map_err(|error| EventError::rejected(TALK, error.to_string()))
    }))
}

fn step(
    _direction_to_parent: Option<Direction>,
    params: &[String],
) -> Result<ListenerHandle<FieldWorld>, GeneratorError> {
    check_arity(STEP, params, Arity::AtLeast(1))?;
    let directions = params
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .trim()
                .parse::<Direction>()
                .map_err(|_| GeneratorError::MalformedArgument {
                    event: STEP.to_owned(),
                    index,
                    value: value.clone(),
                    reason: "expected up, down, left or right".to_owned(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(walk_listener(directions))
}

fn walk_listener(directions: Vec<Direction>) -> ListenerHandle<FieldWorld> {
    EventListener::handle(STEP, move |invocation: &mut Invocation<'_, FieldWorld>| {
        let sender = invocation.sender().ok_or_else(|| EventError::MissingSender {
            event: STEP.to_owned(),
        })?;
        let Some((first, rest)) = directions.split_first() else {
            return Ok(());
        };
        invocation.context().move_object(sender, *first, None)?;
        if !rest.is_empty() {
            invocation.chain(walk_listener(rest.to_vec()));
        }
        Ok(())
    })
}

fn hide(
    _direction_to_parent: Option<Direction>,
    params: &[String],
) -> Result<ListenerHandle<FieldWorld>, GeneratorError> {
    check_arity(HIDE, params, Arity::Exactly(0))?;
    Ok(EventListener::handle(HIDE, |invocation: &mut Invocation<'_, FieldWorld>| {
        invocation
            .context()
            .hide_dialog()
            .map_err(|error| EventError::rejected(HIDE, error.to_string()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::ListenerGenerator;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn registry_knows_builtin_types() {
        let registry = builtin_registry();
        assert!(registry.contains(TALK));
        assert!(registry.contains(STEP));
        assert!(registry.contains(HIDE));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn talk_requires_text() {
        let registry = builtin_registry();
        assert!(matches!(
            registry.generate(TALK, None, &[]),
            Err(GeneratorError::WrongArgumentCount { .. })
        ));
        assert!(matches!(
            registry.generate(TALK, None, &args(&["  "])),
            Err(GeneratorError::MissingArgument { index: 0, .. })
        ));
        let listener = registry
            .generate(TALK, Some(Direction::Up), &args(&["hello", " world"]))
            .unwrap();
        assert_eq!(listener.label(), TALK);
    }

    #[test]
    fn step_rejects_unknown_directions() {
        let registry = builtin_registry();
        let error = registry
            .generate(STEP, None, &args(&["up", "sideways"]))
            .unwrap_err();
        assert!(matches!(
            error,
            GeneratorError::MalformedArgument { index: 1, ref value, .. } if value == "sideways"
        ));
        assert!(registry.generate(STEP, None, &args(&["Left"])).is_ok());
    }

    #[test]
    fn hide_takes_no_arguments() {
        let registry = builtin_registry();
        assert!(registry.generate(HIDE, None, &[]).is_ok());
        assert!(matches!(
            registry.generate(HIDE, None, &args(&["now"])),
            Err(GeneratorError::WrongArgumentCount { .. })
        ));
    }
}
