use super::Texture;

/// Renderer-agnostic description of a timed node action.
#[derive(Clone, Debug, PartialEq)]
pub enum SpriteAction {
    Animate {
        frames: Vec<Texture>,
        time_per_frame: f32,
    },
    MoveBy {
        dx: f32,
        dy: f32,
        duration: f32,
    },
    FadeAlpha {
        to: f32,
        duration: f32,
    },
    Wait {
        duration: f32,
    },
    /// Children run concurrently.
    Group(Vec<SpriteAction>),
    /// Children run one after another.
    Sequence(Vec<SpriteAction>),
    RepeatForever(Box<SpriteAction>),
}

impl SpriteAction {
    pub fn sequence(actions: impl IntoIterator<Item = SpriteAction>) -> Self {
        Self::Sequence(actions.into_iter().collect())
    }

    /// Total running time, or `None` for actions that never finish.
    pub fn duration(&self) -> Option<f32> {
        match self {
            Self::Animate {
                frames,
                time_per_frame,
            } => Some(frames.len() as f32 * time_per_frame),
            Self::MoveBy { duration, .. }
            | Self::FadeAlpha { duration, .. }
            | Self::Wait { duration } => Some(*duration),
            Self::Group(children) => children
                .iter()
                .try_fold(0.0_f32, |longest, child| Some(longest.max(child.duration()?))),
            Self::Sequence(children) => children
                .iter()
                .try_fold(0.0_f32, |total, child| Some(total + child.duration()?)),
            Self::RepeatForever(_) => None,
        }
    }

    /// Net translation applied by the action once it has finished.
    pub fn translation(&self) -> (f32, f32) {
        match self {
            Self::MoveBy { dx, dy, .. } => (*dx, *dy),
            Self::Group(children) | Self::Sequence(children) => {
                children.iter().fold((0.0, 0.0), |(x, y), child| {
                    let (dx, dy) = child.translation();
                    (x + dx, y + dy)
                })
            }
            _ => (0.0, 0.0),
        }
    }

    /// Final alpha set by the action, if it changes alpha at all.
    pub fn final_alpha(&self) -> Option<f32> {
        match self {
            Self::FadeAlpha { to, .. } => Some(*to),
            Self::Group(children) | Self::Sequence(children) => {
                children.iter().filter_map(SpriteAction::final_alpha).last()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_duration_is_longest_child() {
        let action = SpriteAction::Group(vec![
            SpriteAction::Animate {
                frames: vec![Texture::named("a"), Texture::named("b")],
                time_per_frame: 0.1,
            },
            SpriteAction::MoveBy {
                dx: 32.0,
                dy: 0.0,
                duration: 0.3,
            },
        ]);
        assert_eq!(action.duration(), Some(0.3));
        assert_eq!(action.translation(), (32.0, 0.0));
    }

    #[test]
    fn forever_has_no_duration() {
        let blink = SpriteAction::RepeatForever(Box::new(SpriteAction::Wait { duration: 0.5 }));
        assert_eq!(SpriteAction::sequence([blink]).duration(), None);
    }

    #[test]
    fn final_alpha_takes_last_fade() {
        let action = SpriteAction::sequence([
            SpriteAction::Wait { duration: 0.2 },
            SpriteAction::FadeAlpha {
                to: 1.0,
                duration: 0.0,
            },
            SpriteAction::FadeAlpha {
                to: 0.0,
                duration: 0.0,
            },
        ]);
        assert_eq!(action.final_alpha(), Some(0.0));
    }
}
