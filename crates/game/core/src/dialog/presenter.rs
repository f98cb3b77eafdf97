use crate::coord::SheetCoordinate;
use crate::render::{NodeHandle, NodeSpec, RenderScene, SpriteAction, Texture};

use super::layout::{
    BLINK_INTERVAL, BUTTON_SIZE, CORNER_RADIUS, DialogGeometry, DialogPosition, FONT_SIZE,
    TalkSide, TextLayout, layout_text,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("dialog box has not been added to a scene")]
    NotAttached,
}

#[derive(Clone, Copy, Debug)]
struct DialogNodes {
    text_box: NodeHandle,
    button: NodeHandle,
    icon: NodeHandle,
}

/// Paged text box driven through a [`RenderScene`].
#[derive(Debug)]
pub struct DialogPresenter {
    geometry: DialogGeometry,
    icon: Texture,
    nodes: Option<DialogNodes>,
    glyphs: Vec<NodeHandle>,
    side: TalkSide,
    visible: bool,
}

impl DialogPresenter {
    pub fn new(geometry: DialogGeometry, icon: Texture) -> Self {
        Self {
            geometry,
            icon,
            nodes: None,
            glyphs: Vec::new(),
            side: TalkSide::Middle,
            visible: false,
        }
    }

    pub fn geometry(&self) -> &DialogGeometry {
        &self.geometry
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Creates the box, the continue button and the speaker icon under
    /// `parent`. The dialog starts hidden.
    pub fn add_to(&mut self, scene: &mut dyn RenderScene, parent: Option<NodeHandle>) {
        if let Some(old) = self.nodes.take() {
            scene.remove_child(old.icon);
            scene.remove_child(old.text_box);
        }
        self.glyphs.clear();

        let text_box = scene.add_child(
            parent,
            NodeSpec::Box {
                width: self.geometry.box_width,
                height: self.geometry.box_height,
                corner_radius: CORNER_RADIUS,
                position: self.geometry.box_position(DialogPosition::Middle),
            },
        );
        let layout = self.geometry.side(self.side);
        let button = scene.add_child(
            Some(text_box),
            NodeSpec::Sprite {
                name: "dialog_button".into(),
                texture: None,
                position: layout.button,
                anchor: (0.5, 0.5),
                size: Some((BUTTON_SIZE, BUTTON_SIZE)),
            },
        );
        scene.set_alpha(button, 0.0);
        let icon = scene.add_child(
            parent,
            NodeSpec::Sprite {
                name: "dialog_icon".into(),
                texture: Some(self.icon.clone()),
                position: SheetCoordinate::ZERO,
                anchor: (0.0, 0.0),
                size: Some(self.geometry.icon_size()),
            },
        );
        scene.set_z_position(icon, 20.0);
        scene.set_hidden(icon, true);
        scene.set_hidden(text_box, true);

        self.nodes = Some(DialogNodes {
            text_box,
            button,
            icon,
        });
        self.visible = false;
    }

    fn nodes(&self) -> Result<DialogNodes, DialogError> {
        self.nodes.ok_or(DialogError::NotAttached)
    }

    pub fn show(
        &mut self,
        scene: &mut dyn RenderScene,
        position: DialogPosition,
    ) -> Result<(), DialogError> {
        let nodes = self.nodes()?;
        let origin = self.geometry.box_position(position);
        scene.set_position(nodes.text_box, origin);
        scene.set_hidden(nodes.text_box, false);
        if let Some(icon) = self.geometry.side(self.side).icon {
            scene.set_position(nodes.icon, SheetCoordinate::new(origin.x + icon.x, origin.y + icon.y));
            scene.set_hidden(nodes.icon, false);
        }
        self.visible = true;
        Ok(())
    }

    pub fn hide(&mut self, scene: &mut dyn RenderScene) -> Result<(), DialogError> {
        let nodes = self.nodes()?;
        scene.set_hidden(nodes.text_box, true);
        scene.set_hidden(nodes.icon, true);
        self.visible = false;
        Ok(())
    }

    /// Replaces the box's text with `text`, revealed glyph by glyph.
    pub fn draw_text(
        &mut self,
        scene: &mut dyn RenderScene,
        text: &str,
        side: TalkSide,
    ) -> Result<TextLayout, DialogError> {
        let nodes = self.nodes()?;
        scene.remove_all_actions(nodes.button);
        scene.set_alpha(nodes.button, 0.0);
        self.clear_text(scene);

        self.side = side;
        let layout = layout_text(text, &self.geometry, side);
        scene.set_position(nodes.button, layout.side.button);
        match layout.side.icon {
            Some(_) if self.visible => scene.set_hidden(nodes.icon, false),
            _ => scene.set_hidden(nodes.icon, true),
        }

        for glyph in &layout.glyphs {
            let node = scene.add_child(
                Some(nodes.text_box),
                NodeSpec::Label {
                    text: glyph.ch.to_string(),
                    font_size: FONT_SIZE,
                    position: glyph.position,
                    alpha: 0.0,
                },
            );
            let mut steps = vec![
                SpriteAction::Wait {
                    duration: glyph.reveal_at,
                },
                SpriteAction::FadeAlpha {
                    to: 1.0,
                    duration: 0.0,
                },
            ];
            if let Some(hide_at) = glyph.hide_at {
                steps.push(SpriteAction::Wait {
                    duration: (hide_at - glyph.reveal_at).max(0.0),
                });
                steps.push(SpriteAction::FadeAlpha {
                    to: 0.0,
                    duration: 0.0,
                });
            }
            scene.run_action(node, SpriteAction::Sequence(steps));
            self.glyphs.push(node);
        }

        scene.run_action(
            nodes.button,
            SpriteAction::Sequence(vec![
                SpriteAction::Wait {
                    duration: layout.button_at,
                },
                blink(),
            ]),
        );
        Ok(layout)
    }

    /// Removes every glyph node.
    pub fn clear_text(&mut self, scene: &mut dyn RenderScene) {
        for node in self.glyphs.drain(..) {
            scene.remove_child(node);
        }
    }
}

fn blink() -> SpriteAction {
    let delay = SpriteAction::Wait {
        duration: BLINK_INTERVAL,
    };
    SpriteAction::RepeatForever(Box::new(SpriteAction::Sequence(vec![
        SpriteAction::FadeAlpha {
            to: 1.0,
            duration: 0.0,
        },
        delay.clone(),
        SpriteAction::FadeAlpha {
            to: 0.0,
            duration: 0.0,
        },
        delay,
    ])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_helpers::MockScene;

    fn presenter(scene: &mut MockScene) -> DialogPresenter {
        let mut dialog = DialogPresenter::new(
            DialogGeometry::new(320.0, 480.0),
            Texture::named("player.png"),
        );
        dialog.add_to(scene, None);
        dialog
    }

    fn label_count(scene: &MockScene) -> usize {
        scene
            .nodes
            .values()
            .filter(|node| matches!(node.spec, NodeSpec::Label { .. }))
            .count()
    }

    #[test]
    fn draw_text_replaces_previous_glyphs() {
        let mut scene = MockScene::new();
        let mut dialog = presenter(&mut scene);

        dialog.draw_text(&mut scene, "hello", TalkSide::Middle).unwrap();
        assert_eq!(label_count(&scene), 5);

        dialog.draw_text(&mut scene, "bye", TalkSide::Left).unwrap();
        assert_eq!(label_count(&scene), 3);
        assert_eq!(dialog.glyph_count(), 3);

        dialog.clear_text(&mut scene);
        assert_eq!(label_count(&scene), 0);
    }

    #[test]
    fn button_blinks_after_last_reveal() {
        let mut scene = MockScene::new();
        let mut dialog = presenter(&mut scene);
        let button = dialog.nodes.unwrap().button;

        dialog.draw_text(&mut scene, "abc", TalkSide::Middle).unwrap();

        let actions = scene.actions_on(button);
        assert_eq!(actions.len(), 1);
        let SpriteAction::Sequence(steps) = actions[0] else {
            panic!("expected sequence");
        };
        assert!(matches!(steps[0], SpriteAction::Wait { duration } if (duration - 0.3).abs() < 1e-4));
        assert!(matches!(steps[1], SpriteAction::RepeatForever(_)));

        dialog.draw_text(&mut scene, "d", TalkSide::Middle).unwrap();
        assert_eq!(scene.actions_on(button).len(), 1);
        assert_eq!(scene.node(button).alpha, 0.0);
    }

    #[test]
    fn show_and_hide_toggle_box_and_icon() {
        let mut scene = MockScene::new();
        let mut dialog = presenter(&mut scene);
        let nodes = dialog.nodes.unwrap();

        dialog.draw_text(&mut scene, "hi", TalkSide::Right).unwrap();
        dialog.show(&mut scene, DialogPosition::Bottom).unwrap();

        assert!(dialog.is_visible());
        assert!(!scene.node(nodes.text_box).hidden);
        assert!(!scene.node(nodes.icon).hidden);
        assert_eq!(
            scene.node(nodes.text_box).position,
            dialog.geometry().box_position(DialogPosition::Bottom)
        );

        dialog.hide(&mut scene).unwrap();
        assert!(scene.node(nodes.text_box).hidden);
        assert!(scene.node(nodes.icon).hidden);

        dialog.draw_text(&mut scene, "hi", TalkSide::Middle).unwrap();
        dialog.show(&mut scene, DialogPosition::Top).unwrap();
        assert!(scene.node(nodes.icon).hidden);
    }

    #[test]
    fn unattached_dialog_reports_error() {
        let mut scene = MockScene::new();
        let mut dialog = DialogPresenter::new(
            DialogGeometry::new(320.0, 480.0),
            Texture::named("player.png"),
        );
        assert_eq!(
            dialog.draw_text(&mut scene, "x", TalkSide::Middle).unwrap_err(),
            DialogError::NotAttached
        );
        assert_eq!(
            dialog.show(&mut scene, DialogPosition::Middle),
            Err(DialogError::NotAttached)
        );
    }
}
