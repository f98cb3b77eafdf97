//! Dialog box geometry and glyph layout.
//!
//! Everything here is pure: the presenter turns a [`TextLayout`] into render
//! nodes and timed actions.

use crate::coord::SheetCoordinate;

pub const FONT_SIZE: f32 = 14.0;
pub const FONT_WIDTH_MARGIN: f32 = 1.0;
pub const FONT_HEIGHT_MARGIN: f32 = 5.0;
pub const PADDING_WIDTH: f32 = 20.0;
pub const PADDING_HEIGHT: f32 = 14.0;
/// Distance between the box and the frame edge for top/bottom placement.
pub const MARGIN: f32 = 30.0;
pub const INITIAL_BOX_HEIGHT: f32 = 180.0;
pub const CORNER_RADIUS: f32 = 10.0;
pub const BUTTON_SIZE: f32 = 10.0;
pub const CHAR_ICON_SIZE: f32 = 150.0;
pub const ICON_MARGIN: f32 = 10.0;
/// Seconds between two glyph reveals.
pub const REVEAL_STEP: f32 = 0.1;
/// On and off time of the continue indicator.
pub const BLINK_INTERVAL: f32 = 0.5;
/// Forces a line break; never drawn.
pub const LINE_BREAK: char = '嬲';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DialogPosition {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Side the speaker's icon is shown on, which also decides how wide the
/// text region is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TalkSide {
    Left,
    Right,
    #[default]
    Middle,
}

/// Box geometry derived once from the frame size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialogGeometry {
    pub frame_width: f32,
    pub frame_height: f32,
    pub box_width: f32,
    /// Rounded to a whole number of text rows plus the continue button.
    pub box_height: f32,
    pub char_width: f32,
    pub char_height: f32,
    /// Glyphs per row in the full-width text region.
    pub columns: usize,
    /// Rows per page.
    pub rows: usize,
}

/// Placement of the text region for one [`TalkSide`], relative to the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideLayout {
    pub columns: usize,
    /// Centre of the first glyph of the first row.
    pub text_anchor: SheetCoordinate,
    pub button: SheetCoordinate,
    /// Bottom-left corner of the speaker icon, `None` when it is hidden.
    pub icon: Option<SheetCoordinate>,
}

impl DialogGeometry {
    pub fn new(frame_width: f32, frame_height: f32) -> Self {
        let char_width = FONT_SIZE + FONT_WIDTH_MARGIN;
        let char_height = FONT_SIZE + FONT_HEIGHT_MARGIN;

        let text_width = frame_width - PADDING_WIDTH * 2.0;
        let text_height = INITIAL_BOX_HEIGHT - PADDING_HEIGHT * 2.0;
        let columns = fit(text_width, char_width);
        let rows = fit(text_height, char_height);

        let text_height = rows as f32 * char_height - FONT_HEIGHT_MARGIN;
        Self {
            frame_width,
            frame_height,
            box_width: frame_width,
            box_height: text_height + PADDING_HEIGHT * 2.0 + BUTTON_SIZE,
            char_width,
            char_height,
            columns,
            rows,
        }
    }

    /// Bottom-left corner of the box inside the frame.
    pub fn box_position(&self, position: DialogPosition) -> SheetCoordinate {
        let x = self.frame_width / 2.0 - self.box_width / 2.0;
        let y = match position {
            DialogPosition::Top => self.frame_height - self.box_height - MARGIN,
            DialogPosition::Middle => self.frame_height / 2.0 - self.box_height / 2.0,
            DialogPosition::Bottom => MARGIN,
        };
        SheetCoordinate::new(x, y)
    }

    pub fn icon_size(&self) -> (f32, f32) {
        (
            CHAR_ICON_SIZE - ICON_MARGIN * 2.0,
            self.box_height - ICON_MARGIN * 2.0,
        )
    }

    pub fn side(&self, side: TalkSide) -> SideLayout {
        let top = self.box_height - FONT_SIZE - PADDING_HEIGHT;
        let icon_y = PADDING_HEIGHT + FONT_SIZE + ICON_MARGIN;
        let button_y = PADDING_HEIGHT;
        let right_button = self.box_width - PADDING_WIDTH * 1.5;

        match side {
            TalkSide::Right => {
                let columns = fit(
                    self.box_width - PADDING_WIDTH * 2.0 - CHAR_ICON_SIZE,
                    self.char_width,
                );
                let region = columns as f32 * self.char_width;
                SideLayout {
                    columns,
                    text_anchor: SheetCoordinate::new(
                        FONT_SIZE / 2.0 + self.box_width - PADDING_WIDTH - region,
                        top,
                    ),
                    button: SheetCoordinate::new(right_button, button_y),
                    icon: Some(SheetCoordinate::new(ICON_MARGIN, icon_y)),
                }
            }
            TalkSide::Left => {
                let columns = fit(self.box_width - PADDING_WIDTH - CHAR_ICON_SIZE, self.char_width);
                let region = columns as f32 * self.char_width;
                SideLayout {
                    columns,
                    text_anchor: SheetCoordinate::new(FONT_SIZE / 2.0 + PADDING_WIDTH, top),
                    button: SheetCoordinate::new(right_button - CHAR_ICON_SIZE, button_y),
                    icon: Some(SheetCoordinate::new(
                        region + PADDING_WIDTH + ICON_MARGIN,
                        icon_y,
                    )),
                }
            }
            TalkSide::Middle => SideLayout {
                columns: self.columns,
                text_anchor: SheetCoordinate::new(FONT_SIZE / 2.0 + PADDING_WIDTH, top),
                button: SheetCoordinate::new(right_button, button_y),
                icon: None,
            },
        }
    }
}

/// Number of whole-or-partial cells of `cell` that cover `span`, at least one.
fn fit(span: f32, cell: f32) -> usize {
    (span / cell).ceil().max(1.0) as usize
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// Relative to the box's bottom-left corner.
    pub position: SheetCoordinate,
    pub page: usize,
    /// Seconds after drawing starts at which the glyph fades in.
    pub reveal_at: f32,
    /// Seconds after drawing starts at which the glyph is hidden again
    /// because the text moved on to the next page.
    pub hide_at: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    pub side: SideLayout,
    pub glyphs: Vec<Glyph>,
    pub pages: usize,
    /// Seconds after which the continue indicator starts blinking.
    pub button_at: f32,
}

/// Lays `text` out left to right, top to bottom.
///
/// Every glyph and every page turn takes one [`REVEAL_STEP`]. When a glyph
/// would fall below the last row, all glyphs drawn so far are hidden at the
/// current reveal time and layout restarts at the top-left cell.
pub fn layout_text(text: &str, geometry: &DialogGeometry, side: TalkSide) -> TextLayout {
    let region = geometry.side(side);
    let columns = region.columns;

    let mut glyphs: Vec<Glyph> = Vec::new();
    let mut slot = 0usize;
    let mut step = 0usize;
    let mut page = 0usize;

    for ch in text.chars() {
        if ch == LINE_BREAK {
            slot = slot.div_ceil(columns) * columns;
            continue;
        }

        if slot / columns >= geometry.rows {
            let at = REVEAL_STEP * step as f32;
            for glyph in glyphs.iter_mut().filter(|glyph| glyph.hide_at.is_none()) {
                glyph.hide_at = Some(at);
            }
            step += 1;
            slot = 0;
            page += 1;
        }

        let line = slot / columns;
        let column = slot % columns;
        glyphs.push(Glyph {
            ch,
            position: SheetCoordinate::new(
                region.text_anchor.x + column as f32 * geometry.char_width,
                region.text_anchor.y - line as f32 * geometry.char_height,
            ),
            page,
            reveal_at: REVEAL_STEP * step as f32,
            hide_at: None,
        });

        slot += 1;
        step += 1;
    }

    TextLayout {
        side: region,
        glyphs,
        pages: page + 1,
        button_at: REVEAL_STEP * step as f32,
    }
}
