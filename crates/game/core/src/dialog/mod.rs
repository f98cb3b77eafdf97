//! Paged dialog box.

mod layout;
mod presenter;

pub use layout::{
    DialogGeometry, DialogPosition, Glyph, LINE_BREAK, REVEAL_STEP, SideLayout, TalkSide,
    TextLayout, layout_text,
};
pub use presenter::{DialogError, DialogPresenter};
