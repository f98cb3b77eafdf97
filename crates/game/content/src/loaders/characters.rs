//! Character walking-frame loader.

use std::collections::HashMap;
use std::path::Path;

use lantern_core::ImageSet;

use crate::loaders::{LoadResult, read_file};

/// Loader for character image sets from RON files.
///
/// ```ron
/// {
///     "hero": (
///         up: [["hero_up_1", "hero_up_2"], ["hero_up_3", "hero_up_2"]],
///         down: [["hero_down_1", "hero_down_2"], ["hero_down_3", "hero_down_2"]],
///         left: [["hero_left_1", "hero_left_2"], ["hero_left_3", "hero_left_2"]],
///         right: [["hero_right_1", "hero_right_2"], ["hero_right_3", "hero_right_2"]],
///     ),
/// }
/// ```
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<HashMap<String, ImageSet>> {
        let content = read_file(path)?;
        let characters: HashMap<String, ImageSet> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse characters RON: {}", e))?;

        Ok(characters)
    }
}
