//! Object-definition property loader.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use lantern_core::{PropertyTable, TileId, TileProperty};

use crate::loaders::{LoadResult, read_file};

/// Loader for the property table from TOML files.
///
/// Each table is keyed by object-definition id:
///
/// ```toml
/// [7]
/// tileSetID = 1
/// tileSetName = "sign"
/// collision = "1"
/// event = "talk,1000,Welcome to town"
/// ```
///
/// Integers and booleans are stored in their string form (`true` → `"1"`).
pub struct PropertyLoader;

impl PropertyLoader {
    pub fn load(path: &Path) -> LoadResult<PropertyTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PropertyTable> {
        let raw: HashMap<String, HashMap<String, toml::Value>> = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse properties TOML: {}", e))?;

        let mut table = PropertyTable::new();
        for (id, attributes) in raw {
            let tile_id = id
                .trim()
                .parse::<u32>()
                .map(TileId)
                .with_context(|| format!("Property key `{id}` is not an object id"))?;

            let mut property = TileProperty::new();
            for (key, value) in attributes {
                let value = attribute_string(&value)
                    .with_context(|| format!("Attribute `{key}` of object id {tile_id}"))?;
                property.insert(key, value);
            }
            table.insert(tile_id, property);
        }

        Ok(table)
    }
}

fn attribute_string(value: &toml::Value) -> LoadResult<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "1" } else { "0" }.to_owned()),
        other => anyhow::bail!("unsupported value type `{}`", other.type_str()),
    }
}
