//! # Item Drops
//!
//! Maps a broken block to the item it leaves behind.
//!
//! Most blocks drop themselves. The table lists the exceptions: blocks that
//! drop something else (stone drops cobblestone) and blocks that drop
//! nothing (leaves, glass, bedrock). A metadata-specific rule beats a rule
//! for the whole block type.
//!
//! ## Overrides
//!
//! ```toml
//! [[drop]]
//! block = "gravel"
//! item_id = 318     # flint
//!
//! [[drop]]
//! block = "glass"
//! item_id = 20      # drop itself after all
//!
//! [[drop]]
//! block = 1
//! metadata = 5
//! # no item_id: andesite drops nothing
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use veldt_procedural::block::{block_type_by_name, block_type_name, ids};
use veldt_procedural::BlockState;

use crate::error::{read_file, WorldError, WorldResult};

/// Item id of a snowball.
const SNOWBALL_ITEM: u16 = 332;
/// Item id of harvested wheat.
const WHEAT_ITEM: u16 = 296;

/// An item stack produced by breaking a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDrop {
    /// Item id.
    pub item_id: u16,
    /// Item damage/metadata value.
    pub metadata: u8,
    /// Stack size.
    pub count: u8,
}

impl ItemDrop {
    /// A single item.
    #[must_use]
    pub const fn single(item_id: u16, metadata: u8) -> Self {
        Self {
            item_id,
            metadata,
            count: 1,
        }
    }
}

/// A block named either by id or by configuration name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockRef {
    /// Numeric block type id.
    Id(u16),
    /// Name such as `"mossy_cobblestone"`.
    Name(String),
}

impl BlockRef {
    fn resolve(&self) -> WorldResult<u16> {
        match self {
            Self::Id(id) => Ok(*id),
            Self::Name(name) => {
                block_type_by_name(name).ok_or_else(|| WorldError::UnknownBlock(name.clone()))
            }
        }
    }
}

/// One `[[drop]]` entry of an override file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropEntry {
    /// Block the rule applies to.
    pub block: BlockRef,
    /// Restricts the rule to one metadata value.
    #[serde(default)]
    pub metadata: Option<u8>,
    /// Dropped item; absent means the block drops nothing.
    #[serde(default)]
    pub item_id: Option<u16>,
    /// Metadata of the dropped item.
    #[serde(default)]
    pub item_metadata: u8,
    /// Stack size.
    #[serde(default = "default_count")]
    pub count: u8,
}

const fn default_count() -> u8 {
    1
}

#[derive(Debug, Default, Deserialize)]
struct DropFile {
    #[serde(default, rename = "drop")]
    drops: Vec<DropEntry>,
}

/// Rule key: block type plus optional metadata.
type RuleKey = (u16, Option<u8>);

/// Block to item lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropTable {
    rules: HashMap<RuleKey, Option<ItemDrop>>,
}

impl DropTable {
    /// The built-in rules for the blocks the generator places.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();

        table.set_rule(ids::STONE, None, Some(ItemDrop::single(ids::COBBLESTONE, 0)));
        table.set_rule(ids::STONE, Some(5), Some(ItemDrop::single(ids::STONE, 5)));
        table.set_rule(ids::GRASS, None, Some(ItemDrop::single(ids::DIRT, 0)));
        table.set_rule(ids::FARMLAND, None, Some(ItemDrop::single(ids::DIRT, 0)));
        table.set_rule(ids::SNOW_LAYER, None, Some(ItemDrop::single(SNOWBALL_ITEM, 0)));
        table.set_rule(ids::WHEAT, None, Some(ItemDrop::single(WHEAT_ITEM, 0)));

        for nothing in [
            ids::BEDROCK,
            ids::WATER,
            ids::LEAVES,
            ids::GLASS,
            ids::TALL_GRASS,
            ids::DEAD_BUSH,
            ids::ICE,
        ] {
            table.set_rule(nothing, None, None);
        }

        table
    }

    /// The standard table with overrides from a TOML document applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or names an unknown
    /// block.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let file: DropFile = toml::from_str(text)?;
        let mut table = Self::standard();
        for entry in &file.drops {
            table.apply(entry)?;
        }
        tracing::info!("loaded {} drop overrides", file.drops.len());
        Ok(table)
    }

    /// Like [`DropTable::from_toml_str`], reading from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> WorldResult<Self> {
        Self::from_toml_str(&read_file(path)?)
    }

    /// Adds or replaces one rule.
    pub fn set_rule(&mut self, block_type: u16, metadata: Option<u8>, drop: Option<ItemDrop>) {
        self.rules.insert((block_type, metadata), drop);
    }

    fn apply(&mut self, entry: &DropEntry) -> WorldResult<()> {
        let block_type = entry.block.resolve()?;
        if entry.count == 0 {
            let name = block_type_name(block_type).unwrap_or("unnamed");
            return Err(WorldError::InvalidConfig(format!(
                "drop for block {block_type} ({name}) has a zero count"
            )));
        }
        let drop = entry.item_id.map(|item_id| ItemDrop {
            item_id,
            metadata: entry.item_metadata,
            count: entry.count,
        });
        self.set_rule(block_type, entry.metadata, drop);
        Ok(())
    }

    /// What breaking `state` yields, or `None` if it yields nothing.
    #[must_use]
    pub fn drop_for(&self, state: BlockState) -> Option<ItemDrop> {
        if state.is_air() {
            return None;
        }
        let block_type = state.block_type();
        let metadata = state.metadata();

        self.rules
            .get(&(block_type, Some(metadata)))
            .or_else(|| self.rules.get(&(block_type, None)))
            .copied()
            .unwrap_or(Some(ItemDrop::single(block_type, metadata)))
    }
}
