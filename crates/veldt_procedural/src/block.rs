//! # Block States
//!
//! A block state is the 16-bit wire value `(block_type << 4) | metadata`.
//! Zero is air. The constants below are the subset of the classic block
//! palette the generator places.

use bytemuck::{Pod, Zeroable};

/// Block type ids used by the generator.
pub mod ids {
    /// Air.
    pub const AIR: u16 = 0;
    /// Stone (metadata 5 is andesite).
    pub const STONE: u16 = 1;
    /// Grass block.
    pub const GRASS: u16 = 2;
    /// Dirt.
    pub const DIRT: u16 = 3;
    /// Cobblestone.
    pub const COBBLESTONE: u16 = 4;
    /// Wooden planks.
    pub const PLANKS: u16 = 5;
    /// Bedrock.
    pub const BEDROCK: u16 = 7;
    /// Still water.
    pub const WATER: u16 = 9;
    /// Sand.
    pub const SAND: u16 = 12;
    /// Gravel.
    pub const GRAVEL: u16 = 13;
    /// Log (metadata selects the species).
    pub const LOG: u16 = 17;
    /// Leaves (metadata selects the species).
    pub const LEAVES: u16 = 18;
    /// Glass.
    pub const GLASS: u16 = 20;
    /// Sandstone.
    pub const SANDSTONE: u16 = 24;
    /// Tall grass.
    pub const TALL_GRASS: u16 = 31;
    /// Dead bush.
    pub const DEAD_BUSH: u16 = 32;
    /// Dandelion.
    pub const DANDELION: u16 = 37;
    /// Poppy.
    pub const POPPY: u16 = 38;
    /// Mossy cobblestone.
    pub const MOSSY_COBBLESTONE: u16 = 48;
    /// Torch.
    pub const TORCH: u16 = 50;
    /// Wheat crop.
    pub const WHEAT: u16 = 59;
    /// Farmland.
    pub const FARMLAND: u16 = 60;
    /// Snow layer.
    pub const SNOW_LAYER: u16 = 78;
    /// Ice.
    pub const ICE: u16 = 79;
    /// Cactus.
    pub const CACTUS: u16 = 81;
    /// Fence.
    pub const FENCE: u16 = 85;
}

/// Names accepted in configuration files, keyed by block type id.
const BLOCK_NAMES: &[(u16, &str)] = &[
    (ids::AIR, "air"),
    (ids::STONE, "stone"),
    (ids::GRASS, "grass"),
    (ids::DIRT, "dirt"),
    (ids::COBBLESTONE, "cobblestone"),
    (ids::PLANKS, "planks"),
    (ids::BEDROCK, "bedrock"),
    (ids::WATER, "water"),
    (ids::SAND, "sand"),
    (ids::GRAVEL, "gravel"),
    (ids::LOG, "log"),
    (ids::LEAVES, "leaves"),
    (ids::GLASS, "glass"),
    (ids::SANDSTONE, "sandstone"),
    (ids::TALL_GRASS, "tall_grass"),
    (ids::DEAD_BUSH, "dead_bush"),
    (ids::DANDELION, "dandelion"),
    (ids::POPPY, "poppy"),
    (ids::MOSSY_COBBLESTONE, "mossy_cobblestone"),
    (ids::TORCH, "torch"),
    (ids::WHEAT, "wheat"),
    (ids::FARMLAND, "farmland"),
    (ids::SNOW_LAYER, "snow_layer"),
    (ids::ICE, "ice"),
    (ids::CACTUS, "cactus"),
    (ids::FENCE, "fence"),
];

/// Looks up a block type id by its configuration name.
#[must_use]
pub fn block_type_by_name(name: &str) -> Option<u16> {
    BLOCK_NAMES
        .iter()
        .find(|(_, candidate)| candidate.eq_ignore_ascii_case(name))
        .map(|(id, _)| *id)
}

/// Returns the configuration name of a block type, if it is one we know.
#[must_use]
pub fn block_type_name(block_type: u16) -> Option<&'static str> {
    BLOCK_NAMES
        .iter()
        .find(|(id, _)| *id == block_type)
        .map(|(_, name)| *name)
}

/// A single voxel value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct BlockState(u16);

impl BlockState {
    /// Air.
    pub const AIR: Self = Self::new(ids::AIR, 0);
    /// Stone.
    pub const STONE: Self = Self::new(ids::STONE, 0);
    /// Andesite (stone variant).
    pub const ANDESITE: Self = Self::new(ids::STONE, 5);
    /// Grass block.
    pub const GRASS: Self = Self::new(ids::GRASS, 0);
    /// Dirt.
    pub const DIRT: Self = Self::new(ids::DIRT, 0);
    /// Cobblestone.
    pub const COBBLESTONE: Self = Self::new(ids::COBBLESTONE, 0);
    /// Oak planks.
    pub const OAK_PLANKS: Self = Self::new(ids::PLANKS, 0);
    /// Bedrock.
    pub const BEDROCK: Self = Self::new(ids::BEDROCK, 0);
    /// Still water.
    pub const WATER: Self = Self::new(ids::WATER, 0);
    /// Sand.
    pub const SAND: Self = Self::new(ids::SAND, 0);
    /// Gravel.
    pub const GRAVEL: Self = Self::new(ids::GRAVEL, 0);
    /// Oak log.
    pub const OAK_LOG: Self = Self::new(ids::LOG, 0);
    /// Spruce log.
    pub const SPRUCE_LOG: Self = Self::new(ids::LOG, 1);
    /// Birch log.
    pub const BIRCH_LOG: Self = Self::new(ids::LOG, 2);
    /// Jungle log.
    pub const JUNGLE_LOG: Self = Self::new(ids::LOG, 3);
    /// Oak leaves.
    pub const OAK_LEAVES: Self = Self::new(ids::LEAVES, 0);
    /// Spruce leaves.
    pub const SPRUCE_LEAVES: Self = Self::new(ids::LEAVES, 1);
    /// Birch leaves.
    pub const BIRCH_LEAVES: Self = Self::new(ids::LEAVES, 2);
    /// Jungle leaves.
    pub const JUNGLE_LEAVES: Self = Self::new(ids::LEAVES, 3);
    /// Glass.
    pub const GLASS: Self = Self::new(ids::GLASS, 0);
    /// Sandstone.
    pub const SANDSTONE: Self = Self::new(ids::SANDSTONE, 0);
    /// Tall grass (the grass variant).
    pub const TALL_GRASS: Self = Self::new(ids::TALL_GRASS, 1);
    /// Dead bush.
    pub const DEAD_BUSH: Self = Self::new(ids::DEAD_BUSH, 0);
    /// Dandelion.
    pub const DANDELION: Self = Self::new(ids::DANDELION, 0);
    /// Poppy.
    pub const POPPY: Self = Self::new(ids::POPPY, 0);
    /// Mossy cobblestone.
    pub const MOSSY_COBBLESTONE: Self = Self::new(ids::MOSSY_COBBLESTONE, 0);
    /// Torch standing on the floor.
    pub const TORCH: Self = Self::new(ids::TORCH, 5);
    /// Fully grown wheat.
    pub const WHEAT: Self = Self::new(ids::WHEAT, 7);
    /// Hydrated farmland.
    pub const FARMLAND: Self = Self::new(ids::FARMLAND, 7);
    /// One snow layer.
    pub const SNOW_LAYER: Self = Self::new(ids::SNOW_LAYER, 0);
    /// Ice.
    pub const ICE: Self = Self::new(ids::ICE, 0);
    /// Cactus.
    pub const CACTUS: Self = Self::new(ids::CACTUS, 0);
    /// Oak fence.
    pub const FENCE: Self = Self::new(ids::FENCE, 0);

    /// Packs a block type and metadata nibble.
    ///
    /// Metadata above 15 is truncated to its low nibble.
    #[inline]
    #[must_use]
    pub const fn new(block_type: u16, metadata: u8) -> Self {
        Self((block_type << 4) | (metadata as u16 & 0xF))
    }

    /// Wraps a raw wire value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw wire value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the block type id.
    #[inline]
    #[must_use]
    pub const fn block_type(self) -> u16 {
        self.0 >> 4
    }

    /// Returns the metadata nibble.
    #[inline]
    #[must_use]
    pub const fn metadata(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// Returns true for air.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true for natural stone of any variant.
    #[inline]
    #[must_use]
    pub const fn is_stone(self) -> bool {
        self.block_type() == ids::STONE
    }

    /// Returns true for plant matter that growing vegetation may replace.
    #[must_use]
    pub const fn is_foliage(self) -> bool {
        matches!(
            self.block_type(),
            ids::LEAVES
                | ids::TALL_GRASS
                | ids::DEAD_BUSH
                | ids::DANDELION
                | ids::POPPY
                | ids::SNOW_LAYER
        )
    }

    /// Returns true if a tree may grow through this voxel.
    #[inline]
    #[must_use]
    pub const fn is_replaceable_by_vegetation(self) -> bool {
        self.is_air() || self.is_foliage()
    }
}

impl From<u16> for BlockState {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<BlockState> for u16 {
    fn from(state: BlockState) -> Self {
        state.0
    }
}
