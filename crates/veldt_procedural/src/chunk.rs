//! # Chunk System
//!
//! The world is organized into 16x256x16 chunk columns, each split into 16
//! stacked sections of 16x16x16.
//!
//! ## Regions
//!
//! Generation writes into a `VoxelRegion`: a rectangle of full-height
//! columns anywhere in the world. A chunk is a 16x16 region aligned to the
//! chunk grid, and a single-block lookup uses a 1x1 region. Both go through
//! the same pipeline, which is what keeps bulk and point lookups identical.
//!
//! ## Layout
//!
//! Voxels are stored y-major, then z, then x. For a chunk this is exactly
//! the wire order `y * 256 + z * 16 + x` within the column.

use crate::block::BlockState;

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: usize = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: usize = 256;

/// Height of one section.
pub const SECTION_HEIGHT: usize = 16;

/// Sections per chunk column.
pub const SECTION_COUNT: usize = CHUNK_HEIGHT / SECTION_HEIGHT;

/// Voxels in one section.
pub const SECTION_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * SECTION_HEIGHT;

/// Columns in one chunk.
pub const COLUMN_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Highest valid block Y.
pub const MAX_Y: i32 = CHUNK_HEIGHT as i32 - 1;

/// Lowest chunk coordinate whose columns are addressable with `i32`.
pub const MIN_CHUNK_COORD: i32 = i32::MIN / CHUNK_SIZE as i32;

/// Highest chunk coordinate whose columns are addressable with `i32`.
pub const MAX_CHUNK_COORD: i32 = i32::MAX / CHUNK_SIZE as i32;

/// Returns true if `coord` is at least `margin` blocks away from both ends
/// of the `i32` range, so offsets up to `margin` cannot overflow.
#[inline]
#[must_use]
pub const fn within_margin(coord: i32, margin: i32) -> bool {
    coord >= i32::MIN + margin && coord <= i32::MAX - margin
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    ///
    /// Uses floor division so negative coordinates land in the right chunk.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE as i32),
            z: block_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * CHUNK_SIZE as i32
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z * CHUNK_SIZE as i32
    }
}

/// Splits a world block coordinate into (chunk, local) parts.
#[inline]
#[must_use]
pub const fn split_block_coord(world: i32) -> (i32, usize) {
    (
        world.div_euclid(CHUNK_SIZE as i32),
        world.rem_euclid(CHUNK_SIZE as i32) as usize,
    )
}

/// A rectangle of full-height voxel columns.
///
/// Writes outside the rectangle or outside `0..=255` are dropped, so
/// decorations can be stamped without clipping logic of their own.
#[derive(Clone, Debug)]
pub struct VoxelRegion {
    origin_x: i32,
    origin_z: i32,
    width: usize,
    depth: usize,
    blocks: Vec<BlockState>,
    /// Voxels written by structures; later layers must leave them alone.
    protected: Vec<bool>,
    /// Biome id per column, indexed `z * width + x`.
    biomes: Vec<u8>,
}

impl VoxelRegion {
    /// Creates an all-air region.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(origin_x: i32, origin_z: i32, width: usize, depth: usize) -> Self {
        assert!(width > 0 && depth > 0, "voxel region must not be empty");
        let volume = width * depth * CHUNK_HEIGHT;
        Self {
            origin_x,
            origin_z,
            width,
            depth,
            blocks: vec![BlockState::AIR; volume],
            protected: vec![false; volume],
            biomes: vec![0; width * depth],
        }
    }

    /// Creates the region covering one chunk.
    #[must_use]
    pub fn for_chunk(coord: ChunkCoord) -> Self {
        Self::new(coord.world_x(), coord.world_z(), CHUNK_SIZE, CHUNK_SIZE)
    }

    /// Creates the region covering a single column.
    #[must_use]
    pub fn for_column(x: i32, z: i32) -> Self {
        Self::new(x, z, 1, 1)
    }

    /// Lowest world X inside the region.
    #[inline]
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.origin_x
    }

    /// Lowest world Z inside the region.
    #[inline]
    #[must_use]
    pub const fn min_z(&self) -> i32 {
        self.origin_z
    }

    /// Highest world X inside the region (inclusive).
    #[inline]
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.origin_x.saturating_add(self.width as i32 - 1)
    }

    /// Highest world Z inside the region (inclusive).
    #[inline]
    #[must_use]
    pub const fn max_z(&self) -> i32 {
        self.origin_z.saturating_add(self.depth as i32 - 1)
    }

    /// Returns true if the column `(x, z)` lies in the region.
    #[inline]
    #[must_use]
    pub const fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= self.min_x() && x <= self.max_x() && z >= self.min_z() && z <= self.max_z()
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains_column(x, z) || !(0..=MAX_Y).contains(&y) {
            return None;
        }
        let local_x = (x - self.origin_x) as usize;
        let local_z = (z - self.origin_z) as usize;
        Some((y as usize * self.depth + local_z) * self.width + local_x)
    }

    /// Gets the voxel at world coordinates (air outside the region).
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.index(x, y, z)
            .map_or(BlockState::AIR, |index| self.blocks[index])
    }

    /// Sets the voxel at world coordinates. Returns false if out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, state: BlockState) -> bool {
        match self.index(x, y, z) {
            Some(index) => {
                self.blocks[index] = state;
                true
            }
            None => false,
        }
    }

    /// Sets a voxel and marks it as structure-owned.
    #[inline]
    pub fn set_protected(&mut self, x: i32, y: i32, z: i32, state: BlockState) -> bool {
        match self.index(x, y, z) {
            Some(index) => {
                self.blocks[index] = state;
                self.protected[index] = true;
                true
            }
            None => false,
        }
    }

    /// Returns true if a structure owns this voxel.
    #[inline]
    #[must_use]
    pub fn is_protected(&self, x: i32, y: i32, z: i32) -> bool {
        self.index(x, y, z)
            .is_some_and(|index| self.protected[index])
    }

    /// Records the biome of a column.
    pub fn set_biome(&mut self, x: i32, z: i32, biome_id: u8) {
        if self.contains_column(x, z) {
            let index = (z - self.origin_z) as usize * self.width + (x - self.origin_x) as usize;
            self.biomes[index] = biome_id;
        }
    }

    /// Gets the biome of a column (0 outside the region).
    #[must_use]
    pub fn biome(&self, x: i32, z: i32) -> u8 {
        if self.contains_column(x, z) {
            self.biomes[(z - self.origin_z) as usize * self.width + (x - self.origin_x) as usize]
        } else {
            0
        }
    }
}

/// A generated chunk column.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    region: VoxelRegion,
}

impl Chunk {
    /// Creates a new all-air chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            region: VoxelRegion::for_chunk(coord),
        }
    }

    /// Wraps a region that was generated for `coord`.
    ///
    /// # Panics
    ///
    /// Panics if the region is not exactly the chunk's footprint.
    #[must_use]
    pub fn from_region(coord: ChunkCoord, region: VoxelRegion) -> Self {
        assert!(
            region.min_x() == coord.world_x()
                && region.min_z() == coord.world_z()
                && region.width == CHUNK_SIZE
                && region.depth == CHUNK_SIZE,
            "region does not match chunk {coord:?}"
        );
        Self { coord, region }
    }

    /// Gets a block at local coordinates (air outside the chunk).
    #[inline]
    #[must_use]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> BlockState {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.region.blocks[(y * CHUNK_SIZE + z) * CHUNK_SIZE + x]
        } else {
            BlockState::AIR
        }
    }

    /// Sets a block at local coordinates. Out-of-range writes are ignored.
    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, state: BlockState) {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.region.blocks[(y * CHUNK_SIZE + z) * CHUNK_SIZE + x] = state;
        }
    }

    /// Gets the biome id of a local column.
    #[inline]
    #[must_use]
    pub fn biome(&self, x: usize, z: usize) -> u8 {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.region.biomes[z * CHUNK_SIZE + x]
        } else {
            0
        }
    }

    /// Sets the biome id of a local column.
    #[inline]
    pub fn set_biome(&mut self, x: usize, z: usize, biome_id: u8) {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.region.biomes[z * CHUNK_SIZE + x] = biome_id;
        }
    }

    /// All 256 column biome ids, indexed `z * 16 + x`.
    #[must_use]
    pub fn biomes(&self) -> &[u8] {
        &self.region.biomes
    }

    /// The 4096 voxels of one section in wire order.
    ///
    /// # Panics
    ///
    /// Panics if `section >= SECTION_COUNT`.
    #[must_use]
    pub fn section(&self, section: usize) -> &[BlockState] {
        assert!(section < SECTION_COUNT, "section {section} out of range");
        let start = section * SECTION_VOLUME;
        &self.region.blocks[start..start + SECTION_VOLUME]
    }

    /// Returns true if any voxel of the section is not air.
    #[must_use]
    pub fn is_section_populated(&self, section: usize) -> bool {
        self.section(section).iter().any(|state| !state.is_air())
    }
}
