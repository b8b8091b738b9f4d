//! # Veldt Procedural Generation
//!
//! Deterministic generation of an infinite voxel world from a single seed.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same seed and coordinate always give the same voxel
//! 2. **Order independent**: no chunk depends on which chunks came before it
//! 3. **Chunked**: the world is produced as 16x256x16 columns
//! 4. **Immutable**: generators never change after construction and can be
//!    shared across threads
//!
//! ## Core Components
//!
//! - `NoiseField`: seeded 2D/3D gradient noise and octave sums
//! - `BiomeClassifier`: climate noise to biome descriptors
//! - `StructureGrid`: village placement on a grid independent of chunks
//! - `TerrainGenerator`: terrain, caves, villages, boulders and vegetation
//! - `FlatGenerator`: the superflat preset
//!
//! ## Example
//!
//! ```rust
//! use veldt_procedural::{ChunkCoord, ChunkSource, TerrainGenerator, WorldSeed};
//!
//! let generator = TerrainGenerator::new(WorldSeed::new(42));
//! let chunk = generator.generate_chunk(ChunkCoord::new(0, 0));
//!
//! // Bulk and single-block lookups agree.
//! assert_eq!(chunk.get_block(3, 0, 5), generator.block_at(3, 0, 5));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod block;
pub mod boulder;
pub mod chunk;
pub mod flat;
pub mod hash;
pub mod height;
pub mod noise;
pub mod structure;
pub mod terrain;
pub mod vegetation;

pub use biome::{Biome, BiomeClassifier, BiomeKind, BiomeRegistry};
pub use block::BlockState;
pub use chunk::{Chunk, ChunkCoord, VoxelRegion, CHUNK_HEIGHT, CHUNK_SIZE, SECTION_COUNT};
pub use flat::{flat_world_block, FlatGenerator};
pub use height::{HeightField, SEA_LEVEL};
pub use noise::{NoiseField, WorldSeed};
pub use structure::{cell_at, CellCoord, Site, StructureGrid};
pub use terrain::{ColumnPlan, TerrainGenerator};

/// Anything that can produce chunk columns and answer point queries.
///
/// Implementations are pure: the answer for a coordinate never depends on
/// earlier calls.
pub trait ChunkSource: Send + Sync {
    /// Generates the chunk column at `coord`.
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk;

    /// The voxel at a world position. Air outside `0..=255`.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState;

    /// Y of the topmost terrain voxel of a column.
    fn surface_height(&self, x: i32, z: i32) -> i32;
}
