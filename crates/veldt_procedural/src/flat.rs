//! Superflat preset.

use crate::block::BlockState;
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::ChunkSource;

/// Y of the grass cap.
pub const FLAT_SURFACE: i32 = 3;

/// Biome id written to every flat column (plains).
pub const FLAT_BIOME_ID: u8 = 1;

/// Block at height `y` in a flat world.
///
/// Bedrock at 0, dirt up to the grass cap, air above and below.
#[must_use]
pub const fn flat_world_block(y: i32) -> BlockState {
    match y {
        0 => BlockState::BEDROCK,
        1..=2 => BlockState::DIRT,
        FLAT_SURFACE => BlockState::GRASS,
        _ => BlockState::AIR,
    }
}

/// Generator for the flat preset. Ignores the seed and position.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatGenerator;

impl ChunkSource for FlatGenerator {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                chunk.set_biome(x, z, FLAT_BIOME_ID);
                for y in 0..=FLAT_SURFACE as usize {
                    chunk.set_block(x, y, z, flat_world_block(y as i32));
                }
            }
        }
        chunk
    }

    fn block_at(&self, _x: i32, y: i32, _z: i32) -> BlockState {
        flat_world_block(y)
    }

    fn surface_height(&self, _x: i32, _z: i32) -> i32 {
        FLAT_SURFACE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_HEIGHT;

    #[test]
    fn test_flat_layers() {
        assert_eq!(flat_world_block(-1), BlockState::AIR);
        assert_eq!(flat_world_block(0), BlockState::BEDROCK);
        assert_eq!(flat_world_block(1), BlockState::DIRT);
        assert_eq!(flat_world_block(2), BlockState::DIRT);
        assert_eq!(flat_world_block(3), BlockState::GRASS);
        assert_eq!(flat_world_block(4), BlockState::AIR);
        assert_eq!(flat_world_block(255), BlockState::AIR);
    }

    #[test]
    fn test_flat_chunk_matches_block_at() {
        let generator = FlatGenerator;
        let chunk = generator.generate_chunk(ChunkCoord::new(-7, 12));
        for y in 0..CHUNK_HEIGHT {
            assert_eq!(chunk.get_block(4, y, 9), generator.block_at(-108, y as i32, 201));
        }
        assert_eq!(chunk.biome(0, 0), FLAT_BIOME_ID);
        assert!(chunk.is_section_populated(0));
        assert!(!chunk.is_section_populated(1));
    }
}
