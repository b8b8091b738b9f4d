//! # Chunk Serializer
//!
//! Packs a chunk column into the segmented wire layout:
//!
//! ```text
//! [block ids: populated sections ascending, 4096 x u16 LE each]
//! [block light: 2048 bytes per populated section]
//! [sky light: 2048 bytes per populated section]
//! [biomes: 256 bytes]
//! ```
//!
//! The segments are never interleaved. Light is not modelled, so both
//! light arrays are filled with `0xFF`.

use veldt_procedural::chunk::{Chunk, COLUMN_AREA, SECTION_COUNT, SECTION_VOLUME};
use veldt_procedural::BlockState;

/// Bytes of block ids per section.
pub const BLOCK_ARRAY_BYTES: usize = SECTION_VOLUME * 2;

/// Bytes of one nibble light array per section.
pub const LIGHT_ARRAY_BYTES: usize = SECTION_VOLUME / 2;

/// Bytes every populated section contributes.
pub const SECTION_BYTES: usize = BLOCK_ARRAY_BYTES + 2 * LIGHT_ARRAY_BYTES;

/// Bytes of the trailing biome array.
pub const BIOME_BYTES: usize = COLUMN_AREA;

/// Placeholder light level (full brightness in both nibbles).
pub const FULL_LIGHT: u8 = 0xFF;

/// A serialized chunk column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    /// Payload in the segmented layout.
    pub bytes: Vec<u8>,
    /// Bit `s` is set iff section `s` holds any non-air voxel.
    pub bitmask: u16,
}

impl ChunkData {
    /// Number of populated sections.
    #[must_use]
    pub const fn section_count(&self) -> usize {
        self.bitmask.count_ones() as usize
    }

    /// Payload length for a bitmask.
    #[must_use]
    pub const fn expected_len(bitmask: u16) -> usize {
        bitmask.count_ones() as usize * SECTION_BYTES + BIOME_BYTES
    }
}

/// Computes the section bitmask of a chunk.
#[must_use]
pub fn section_bitmask(chunk: &Chunk) -> u16 {
    (0..SECTION_COUNT)
        .filter(|&section| chunk.is_section_populated(section))
        .fold(0u16, |mask, section| mask | (1 << section))
}

/// Appends one section's block ids as little-endian u16 words.
fn push_block_ids(out: &mut Vec<u8>, states: &[BlockState]) {
    if cfg!(target_endian = "little") {
        out.extend_from_slice(bytemuck::cast_slice(states));
    } else {
        for state in states {
            out.extend_from_slice(&state.raw().to_le_bytes());
        }
    }
}

/// Serializes a chunk column.
#[must_use]
pub fn serialize_chunk(chunk: &Chunk) -> ChunkData {
    let bitmask = section_bitmask(chunk);
    let populated: Vec<usize> = (0..SECTION_COUNT)
        .filter(|&section| bitmask & (1 << section) != 0)
        .collect();

    let mut bytes = Vec::with_capacity(ChunkData::expected_len(bitmask));

    for &section in &populated {
        push_block_ids(&mut bytes, chunk.section(section));
    }
    // Block light, then sky light.
    bytes.resize(bytes.len() + populated.len() * LIGHT_ARRAY_BYTES * 2, FULL_LIGHT);
    bytes.extend_from_slice(chunk.biomes());

    debug_assert_eq!(bytes.len(), ChunkData::expected_len(bitmask));
    ChunkData { bytes, bitmask }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veldt_procedural::ChunkCoord;

    fn two_section_chunk() -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block(0, 0, 0, BlockState::BEDROCK);
        chunk.set_block(0, 16, 0, BlockState::from_raw(0x0123));
        chunk.set_biome(15, 15, 21);
        chunk
    }

    #[test]
    fn test_two_section_layout() {
        let data = serialize_chunk(&two_section_chunk());

        assert_eq!(data.bitmask, 0x0003);
        assert_eq!(data.bytes.len(), 2 * (4096 * 2 + 2048 + 2048) + 256);

        // Section 1 starts right after section 0's block ids.
        assert_eq!(data.bytes[8192], 0x23);
        assert_eq!(data.bytes[8193], 0x01);

        // Block light follows both block arrays.
        assert_eq!(data.bytes[16384], 0xFF);
        assert!(data.bytes[16384..16384 + 4 * 2048].iter().all(|&b| b == 0xFF));

        // Biomes are last.
        assert_eq!(data.bytes[data.bytes.len() - 1], 21);
    }

    #[test]
    fn test_block_ids_are_little_endian() {
        let data = serialize_chunk(&two_section_chunk());
        let bedrock = BlockState::BEDROCK.raw().to_le_bytes();
        assert_eq!(&data.bytes[0..2], &bedrock);
    }

    #[test]
    fn test_empty_chunk_is_only_biomes() {
        let data = serialize_chunk(&Chunk::new(ChunkCoord::new(3, 3)));
        assert_eq!(data.bitmask, 0);
        assert_eq!(data.bytes.len(), BIOME_BYTES);
    }

    #[test]
    fn test_sparse_sections_skip_gaps() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block(1, 5 * 16 + 2, 1, BlockState::STONE);
        chunk.set_block(1, 15 * 16, 1, BlockState::GLASS);

        let data = serialize_chunk(&chunk);
        assert_eq!(data.bitmask, (1 << 5) | (1 << 15));
        assert_eq!(data.section_count(), 2);
        assert_eq!(data.bytes.len(), ChunkData::expected_len(data.bitmask));

        // Glass is voxel 17 of the second block array.
        let glass = BlockState::GLASS.raw().to_le_bytes();
        let offset = BLOCK_ARRAY_BYTES + (16 + 1) * 2;
        assert_eq!(&data.bytes[offset..offset + 2], &glass);
    }
}
