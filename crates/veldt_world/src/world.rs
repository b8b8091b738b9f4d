//! # World Facade
//!
//! Ties a chunk source, the edit overlay and the drop table together.
//! This is the surface a server talks to.

use std::sync::Arc;

use veldt_procedural::chunk::MAX_Y;
use veldt_procedural::{
    BlockState, Chunk, ChunkCoord, ChunkSource, FlatGenerator, TerrainGenerator, WorldSeed,
    CHUNK_HEIGHT,
};

use crate::config::{WorldConfig, WorldPreset};
use crate::drops::{DropTable, ItemDrop};
use crate::error::WorldResult;
use crate::overlay::{local_offset, BlockPos, WorldOverlay};
use crate::serializer::{serialize_chunk, ChunkData};

/// Furthest column, in blocks from the origin, sampled for a spawn point.
const SPAWN_SEARCH_RADIUS: i32 = 256;
/// Distance between sampled columns.
const SPAWN_SEARCH_STEP: i32 = 8;

/// A generated world with player edits.
pub struct World {
    seed: WorldSeed,
    preset: WorldPreset,
    overlay: WorldOverlay,
    drops: DropTable,
}

impl World {
    /// Opens a default-preset world.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::with_preset(seed, WorldPreset::Default)
    }

    /// Opens a world with the given preset and the standard drop table.
    #[must_use]
    pub fn with_preset(seed: WorldSeed, preset: WorldPreset) -> Self {
        let source: Arc<dyn ChunkSource> = match preset {
            WorldPreset::Default => Arc::new(TerrainGenerator::new(seed)),
            WorldPreset::Flat => Arc::new(FlatGenerator),
        };
        tracing::debug!(seed = seed.value(), ?preset, "world opened");

        Self {
            seed,
            preset,
            overlay: WorldOverlay::new(source),
            drops: DropTable::standard(),
        }
    }

    /// Opens the world a config describes, loading its drop overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the drop file cannot be
    /// loaded.
    pub fn from_config(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        let drops = match &config.drops_path {
            Some(path) => DropTable::from_file(path)?,
            None => DropTable::standard(),
        };
        Ok(Self::with_preset(config.world_seed(), config.preset).with_drops(drops))
    }

    /// Replaces the drop table.
    #[must_use]
    pub fn with_drops(mut self, drops: DropTable) -> Self {
        self.drops = drops;
        self
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The generator preset.
    #[must_use]
    pub const fn preset(&self) -> WorldPreset {
        self.preset
    }

    /// The edit overlay.
    #[must_use]
    pub const fn overlay(&self) -> &WorldOverlay {
        &self.overlay
    }

    /// The drop table.
    #[must_use]
    pub const fn drops(&self) -> &DropTable {
        &self.drops
    }

    fn source(&self) -> &dyn ChunkSource {
        self.overlay.source().as_ref()
    }

    /// The generated chunk column, ignoring edits.
    #[must_use]
    pub fn generate_chunk(&self, cx: i32, cz: i32) -> Chunk {
        self.source().generate_chunk(ChunkCoord::new(cx, cz))
    }

    /// Serialized generated chunk, ignoring edits.
    #[must_use]
    pub fn generate_chunk_data(&self, cx: i32, cz: i32) -> ChunkData {
        serialize_chunk(&self.generate_chunk(cx, cz))
    }

    /// Serialized chunk as a player would see it, with edits applied.
    #[must_use]
    pub fn chunk_data(&self, cx: i32, cz: i32) -> ChunkData {
        let coord = ChunkCoord::new(cx, cz);
        let mut chunk = self.source().generate_chunk(coord);
        for (pos, state) in self.overlay.edits_in_chunk(coord) {
            match usize::try_from(pos.y) {
                Ok(y) if y < CHUNK_HEIGHT => {
                    chunk.set_block(local_offset(pos.x), y, local_offset(pos.z), state);
                }
                _ => {}
            }
        }
        serialize_chunk(&chunk)
    }

    /// The block at a position, edits included.
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.overlay.get_block(x, y, z)
    }

    /// Records an edit.
    pub fn set_block(&self, x: i32, y: i32, z: i32, state: BlockState) {
        self.overlay.set_block(x, y, z, state);
    }

    /// Replaces a block with air and returns what it drops.
    pub fn break_block(&self, x: i32, y: i32, z: i32) -> Option<ItemDrop> {
        let broken = self.get_block(x, y, z);
        if broken.is_air() {
            return None;
        }
        self.set_block(x, y, z, BlockState::AIR);
        self.drops.drop_for(broken)
    }

    /// Copy of every edit.
    #[must_use]
    pub fn modifications(&self) -> std::collections::HashMap<BlockPos, BlockState> {
        self.overlay.modifications()
    }

    /// The generated block at a position, ignoring edits.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.source().block_at(x, y, z)
    }

    /// Y of the topmost terrain voxel of a column.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.source().surface_height(x, z)
    }

    /// What breaking `state` yields.
    #[must_use]
    pub fn drop_for(&self, state: BlockState) -> Option<ItemDrop> {
        self.drops.drop_for(state)
    }

    /// A position a player can stand at: on solid ground with two free
    /// voxels above, so never under water. Samples rings of columns around
    /// the origin and falls back to the origin column.
    #[must_use]
    pub fn spawn_point(&self) -> BlockPos {
        let candidates = std::iter::once((0, 0)).chain(
            (1..=SPAWN_SEARCH_RADIUS / SPAWN_SEARCH_STEP)
                .flat_map(|k| ring(k * SPAWN_SEARCH_STEP, SPAWN_SEARCH_STEP)),
        );

        for (x, z) in candidates {
            if let Some(spawn) = self.standing_spot(x, z) {
                tracing::debug!(x = spawn.x, y = spawn.y, z = spawn.z, "spawn point chosen");
                return spawn;
            }
        }

        BlockPos::new(0, self.surface_height(0, 0) + 1, 0)
    }

    fn standing_spot(&self, x: i32, z: i32) -> Option<BlockPos> {
        let surface = self.surface_height(x, z);
        if surface + 2 > MAX_Y {
            return None;
        }
        let ground = self.get_block(x, surface, z);
        if ground.is_air() || ground == BlockState::WATER || ground.is_foliage() {
            return None;
        }
        let free = |y| self.get_block(x, y, z).is_replaceable_by_vegetation();
        (free(surface + 1) && free(surface + 2)).then_some(BlockPos::new(x, surface + 1, z))
    }
}

/// Columns on the square ring at Chebyshev distance `r`, `step` apart.
fn ring(r: i32, step: i32) -> impl Iterator<Item = (i32, i32)> {
    (-r..=r)
        .filter(move |a| a.rem_euclid(step) == 0)
        .flat_map(move |a| [(a, -r), (a, r), (-r, a), (r, a)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::SECTION_BYTES;

    #[test]
    fn test_flat_world_surface_and_spawn() {
        let world = World::with_preset(WorldSeed::new(1), WorldPreset::Flat);
        assert_eq!(world.surface_height(500, -500), 3);
        assert_eq!(world.spawn_point(), BlockPos::new(0, 4, 0));
    }

    #[test]
    fn test_chunk_data_applies_edits() {
        let world = World::with_preset(WorldSeed::new(1), WorldPreset::Flat);
        world.set_block(17, 20, 3, BlockState::GLASS);

        let pristine = world.generate_chunk_data(1, 0);
        let edited = world.chunk_data(1, 0);
        assert_eq!(pristine.bitmask, 0x0001);
        assert_eq!(edited.bitmask, 0x0003);
        assert_eq!(edited.bytes.len(), 2 * SECTION_BYTES + 256);

        // Section 1 block array follows section 0's; y 20 is local y 4.
        let index = 8192 + 2 * ((4 * 16 + 3) * 16 + 1);
        let raw = u16::from_le_bytes([edited.bytes[index], edited.bytes[index + 1]]);
        assert_eq!(BlockState::from_raw(raw), BlockState::GLASS);

        // Other chunks are unaffected.
        assert_eq!(world.chunk_data(0, 0), world.generate_chunk_data(0, 0));
    }

    #[test]
    fn test_break_block() {
        let world = World::with_preset(WorldSeed::new(1), WorldPreset::Flat);
        assert_eq!(
            world.break_block(5, 3, 5),
            Some(ItemDrop::single(veldt_procedural::block::ids::DIRT, 0))
        );
        assert_eq!(world.get_block(5, 3, 5), BlockState::AIR);
        assert_eq!(world.break_block(5, 3, 5), None);
        assert_eq!(world.break_block(5, 0, 5), None);
        assert_eq!(world.get_block(5, 0, 5), BlockState::AIR);
    }

    #[test]
    fn test_ring_covers_perimeter() {
        let columns: Vec<_> = ring(8, 8).collect();
        assert!(columns.contains(&(-8, -8)));
        assert!(columns.contains(&(8, 0)));
        assert!(columns.contains(&(0, -8)));
        assert!(columns.iter().all(|&(x, z)| x.abs() == 8 || z.abs() == 8));
    }
}
