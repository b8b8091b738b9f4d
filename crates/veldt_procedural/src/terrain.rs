//! # Terrain Generation
//!
//! Composes the height field, caves, structures, boulders and vegetation
//! into voxel columns.
//!
//! ## Pipeline
//!
//! 1. Plan every column within decoration reach of the target region:
//!    biome, surface height and whether a village covers it.
//! 2. Fill the region's own columns with the fixed per-Y terrain rule.
//! 3. Render villages.
//! 4. Stamp boulders, then ground cover, then trees. Each layer visits its
//!    origin columns in ascending (z, x) order.
//!
//! Every decoration decision is a function of the seed and the origin
//! column only, and every write looks at nothing but the voxel it writes.
//! So a voxel ends up the same whether it is generated as part of a chunk
//! or through `block_at`, which runs the same pipeline on a 1x1 region.

use std::sync::Arc;

use crate::biome::{Biome, BiomeRegistry};
use crate::block::{ids, BlockState};
use crate::boulder::{BoulderPlacer, BOULDER_REACH};
use crate::chunk::{Chunk, ChunkCoord, VoxelRegion, MAX_Y};
use crate::height::{HeightField, SEA_LEVEL};
use crate::noise::{NoiseField, WorldSeed};
use crate::structure::{Plot, Site, StructureGrid};
use crate::vegetation::{self, TREE_REACH};
use crate::ChunkSource;

const CAVE_PRIMARY_SEED_OFFSET: i64 = 6000;
const CAVE_FINE_SEED_OFFSET: i64 = 7000;
const CAVE_GATE_SEED_OFFSET: i64 = 8000;

/// Everything later stages need to know about one column, computed without
/// looking at any voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnPlan {
    /// World X.
    pub x: i32,
    /// World Z.
    pub z: i32,
    /// Biome of the column.
    pub biome: Biome,
    /// Y of the topmost terrain voxel.
    pub surface: i32,
    /// A village footprint covers the column.
    pub in_village: bool,
}

impl ColumnPlan {
    /// The block the terrain rule puts at the surface.
    #[must_use]
    pub fn surface_block(&self) -> BlockState {
        if self.surface < SEA_LEVEL {
            BlockState::SAND
        } else {
            self.biome.surface
        }
    }

    /// Returns true if the surface is dry grass or dirt.
    #[must_use]
    pub fn is_fertile(&self) -> bool {
        self.surface >= SEA_LEVEL
            && matches!(self.surface_block().block_type(), ids::GRASS | ids::DIRT)
    }
}

/// Plans for a rectangle of columns, stored z-major, plus the villages
/// that reach it.
struct PlanGrid {
    plans: Vec<ColumnPlan>,
    sites: Vec<Site>,
}

impl PlanGrid {
    fn build(heights: &HeightField, structures: &StructureGrid, area: Plot) -> Self {
        let sites = structures.sites_overlapping(area);
        let width = area.max_x.abs_diff(area.min_x) as usize + 1;
        let depth = area.max_z.abs_diff(area.min_z) as usize + 1;

        let mut plans = Vec::with_capacity(width * depth);
        for z in area.min_z..=area.max_z {
            for x in area.min_x..=area.max_x {
                let sample = heights.sample(x, z);
                plans.push(ColumnPlan {
                    x,
                    z,
                    biome: sample.biome,
                    surface: sample.surface,
                    in_village: sites.iter().any(|site| site.contains_column(x, z)),
                });
            }
        }
        Self { plans, sites }
    }

    /// Plans in ascending (z, x) order.
    fn iter(&self) -> std::slice::Iter<'_, ColumnPlan> {
        self.plans.iter()
    }
}

/// The three 3D fields that carve caves.
struct CaveField {
    primary: NoiseField,
    fine: NoiseField,
    gate: NoiseField,
}

impl CaveField {
    fn new(seed: WorldSeed) -> Self {
        Self {
            primary: NoiseField::new(seed.offset(CAVE_PRIMARY_SEED_OFFSET)),
            fine: NoiseField::new(seed.offset(CAVE_FINE_SEED_OFFSET)),
            gate: NoiseField::new(seed.offset(CAVE_GATE_SEED_OFFSET)),
        }
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let (fx, fy, fz) = (f64::from(x), f64::from(y), f64::from(z));

        if self.primary.noise_3d(fx * 0.045, fy * 0.06, fz * 0.045) > 0.42 {
            return true;
        }
        self.fine.noise_3d(fx * 0.09, fy * 0.12, fz * 0.09) > 0.45
            && self.gate.noise_3d(fx * 0.02, fy * 0.02, fz * 0.02) > 0.15
    }
}

/// Noise-driven terrain generator.
///
/// Immutable after construction and `Send + Sync`, so one generator can
/// serve any number of threads.
pub struct TerrainGenerator {
    seed: WorldSeed,
    heights: Arc<HeightField>,
    structures: StructureGrid,
    caves: CaveField,
    boulders: BoulderPlacer,
}

impl TerrainGenerator {
    /// Creates a generator over the standard biome registry.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::with_registry(seed, BiomeRegistry::standard())
    }

    /// Creates a generator over a caller-supplied biome registry.
    #[must_use]
    pub fn with_registry(seed: WorldSeed, registry: BiomeRegistry) -> Self {
        let heights = Arc::new(HeightField::with_registry(seed, registry));
        tracing::debug!(seed = seed.value(), "terrain generator created");

        Self {
            seed,
            structures: StructureGrid::new(seed, Arc::clone(&heights)),
            heights,
            caves: CaveField::new(seed),
            boulders: BoulderPlacer::new(seed),
        }
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The settlement placement grid.
    #[must_use]
    pub fn structures(&self) -> &StructureGrid {
        &self.structures
    }

    /// Biome at a column.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> &Biome {
        self.heights.biome_at(x, z)
    }

    /// Plan for one column.
    #[must_use]
    pub fn plan_column(&self, x: i32, z: i32) -> ColumnPlan {
        let sample = self.heights.sample(x, z);
        ColumnPlan {
            x,
            z,
            biome: sample.biome,
            surface: sample.surface,
            in_village: self.structures.is_in_village(x, z),
        }
    }

    /// Terrain voxel before any decoration.
    fn terrain_voxel(&self, plan: &ColumnPlan, y: i32) -> BlockState {
        let surface = plan.surface;

        if y == 0 {
            return BlockState::BEDROCK;
        }
        if y < surface - 1 && self.caves.is_cave(plan.x, y, plan.z) {
            return if y < SEA_LEVEL {
                BlockState::WATER
            } else {
                BlockState::AIR
            };
        }
        if y < surface - 4 {
            return BlockState::STONE;
        }
        if y < surface {
            return plan.biome.filler;
        }
        if y == surface {
            return plan.surface_block();
        }
        if y <= SEA_LEVEL {
            return if y == SEA_LEVEL && plan.biome.snow {
                BlockState::ICE
            } else {
                BlockState::WATER
            };
        }
        if y == surface + 1 && plan.biome.snow {
            return BlockState::SNOW_LAYER;
        }
        BlockState::AIR
    }

    fn fill_column(&self, region: &mut VoxelRegion, plan: &ColumnPlan) {
        region.set_biome(plan.x, plan.z, plan.biome.id);

        let top = (plan.surface.max(SEA_LEVEL) + 1).min(MAX_Y);
        for y in 0..=top {
            let state = self.terrain_voxel(plan, y);
            if !state.is_air() {
                region.set(plan.x, y, plan.z, state);
            }
        }
    }

    /// Runs the full pipeline over an all-air region.
    pub fn generate_region(&self, region: &mut VoxelRegion) {
        let plans = PlanGrid::build(
            &self.heights,
            &self.structures,
            Plot::covering(region, TREE_REACH),
        );

        for plan in plans.iter() {
            if region.contains_column(plan.x, plan.z) {
                self.fill_column(region, plan);
            }
        }

        StructureGrid::generate_into_with(&plans.sites, region);

        let boulder_area = Plot::covering(region, BOULDER_REACH);
        for plan in plans
            .iter()
            .filter(|plan| boulder_area.contains(plan.x, plan.z))
        {
            self.boulders.place(plan, region);
        }
        for plan in plans.iter() {
            vegetation::place_ground_cover(self.seed, plan, region);
        }
        for plan in plans.iter() {
            vegetation::place_tree(self.seed, plan, region);
        }
    }

    /// Generates one chunk column.
    #[must_use]
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut region = VoxelRegion::for_chunk(coord);
        self.generate_region(&mut region);
        let chunk = Chunk::from_region(coord, region);
        tracing::trace!(
            x = coord.x,
            z = coord.z,
            sections = (0..crate::chunk::SECTION_COUNT)
                .filter(|&s| chunk.is_section_populated(s))
                .count(),
            "chunk generated"
        );
        chunk
    }

    /// The voxel bulk generation produces at a position.
    ///
    /// Air outside `0..=255`.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        if !(0..=MAX_Y).contains(&y) {
            return BlockState::AIR;
        }
        let mut region = VoxelRegion::for_column(x, z);
        self.generate_region(&mut region);
        region.get(x, y, z)
    }

    /// Surface height of the height field at a column.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.heights.surface_height(x, z)
    }
}

impl ChunkSource for TerrainGenerator {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        Self::generate_chunk(self, coord)
    }

    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        Self::block_at(self, x, y, z)
    }

    fn surface_height(&self, x: i32, z: i32) -> i32 {
        Self::surface_height(self, x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_SIZE;

    #[test]
    fn test_bedrock_floor() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        for i in -20..20 {
            let (x, z) = (i * 31, i * -17 + 5);
            assert_eq!(generator.block_at(x, 0, z).block_type(), ids::BEDROCK);
        }
    }

    #[test]
    fn test_out_of_range_is_air() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        assert!(generator.block_at(0, -1, 0).is_air());
        assert!(generator.block_at(0, 256, 0).is_air());
        assert!(generator.block_at(5, i32::MIN, 5).is_air());
        assert!(generator.block_at(5, i32::MAX, 5).is_air());
    }

    #[test]
    fn test_column_rule_layers() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        let plan = ColumnPlan {
            x: 0,
            z: 0,
            biome: *BiomeRegistry::standard().get(crate::biome::BiomeKind::Desert),
            surface: 70,
            in_village: false,
        };

        assert_eq!(generator.terrain_voxel(&plan, 0), BlockState::BEDROCK);
        assert_eq!(generator.terrain_voxel(&plan, 70), BlockState::SAND);
        assert_eq!(generator.terrain_voxel(&plan, 69), BlockState::SANDSTONE);
        assert_eq!(generator.terrain_voxel(&plan, 71), BlockState::AIR);
    }

    #[test]
    fn test_underwater_surface_is_sand() {
        let generator = TerrainGenerator::new(WorldSeed::new(1));
        let mut plan = generator.plan_column(0, 0);
        plan.surface = 50;
        plan.biome = *BiomeRegistry::standard().get(crate::biome::BiomeKind::Forest);

        assert_eq!(generator.terrain_voxel(&plan, 50), BlockState::SAND);
        assert_eq!(generator.terrain_voxel(&plan, 51), BlockState::WATER);
        assert_eq!(generator.terrain_voxel(&plan, SEA_LEVEL), BlockState::WATER);
        assert_eq!(generator.terrain_voxel(&plan, SEA_LEVEL + 1), BlockState::AIR);

        plan.biome = *BiomeRegistry::standard().get(crate::biome::BiomeKind::Taiga);
        assert_eq!(generator.terrain_voxel(&plan, SEA_LEVEL), BlockState::ICE);
        assert_eq!(generator.terrain_voxel(&plan, SEA_LEVEL + 1), BlockState::AIR);
    }

    #[test]
    fn test_snow_on_dry_taiga() {
        let generator = TerrainGenerator::new(WorldSeed::new(1));
        let plan = ColumnPlan {
            x: 3,
            z: 3,
            biome: *BiomeRegistry::standard().get(crate::biome::BiomeKind::Taiga),
            surface: 80,
            in_village: false,
        };
        assert_eq!(generator.terrain_voxel(&plan, 80), BlockState::GRASS);
        assert_eq!(generator.terrain_voxel(&plan, 81), BlockState::SNOW_LAYER);
        assert_eq!(generator.terrain_voxel(&plan, 82), BlockState::AIR);
    }

    #[test]
    fn test_chunk_biomes_filled() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        let chunk = generator.generate_chunk(ChunkCoord::new(3, -2));
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let world_x = chunk.coord.world_x() + x as i32;
                let world_z = chunk.coord.world_z() + z as i32;
                assert_eq!(chunk.biome(x, z), generator.biome_at(world_x, world_z).id);
            }
        }
    }

    #[test]
    fn test_world_edge_has_bedrock() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        for (x, z) in [
            (i32::MAX, 0),
            (i32::MIN, 0),
            (i32::MAX - 3, 0),
            (0, i32::MAX),
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MAX),
        ] {
            assert_eq!(generator.block_at(x, 0, z), BlockState::BEDROCK, "at ({x}, {z})");
            assert!((1..=250).contains(&generator.surface_height(x, z)));
        }
    }

    #[test]
    fn test_world_edge_chunk_matches_block_at() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        let coord = ChunkCoord::from_block_pos(i32::MAX, i32::MIN);
        let chunk = generator.generate_chunk(coord);

        for (x, z) in [(15usize, 0usize), (0, 0), (15, 15)] {
            for y in (0..256).step_by(5) {
                let world_x = coord.world_x() + x as i32;
                let world_z = coord.world_z() + z as i32;
                assert_eq!(
                    chunk.get_block(x, y, z),
                    generator.block_at(world_x, y as i32, world_z),
                    "mismatch at local ({x}, {y}, {z})"
                );
            }
        }
        assert_eq!(chunk.get_block(15, 0, 0), BlockState::BEDROCK);
    }

    #[test]
    fn test_sites_render_through_the_pipeline() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        let site = (-20..20)
            .flat_map(|z| (-20..20).map(move |x| crate::structure::CellCoord::new(x, z)))
            .find_map(|cell| generator.structures().site(cell))
            .expect("a 40x40 cell area should contain a village");

        let coord = ChunkCoord::from_block_pos(site.center_x, site.center_z);
        let chunk = generator.generate_chunk(coord);
        let local_x = (site.center_x - coord.world_x()) as usize;
        let local_z = (site.center_z - coord.world_z()) as usize;
        let base = site.base_y as usize;

        assert_eq!(chunk.get_block(local_x, base, local_z), BlockState::WATER);
        assert_eq!(chunk.get_block(local_x, base + 4, local_z), BlockState::OAK_PLANKS);
        assert_eq!(chunk.get_block(local_x, base - 4, local_z), BlockState::COBBLESTONE);
    }

    #[test]
    fn test_block_at_matches_chunk() {
        let generator = TerrainGenerator::new(WorldSeed::new(42));
        let coord = ChunkCoord::new(-1, 2);
        let chunk = generator.generate_chunk(coord);

        for (x, z) in [(0usize, 0usize), (15, 15), (7, 3), (0, 15)] {
            for y in (0..256).step_by(3) {
                let expected = chunk.get_block(x, y, z);
                let actual = generator.block_at(
                    coord.world_x() + x as i32,
                    y as i32,
                    coord.world_z() + z as i32,
                );
                assert_eq!(actual, expected, "mismatch at local ({x}, {y}, {z})");
            }
        }
    }
}
