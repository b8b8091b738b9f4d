//! # Vegetation
//!
//! Ground cover and trees. Whether a column grows something, and what, is a
//! positional hash of the seed and the column; noise is not involved.
//!
//! ## Tree Shapes
//!
//! | Species      | Trunk        | Canopy                          |
//! |--------------|--------------|---------------------------------|
//! | Oak, Birch   | single, 4-7  | rounded blob around the top     |
//! | Spruce       | single, 6-9  | conical rings                   |
//! | Mega jungle  | 2x2, 10-16   | broad disc, radius up to 5      |
//! | Jungle       | single, 8-12 | stacked layers down the trunk   |
//!
//! Trees only grow through air and foliage and never touch voxels a
//! structure owns.

use crate::biome::BiomeKind;
use crate::block::{ids, BlockState};
use crate::chunk::{within_margin, VoxelRegion, MAX_Y};
use crate::hash::{column_hash, mix64, pick_range, unit_interval, voxel_hash};
use crate::noise::WorldSeed;
use crate::terrain::ColumnPlan;

/// Furthest a tree reaches horizontally from its origin column.
pub const TREE_REACH: i32 = 6;

const SALT_TREE: u64 = 0x7EE0_0001;
const SALT_SPECIES: u64 = 0x7EE0_0002;
const SALT_HEIGHT: u64 = 0x7EE0_0003;
const SALT_LEAF: u64 = 0x7EE0_0004;
const SALT_COVER: u64 = 0x7EE0_0005;
const SALT_COVER_KIND: u64 = 0x7EE0_0006;

/// Tree species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    /// Common broadleaf.
    Oak,
    /// Pale broadleaf, slightly taller than oak.
    Birch,
    /// Conical conifer.
    Spruce,
    /// Huge tropical tree on a 2x2 trunk.
    MegaJungle,
    /// Tall tropical tree.
    Jungle,
}

impl TreeSpecies {
    /// Log block for the trunk.
    #[must_use]
    pub const fn log(self) -> BlockState {
        match self {
            Self::Oak => BlockState::OAK_LOG,
            Self::Birch => BlockState::BIRCH_LOG,
            Self::Spruce => BlockState::SPRUCE_LOG,
            Self::MegaJungle | Self::Jungle => BlockState::JUNGLE_LOG,
        }
    }

    /// Leaf block for the canopy.
    #[must_use]
    pub const fn leaves(self) -> BlockState {
        match self {
            Self::Oak => BlockState::OAK_LEAVES,
            Self::Birch => BlockState::BIRCH_LEAVES,
            Self::Spruce => BlockState::SPRUCE_LEAVES,
            Self::MegaJungle | Self::Jungle => BlockState::JUNGLE_LEAVES,
        }
    }

    /// Trunk height range, inclusive.
    #[must_use]
    pub const fn trunk_range(self) -> (i32, i32) {
        match self {
            Self::Oak => (4, 6),
            Self::Birch => (5, 7),
            Self::Spruce => (6, 9),
            Self::MegaJungle => (10, 16),
            Self::Jungle => (8, 12),
        }
    }

    /// Picks a species for a biome from a hash, or `None` if the biome grows
    /// no trees.
    #[must_use]
    pub fn for_biome(biome: BiomeKind, hash: u64) -> Option<Self> {
        let roll = hash % 100;
        match biome {
            BiomeKind::Forest => Some(if roll < 70 { Self::Oak } else { Self::Birch }),
            BiomeKind::Plains | BiomeKind::Swamp | BiomeKind::Savanna => Some(Self::Oak),
            BiomeKind::Taiga | BiomeKind::ExtremeHills => Some(Self::Spruce),
            BiomeKind::Jungle => Some(match roll {
                0..=24 => Self::MegaJungle,
                25..=74 => Self::Jungle,
                _ => Self::Oak,
            }),
            BiomeKind::Desert => None,
        }
    }
}

/// Writes `state` if the target holds air or foliage and no structure owns it.
fn grow(region: &mut VoxelRegion, x: i32, y: i32, z: i32, state: BlockState) {
    if region.is_protected(x, y, z) {
        return;
    }
    if region.get(x, y, z).is_replaceable_by_vegetation() {
        region.set(x, y, z, state);
    }
}

/// Places flowers, grass, dead bushes or cacti on one column.
pub fn place_ground_cover(seed: WorldSeed, plan: &ColumnPlan, region: &mut VoxelRegion) {
    if plan.in_village || !region.contains_column(plan.x, plan.z) {
        return;
    }

    // A boulder may have buried the soil.
    let y = plan.surface + 1;
    if y > MAX_Y
        || region.get(plan.x, plan.surface, plan.z) != plan.surface_block()
        || !region.get(plan.x, y, plan.z).is_air()
    {
        return;
    }

    let roll = unit_interval(column_hash(seed, plan.x, plan.z, SALT_COVER));
    let kind = column_hash(seed, plan.x, plan.z, SALT_COVER_KIND);

    match plan.surface_block().block_type() {
        ids::GRASS => {
            if roll >= 0.04 + plan.biome.vegetation_density * 2.0 {
                return;
            }
            let plant = match kind % 10 {
                0 => BlockState::DANDELION,
                1 => BlockState::POPPY,
                _ => BlockState::TALL_GRASS,
            };
            region.set(plan.x, y, plan.z, plant);
        }
        ids::SAND if plan.biome.kind == BiomeKind::Desert => {
            if roll >= plan.biome.vegetation_density {
                return;
            }
            if kind % 10 < 7 {
                region.set(plan.x, y, plan.z, BlockState::DEAD_BUSH);
            } else {
                let height = pick_range(mix64(kind), 1, 3);
                for cy in y..(y + height).min(MAX_Y + 1) {
                    if region.get(plan.x, cy, plan.z).is_air() {
                        region.set(plan.x, cy, plan.z, BlockState::CACTUS);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Grows the tree rooted at a column, if the column has one.
///
/// Writes are clipped to `region`; the origin may lie outside it.
pub fn place_tree(seed: WorldSeed, plan: &ColumnPlan, region: &mut VoxelRegion) {
    if plan.in_village || !plan.is_fertile() {
        return;
    }
    if !within_margin(plan.x, TREE_REACH) || !within_margin(plan.z, TREE_REACH) {
        return;
    }
    let roll = unit_interval(column_hash(seed, plan.x, plan.z, SALT_TREE));
    if roll >= plan.biome.vegetation_density {
        return;
    }
    let Some(species) =
        TreeSpecies::for_biome(plan.biome.kind, column_hash(seed, plan.x, plan.z, SALT_SPECIES))
    else {
        return;
    };

    let (min, max) = species.trunk_range();
    let trunk = pick_range(column_hash(seed, plan.x, plan.z, SALT_HEIGHT), min, max);
    let base = plan.surface + 1;
    let top = base + trunk - 1;
    // Every canopy reaches at most two blocks above the trunk.
    if top + 2 > MAX_Y {
        return;
    }

    let tree = Tree {
        seed,
        species,
        x: plan.x,
        z: plan.z,
        base,
        top,
    };
    match species {
        TreeSpecies::Oak | TreeSpecies::Birch => tree.grow_rounded(region),
        TreeSpecies::Spruce => tree.grow_conical(region),
        TreeSpecies::MegaJungle => tree.grow_mega(region),
        TreeSpecies::Jungle => tree.grow_layered(region),
    }
}

/// A resolved tree ready to be stamped.
struct Tree {
    seed: WorldSeed,
    species: TreeSpecies,
    x: i32,
    z: i32,
    base: i32,
    top: i32,
}

impl Tree {
    fn trunk(&self, region: &mut VoxelRegion, x: i32, z: i32) {
        for y in self.base..=self.top {
            grow(region, x, y, z, self.species.log());
        }
    }

    /// Disc of leaves; corners of square layers are dropped by hash.
    fn leaf_disc(&self, region: &mut VoxelRegion, y: i32, radius: i32, ragged: bool) {
        let leaves = self.species.leaves();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let (x, z) = (self.x + dx, self.z + dz);
                let corner = dx.abs() == radius && dz.abs() == radius;
                let trimmed = radius <= 1
                    || !ragged
                    || voxel_hash(self.seed, x, y, z, SALT_LEAF) & 1 == 0;
                if corner && trimmed {
                    continue;
                }
                grow(region, x, y, z, leaves);
            }
        }
    }

    fn grow_rounded(&self, region: &mut VoxelRegion) {
        for y in (self.top - 2)..=(self.top + 1) {
            let radius = if y < self.top { 2 } else { 1 };
            self.leaf_disc(region, y, radius, true);
        }
        self.trunk(region, self.x, self.z);
    }

    fn grow_conical(&self, region: &mut VoxelRegion) {
        let leaves = self.species.leaves();
        let crown = self.top + 1;
        for y in (self.base + 2)..=crown {
            let depth = crown - y;
            let radius = if depth == 0 {
                0
            } else if depth % 2 == 1 {
                1
            } else {
                (depth / 2 + 1).min(3)
            };
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx * dx + dz * dz <= radius * radius + 1 {
                        grow(region, self.x + dx, y, self.z + dz, leaves);
                    }
                }
            }
        }
        self.trunk(region, self.x, self.z);
    }

    fn grow_mega(&self, region: &mut VoxelRegion) {
        let leaves = self.species.leaves();
        for (y, radius) in [(self.top - 1, 5), (self.top, 4), (self.top + 1, 3)] {
            // Doubled coordinates keep the disc centred on the 2x2 trunk.
            let limit = 4 * radius * radius + 2;
            for dz in -radius..=(radius + 1) {
                for dx in -radius..=(radius + 1) {
                    let (ddx, ddz) = (2 * dx - 1, 2 * dz - 1);
                    if ddx * ddx + ddz * ddz <= limit {
                        grow(region, self.x + dx, y, self.z + dz, leaves);
                    }
                }
            }
        }
        for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            self.trunk(region, self.x + dx, self.z + dz);
        }
    }

    fn grow_layered(&self, region: &mut VoxelRegion) {
        let mut layer = self.top;
        while layer >= self.base + 3 {
            self.leaf_disc(region, layer, 2, true);
            self.leaf_disc(region, layer + 1, 1, false);
            layer -= 3;
        }
        self.trunk(region, self.x, self.z);
    }
}
