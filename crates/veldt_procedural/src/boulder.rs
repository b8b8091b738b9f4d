//! Boulder clusters.
//!
//! A coarse noise field marks rocky patches; inside a patch each column
//! rolls against its biome's boulder density. The voxels of a boulder pick
//! their material from a positional hash.

use crate::block::BlockState;
use crate::chunk::{within_margin, VoxelRegion};
use crate::hash::{column_hash, mix64, pick_range, unit_interval, voxel_hash};
use crate::noise::{NoiseField, WorldSeed};
use crate::terrain::ColumnPlan;

/// Furthest a boulder reaches horizontally from its origin column.
pub const BOULDER_REACH: i32 = 2;

const GATE_SEED_OFFSET: i64 = 9000;
const GATE_SCALE: f64 = 0.02;
const GATE_THRESHOLD: f64 = 0.15;

const SALT_BOULDER: u64 = 0xB01D_0001;
const SALT_SHAPE: u64 = 0xB01D_0002;
const SALT_MATERIAL: u64 = 0xB01D_0003;

/// Material for one boulder voxel.
#[must_use]
pub fn boulder_material(hash: u64) -> BlockState {
    match hash % 100 {
        0..=54 => BlockState::COBBLESTONE,
        55..=79 => BlockState::MOSSY_COBBLESTONE,
        80..=89 => BlockState::GRAVEL,
        _ => BlockState::ANDESITE,
    }
}

/// Places boulders on eligible columns.
pub struct BoulderPlacer {
    seed: WorldSeed,
    gate: NoiseField,
}

impl BoulderPlacer {
    /// Creates a placer for a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            gate: NoiseField::new(seed.offset(GATE_SEED_OFFSET)),
        }
    }

    /// Returns true if a boulder is rooted at this column.
    #[must_use]
    pub fn has_boulder(&self, plan: &ColumnPlan) -> bool {
        if plan.in_village || !plan.is_fertile() || plan.biome.boulder_density <= 0.0 {
            return false;
        }
        if !within_margin(plan.x, BOULDER_REACH) || !within_margin(plan.z, BOULDER_REACH) {
            return false;
        }
        let gate = self
            .gate
            .noise_2d(f64::from(plan.x) * GATE_SCALE, f64::from(plan.z) * GATE_SCALE);
        gate > GATE_THRESHOLD
            && unit_interval(column_hash(self.seed, plan.x, plan.z, SALT_BOULDER))
                < plan.biome.boulder_density
    }

    /// Stamps the boulder rooted at a column, if any.
    ///
    /// Stone, bedrock and structure voxels are left untouched.
    pub fn place(&self, plan: &ColumnPlan, region: &mut VoxelRegion) {
        if !self.has_boulder(plan) {
            return;
        }

        let shape = column_hash(self.seed, plan.x, plan.z, SALT_SHAPE);
        let rx = pick_range(shape, 1, BOULDER_REACH);
        let ry = pick_range(mix64(shape ^ 1), 1, 2);
        let rz = pick_range(mix64(shape ^ 2), 1, BOULDER_REACH);
        let cy = plan.surface + 1;

        for dy in -ry..=ry {
            for dz in -rz..=rz {
                for dx in -rx..=rx {
                    let distance = f64::from(dx * dx) / f64::from(rx * rx)
                        + f64::from(dy * dy) / f64::from(ry * ry)
                        + f64::from(dz * dz) / f64::from(rz * rz);
                    if distance > 1.0 {
                        continue;
                    }

                    let (x, y, z) = (plan.x + dx, cy + dy, plan.z + dz);
                    if region.is_protected(x, y, z) {
                        continue;
                    }
                    let current = region.get(x, y, z);
                    if current.is_stone() || current == BlockState::BEDROCK {
                        continue;
                    }
                    region.set(
                        x,
                        y,
                        z,
                        boulder_material(voxel_hash(self.seed, x, y, z, SALT_MATERIAL)),
                    );
                }
            }
        }
    }
}
