//! Surface height field.
//!
//! Three octave noise layers at different scales are mixed into one shape
//! value, then scaled by the biome's base height and variation. Biome
//! parameters are averaged over the column and four neighbours eight blocks
//! away so heights do not step at biome borders.

use crate::biome::{Biome, BiomeClassifier, BiomeRegistry};
use crate::noise::{NoiseField, WorldSeed};

/// Water fills every open voxel at or below this height.
pub const SEA_LEVEL: i32 = 62;

/// Lowest surface the height field produces.
pub const MIN_SURFACE: i32 = 1;

/// Highest surface the height field produces.
pub const MAX_SURFACE: i32 = 250;

const BROAD_SEED_OFFSET: i64 = 3000;
const HILLS_SEED_OFFSET: i64 = 4000;
const DETAIL_SEED_OFFSET: i64 = 5000;

const BLEND_DISTANCE: i32 = 8;

/// Biome plus surface height for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    /// Biome at the column.
    pub biome: Biome,
    /// Y of the topmost terrain voxel.
    pub surface: i32,
}

/// Seeded surface height field.
pub struct HeightField {
    classifier: BiomeClassifier,
    broad: NoiseField,
    hills: NoiseField,
    detail: NoiseField,
}

impl HeightField {
    /// Creates a height field over the standard biome registry.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::with_registry(seed, BiomeRegistry::standard())
    }

    /// Creates a height field over a caller-supplied biome registry.
    #[must_use]
    pub fn with_registry(seed: WorldSeed, registry: BiomeRegistry) -> Self {
        Self {
            classifier: BiomeClassifier::with_registry(seed, registry),
            broad: NoiseField::new(seed.offset(BROAD_SEED_OFFSET)),
            hills: NoiseField::new(seed.offset(HILLS_SEED_OFFSET)),
            detail: NoiseField::new(seed.offset(DETAIL_SEED_OFFSET)),
        }
    }

    /// Biome at a column.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> &Biome {
        self.classifier.biome_at(x, z)
    }

    /// Terrain shape in roughly [-1, 1] before biome scaling.
    #[must_use]
    pub fn shape_at(&self, x: i32, z: i32) -> f64 {
        let fx = f64::from(x);
        let fz = f64::from(z);

        let broad = self.broad.octave_noise_2d(fx * 0.004, fz * 0.004, 4, 2.0, 0.5);
        let hills = self.hills.octave_noise_2d(fx * 0.015, fz * 0.015, 3, 2.0, 0.5);
        let detail = self.detail.octave_noise_2d(fx * 0.06, fz * 0.06, 2, 2.0, 0.5);

        broad * 0.6 + hills * 0.3 + detail * 0.1
    }

    /// Surface height at a column, clamped to `[MIN_SURFACE, MAX_SURFACE]`.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.sample(x, z).surface
    }

    /// Biome and surface height at a column.
    #[must_use]
    pub fn sample(&self, x: i32, z: i32) -> ColumnSample {
        let biome = *self.biome_at(x, z);

        let mut base = biome.base_height;
        let mut variation = biome.height_variation;
        for (dx, dz) in [
            (BLEND_DISTANCE, 0),
            (-BLEND_DISTANCE, 0),
            (0, BLEND_DISTANCE),
            (0, -BLEND_DISTANCE),
        ] {
            // Neighbours past the edge of the world clamp to the edge.
            let neighbour = self.biome_at(x.saturating_add(dx), z.saturating_add(dz));
            base += neighbour.base_height;
            variation += neighbour.height_variation;
        }
        base /= 5.0;
        variation /= 5.0;

        let height = base + variation * self.shape_at(x, z) * 2.0;
        let surface = (height.floor() as i32).clamp(MIN_SURFACE, MAX_SURFACE);

        ColumnSample { biome, surface }
    }
}
