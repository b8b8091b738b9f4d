//! # Biome Classification
//!
//! Determines terrain type from two climate channels.
//!
//! ## Climate Model
//!
//! - Temperature and rainfall are independent octave noise fields sampled
//!   at a coarse scale, so a biome region spans hundreds of blocks.
//! - Both channels are remapped from [-1, 1] to [0, 1].
//! - A fixed threshold table turns the (temperature, rainfall) pair into
//!   one of the registry's biomes.
//!
//! The registry is an immutable value handed to the classifier. Nothing in
//! this module holds mutable state, so classification is a pure function of
//! the seed and the coordinate.

use crate::block::BlockState;
use crate::noise::{NoiseField, WorldSeed};

/// Seed offset of the temperature channel.
pub const TEMPERATURE_SEED_OFFSET: i64 = 1000;

/// Seed offset of the rainfall channel.
pub const RAINFALL_SEED_OFFSET: i64 = 2000;

/// Identifies a biome family, independent of its numeric wire id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BiomeKind {
    /// Open grassland.
    Plains,
    /// Hot sand dunes.
    Desert,
    /// Tall, rough mountains.
    ExtremeHills,
    /// Temperate woodland.
    Forest,
    /// Snowy conifer forest.
    Taiga,
    /// Low, wet marsh.
    Swamp,
    /// Dense tropical forest.
    Jungle,
    /// Dry, warm grassland.
    Savanna,
}

/// Immutable biome descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biome {
    /// Biome id written to the chunk biome array.
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// Family this descriptor belongs to.
    pub kind: BiomeKind,
    /// Block placed at the surface.
    pub surface: BlockState,
    /// Block placed in the four layers under the surface.
    pub filler: BlockState,
    /// Mean surface height.
    pub base_height: f64,
    /// Amplitude applied to the combined height noise.
    pub height_variation: f64,
    /// Chance per column that a tree grows.
    pub vegetation_density: f64,
    /// Chance per column that a boulder spawns (before the noise gate).
    pub boulder_density: f64,
    /// Freezes water at sea level and dusts the surface with snow.
    pub snow: bool,
}

/// The fixed set of biomes a classifier chooses from.
#[derive(Clone, Debug)]
pub struct BiomeRegistry {
    biomes: [Biome; 8],
}

impl BiomeRegistry {
    /// The default eight-biome set.
    #[must_use]
    pub fn standard() -> Self {
        fn grassy(
            id: u8,
            name: &'static str,
            kind: BiomeKind,
            base_height: f64,
            height_variation: f64,
            vegetation_density: f64,
            boulder_density: f64,
        ) -> Biome {
            Biome {
                id,
                name,
                kind,
                surface: BlockState::GRASS,
                filler: BlockState::DIRT,
                base_height,
                height_variation,
                vegetation_density,
                boulder_density,
                snow: false,
            }
        }

        Self {
            biomes: [
                grassy(1, "Plains", BiomeKind::Plains, 66.0, 6.0, 0.004, 0.002),
                Biome {
                    id: 2,
                    name: "Desert",
                    kind: BiomeKind::Desert,
                    surface: BlockState::SAND,
                    filler: BlockState::SANDSTONE,
                    base_height: 66.0,
                    height_variation: 5.0,
                    vegetation_density: 0.006,
                    boulder_density: 0.0,
                    snow: false,
                },
                grassy(3, "Extreme Hills", BiomeKind::ExtremeHills, 84.0, 36.0, 0.01, 0.012),
                grassy(4, "Forest", BiomeKind::Forest, 68.0, 10.0, 0.05, 0.003),
                Biome {
                    snow: true,
                    ..grassy(30, "Cold Taiga", BiomeKind::Taiga, 70.0, 12.0, 0.04, 0.006)
                },
                grassy(6, "Swampland", BiomeKind::Swamp, 61.0, 3.0, 0.02, 0.0),
                grassy(21, "Jungle", BiomeKind::Jungle, 70.0, 14.0, 0.08, 0.002),
                grassy(35, "Savanna", BiomeKind::Savanna, 68.0, 7.0, 0.006, 0.004),
            ],
        }
    }

    /// Looks up the descriptor for a biome family.
    #[must_use]
    pub fn get(&self, kind: BiomeKind) -> &Biome {
        self.biomes
            .iter()
            .find(|biome| biome.kind == kind)
            .unwrap_or(&self.biomes[0])
    }

    /// Looks up a descriptor by wire id.
    #[must_use]
    pub fn by_id(&self, id: u8) -> Option<&Biome> {
        self.biomes.iter().find(|biome| biome.id == id)
    }

    /// All descriptors in registry order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Biome> {
        self.biomes.iter()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Climate sample at one column, both channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// 0 is freezing, 1 is scorching.
    pub temperature: f64,
    /// 0 is arid, 1 is drenched.
    pub rainfall: f64,
}

/// Biome classifier that determines biome from world coordinates.
pub struct BiomeClassifier {
    temperature: NoiseField,
    rainfall: NoiseField,
    registry: BiomeRegistry,
}

impl BiomeClassifier {
    /// Horizontal scale of both climate channels.
    pub const CLIMATE_SCALE: f64 = 0.003;

    const CLIMATE_OCTAVES: u32 = 4;

    /// Creates a classifier over the standard registry.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::with_registry(seed, BiomeRegistry::standard())
    }

    /// Creates a classifier over a caller-supplied registry.
    #[must_use]
    pub fn with_registry(seed: WorldSeed, registry: BiomeRegistry) -> Self {
        Self {
            temperature: NoiseField::new(seed.offset(TEMPERATURE_SEED_OFFSET)),
            rainfall: NoiseField::new(seed.offset(RAINFALL_SEED_OFFSET)),
            registry,
        }
    }

    /// The registry this classifier selects from.
    #[must_use]
    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }

    /// Samples both climate channels at a column.
    #[must_use]
    pub fn climate_at(&self, x: i32, z: i32) -> Climate {
        let sx = f64::from(x) * Self::CLIMATE_SCALE;
        let sz = f64::from(z) * Self::CLIMATE_SCALE;
        let remap = |value: f64| ((value + 1.0) * 0.5).clamp(0.0, 1.0);

        Climate {
            temperature: remap(self.temperature.octave_noise_2d(
                sx,
                sz,
                Self::CLIMATE_OCTAVES,
                2.0,
                0.5,
            )),
            rainfall: remap(self.rainfall.octave_noise_2d(
                sx,
                sz,
                Self::CLIMATE_OCTAVES,
                2.0,
                0.5,
            )),
        }
    }

    /// Classifies the biome at a column.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> &Biome {
        self.registry.get(Self::classify(self.climate_at(x, z)))
    }

    /// The fixed threshold table.
    #[must_use]
    pub fn classify(climate: Climate) -> BiomeKind {
        let Climate {
            temperature: t,
            rainfall: r,
        } = climate;

        if t < 0.38 {
            BiomeKind::Taiga
        } else if t < 0.46 {
            if r < 0.5 {
                BiomeKind::ExtremeHills
            } else {
                BiomeKind::Forest
            }
        } else if t < 0.54 {
            if r < 0.42 {
                BiomeKind::Plains
            } else if r < 0.58 {
                BiomeKind::Forest
            } else {
                BiomeKind::Swamp
            }
        } else if t < 0.62 {
            if r < 0.45 {
                BiomeKind::Savanna
            } else if r < 0.55 {
                BiomeKind::Plains
            } else {
                BiomeKind::Jungle
            }
        } else if r < 0.5 {
            BiomeKind::Desert
        } else {
            BiomeKind::Jungle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_biome_determinism() {
        let classifier1 = BiomeClassifier::new(WorldSeed::new(42));
        let classifier2 = BiomeClassifier::new(WorldSeed::new(42));

        for i in 0..200 {
            let x = i * 97 - 9_000;
            let z = i * 61 - 4_000;
            assert_eq!(
                classifier1.biome_at(x, z).id,
                classifier2.biome_at(x, z).id,
                "Biome classification should be deterministic"
            );
        }
    }

    #[test]
    fn test_climate_range() {
        let classifier = BiomeClassifier::new(WorldSeed::new(3));
        for i in -500..500 {
            let climate = classifier.climate_at(i * 37, i * -53);
            assert!((0.0..=1.0).contains(&climate.temperature));
            assert!((0.0..=1.0).contains(&climate.rainfall));
        }
    }

    #[test]
    fn test_biome_diversity() {
        let classifier = BiomeClassifier::new(WorldSeed::new(42));
        let mut found = HashSet::new();

        for x in (0..1000).step_by(10) {
            for z in (0..1000).step_by(10) {
                found.insert(classifier.biome_at(x, z).id);
            }
        }

        assert!(
            found.len() >= 4,
            "Should find at least 4 biomes, found: {found:?}"
        );
    }

    #[test]
    fn test_threshold_table() {
        let at = |temperature, rainfall| {
            BiomeClassifier::classify(Climate {
                temperature,
                rainfall,
            })
        };

        assert_eq!(at(0.1, 0.9), BiomeKind::Taiga);
        assert_eq!(at(0.4, 0.2), BiomeKind::ExtremeHills);
        assert_eq!(at(0.4, 0.7), BiomeKind::Forest);
        assert_eq!(at(0.5, 0.3), BiomeKind::Plains);
        assert_eq!(at(0.5, 0.9), BiomeKind::Swamp);
        assert_eq!(at(0.6, 0.3), BiomeKind::Savanna);
        assert_eq!(at(0.6, 0.8), BiomeKind::Jungle);
        assert_eq!(at(0.9, 0.1), BiomeKind::Desert);
    }

    #[test]
    fn test_registry_is_complete() {
        let registry = BiomeRegistry::standard();
        let ids: HashSet<u8> = registry.iter().map(|biome| biome.id).collect();
        assert_eq!(ids.len(), 8);

        assert_eq!(registry.get(BiomeKind::Desert).surface, BlockState::SAND);
        assert!(registry.get(BiomeKind::Taiga).snow);
        assert_eq!(registry.by_id(21).map(|biome| biome.kind), Some(BiomeKind::Jungle));
        assert!(registry.by_id(99).is_none());
    }
}
