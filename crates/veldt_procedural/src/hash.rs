//! Stateless positional hashing.
//!
//! Every placement decision that must agree across chunks (structure sites,
//! boulder materials, tree species) is an integer hash of the seed and the
//! coordinate it concerns. Nothing here carries state between calls, so the
//! answer for a coordinate never depends on what was generated before it.

use crate::noise::WorldSeed;

/// Multiplier used to spread salts across the 64-bit space.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// `SplitMix64` finalizer.
#[inline]
#[must_use]
pub const fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Hashes a horizontal coordinate under a purpose salt.
#[inline]
#[must_use]
pub const fn column_hash(seed: WorldSeed, x: i32, z: i32, salt: u64) -> u64 {
    let keyed = mix64((seed.value() as u64) ^ salt.wrapping_mul(GOLDEN_GAMMA));
    mix64(keyed ^ (x as u32 as u64) ^ ((z as u32 as u64) << 32))
}

/// Hashes a voxel coordinate under a purpose salt.
#[inline]
#[must_use]
pub const fn voxel_hash(seed: WorldSeed, x: i32, y: i32, z: i32, salt: u64) -> u64 {
    mix64(column_hash(seed, x, z, salt) ^ (y as u32 as u64).wrapping_mul(GOLDEN_GAMMA))
}

/// Maps a hash to a float in `[0, 1)`.
#[inline]
#[must_use]
pub fn unit_interval(hash: u64) -> f64 {
    (hash >> 11) as f64 / (1u64 << 53) as f64
}

/// Picks a value in `min..=max` from a hash.
#[inline]
#[must_use]
pub const fn pick_range(hash: u64, min: i32, max: i32) -> i32 {
    let span = (max - min + 1) as u64;
    min + (hash % span) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_hash_is_pure() {
        let seed = WorldSeed::new(42);
        assert_eq!(column_hash(seed, 10, -3, 1), column_hash(seed, 10, -3, 1));
        assert_ne!(column_hash(seed, 10, -3, 1), column_hash(seed, 10, -3, 2));
        assert_ne!(column_hash(seed, 10, -3, 1), column_hash(seed, -3, 10, 1));
        assert_ne!(column_hash(seed, 10, -3, 1), column_hash(WorldSeed::new(43), 10, -3, 1));
    }

    #[test]
    fn test_voxel_hash_uses_height() {
        let seed = WorldSeed::new(7);
        assert_ne!(voxel_hash(seed, 1, 2, 3, 0), voxel_hash(seed, 1, 3, 3, 0));
    }

    #[test]
    fn test_unit_interval_bounds() {
        for i in 0..10_000u64 {
            let value = unit_interval(mix64(i));
            assert!((0.0..1.0).contains(&value));
        }
        assert!(unit_interval(u64::MAX) < 1.0);
    }

    #[test]
    fn test_pick_range_bounds() {
        for i in 0..1_000u64 {
            let value = pick_range(mix64(i), 5, 7);
            assert!((5..=7).contains(&value));
        }
    }
}
