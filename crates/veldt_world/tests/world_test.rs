//! End-to-end tests for the world facade: overlay semantics, the wire
//! layout and configuration.

use std::sync::Arc;
use std::thread;

use veldt_procedural::block::ids;
use veldt_procedural::{BlockState, ChunkCoord, TerrainGenerator, WorldSeed};
use veldt_world::serializer::{BLOCK_ARRAY_BYTES, LIGHT_ARRAY_BYTES, SECTION_BYTES};
use veldt_world::{
    pregenerate, BlockPos, ChunkData, DropTable, World, WorldConfig, WorldPreset,
};

/// Test: A new world reports no edits
#[test]
fn test_fresh_world_has_no_modifications() {
    let world = World::new(WorldSeed::new(42));
    assert!(world.modifications().is_empty());
    println!("Fresh world: no edits");
}

/// Test: Two edits at distinct positions give two snapshot entries
#[test]
fn test_two_edits_two_entries() {
    let world = World::new(WorldSeed::new(42));
    world.set_block(1, 80, 1, BlockState::GLASS);
    world.set_block(-1, 80, -1, BlockState::COBBLESTONE);

    let edits = world.modifications();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[&BlockPos::new(1, 80, 1)], BlockState::GLASS);
    assert_eq!(edits[&BlockPos::new(-1, 80, -1)], BlockState::COBBLESTONE);
}

/// Test: Edited positions read back; untouched ones match the generator
#[test]
fn test_get_after_set_and_untouched_positions() {
    let world = World::new(WorldSeed::new(42));
    let generated = TerrainGenerator::new(WorldSeed::new(42));

    world.set_block(10, 0, 10, BlockState::AIR);
    assert_eq!(world.get_block(10, 0, 10), BlockState::AIR);
    assert_eq!(world.block_at(10, 0, 10), BlockState::BEDROCK);

    for (x, y, z) in [(11, 0, 10), (0, 40, 0), (-300, 64, 77), (5, 300, 5)] {
        assert_eq!(world.get_block(x, y, z), generated.block_at(x, y, z));
    }
}

/// Test: A snapshot does not see later edits
#[test]
fn test_snapshot_is_a_copy() {
    let world = World::new(WorldSeed::new(3));
    world.set_block(0, 90, 0, BlockState::GLASS);
    let snapshot = world.modifications();
    world.set_block(0, 91, 0, BlockState::GLASS);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(world.modifications().len(), 2);
}

/// Test: Serialized chunk layout matches the bitmask and section size
#[test]
fn test_serialization_shape() {
    let world = World::new(WorldSeed::new(42));
    for cz in -2..2 {
        for cx in -2..2 {
            let data = world.generate_chunk_data(cx, cz);
            assert_eq!(data.bytes.len(), ChunkData::expected_len(data.bitmask));
            assert_eq!(data.bitmask & 1, 1, "bedrock section always present");

            let sections = data.section_count();
            let light_start = sections * BLOCK_ARRAY_BYTES;
            let biome_start = sections * SECTION_BYTES;
            assert!(data.bytes[light_start..light_start + 2 * sections * LIGHT_ARRAY_BYTES]
                .iter()
                .all(|&b| b == 0xFF));
            assert_eq!(data.bytes.len() - biome_start, 256);

            // y = 0 is bedrock everywhere.
            for i in 0..256 {
                let raw = u16::from_le_bytes([data.bytes[2 * i], data.bytes[2 * i + 1]]);
                assert_eq!(raw >> 4, ids::BEDROCK);
            }
        }
    }
    println!("Serialized 16 chunks");
}

/// Test: Edits in negative chunks land at the right local offset
#[test]
fn test_chunk_data_sees_edits_in_negative_chunks() {
    let world = World::new(WorldSeed::new(42));
    world.set_block(-1, 250, -16, BlockState::GLASS);

    let data = world.chunk_data(-1, -1);
    assert_ne!(data.bitmask & (1 << 15), 0);
    assert_eq!(world.generate_chunk_data(-1, -1).bitmask & (1 << 15), 0);
}

/// Test: Parallel writers and readers keep every edit
#[test]
fn test_concurrent_edits_and_reads() {
    let world = Arc::new(World::new(WorldSeed::new(9)));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                for i in 0..50 {
                    world.set_block(t * 100 + i, 120, 0, BlockState::GLASS);
                    assert_eq!(world.get_block(t * 100 + i, 120, 0), BlockState::GLASS);
                }
                world.generate_chunk_data(t, 0).bitmask
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap() & 1, 1);
    }
    assert_eq!(world.modifications().len(), 200);
}

/// Test: The flat preset yields the fixed layer stack
#[test]
fn test_flat_world() {
    let world = World::with_preset(WorldSeed::new(42), WorldPreset::Flat);
    let data = world.generate_chunk_data(7, -3);

    assert_eq!(data.bitmask, 0x0001);
    assert_eq!(data.bytes.len(), SECTION_BYTES + 256);

    let block = |x: usize, y: usize, z: usize| {
        let i = 2 * (y * 256 + z * 16 + x);
        BlockState::from_raw(u16::from_le_bytes([data.bytes[i], data.bytes[i + 1]]))
    };
    assert_eq!(block(3, 0, 3), BlockState::BEDROCK);
    assert_eq!(block(3, 2, 3), BlockState::DIRT);
    assert_eq!(block(3, 3, 3), BlockState::GRASS);
    assert_eq!(block(3, 4, 3), BlockState::AIR);
    assert!(data.bytes[SECTION_BYTES..].iter().all(|&b| b == 1));
}

/// Test: A parsed config selects seed and preset
#[test]
fn test_config_drives_world() {
    let dir = std::env::temp_dir().join(format!("veldt_world_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("drops.toml"),
        "[[drop]]\nblock = \"grass\"\nitem_id = 2\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("world.toml"),
        "seed = 42\npreset = \"flat\"\ndrops_path = \"drops.toml\"\npregen_radius = 1\nworkers = 2\n",
    )
    .unwrap();

    let config = WorldConfig::from_file(&dir.join("world.toml")).unwrap();
    let world = World::from_config(&config).unwrap();
    assert_eq!(world.preset(), WorldPreset::Flat);
    assert_eq!(world.seed(), WorldSeed::new(42));

    let grass = world.drop_for(BlockState::GRASS).unwrap();
    assert_eq!(grass.item_id, ids::GRASS);
    assert_ne!(world.drops(), &DropTable::standard());

    let chunks = pregenerate(&world, ChunkCoord::new(0, 0), config.pregen_radius, config.workers);
    assert_eq!(chunks.len(), 9);

    std::fs::remove_dir_all(&dir).unwrap();
}

/// Test: Loading a missing drop file returns an error
#[test]
fn test_missing_drop_file_is_an_error() {
    let config = WorldConfig {
        drops_path: Some("/nonexistent/drops.toml".into()),
        ..WorldConfig::default()
    };
    assert!(World::from_config(&config).is_err());
}

/// Test: The spawn point has solid ground and headroom
#[test]
fn test_spawn_point_is_standable() {
    let world = World::new(WorldSeed::new(42));
    let spawn = world.spawn_point();

    let ground = world.get_block(spawn.x, spawn.y - 1, spawn.z);
    assert!(!ground.is_air());
    assert_ne!(ground, BlockState::WATER);
    assert!(world.get_block(spawn.x, spawn.y, spawn.z).is_replaceable_by_vegetation());
    println!("Spawn at {spawn:?} on {ground:?}");
}
