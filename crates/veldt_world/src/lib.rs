//! # Veldt World
//!
//! The serving side of a Veldt world: chunk serialization, a thread-safe
//! edit overlay on top of a generator, item drops, configuration and
//! region pre-generation.
//!
//! ## Thread Safety
//!
//! [`World`] is `Send + Sync`. Generation takes no locks; the only shared
//! mutable state is the overlay's edit map.
//!
//! ## Example
//!
//! ```rust
//! use veldt_procedural::{BlockState, WorldSeed};
//! use veldt_world::World;
//!
//! let world = World::new(WorldSeed::new(42));
//! world.set_block(0, 100, 0, BlockState::GLASS);
//!
//! assert_eq!(world.get_block(0, 100, 0), BlockState::GLASS);
//! assert_eq!(world.modifications().len(), 1);
//!
//! let data = world.generate_chunk_data(0, 0);
//! assert_eq!(data.bitmask & 1, 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod drops;
pub mod error;
pub mod overlay;
pub mod region;
pub mod serializer;
pub mod world;

pub use config::{SeedSpec, WorldConfig, WorldPreset};
pub use drops::{DropTable, ItemDrop};
pub use error::{WorldError, WorldResult};
pub use overlay::{BlockPos, WorldOverlay};
pub use region::{pregenerate, RegionStats};
pub use serializer::{serialize_chunk, ChunkData};
pub use world::World;
