//! # World Overlay
//!
//! Sparse player edits layered over a chunk source. An entry is
//! authoritative; a missing entry defers to the generator, which is asked
//! afresh every time (nothing generated is cached).
//!
//! One reader/writer lock guards the map. It is held only for the map
//! operation itself, never while the generator runs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use veldt_procedural::chunk::split_block_coord;
use veldt_procedural::{BlockState, ChunkCoord, ChunkSource};

/// A world block position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// World Y.
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk column containing this position.
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block_pos(self.x, self.z)
    }
}

/// Thread-safe edit layer over a chunk source.
pub struct WorldOverlay {
    source: Arc<dyn ChunkSource>,
    edits: RwLock<HashMap<BlockPos, BlockState>>,
}

impl WorldOverlay {
    /// Creates an empty overlay over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ChunkSource>) -> Self {
        Self {
            source,
            edits: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped chunk source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ChunkSource> {
        &self.source
    }

    /// The block at a position: the edit if there is one, else the
    /// generator's voxel.
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.edit_at(x, y, z)
            .unwrap_or_else(|| self.source.block_at(x, y, z))
    }

    /// Records an edit, replacing any earlier one at the same position.
    pub fn set_block(&self, x: i32, y: i32, z: i32, state: BlockState) {
        self.edits.write().insert(BlockPos::new(x, y, z), state);
        tracing::debug!(x, y, z, state = state.raw(), "block edited");
    }

    /// The edit at a position, if any.
    #[must_use]
    pub fn edit_at(&self, x: i32, y: i32, z: i32) -> Option<BlockState> {
        self.edits.read().get(&BlockPos::new(x, y, z)).copied()
    }

    /// A point-in-time copy of every edit.
    #[must_use]
    pub fn modifications(&self) -> HashMap<BlockPos, BlockState> {
        self.edits.read().clone()
    }

    /// Edits inside one chunk column, sorted by position.
    #[must_use]
    pub fn edits_in_chunk(&self, coord: ChunkCoord) -> Vec<(BlockPos, BlockState)> {
        let mut edits: Vec<(BlockPos, BlockState)> = self
            .edits
            .read()
            .iter()
            .filter(|(pos, _)| pos.chunk() == coord)
            .map(|(pos, state)| (*pos, *state))
            .collect();
        edits.sort_unstable_by_key(|(pos, _)| *pos);
        edits
    }

    /// Number of edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.read().len()
    }

    /// Returns true if nothing has been edited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.read().is_empty()
    }
}

/// Local column offset of a world coordinate inside its chunk.
#[inline]
pub(crate) fn local_offset(world: i32) -> usize {
    split_block_coord(world).1
}
