//! # Region Pre-generation
//!
//! Generates a square of chunks around a center on a pool of scoped worker
//! threads. Coordinates go out over one channel and serialized chunks come
//! back over another; the result is sorted so the output does not depend
//! on thread scheduling.

use std::time::Instant;

use crossbeam_channel::{bounded, unbounded};
use veldt_procedural::chunk::{MAX_CHUNK_COORD, MIN_CHUNK_COORD};
use veldt_procedural::ChunkCoord;

use crate::config::MAX_PREGEN_RADIUS;
use crate::serializer::ChunkData;
use crate::world::World;

/// Summary of a pre-generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionStats {
    /// Chunks generated.
    pub chunks: usize,
    /// Populated sections across all chunks.
    pub sections: usize,
    /// Total payload bytes.
    pub bytes: usize,
}

impl RegionStats {
    /// Tallies a set of generated chunks.
    #[must_use]
    pub fn from_chunks(chunks: &[(ChunkCoord, ChunkData)]) -> Self {
        chunks.iter().fold(Self::default(), |stats, (_, data)| Self {
            chunks: stats.chunks + 1,
            sections: stats.sections + data.section_count(),
            bytes: stats.bytes + data.bytes.len(),
        })
    }
}

/// Chunk coordinates within `radius` (Chebyshev) of `center`, row-major.
///
/// The radius is capped at [`MAX_PREGEN_RADIUS`] and the square is clipped
/// to the chunks the world can address.
#[must_use]
pub fn region_coords(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let r = radius.min(MAX_PREGEN_RADIUS) as i32;
    let span = |c: i32| {
        c.saturating_sub(r).max(MIN_CHUNK_COORD)..=c.saturating_add(r).min(MAX_CHUNK_COORD)
    };
    let xs = span(center.x);
    span(center.z)
        .flat_map(|z| xs.clone().map(move |x| ChunkCoord::new(x, z)))
        .collect()
}

/// Generates every chunk within `radius` of `center`, edits applied, using
/// `workers` threads (at least one). Results are sorted by coordinate.
#[must_use]
pub fn pregenerate(
    world: &World,
    center: ChunkCoord,
    radius: u32,
    workers: usize,
) -> Vec<(ChunkCoord, ChunkData)> {
    if radius > MAX_PREGEN_RADIUS {
        tracing::warn!(radius, max = MAX_PREGEN_RADIUS, "pre-generation radius capped");
    }
    let coords = region_coords(center, radius);
    let workers = workers.clamp(1, coords.len().max(1));
    let started = Instant::now();

    let (job_tx, job_rx) = bounded::<ChunkCoord>(coords.len());
    let (result_tx, result_rx) = unbounded();

    for coord in &coords {
        // The channel holds every job and the receiver is alive.
        let _ = job_tx.send(*coord);
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move || {
                for coord in jobs {
                    let data = world.chunk_data(coord.x, coord.z);
                    if results.send((coord, data)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut chunks: Vec<(ChunkCoord, ChunkData)> = result_rx.into_iter().collect();
    chunks.sort_unstable_by_key(|(coord, _)| *coord);

    let stats = RegionStats::from_chunks(&chunks);
    tracing::info!(
        center_x = center.x,
        center_z = center.z,
        radius,
        workers,
        chunks = stats.chunks,
        sections = stats.sections,
        bytes = stats.bytes,
        elapsed_ms = started.elapsed().as_millis(),
        "region pre-generated"
    );
    chunks
}
