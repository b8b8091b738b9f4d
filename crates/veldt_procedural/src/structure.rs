//! # Structure Placement
//!
//! Villages are placed on an 80-block cell grid that is deliberately out of
//! step with the 16-block chunk grid, so most villages straddle several
//! chunks.
//!
//! ## Consistency
//!
//! Everything about a site (presence, centre, footprint, every house) is
//! derived from an integer hash of the seed and the cell coordinate, plus
//! the biome and surface height at the site centre, which are themselves
//! pure functions of the seed. A chunk never decides anything about a site
//! from its own partial state. When a region is generated, every cell whose
//! footprint could reach the region is visited and only the in-bounds
//! voxels are written, so each chunk renders its slice of the same village.

use std::sync::Arc;

use crate::biome::BiomeKind;
use crate::block::BlockState;
use crate::chunk::{within_margin, VoxelRegion};
use crate::hash::{column_hash, mix64, pick_range, unit_interval};
use crate::height::{HeightField, SEA_LEVEL};
use crate::noise::WorldSeed;

/// Edge length of a placement cell in blocks.
pub const CELL_SIZE: i32 = 80;

/// Smallest footprint half extent.
pub const MIN_HALF_EXTENT: i32 = 11;

/// Largest footprint half extent; bounds the cell search radius.
pub const MAX_HALF_EXTENT: i32 = 18;

const PRESENCE_CHANCE: f64 = 0.45;
const HOUSE_CHANCE: f64 = 0.8;
const FARM_CHANCE: f64 = 0.6;

/// Sites are not built on peaks above this height.
const MAX_BASE_Y: i32 = 200;

/// Air cleared above the village floor.
const CLEARANCE: i32 = 16;
/// Solid filler directly under the floor.
const SOLID_DEPTH: i32 = 3;
/// Depth down to which caves and water under the floor are filled.
const FOUNDATION_DEPTH: i32 = 12;

const PATH_HALF_WIDTH: i32 = 1;
const WALL_HEIGHT: i32 = 4;

const SALT_PRESENCE: u64 = 0x5173_0001;
const SALT_CENTER_X: u64 = 0x5173_0002;
const SALT_CENTER_Z: u64 = 0x5173_0003;
const SALT_EXTENT: u64 = 0x5173_0004;
const SALT_FARM: u64 = 0x5173_0005;
const SALT_HOUSE: u64 = 0x5173_0010;

/// Quadrant signs, in layout order.
const QUADRANTS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Coordinate of a placement cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Cell X.
    pub x: i32,
    /// Cell Z.
    pub z: i32,
}

impl CellCoord {
    /// Creates a cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Maps a block column to its placement cell (floor division).
#[inline]
#[must_use]
pub const fn cell_at(x: i32, z: i32) -> CellCoord {
    CellCoord {
        x: x.div_euclid(CELL_SIZE),
        z: z.div_euclid(CELL_SIZE),
    }
}

/// Axis-aligned rectangle of columns, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plot {
    /// Lowest X.
    pub min_x: i32,
    /// Lowest Z.
    pub min_z: i32,
    /// Highest X.
    pub max_x: i32,
    /// Highest Z.
    pub max_z: i32,
}

impl Plot {
    /// The columns of `region` grown by `margin` on every side, clamped to
    /// the `i32` range.
    #[must_use]
    pub const fn covering(region: &VoxelRegion, margin: i32) -> Self {
        Self {
            min_x: region.min_x().saturating_sub(margin),
            min_z: region.min_z().saturating_sub(margin),
            max_x: region.max_x().saturating_add(margin),
            max_z: region.max_z().saturating_add(margin),
        }
    }

    /// Returns true if the column lies on the plot.
    #[must_use]
    pub const fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// Returns true if the two plots share at least one column.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_z <= other.max_z
            && other.min_z <= self.max_z
    }

    fn clipped_to(&self, region: &VoxelRegion) -> Option<Self> {
        let clipped = Self {
            min_x: self.min_x.max(region.min_x()),
            min_z: self.min_z.max(region.min_z()),
            max_x: self.max_x.min(region.max_x()),
            max_z: self.max_z.min(region.max_z()),
        };
        (clipped.min_x <= clipped.max_x && clipped.min_z <= clipped.max_z).then_some(clipped)
    }

    fn columns(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min_z..=self.max_z).flat_map(move |z| (self.min_x..=self.max_x).map(move |x| (x, z)))
    }
}

/// A house inside a village.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct House {
    /// Walls run along the edge of this plot.
    pub plot: Plot,
    /// Column of the doorway, on the wall facing the main path.
    pub door: (i32, i32),
}

/// A fully resolved settlement.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    /// Cell that owns the site.
    pub cell: CellCoord,
    /// Centre column X (the well).
    pub center_x: i32,
    /// Centre column Z.
    pub center_z: i32,
    /// Footprint reaches this far from the centre on both axes.
    pub half_extent: i32,
    /// Y of the village floor.
    pub base_y: i32,
    /// Biome at the centre.
    pub biome: BiomeKind,
    /// Houses, at most one per quadrant.
    pub houses: Vec<House>,
    /// Wheat field in a quadrant without a house.
    pub farm: Option<Plot>,
}

impl Site {
    /// The square of columns the village claims.
    #[must_use]
    pub const fn footprint(&self) -> Plot {
        Plot {
            min_x: self.center_x - self.half_extent,
            min_z: self.center_z - self.half_extent,
            max_x: self.center_x + self.half_extent,
            max_z: self.center_z + self.half_extent,
        }
    }

    /// Returns true if the column lies inside the footprint.
    #[must_use]
    pub const fn contains_column(&self, x: i32, z: i32) -> bool {
        self.footprint().contains(x, z)
    }

    fn ground(&self) -> BlockState {
        if self.biome == BiomeKind::Desert {
            BlockState::SAND
        } else {
            BlockState::GRASS
        }
    }

    fn filler(&self) -> BlockState {
        if self.biome == BiomeKind::Desert {
            BlockState::SANDSTONE
        } else {
            BlockState::DIRT
        }
    }

    fn wall(&self) -> BlockState {
        if self.biome == BiomeKind::Desert {
            BlockState::SANDSTONE
        } else {
            BlockState::OAK_PLANKS
        }
    }

    fn is_path(&self, x: i32, z: i32) -> bool {
        (x - self.center_x).abs() <= PATH_HALF_WIDTH || (z - self.center_z).abs() <= PATH_HALF_WIDTH
    }

    /// Writes the in-bounds part of the village into `region`.
    ///
    /// Every voxel written is marked protected.
    pub fn render(&self, region: &mut VoxelRegion) {
        let Some(area) = self.footprint().clipped_to(region) else {
            return;
        };

        for (x, z) in area.columns() {
            self.prepare_ground(region, x, z);
        }

        self.render_well(region);
        for house in &self.houses {
            self.render_house(region, house);
        }
        if let Some(farm) = self.farm {
            self.render_farm(region, farm);
        }
    }

    fn prepare_ground(&self, region: &mut VoxelRegion, x: i32, z: i32) {
        let base = self.base_y;
        let filler = self.filler();

        for y in (base - FOUNDATION_DEPTH)..(base - SOLID_DEPTH) {
            let current = region.get(x, y, z);
            if current.is_air() || current == BlockState::WATER {
                region.set_protected(x, y, z, filler);
            }
        }
        for y in (base - SOLID_DEPTH)..base {
            region.set_protected(x, y, z, filler);
        }

        let floor = if self.is_path(x, z) {
            BlockState::GRAVEL
        } else {
            self.ground()
        };
        region.set_protected(x, base, z, floor);

        for y in (base + 1)..=(base + CLEARANCE) {
            region.set_protected(x, y, z, BlockState::AIR);
        }
    }

    fn render_well(&self, region: &mut VoxelRegion) {
        let base = self.base_y;
        for dz in -1..=1 {
            for dx in -1..=1 {
                let x = self.center_x + dx;
                let z = self.center_z + dz;

                if dx == 0 && dz == 0 {
                    region.set_protected(x, base - 4, z, BlockState::COBBLESTONE);
                    for y in (base - 3)..=base {
                        region.set_protected(x, y, z, BlockState::WATER);
                    }
                } else {
                    region.set_protected(x, base, z, BlockState::COBBLESTONE);
                    region.set_protected(x, base + 1, z, BlockState::COBBLESTONE);
                }

                if dx != 0 && dz != 0 {
                    region.set_protected(x, base + 2, z, BlockState::FENCE);
                    region.set_protected(x, base + 3, z, BlockState::FENCE);
                }
                region.set_protected(x, base + 4, z, BlockState::OAK_PLANKS);
            }
        }
    }

    fn render_house(&self, region: &mut VoxelRegion, house: &House) {
        let base = self.base_y;
        let plot = house.plot;
        let wall = self.wall();

        for (x, z) in plot.columns() {
            let edge_x = x == plot.min_x || x == plot.max_x;
            let edge_z = z == plot.min_z || z == plot.max_z;

            region.set_protected(x, base, z, BlockState::COBBLESTONE);
            for y in (base + 1)..=(base + WALL_HEIGHT) {
                let state = if edge_x && edge_z {
                    BlockState::OAK_LOG
                } else if edge_x || edge_z {
                    wall
                } else {
                    BlockState::AIR
                };
                region.set_protected(x, y, z, state);
            }
            region.set_protected(x, base + WALL_HEIGHT + 1, z, BlockState::OAK_PLANKS);
        }

        let mid_x = (plot.min_x + plot.max_x) / 2;
        let mid_z = (plot.min_z + plot.max_z) / 2;
        for window in [
            (mid_x, plot.min_z),
            (mid_x, plot.max_z),
            (plot.min_x, mid_z),
            (plot.max_x, mid_z),
        ] {
            if window != house.door {
                region.set_protected(window.0, base + 2, window.1, BlockState::GLASS);
            }
        }

        let (door_x, door_z) = house.door;
        region.set_protected(door_x, base + 1, door_z, BlockState::AIR);
        region.set_protected(door_x, base + 2, door_z, BlockState::AIR);

        let torch_z = if door_z == plot.min_z {
            plot.max_z - 1
        } else {
            plot.min_z + 1
        };
        region.set_protected(plot.min_x + 1, base + 1, torch_z, BlockState::TORCH);
    }

    fn render_farm(&self, region: &mut VoxelRegion, farm: Plot) {
        let base = self.base_y;
        let channel_z = (farm.min_z + farm.max_z) / 2;
        for (x, z) in farm.columns() {
            if z == channel_z {
                region.set_protected(x, base, z, BlockState::WATER);
            } else {
                region.set_protected(x, base, z, BlockState::FARMLAND);
                region.set_protected(x, base + 1, z, BlockState::WHEAT);
            }
        }
    }
}

/// Deterministic settlement placement on the cell grid.
///
/// Holds only the seed and a shared, immutable height field.
pub struct StructureGrid {
    seed: WorldSeed,
    heights: Arc<HeightField>,
}

impl StructureGrid {
    /// Creates a placement grid.
    #[must_use]
    pub fn new(seed: WorldSeed, heights: Arc<HeightField>) -> Self {
        Self { seed, heights }
    }

    fn cell_hash(&self, cell: CellCoord, salt: u64) -> u64 {
        column_hash(self.seed, cell.x, cell.z, salt)
    }

    /// Resolves the site owned by a cell, if the cell has one.
    #[must_use]
    pub fn site(&self, cell: CellCoord) -> Option<Site> {
        if unit_interval(self.cell_hash(cell, SALT_PRESENCE)) >= PRESENCE_CHANCE {
            return None;
        }

        let offset_x = pick_range(self.cell_hash(cell, SALT_CENTER_X), 0, CELL_SIZE - 1);
        let offset_z = pick_range(self.cell_hash(cell, SALT_CENTER_Z), 0, CELL_SIZE - 1);
        let center_x = site_center(cell.x, offset_x)?;
        let center_z = site_center(cell.z, offset_z)?;

        let sample = self.heights.sample(center_x, center_z);
        let biome = sample.biome.kind;
        if !matches!(
            biome,
            BiomeKind::Plains | BiomeKind::Desert | BiomeKind::Savanna | BiomeKind::Forest
        ) {
            return None;
        }
        if sample.surface <= SEA_LEVEL || sample.surface > MAX_BASE_Y {
            return None;
        }

        let half_extent = pick_range(
            self.cell_hash(cell, SALT_EXTENT),
            MIN_HALF_EXTENT,
            MAX_HALF_EXTENT,
        );

        let mut houses = Vec::with_capacity(QUADRANTS.len());
        let mut free_quadrant = None;
        for (index, &(sx, sz)) in QUADRANTS.iter().enumerate() {
            let hash = self.cell_hash(cell, SALT_HOUSE + index as u64);
            if unit_interval(hash) >= HOUSE_CHANCE {
                free_quadrant.get_or_insert((sx, sz));
                continue;
            }

            let plot = quadrant_plot(
                center_x,
                center_z,
                half_extent,
                (sx, sz),
                pick_range(mix64(hash ^ 1), 5, 7),
                pick_range(mix64(hash ^ 2), 5, 7),
                mix64(hash ^ 3),
            );
            let door_z = if sz > 0 { plot.min_z } else { plot.max_z };
            houses.push(House {
                plot,
                door: ((plot.min_x + plot.max_x) / 2, door_z),
            });
        }

        let farm = free_quadrant.and_then(|quadrant| {
            let hash = self.cell_hash(cell, SALT_FARM);
            (unit_interval(hash) < FARM_CHANCE).then(|| {
                quadrant_plot(
                    center_x,
                    center_z,
                    half_extent,
                    quadrant,
                    pick_range(mix64(hash ^ 1), 5, 7),
                    5,
                    mix64(hash ^ 3),
                )
            })
        });

        Some(Site {
            cell,
            center_x,
            center_z,
            half_extent,
            base_y: sample.surface,
            biome,
            houses,
            farm,
        })
    }

    /// Every site whose footprint intersects `area`, in ascending (z, x)
    /// cell order.
    #[must_use]
    pub fn sites_overlapping(&self, area: Plot) -> Vec<Site> {
        let low = cell_at(
            area.min_x.saturating_sub(MAX_HALF_EXTENT),
            area.min_z.saturating_sub(MAX_HALF_EXTENT),
        );
        let high = cell_at(
            area.max_x.saturating_add(MAX_HALF_EXTENT),
            area.max_z.saturating_add(MAX_HALF_EXTENT),
        );

        let mut sites = Vec::new();
        for cz in low.z..=high.z {
            for cx in low.x..=high.x {
                if let Some(site) = self.site(CellCoord::new(cx, cz)) {
                    if site.footprint().intersects(&area) {
                        sites.push(site);
                    }
                }
            }
        }
        sites
    }

    /// Renders every site that reaches `region`.
    pub fn generate_into(&self, region: &mut VoxelRegion) {
        let sites = self.sites_overlapping(Plot::covering(region, 0));
        Self::generate_into_with(&sites, region);
    }

    /// Renders already resolved sites, in the order given. Sites that miss
    /// `region` write nothing.
    pub fn generate_into_with(sites: &[Site], region: &mut VoxelRegion) {
        for site in sites {
            site.render(region);
        }
    }

    /// Returns true if the column lies inside any village footprint.
    #[must_use]
    pub fn is_in_village(&self, x: i32, z: i32) -> bool {
        !self
            .sites_overlapping(Plot {
                min_x: x,
                min_z: z,
                max_x: x,
                max_z: z,
            })
            .is_empty()
    }
}

/// World coordinate of a site centre, or `None` when the footprint could
/// reach past the edge of the `i32` range.
fn site_center(cell: i32, offset: i32) -> Option<i32> {
    let center = i64::from(cell) * i64::from(CELL_SIZE) + i64::from(offset);
    i32::try_from(center)
        .ok()
        .filter(|&center| within_margin(center, MAX_HALF_EXTENT))
}

/// Places a `width` x `depth` plot in one quadrant, clear of the main paths
/// and one block inside the footprint edge.
fn quadrant_plot(
    center_x: i32,
    center_z: i32,
    half_extent: i32,
    (sx, sz): (i32, i32),
    width: i32,
    depth: i32,
    hash: u64,
) -> Plot {
    let near = PATH_HALF_WIDTH + 2;
    let far = half_extent - 1;

    let inset_x = pick_range(hash, 0, far - near + 1 - width);
    let inset_z = pick_range(mix64(hash), 0, far - near + 1 - depth);

    let span = |center: i32, sign: i32, inset: i32, length: i32| {
        let start = near + inset;
        let end = start + length - 1;
        if sign > 0 {
            (center + start, center + end)
        } else {
            (center - end, center - start)
        }
    };

    let (min_x, max_x) = span(center_x, sx, inset_x, width);
    let (min_z, max_z) = span(center_z, sz, inset_z, depth);
    Plot {
        min_x,
        min_z,
        max_x,
        max_z,
    }
}
