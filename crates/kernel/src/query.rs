//! Block-level reads, writes and searches over the chunk store.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;
use mcworld_common::{Block, ChunkCoord, Location, Material};

use crate::chunk::ChunkColumn;
use crate::world::World;

impl World {
    /// Column containing `location`, if present.
    pub fn chunk_column(&self, location: &Location) -> Option<Arc<ChunkColumn>> {
        self.column(location.chunk_coord())
    }

    /// Block at `location`. Unloaded columns, absent segments and positions
    /// outside the column's height all read as air.
    pub fn block(&self, location: &Location) -> Block {
        let min_y = self.dimension().min_y;
        match self.chunk_column(location) {
            Some(column) => block_in(&column, location, min_y),
            None => Block::AIR,
        }
    }

    /// Overwrite the block at `location`.
    ///
    /// Dropped silently when the column is absent or the position lies outside
    /// the column's height. An absent segment is allocated empty first.
    pub fn set_block(&self, location: &Location, block: Block) {
        let Some(column) = self.chunk_column(location) else {
            tracing::trace!(%location, "set_block on unloaded column dropped");
            return;
        };
        let min_y = self.dimension().min_y;
        let Some(index) = segment_in(&column, location, min_y) else {
            tracing::trace!(%location, "set_block outside column height dropped");
            return;
        };
        let (x, y, z) = location.in_segment(min_y);
        column.set_block(index, x, y, z, block);
    }

    /// [`find_block_in`](Self::find_block_in) with the same radius on every axis.
    pub fn find_block(&self, origin: &Location, material: Material, radius: f64) -> Vec<Location> {
        self.find_block_in(origin, material, radius, radius, radius)
    }

    /// Every integer location within `origin ± radius` (per axis, inclusive)
    /// whose block has `material`, in ascending x, then y, then z order.
    ///
    /// Each axis starts at `floor(origin - radius)` and spans
    /// `floor(2 * radius) + 1` positions. Cost grows with the box volume.
    /// Columns are looked up independently, so a sweep racing the network
    /// thread may see some columns before an update and others after it.
    pub fn find_block_in(
        &self,
        origin: &Location,
        material: Material,
        radius_x: f64,
        radius_y: f64,
        radius_z: f64,
    ) -> Vec<Location> {
        let _span = tracing::debug_span!("find_block", ?material, radius_x, radius_y, radius_z)
            .entered();

        let radius = DVec3::new(radius_x, radius_y, radius_z);
        let min = origin.to_dvec3() - radius;
        let max = origin.to_dvec3() + radius;
        let min_y = self.dimension().min_y;

        let mut columns: HashMap<ChunkCoord, Option<Arc<ChunkColumn>>> = HashMap::new();
        let mut found = Vec::new();
        for x in axis_range(min.x, max.x) {
            for y in axis_range(min.y, max.y) {
                for z in axis_range(min.z, max.z) {
                    let location = Location::block(x, y, z);
                    let column = columns
                        .entry(location.chunk_coord())
                        .or_insert_with(|| self.chunk_column(&location));
                    let block = match column {
                        Some(column) => block_in(column, &location, min_y),
                        None => Block::AIR,
                    };
                    if block.material == material {
                        found.push(location);
                    }
                }
            }
        }
        tracing::debug!(matches = found.len(), "find_block done");
        found
    }
}

/// Segment index of `location` if it falls inside `column`.
fn segment_in(column: &ChunkColumn, location: &Location, min_y: i32) -> Option<usize> {
    usize::try_from(location.segment_index(min_y))
        .ok()
        .filter(|&index| index < column.column_size())
}

fn block_in(column: &ChunkColumn, location: &Location, min_y: i32) -> Block {
    let Some(index) = segment_in(column, location, min_y) else {
        return Block::AIR;
    };
    let (x, y, z) = location.in_segment(min_y);
    column.block(index, x, y, z).unwrap_or(Block::AIR)
}

/// `floor(2 * radius) + 1` lattice points from `floor(lo)`, clipped to the
/// range block coordinates can address.
fn axis_range(lo: f64, hi: f64) -> impl Iterator<Item = i32> {
    let start = lo.floor() as i64;
    let count = ((hi - lo).floor() as i64).saturating_add(1).max(0);
    let end = start.saturating_add(count);
    let first = start.max(i64::from(i32::MIN));
    let last = end.min(i64::from(i32::MAX) + 1);
    (first..last).filter_map(|v| i32::try_from(v).ok())
}
