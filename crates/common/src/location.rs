use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::SEGMENT_SIZE;
use crate::types::ChunkCoord;

/// An absolute world-space position.
///
/// Horizontal chunk addressing is fixed; vertical addressing depends on the
/// `min_y` of the dimension the location is interpreted in, so those accessors
/// take it as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Location of the integer block coordinate `(x, y, z)`.
    pub fn block(x: i32, y: i32, z: i32) -> Self {
        Self::new(x as f64, y as f64, z as f64)
    }

    pub fn block_x(&self) -> i32 {
        self.x.floor() as i32
    }

    pub fn block_y(&self) -> i32 {
        self.y.floor() as i32
    }

    pub fn block_z(&self) -> i32 {
        self.z.floor() as i32
    }

    pub fn chunk_x(&self) -> i32 {
        self.block_x() >> 4
    }

    pub fn chunk_z(&self) -> i32 {
        self.block_z() >> 4
    }

    pub fn chunk_coord(&self) -> ChunkCoord {
        ChunkCoord::new(self.chunk_x(), self.chunk_z())
    }

    /// Height above `min_y`, widened so extreme coordinates cannot overflow.
    fn height_above(&self, min_y: i32) -> i64 {
        i64::from(self.block_y()) - i64::from(min_y)
    }

    /// Vertical segment index within the column. Negative below `min_y`.
    pub fn segment_index(&self, min_y: i32) -> i64 {
        self.height_above(min_y).div_euclid(SEGMENT_SIZE as i64)
    }

    /// Position of this location inside its segment, as `(x, y, z)` in `0..16`.
    pub fn in_segment(&self, min_y: i32) -> (usize, usize, usize) {
        let mask = SEGMENT_SIZE as i32 - 1;
        (
            (self.block_x() & mask) as usize,
            (self.height_above(min_y) & i64::from(mask)) as usize,
            (self.block_z() & mask) as usize,
        )
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn distance(&self, other: &Location) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }
}

impl From<DVec3> for Location {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X:{:.2} Y:{:.2} Z:{:.2}", self.x, self.y, self.z)
    }
}
