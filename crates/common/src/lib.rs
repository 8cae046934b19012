//! Shared value types: blocks, materials, chunk coordinates and world locations.
//!
//! # Invariants
//! - Every type here is a plain value; none of them own chunk or column data.
//! - Converting a [`Location`] to chunk space is pure and depends only on the
//!   location and the dimension's `min_y`.

pub mod location;
pub mod types;

pub use location::Location;
pub use types::{Block, ChunkCoord, Material};

/// Edge length of a chunk segment, in blocks, along each axis.
pub const SEGMENT_SIZE: usize = 16;

/// Number of blocks held by one chunk segment.
pub const SEGMENT_VOLUME: usize = SEGMENT_SIZE * SEGMENT_SIZE * SEGMENT_SIZE;

pub fn crate_info() -> &'static str {
    "mcworld-common v0.1.0"
}
