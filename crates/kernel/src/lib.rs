//! World kernel: the in-memory chunk store streamed from a server, plus block
//! queries over it.
//!
//! # Invariants
//! - At most one column object is installed per chunk coordinate, even when
//!   several writers create it concurrently.
//! - Unloaded space is never an error: reads resolve to air, writes are dropped.
//! - A column marked fully loaded stays so until it is replaced.

pub mod chunk;
mod progress;
mod query;
pub mod world;

pub use chunk::{Chunk, ChunkColumn};
pub use progress::{LoadProgress, chunk_loading_status};
pub use world::World;

pub fn crate_info() -> &'static str {
    "mcworld-kernel v0.1.0"
}
