//! Streaming: the entry points a protocol decoder drives as packets arrive.
//!
//! # Invariants
//! - Every column announcement is paired with a completion or an unload, so
//!   load progress can be reported without scanning the store.
//! - Disconnect and respawn discard world contents without corrupting counters.

mod feed;

pub use feed::{FeedConfig, FeedError, FeedStats, WorldFeed};

pub fn crate_info() -> &'static str {
    "mcworld-stream v0.1.0"
}
