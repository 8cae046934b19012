//! Developer tooling: world inspector.
//!
//! # Invariants
//! - Tools only read world state; they never mutate it.

mod inspector;

pub use inspector::{ColumnInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "mcworld-tools v0.1.0"
}
