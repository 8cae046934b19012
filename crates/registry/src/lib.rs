//! Dimension-type registry: normalizes registry payloads into [`Dimension`]
//! values and tracks the currently active dimension.
//!
//! # Invariants
//! - A payload list is parsed completely before any entry is inserted.
//! - Lookups by bare name fall back to the configured default namespace.

mod dimension;
mod error;
mod registry;
mod tag;

pub use dimension::{Dimension, SpawnLightRange};
pub use error::RegistryError;
pub use registry::{DimensionRegistry, RegistryConfig};
pub use tag::Tag;

pub fn crate_info() -> &'static str {
    "mcworld-registry v0.1.0"
}
