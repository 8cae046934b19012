use crate::world::World;

/// A point-in-time read of the world's load counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    /// Columns present in the store.
    pub known: usize,
    /// Present columns whose data has not finished arriving.
    pub pending: usize,
}

impl LoadProgress {
    pub fn loaded(&self) -> usize {
        self.known.saturating_sub(self.pending)
    }

    /// Fraction of known columns that finished loading; zero when none are known.
    pub fn ratio(&self) -> f64 {
        if self.known == 0 {
            0.0
        } else {
            self.loaded() as f64 / self.known as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pending == 0
    }
}

impl std::fmt::Display for LoadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk loading status: {:.2}% - {} out of {} load completed",
            self.ratio() * 100.0,
            self.loaded(),
            self.known
        )
    }
}

/// Human-readable load status of `world`.
pub fn chunk_loading_status(world: &World) -> String {
    world.load_progress().to_string()
}
