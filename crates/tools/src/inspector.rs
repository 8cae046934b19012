use mcworld_common::ChunkCoord;
use mcworld_kernel::{LoadProgress, World};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the chunk store for debugging and
/// progress reporting.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state. Walks every column.
    pub fn summary(world: &World) -> WorldSummary {
        let _span = tracing::debug_span!("world_summary").entered();
        let columns = world.columns();
        WorldSummary {
            dimension: world.dimension().name.clone(),
            columns: columns.len(),
            fully_loaded_columns: columns.iter().filter(|(_, c)| c.is_fully_loaded()).count(),
            allocated_segments: columns.iter().map(|(_, c)| c.loaded_segments()).sum(),
            progress: world.load_progress(),
        }
    }

    /// Details of the column at `coord`, if present.
    pub fn inspect_column(world: &World, coord: ChunkCoord) -> Option<ColumnInfo> {
        world.column(coord).map(|column| {
            let non_air_blocks = (0..column.column_size())
                .filter_map(|i| column.with_segment(i, |chunk| chunk.non_air_count()))
                .sum();
            ColumnInfo {
                coord,
                column_size: column.column_size(),
                loaded_segments: column.loaded_segments(),
                fully_loaded: column.is_fully_loaded(),
                non_air_blocks,
            }
        })
    }

    /// All present column coordinates, sorted.
    pub fn list_columns(world: &World) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = world.columns().into_iter().map(|(c, _)| c).collect();
        coords.sort();
        coords
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub dimension: String,
    pub columns: usize,
    pub fully_loaded_columns: usize,
    pub allocated_segments: usize,
    pub progress: LoadProgress,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: dimension={} columns={} fully_loaded={} segments={} | {}",
            self.dimension,
            self.columns,
            self.fully_loaded_columns,
            self.allocated_segments,
            self.progress
        )
    }
}

/// Detailed info about a single column.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub coord: ChunkCoord,
    pub column_size: usize,
    pub loaded_segments: usize,
    pub fully_loaded: bool,
    pub non_air_blocks: usize,
}

impl std::fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {} segments={}/{} non_air={} {}",
            self.coord,
            self.loaded_segments,
            self.column_size,
            self.non_air_blocks,
            if self.fully_loaded { "loaded" } else { "partial" }
        )
    }
}
