use std::collections::HashSet;
use std::sync::Arc;

use mcworld_common::{Block, ChunkCoord, Location};
use mcworld_kernel::{Chunk, World};
use mcworld_registry::{Dimension, DimensionRegistry, RegistryError, Tag};

/// Feed behaviour across session transitions.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Discard all columns when the server moves the player to another dimension.
    pub clear_on_respawn: bool,
    /// Keep registered dimension types across a disconnect.
    pub keep_registry_on_disconnect: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            clear_on_respawn: true,
            keep_registry_on_disconnect: true,
        }
    }
}

/// Errors surfaced to the decoder.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("column {0} completed without being announced")]
    ColumnNotAnnounced(ChunkCoord),
}

/// Running totals for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct FeedStats {
    pub columns_received: usize,
    pub segments_stored: usize,
    pub columns_unloaded: usize,
    pub block_updates: usize,
    pub resets: usize,
}

/// Applies decoded packets to a [`World`] and its [`DimensionRegistry`].
///
/// Driven from the single network thread; the world it feeds is shared with
/// any number of reader threads through [`world`](Self::world).
pub struct WorldFeed {
    pub config: FeedConfig,
    registry: Arc<DimensionRegistry>,
    world: Arc<World>,
    in_flight: HashSet<ChunkCoord>,
    stats: FeedStats,
}

impl WorldFeed {
    pub fn new(registry: Arc<DimensionRegistry>, config: FeedConfig) -> Self {
        let world = Arc::new(World::new(Arc::clone(&registry)));
        Self {
            config,
            registry,
            world,
            in_flight: HashSet::new(),
            stats: FeedStats::default(),
        }
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn registry(&self) -> &Arc<DimensionRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    /// Join a world: register dimension types, then enter `dimension`.
    ///
    /// `registry_payload` is the synchronized registry when the server sends
    /// one; without it the built-in defaults are loaded.
    pub fn login(
        &mut self,
        registry_payload: Option<&Tag>,
        dimension: &str,
    ) -> Result<Arc<Dimension>, FeedError> {
        let _span = tracing::info_span!("feed_login", dimension).entered();
        match registry_payload {
            Some(payload) => self.registry.store_dimension_list(payload)?,
            None => self.registry.load_default_dimensions()?,
        };
        self.reset_world();
        let dim = self.registry.set_dimension(dimension)?;
        tracing::info!(dimension = %dim.name, min_y = dim.min_y, height = dim.height, "joined world");
        Ok(dim)
    }

    /// Register a single dimension type sent alongside the join packet.
    pub fn store_dimension(&mut self, name: &str, definition: &Tag) -> Result<(), FeedError> {
        self.registry.store_one_dimension(name, definition)?;
        Ok(())
    }

    /// Move to another dimension.
    pub fn respawn(&mut self, dimension: &str) -> Result<Arc<Dimension>, FeedError> {
        let dim = self.registry.set_dimension(dimension)?;
        if self.config.clear_on_respawn {
            self.reset_world();
        }
        tracing::info!(dimension = %dim.name, "respawned");
        Ok(dim)
    }

    /// Apply a full column: every segment of the current dimension's height,
    /// bottom up. Missing trailing segments are stored as empty.
    pub fn receive_column(&mut self, chunk_x: i32, chunk_z: i32, segments: Vec<Option<Chunk>>) {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        let column_size = self.registry.dimension().column_size();
        if segments.len() > column_size {
            tracing::warn!(
                %coord,
                received = segments.len(),
                column_size,
                "column has more segments than the dimension allows"
            );
        }

        self.in_flight.remove(&coord);
        let mut segments = segments.into_iter();
        for index in 0..column_size.max(1) {
            let chunk = segments.next().flatten();
            self.world.store_chunk(
                chunk_x,
                index,
                chunk_z,
                column_size,
                chunk,
                index + 1 >= column_size,
            );
        }

        self.stats.columns_received += 1;
        self.stats.segments_stored += column_size;
        tracing::debug!(%coord, "column received");
    }

    /// Start a column delivered one segment at a time. An empty column is
    /// installed right away, so it counts as pending until completed or unloaded.
    pub fn begin_column(&mut self, chunk_x: i32, chunk_z: i32) {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        if !self.in_flight.insert(coord) {
            return;
        }
        let column_size = self.registry.dimension().column_size();
        if self.world.ensure_column(chunk_x, chunk_z, column_size) {
            tracing::trace!(%coord, "column announced");
        }
    }

    /// Store one segment, announcing the column first if needed.
    pub fn store_segment(&mut self, chunk_x: i32, index: usize, chunk_z: i32, chunk: Option<Chunk>) {
        self.begin_column(chunk_x, chunk_z);
        let column_size = self.registry.dimension().column_size();
        self.world
            .store_chunk(chunk_x, index, chunk_z, column_size, chunk, false);
        self.stats.segments_stored += 1;
    }

    /// Finish a column started with [`begin_column`](Self::begin_column).
    pub fn complete_column(&mut self, chunk_x: i32, chunk_z: i32) -> Result<(), FeedError> {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        if !self.in_flight.remove(&coord) {
            return Err(FeedError::ColumnNotAnnounced(coord));
        }
        if !self.world.complete_column(chunk_x, chunk_z) {
            let column_size = self.registry.dimension().column_size();
            self.world
                .store_chunk(chunk_x, 0, chunk_z, column_size, None, true);
        }
        self.stats.columns_received += 1;
        Ok(())
    }

    /// Forget a column the server no longer tracks.
    pub fn unload_column(&mut self, chunk_x: i32, chunk_z: i32) {
        self.in_flight.remove(&ChunkCoord::new(chunk_x, chunk_z));
        self.world.set(chunk_x, chunk_z, None);
        self.stats.columns_unloaded += 1;
    }

    /// A single block changed server-side.
    pub fn block_change(&mut self, location: &Location, block: Block) {
        self.world.set_block(location, block);
        self.stats.block_updates += 1;
    }

    /// The connection ended.
    pub fn disconnect(&mut self) {
        self.reset_world();
        if !self.config.keep_registry_on_disconnect {
            self.registry.clear();
        }
        tracing::info!("disconnected, world state discarded");
    }

    fn reset_world(&mut self) {
        self.in_flight.clear();
        self.world.clear();
        self.stats.resets += 1;
    }
}
