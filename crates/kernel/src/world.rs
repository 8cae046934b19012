use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use mcworld_common::ChunkCoord;
use mcworld_registry::{Dimension, DimensionRegistry};
use parking_lot::RwLock;

use crate::chunk::{Chunk, ChunkColumn};
use crate::progress::LoadProgress;

/// One lifetime of world contents: everything `clear` discards at once.
///
/// `known` counts the columns in `columns` and `pending` those not yet fully
/// loaded. Both are adjusted against the same generation as the structural
/// change they describe, so a `clear` racing a writer never splits a column
/// from its count.
#[derive(Default)]
struct Generation {
    columns: DashMap<ChunkCoord, Arc<ChunkColumn>>,
    known: AtomicUsize,
    pending: AtomicUsize,
}

impl Generation {
    fn counted_in(&self, column: &ChunkColumn) {
        self.known.fetch_add(1, Ordering::AcqRel);
        if !column.is_fully_loaded() {
            self.pending.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn counted_out(&self, column: &ChunkColumn) {
        decrement(&self.known);
        if !column.is_fully_loaded() {
            decrement(&self.pending);
        }
    }

    /// Column at `coord`, created with `column_size` segments if absent.
    /// The flag is `true` when this call created it.
    fn column_or_insert(&self, coord: ChunkCoord, column_size: usize) -> (Arc<ChunkColumn>, bool) {
        let mut created = false;
        let entry = self.columns.entry(coord).or_insert_with(|| {
            created = true;
            Arc::new(ChunkColumn::new(column_size))
        });
        let column = Arc::clone(entry.value());
        if created {
            // Counted while the shard is still locked.
            self.counted_in(&column);
            tracing::debug!(%coord, column_size, "column created");
        }
        (column, created)
    }

    /// Mark `column` fully loaded if it is still the one installed at `coord`.
    /// A column detached by `set` or `clear` keeps its state.
    fn mark_loaded(&self, coord: ChunkCoord, column: &Arc<ChunkColumn>) -> bool {
        let Some(entry) = self.columns.get(&coord) else {
            return false;
        };
        if !Arc::ptr_eq(entry.value(), column) {
            return false;
        }
        if column.mark_fully_loaded() {
            decrement(&self.pending);
        }
        true
    }
}

fn decrement(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1));
}

/// The client-side chunk store.
///
/// Maps chunk coordinates to shared [`ChunkColumn`]s. All operations take
/// `&self`: the map is sharded, so writers to one coordinate never block
/// readers of another. Operations on a single coordinate are linearizable;
/// nothing spanning several coordinates is atomic.
///
/// Two counters track load progress: `known` (columns present) and `pending`
/// (present but not fully loaded). Every operation that installs, removes or
/// completes a column keeps them in step.
pub struct World {
    registry: Arc<DimensionRegistry>,
    generation: RwLock<Arc<Generation>>,
}

impl World {
    /// An empty world whose vertical addressing follows `registry`'s current dimension.
    pub fn new(registry: Arc<DimensionRegistry>) -> Self {
        Self {
            registry,
            generation: RwLock::new(Arc::new(Generation::default())),
        }
    }

    pub fn registry(&self) -> &Arc<DimensionRegistry> {
        &self.registry
    }

    /// The dimension used for coordinate math.
    pub fn dimension(&self) -> Arc<Dimension> {
        self.registry.dimension()
    }

    fn generation(&self) -> Arc<Generation> {
        Arc::clone(&*self.generation.read())
    }

    /// Column at `(chunk_x, chunk_z)`, if present.
    pub fn get(&self, chunk_x: i32, chunk_z: i32) -> Option<Arc<ChunkColumn>> {
        self.column(ChunkCoord::new(chunk_x, chunk_z))
    }

    pub fn column(&self, coord: ChunkCoord) -> Option<Arc<ChunkColumn>> {
        self.generation()
            .columns
            .get(&coord)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.generation()
            .columns
            .contains_key(&ChunkCoord::new(chunk_x, chunk_z))
    }

    /// Install, replace or (with `None`) remove the column at a coordinate.
    ///
    /// Installing at a new coordinate counts the column; replacing settles
    /// `pending` for the old and new load state; removing uncounts it.
    pub fn set(&self, chunk_x: i32, chunk_z: i32, column: Option<ChunkColumn>) {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        let generation = self.generation();
        match column {
            Some(column) => {
                // Counted before it becomes visible to writers that may complete it.
                generation.counted_in(&column);
                match generation.columns.insert(coord, Arc::new(column)) {
                    Some(previous) => {
                        generation.counted_out(&previous);
                        tracing::debug!(%coord, "column replaced");
                    }
                    None => tracing::debug!(%coord, "column installed"),
                }
            }
            None => {
                if let Some((_, removed)) = generation.columns.remove(&coord) {
                    generation.counted_out(&removed);
                    tracing::debug!(%coord, "column removed");
                }
            }
        }
    }

    /// Write one segment of the column at `(chunk_x, chunk_z)`.
    ///
    /// The column is created with `column_size` segments if absent; creation is
    /// atomic, so concurrent first writers share one column. `chunk == None`
    /// clears the segment. `load_completed` marks the column fully loaded.
    /// Segment indices outside the column are dropped with a warning.
    pub fn store_chunk(
        &self,
        chunk_x: i32,
        segment: usize,
        chunk_z: i32,
        column_size: usize,
        chunk: Option<Chunk>,
        load_completed: bool,
    ) {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        let generation = self.generation();
        let (column, _) = generation.column_or_insert(coord, column_size);

        if !column.set_segment(segment, chunk) {
            tracing::warn!(
                %coord,
                segment,
                column_size = column.column_size(),
                "segment index outside column, dropped"
            );
        } else {
            tracing::trace!(%coord, segment, "segment stored");
        }
        if load_completed {
            generation.mark_loaded(coord, &column);
        }
    }

    /// Install an empty column at `(chunk_x, chunk_z)` unless one is present.
    /// Returns `true` if a column was created.
    pub fn ensure_column(&self, chunk_x: i32, chunk_z: i32, column_size: usize) -> bool {
        let (_, created) = self
            .generation()
            .column_or_insert(ChunkCoord::new(chunk_x, chunk_z), column_size);
        created
    }

    /// Mark the column at `(chunk_x, chunk_z)` fully loaded.
    /// Returns `false` if no column is present.
    pub fn complete_column(&self, chunk_x: i32, chunk_z: i32) -> bool {
        let coord = ChunkCoord::new(chunk_x, chunk_z);
        let generation = self.generation();
        let Some(column) = generation
            .columns
            .get(&coord)
            .map(|entry| Arc::clone(entry.value()))
        else {
            return false;
        };
        generation.mark_loaded(coord, &column)
    }

    /// Discard every column and reset both counters.
    ///
    /// Writers that already hold the previous generation finish against it and
    /// their effects, counts included, are dropped along with it.
    pub fn clear(&self) {
        let previous = std::mem::take(&mut *self.generation.write());
        tracing::debug!(columns = previous.columns.len(), "world cleared");
    }

    pub fn load_progress(&self) -> LoadProgress {
        let generation = self.generation();
        LoadProgress {
            known: generation.known.load(Ordering::Acquire),
            pending: generation.pending.load(Ordering::Acquire),
        }
    }

    /// Number of columns currently in the map.
    pub fn column_count(&self) -> usize {
        self.generation().columns.len()
    }

    /// Snapshot of every present column, in no particular order.
    pub fn columns(&self) -> Vec<(ChunkCoord, Arc<ChunkColumn>)> {
        self.generation()
            .columns
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("columns", &self.column_count())
            .field("progress", &self.load_progress())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcworld_common::{Block, Material};

    fn world() -> World {
        World::new(Arc::new(DimensionRegistry::new()))
    }

    #[test]
    fn world_starts_empty() {
        let w = world();
        assert_eq!(w.column_count(), 0);
        assert!(w.get(0, 0).is_none());
        assert_eq!(w.load_progress(), LoadProgress::default());
    }

    #[test]
    fn store_chunk_creates_column_on_demand() {
        let w = world();
        w.store_chunk(3, 2, -4, 16, Some(Chunk::new()), false);
        let col = w.get(3, -4).unwrap();
        assert_eq!(col.column_size(), 16);
        assert!(col.has_segment(2));
        assert!(!col.is_fully_loaded());
    }

    #[test]
    fn store_chunk_keeps_existing_column_size() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, None, false);
        w.store_chunk(0, 20, 0, 24, Some(Chunk::new()), false);
        let col = w.get(0, 0).unwrap();
        assert_eq!(col.column_size(), 16);
        assert_eq!(col.loaded_segments(), 0);
    }

    #[test]
    fn empty_column_is_distinct_from_missing() {
        let w = world();
        w.store_chunk(1, 0, 1, 16, None, false);
        assert!(w.contains(1, 1));
        assert_eq!(w.get(1, 1).unwrap().loaded_segments(), 0);
        assert!(!w.contains(1, 2));
    }

    #[test]
    fn store_chunk_none_clears_segment() {
        let w = world();
        w.store_chunk(0, 1, 0, 16, Some(Chunk::filled(Block::new(Material::new(1)))), false);
        w.store_chunk(0, 1, 0, 16, None, false);
        assert!(!w.get(0, 0).unwrap().has_segment(1));
    }

    #[test]
    fn fully_loaded_survives_later_segments() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, Some(Chunk::new()), true);
        w.store_chunk(0, 1, 0, 16, Some(Chunk::new()), false);
        assert!(w.get(0, 0).unwrap().is_fully_loaded());
    }

    #[test]
    fn replacing_column_resets_to_partial() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, Some(Chunk::new()), true);
        w.set(0, 0, None);
        assert!(w.get(0, 0).is_none());
        w.set(0, 0, Some(ChunkColumn::new(16)));
        assert!(!w.get(0, 0).unwrap().is_fully_loaded());
    }

    #[test]
    fn set_replaces_existing_column() {
        let w = world();
        w.store_chunk(5, 0, 5, 16, Some(Chunk::new()), false);
        w.set(5, 5, Some(ChunkColumn::new(8)));
        let col = w.get(5, 5).unwrap();
        assert_eq!(col.column_size(), 8);
        assert_eq!(col.loaded_segments(), 0);
    }

    #[test]
    fn removing_column_adjusts_counters() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, None, false);
        w.store_chunk(1, 0, 0, 16, None, true);
        assert_eq!(w.load_progress(), LoadProgress { known: 2, pending: 1 });

        w.set(0, 0, None);
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 0 });
        w.set(1, 0, None);
        assert_eq!(w.load_progress(), LoadProgress { known: 0, pending: 0 });
        w.set(1, 0, None);
        assert_eq!(w.load_progress(), LoadProgress::default());
    }

    #[test]
    fn out_of_range_segment_is_dropped() {
        let w = world();
        w.store_chunk(0, 99, 0, 16, Some(Chunk::new()), false);
        let col = w.get(0, 0).unwrap();
        assert_eq!(col.loaded_segments(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let w = world();
        for x in 0..4 {
            w.store_chunk(x, 0, 0, 16, Some(Chunk::new()), false);
        }
        w.clear();
        assert_eq!(w.column_count(), 0);
        assert_eq!(w.load_progress(), LoadProgress::default());
        assert_eq!(crate::chunk_loading_status(&w), LoadProgress::default().to_string());
    }

    #[test]
    fn removing_missing_column_keeps_counters() {
        let w = world();
        w.store_chunk(2, 0, 2, 16, None, false);
        w.set(9, 9, None);
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 1 });
    }

    #[test]
    fn installed_column_is_counted_until_removed() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, None, false);
        w.set(5, 5, Some(ChunkColumn::new(16)));
        assert_eq!(w.load_progress(), LoadProgress { known: 2, pending: 2 });
        w.set(5, 5, None);
        assert_eq!(w.column_count(), 1);
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 1 });
    }

    #[test]
    fn replacing_column_settles_pending() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, None, false);
        let loaded = ChunkColumn::new(16);
        loaded.mark_fully_loaded();
        w.set(0, 0, Some(loaded));
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 0 });
        w.set(0, 0, Some(ChunkColumn::new(16)));
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 1 });
    }

    #[test]
    fn completing_column_counts_once() {
        let w = world();
        assert!(w.ensure_column(1, 1, 16));
        assert!(!w.ensure_column(1, 1, 16));
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 1 });
        assert!(w.complete_column(1, 1));
        assert!(w.complete_column(1, 1));
        w.store_chunk(1, 0, 1, 16, None, true);
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 0 });
        assert!(!w.complete_column(4, 4));
    }

    #[test]
    fn detached_column_is_not_completed() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, None, false);
        let held = w.get(0, 0).unwrap();
        w.set(0, 0, None);
        w.store_chunk(0, 0, 0, 16, None, true);
        assert!(!held.is_fully_loaded());
        assert_eq!(w.load_progress(), LoadProgress { known: 1, pending: 0 });
    }

    #[test]
    fn concurrent_first_writers_share_one_column() {
        let w = world();
        let threads = 16;
        std::thread::scope(|s| {
            for i in 0..threads {
                let w = &w;
                s.spawn(move || {
                    w.store_chunk(
                        7,
                        i,
                        -7,
                        threads,
                        Some(Chunk::filled(Block::new(Material::new(i as u16 + 1)))),
                        false,
                    );
                });
            }
        });
        assert_eq!(w.column_count(), 1);
        let col = w.get(7, -7).unwrap();
        assert_eq!(col.loaded_segments(), threads);
        for i in 0..threads {
            assert_eq!(
                col.block(i, 0, 0, 0),
                Some(Block::new(Material::new(i as u16 + 1)))
            );
        }
    }

    #[test]
    fn clear_during_stores_stays_consistent() {
        let w = world();
        std::thread::scope(|s| {
            s.spawn(|| {
                for x in 0..200 {
                    w.store_chunk(x, 0, 0, 4, Some(Chunk::new()), false);
                    w.store_chunk(x, 1, 0, 4, Some(Chunk::new()), true);
                }
            });
            s.spawn(|| {
                for _ in 0..50 {
                    w.clear();
                    let p = w.load_progress();
                    assert!(p.loaded() <= p.known);
                }
            });
        });
        let p = w.load_progress();
        assert_eq!(p.known, w.column_count());
        let partial = w.columns().iter().filter(|(_, c)| !c.is_fully_loaded()).count();
        assert_eq!(p.pending, partial);
    }

    #[test]
    fn readers_do_not_block_other_coordinates() {
        let w = world();
        w.store_chunk(0, 0, 0, 16, Some(Chunk::new()), true);
        let held = w.get(0, 0).unwrap();
        w.store_chunk(1, 0, 1, 16, Some(Chunk::new()), true);
        assert!(held.is_fully_loaded());
        assert!(w.get(1, 1).is_some());
    }
}
