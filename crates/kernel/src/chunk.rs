use std::sync::atomic::{AtomicBool, Ordering};

use mcworld_common::{Block, SEGMENT_SIZE, SEGMENT_VOLUME};
use parking_lot::RwLock;

/// One 16×16×16 segment of block data.
#[derive(Clone, PartialEq)]
pub struct Chunk {
    blocks: Box<[Block]>,
}

impl Chunk {
    /// A segment filled with air.
    pub fn new() -> Self {
        Self::filled(Block::AIR)
    }

    pub fn filled(block: Block) -> Self {
        Self {
            blocks: vec![block; SEGMENT_VOLUME].into_boxed_slice(),
        }
    }

    /// Build a segment from blocks in `y`, then `z`, then `x` order.
    /// Returns `None` unless exactly one segment's worth of blocks is given.
    pub fn from_blocks(blocks: Vec<Block>) -> Option<Self> {
        (blocks.len() == SEGMENT_VOLUME).then(|| Self {
            blocks: blocks.into_boxed_slice(),
        })
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SEGMENT_SIZE && y < SEGMENT_SIZE && z < SEGMENT_SIZE);
        (y * SEGMENT_SIZE + z) * SEGMENT_SIZE + x
    }

    pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::index(x, y, z)]
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[Self::index(x, y, z)] = block;
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.material.is_air()).count()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("non_air", &self.non_air_count())
            .finish()
    }
}

/// The vertical stack of segments for one chunk coordinate.
///
/// Each segment slot has its own lock: writers to different segments never
/// contend, writers to the same segment are serialized (last write wins).
/// A column with every slot empty is valid and distinct from a missing column.
#[derive(Debug)]
pub struct ChunkColumn {
    segments: Box<[RwLock<Option<Chunk>>]>,
    fully_loaded: AtomicBool,
}

impl ChunkColumn {
    /// An empty, partially loaded column of `column_size` segments.
    pub fn new(column_size: usize) -> Self {
        Self {
            segments: (0..column_size).map(|_| RwLock::new(None)).collect(),
            fully_loaded: AtomicBool::new(false),
        }
    }

    pub fn column_size(&self) -> usize {
        self.segments.len()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded.load(Ordering::Acquire)
    }

    /// One-way: a column never returns to partial. Returns `true` only for
    /// the call that made the transition.
    pub fn mark_fully_loaded(&self) -> bool {
        !self.fully_loaded.swap(true, Ordering::AcqRel)
    }

    /// Replace (or clear, with `None`) a whole segment.
    /// Returns `false` if `index` is outside the column.
    pub fn set_segment(&self, index: usize, chunk: Option<Chunk>) -> bool {
        match self.segments.get(index) {
            Some(slot) => {
                *slot.write() = chunk;
                true
            }
            None => false,
        }
    }

    pub fn has_segment(&self, index: usize) -> bool {
        self.segments
            .get(index)
            .is_some_and(|slot| slot.read().is_some())
    }

    /// Run `f` against a segment while holding its read lock.
    pub fn with_segment<R>(&self, index: usize, f: impl FnOnce(&Chunk) -> R) -> Option<R> {
        let slot = self.segments.get(index)?.read();
        (*slot).as_ref().map(f)
    }

    /// Block at an in-segment position, or `None` if the segment is absent.
    pub fn block(&self, index: usize, x: usize, y: usize, z: usize) -> Option<Block> {
        self.with_segment(index, |chunk| chunk.block(x, y, z))
    }

    /// Write one block, allocating an empty segment first if needed.
    /// Returns `false` if `index` is outside the column.
    pub fn set_block(&self, index: usize, x: usize, y: usize, z: usize, block: Block) -> bool {
        let Some(slot) = self.segments.get(index) else {
            return false;
        };
        slot.write()
            .get_or_insert_with(Chunk::new)
            .set_block(x, y, z, block);
        true
    }

    /// Number of segments holding data.
    pub fn loaded_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.read().is_some()).count()
    }
}
