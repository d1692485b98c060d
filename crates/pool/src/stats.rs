//! Pool statistics

use crate::layout::BlockLayout;

/// Snapshot of one block class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Blocks the slab can ever hold
    pub capacity: usize,
    /// Blocks taken from the slab so far
    pub carved: usize,
    /// Blocks sitting on the free list
    pub free_blocks: usize,
    /// Successful obtains
    pub total_obtains: u64,
    /// Obtains served from the free list
    pub reused: u64,
    /// Releases pushed onto the free list
    pub total_releases: u64,
    /// Releases dropped because of a count other than one
    pub ignored_releases: u64,
    /// Obtains refused with `PoolExhausted`
    pub exhausted: u64,
    /// Size of each block
    pub block_size: usize,
    /// Alignment of each block
    pub block_align: usize,
}

impl PoolStats {
    pub(crate) fn empty(block: BlockLayout, capacity: usize) -> Self {
        Self {
            capacity,
            block_size: block.size(),
            block_align: block.align(),
            ..Self::default()
        }
    }

    /// Blocks currently handed out
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.carved - self.free_blocks
    }

    /// Fraction of obtains served by reuse
    #[must_use]
    pub fn reuse_ratio(&self) -> f64 {
        if self.total_obtains == 0 {
            return 0.0;
        }
        self.reused as f64 / self.total_obtains as f64
    }
}
