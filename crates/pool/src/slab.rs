//! Slab storage: one contiguous region of equally sized blocks
//!
//! # Safety
//!
//! The region is reserved from the global allocator once, at construction,
//! for the full capacity. Blocks are carved from the front in order and the
//! region is never grown, shrunk or moved, so every address handed out stays
//! valid until the slab is dropped.
//!
//! ## Invariants
//!
//! - `carved <= capacity`, and `carved` never decreases
//! - Block `i` lives at `base + i * block.size()` and is aligned to `block.align()`
//! - The region is returned to the global allocator only in `Drop`

use core::alloc::Layout;
use core::ptr::{self, NonNull};
use std::alloc;

use tracing::debug;

use crate::error::{PoolError, PoolResult};
use crate::layout::BlockLayout;

/// Capacity-bounded region of uninitialized blocks
pub struct Slab {
    base: NonNull<u8>,
    region: Layout,
    block: BlockLayout,
    capacity: usize,
    carved: usize,
}

impl Slab {
    /// Reserve a region for `capacity` blocks of `block`
    ///
    /// # Errors
    /// - `InvalidConfig` when `capacity` is zero
    /// - `SizeOverflow` when the region size does not fit in `isize`
    /// - `ReservationFailed` when the global allocator returns null
    pub fn reserve(block: BlockLayout, capacity: usize, fill: Option<u8>) -> PoolResult<Self> {
        if capacity == 0 {
            return Err(PoolError::invalid_config("capacity must be at least one block"));
        }

        let region = block.slab_layout(capacity)?;

        // SAFETY: region has non-zero size (block size >= 1, capacity >= 1)
        // and a valid power-of-two alignment taken from a `Layout`.
        let raw = unsafe { alloc::alloc(region) };
        let base = NonNull::new(raw)
            .ok_or_else(|| PoolError::reservation_failed(region.size(), region.align()))?;

        if let Some(pattern) = fill {
            // SAFETY: base is valid for writes of region.size() bytes (just allocated).
            unsafe { ptr::write_bytes(base.as_ptr(), pattern, region.size()) };
        }

        debug!(
            block = %block,
            capacity,
            bytes = region.size(),
            "reserved slab region"
        );

        Ok(Self {
            base,
            region,
            block,
            capacity,
            carved: 0,
        })
    }

    /// Carve the next block, or `None` once all `capacity` blocks are carved
    pub fn grow(&mut self) -> Option<NonNull<u8>> {
        if self.carved >= self.capacity {
            return None;
        }

        let offset = self.carved * self.block.size();
        // SAFETY: offset < capacity * block.size() == region.size(), so the
        // resulting pointer stays inside the reserved region and is non-null.
        let block = unsafe { NonNull::new_unchecked(self.base.as_ptr().add(offset)) };
        self.carved += 1;
        Some(block)
    }

    /// Whether `ptr` is the start of a block carved from this slab
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        let start = self.base.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= start
            && addr < start + self.carved * self.block.size()
            && (addr - start) % self.block.size() == 0
    }

    pub fn block(&self) -> BlockLayout {
        self.block
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocks taken from the slab so far
    pub fn carved(&self) -> usize {
        self.carved
    }

    pub fn is_full(&self) -> bool {
        self.carved == self.capacity
    }
}

impl Drop for Slab {
    fn drop(&mut self) {
        // SAFETY: base was allocated in `reserve` with exactly `region`.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.region) };
    }
}

impl core::fmt::Debug for Slab {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slab")
            .field("block", &self.block)
            .field("capacity", &self.capacity)
            .field("carved", &self.carved)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_until_full() {
        let mut slab = Slab::reserve(BlockLayout::of::<u32>(), 3, None).unwrap();
        let a = slab.grow().unwrap();
        let b = slab.grow().unwrap();
        let c = slab.grow().unwrap();
        assert!(slab.grow().is_none());
        assert!(slab.is_full());
        assert_eq!(slab.carved(), 3);

        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 4);
        assert_eq!(c.as_ptr() as usize - b.as_ptr() as usize, 4);
    }

    #[test]
    fn test_blocks_aligned() {
        #[repr(align(32))]
        struct Wide {
            _bytes: [u8; 40],
        }

        let mut slab = Slab::reserve(BlockLayout::of::<Wide>(), 4, None).unwrap();
        while let Some(block) = slab.grow() {
            assert_eq!(block.as_ptr() as usize % 32, 0);
        }
    }

    #[test]
    fn test_contains_only_carved_block_starts() {
        let mut slab = Slab::reserve(BlockLayout::of::<u64>(), 2, None).unwrap();
        let a = slab.grow().unwrap();
        assert!(slab.contains(a));

        // SAFETY: a + 1 is inside the reserved region.
        let inner = unsafe { NonNull::new_unchecked(a.as_ptr().add(1)) };
        assert!(!slab.contains(inner));

        // SAFETY: a + 8 is the second (not yet carved) block.
        let next = unsafe { NonNull::new_unchecked(a.as_ptr().add(8)) };
        assert!(!slab.contains(next));
    }

    #[test]
    fn test_carve_fill() {
        let mut slab = Slab::reserve(BlockLayout::of::<[u8; 16]>(), 1, Some(0xBB)).unwrap();
        let block = slab.grow().unwrap();
        // SAFETY: block holds 16 initialized bytes written by the fill.
        let bytes = unsafe { core::slice::from_raw_parts(block.as_ptr(), 16) };
        assert!(bytes.iter().all(|&b| b == 0xBB));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Slab::reserve(BlockLayout::of::<u8>(), 0, None).is_err());
    }
}
