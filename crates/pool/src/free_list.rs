//! LIFO stack of released block addresses

use core::ptr::NonNull;

/// Released blocks awaiting reuse, most recently released on top.
///
/// No ownership validation happens here: the caller guarantees that every
/// pushed address came from the owning slab and is not already present.
#[derive(Debug, Default)]
pub struct FreeList {
    stack: Vec<NonNull<u8>>,
}

impl FreeList {
    /// Free list able to hold `capacity` addresses without reallocating
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, block: NonNull<u8>) {
        self.stack.push(block);
    }

    /// Remove the most recently pushed address
    #[inline]
    pub fn pop(&mut self) -> Option<NonNull<u8>> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
