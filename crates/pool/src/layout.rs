//! Block layout: the padded size and alignment of one pool block

use core::alloc::Layout;
use core::fmt;

use crate::error::{PoolError, PoolResult};

/// Aligns a value up to the nearest multiple of alignment
///
/// # Examples
/// ```
/// use reuse_pool::layout::align_up;
///
/// assert_eq!(align_up(7, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
#[inline(always)]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Size and alignment of one block.
///
/// The size is never zero and is always a multiple of the alignment, so
/// blocks laid out back to back stay aligned and never share an address.
/// Element types that map to the same `BlockLayout` share a block class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockLayout {
    size: usize,
    align: usize,
}

impl BlockLayout {
    /// Block layout for one element of `T`
    #[must_use]
    pub const fn of<T>() -> Self {
        let layout = Layout::new::<T>();
        Self::padded(layout.size(), layout.align())
    }

    /// Block layout for an arbitrary layout
    #[must_use]
    pub const fn from_layout(layout: Layout) -> Self {
        Self::padded(layout.size(), layout.align())
    }

    const fn padded(size: usize, align: usize) -> Self {
        // Zero-sized elements still get a distinct byte each
        let size = if size == 0 { 1 } else { size };
        Self {
            size: align_up(size, align),
            align,
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Layout of a slab holding `capacity` blocks
    pub fn slab_layout(&self, capacity: usize) -> PoolResult<Layout> {
        let total = self
            .size
            .checked_mul(capacity)
            .ok_or_else(|| PoolError::size_overflow(self.size, capacity))?;
        Layout::from_size_align(total, self.align)
            .map_err(|_| PoolError::size_overflow(self.size, capacity))
    }
}

impl fmt::Display for BlockLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B/{}", self.size, self.align)
    }
}
