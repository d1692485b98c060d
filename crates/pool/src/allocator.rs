//! Allocation authority contract and its implementations
//!
//! [`AllocationAuthority`] is the minimal capability a node-based container
//! needs: obtain one block for its element type, give it back, and derive an
//! authority for an internal node type via [`AllocationAuthority::rebind`].
//!
//! # Safety
//!
//! - `obtain` returns raw, uninitialized storage; constructing a value in it
//!   and destroying that value again is the caller's job
//! - `release` trusts its caller: releasing a foreign pointer, releasing
//!   twice, or using a block after release is undefined behavior
//! - `emplace`/`dispose` pair the storage steps with construction and
//!   destruction for callers that want them together

use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use std::alloc;

use tracing::warn;

use crate::authority::Authority;
use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::hook::{NoopHook, PoolHook};
use crate::layout::BlockLayout;
use crate::stats::PoolStats;

/// Contract between an allocation authority and the containers that use it.
///
/// Only single-element requests are supported: `obtain(1)` and
/// `release(ptr, 1)`.
pub trait AllocationAuthority: Clone {
    /// Element type the authority hands out storage for
    type Value;

    /// The same kind of authority for another element type
    type Rebind<U>: AllocationAuthority<Value = U>;

    /// Obtain raw storage for `count` elements.
    ///
    /// # Errors
    /// - `UnsupportedSize` when `count != 1`
    /// - `PoolExhausted` when the authority has no block left
    fn obtain(&self, count: usize) -> PoolResult<NonNull<Self::Value>>;

    /// Give storage back. A `count` other than one is ignored.
    ///
    /// # Safety
    /// - `ptr` was obtained from this authority (or one equal to it)
    /// - `ptr` is outstanding: not released already
    /// - any value in the block has already been destroyed or moved out
    unsafe fn release(&self, ptr: NonNull<Self::Value>, count: usize);

    /// Authority for `U` derived from this one
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// Obtain one block and move `value` into it
    fn emplace(&self, value: Self::Value) -> PoolResult<NonNull<Self::Value>> {
        let ptr = self.obtain(1)?;
        // SAFETY: ptr is fresh storage, aligned and sized for Self::Value.
        unsafe { ptr.as_ptr().write(value) };
        Ok(ptr)
    }

    /// Destroy the value at `ptr` in place, then release its block
    ///
    /// # Safety
    /// Same as [`release`](Self::release), and `ptr` must hold an initialized
    /// value that is not used afterwards.
    unsafe fn dispose(&self, ptr: NonNull<Self::Value>) {
        // SAFETY: ptr holds an initialized value (caller contract).
        unsafe { ptr::drop_in_place(ptr.as_ptr()) };
        // SAFETY: ptr came from this authority and is outstanding (caller contract).
        unsafe { self.release(ptr, 1) };
    }
}

// ============================================================================
// Pool-backed authority
// ============================================================================

/// Pool-backed allocation authority for `T`.
///
/// Cloning a handle is shallow: the clone shares the same pool. Rebinding to
/// another element type also shares the pool; internally the pool keeps one
/// slab and free list per block layout, so element types of equal layout
/// reuse each other's blocks.
///
/// # Example
/// ```
/// use reuse_pool::prelude::*;
///
/// let strings = PoolAllocator::<String>::with_capacity(4)?;
/// let ptr = strings.emplace(String::from("hello"))?;
///
/// // SAFETY: ptr holds a live String obtained from `strings`.
/// unsafe {
///     assert_eq!(ptr.as_ref(), "hello");
///     strings.dispose(ptr);
/// }
///
/// let nodes = strings.rebind::<(String, u32)>();
/// assert_eq!(strings, nodes);
/// # Ok::<(), PoolError>(())
/// ```
pub struct PoolAllocator<T> {
    authority: Authority,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PoolAllocator<T> {
    /// Pool with the default configuration (1024 blocks)
    pub fn new() -> PoolResult<Self> {
        Self::with_config(PoolConfig::default())
    }

    /// Pool with default settings and `capacity` blocks
    pub fn with_capacity(capacity: usize) -> PoolResult<Self> {
        Self::with_config(PoolConfig::bounded(capacity))
    }

    /// Pool with custom configuration
    pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
        Self::with_hook(config, NoopHook)
    }

    /// Pool with custom configuration reporting events to `hook`.
    ///
    /// The slab for `T` is reserved here; slabs for rebound element types
    /// are reserved by their first obtain.
    pub fn with_hook(config: PoolConfig, hook: impl PoolHook + 'static) -> PoolResult<Self> {
        let authority = Authority::new(config, Box::new(hook))?;
        authority.ensure_class(BlockLayout::of::<T>())?;
        Ok(Self::from_authority(authority))
    }

    fn from_authority(authority: Authority) -> Self {
        Self {
            authority,
            _marker: PhantomData,
        }
    }

    /// Converting constructor: handle for `T` on the pool of `other`
    pub fn from_rebind<U>(other: &PoolAllocator<U>) -> Self {
        Self::from_authority(other.authority.clone())
    }

    /// Strict release: reports a count other than one instead of ignoring it
    ///
    /// # Safety
    /// Same as [`AllocationAuthority::release`].
    pub unsafe fn try_release(&self, ptr: NonNull<T>, count: usize) -> PoolResult<()> {
        if count != 1 {
            return Err(PoolError::unsupported_size(count));
        }
        // SAFETY: forwarded caller contract.
        unsafe { self.authority.release(Self::block(), ptr.cast()) };
        Ok(())
    }

    /// Whether `other` shares this handle's pool
    pub fn same_pool<U>(&self, other: &PoolAllocator<U>) -> bool {
        self.authority.ptr_eq(&other.authority)
    }

    /// Layout of the blocks serving `T`
    pub fn block() -> BlockLayout {
        BlockLayout::of::<T>()
    }

    pub fn config(&self) -> &PoolConfig {
        self.authority.config()
    }

    /// Statistics of the block class serving `T`
    pub fn stats(&self) -> PoolStats {
        self.authority.stats(Self::block())
    }

    pub fn capacity(&self) -> usize {
        self.config().capacity
    }

    pub fn carved(&self) -> usize {
        self.stats().carved
    }

    pub fn free_blocks(&self) -> usize {
        self.stats().free_blocks
    }

    pub fn outstanding(&self) -> usize {
        self.stats().outstanding()
    }

    /// Number of distinct block layouts reserved in the shared pool
    pub fn block_classes(&self) -> usize {
        self.authority.class_count()
    }
}

impl<T> AllocationAuthority for PoolAllocator<T> {
    type Value = T;
    type Rebind<U> = PoolAllocator<U>;

    fn obtain(&self, count: usize) -> PoolResult<NonNull<T>> {
        if count != 1 {
            return Err(PoolError::unsupported_size(count));
        }
        self.authority.obtain(Self::block()).map(NonNull::cast)
    }

    unsafe fn release(&self, ptr: NonNull<T>, count: usize) {
        if count != 1 {
            self.authority.record_ignored_release(Self::block(), count);
            return;
        }
        // SAFETY: forwarded caller contract.
        unsafe { self.authority.release(Self::block(), ptr.cast()) };
    }

    fn rebind<U>(&self) -> PoolAllocator<U> {
        PoolAllocator::from_rebind(self)
    }
}

impl<T> Clone for PoolAllocator<T> {
    fn clone(&self) -> Self {
        Self::from_authority(self.authority.clone())
    }
}

impl<T, U> From<&PoolAllocator<U>> for PoolAllocator<T> {
    fn from(other: &PoolAllocator<U>) -> Self {
        Self::from_rebind(other)
    }
}

impl<T, U> PartialEq<PoolAllocator<U>> for PoolAllocator<T> {
    fn eq(&self, other: &PoolAllocator<U>) -> bool {
        self.same_pool(other)
    }
}

impl<T> Eq for PoolAllocator<T> {}

impl<T> fmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("element", &core::any::type_name::<T>())
            .field("block", &Self::block())
            .field("authority", &self.authority)
            .finish()
    }
}

// ============================================================================
// Heap-backed authority
// ============================================================================

/// Allocation authority over the global allocator.
///
/// Every call goes straight to the heap; nothing is pooled and every
/// instance is interchangeable with every other. Zero-sized values are
/// padded to one byte, as in the pool, so outstanding blocks never alias.
pub struct HeapAuthority<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAuthority<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Heap layout of one element, padded like a pool block so that
    /// zero-sized values still get distinct addresses
    fn block_layout() -> PoolResult<alloc::Layout> {
        BlockLayout::of::<T>().slab_layout(1)
    }
}

impl<T> Default for HeapAuthority<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HeapAuthority<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapAuthority<T> {}

impl<T, U> PartialEq<HeapAuthority<U>> for HeapAuthority<T> {
    fn eq(&self, _other: &HeapAuthority<U>) -> bool {
        true
    }
}

impl<T> Eq for HeapAuthority<T> {}

impl<T> fmt::Debug for HeapAuthority<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapAuthority")
            .field("element", &core::any::type_name::<T>())
            .finish()
    }
}

impl<T> AllocationAuthority for HeapAuthority<T> {
    type Value = T;
    type Rebind<U> = HeapAuthority<U>;

    fn obtain(&self, count: usize) -> PoolResult<NonNull<T>> {
        if count != 1 {
            return Err(PoolError::unsupported_size(count));
        }
        let layout = Self::block_layout()?;
        // SAFETY: block layouts are never zero-sized.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>())
            .ok_or_else(|| PoolError::reservation_failed(layout.size(), layout.align()))
    }

    unsafe fn release(&self, ptr: NonNull<T>, count: usize) {
        if count != 1 {
            warn!(count, "heap release with unsupported count ignored");
            return;
        }
        // obtain fails for a layout that does not fit, so nothing to free
        let Ok(layout) = Self::block_layout() else {
            return;
        };
        // SAFETY: ptr was allocated by `obtain` with this same layout (caller contract).
        unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) };
    }

    fn rebind<U>(&self) -> HeapAuthority<U> {
        HeapAuthority::new()
    }
}
