//! Shared bookkeeping behind every handle of one logical pool
//!
//! # Safety
//!
//! `Authority` is the single owner of all slabs. Handles hold it through an
//! `Rc`, so slabs live as long as the longest-lived handle.
//!
//! ## Invariants
//!
//! - One block class per distinct `BlockLayout`, each with its own slab and
//!   free list; classes are never removed
//! - Every address on a class's free list was carved from that class's slab
//! - `RefCell` borrows never span a hook call

use core::cell::RefCell;
use core::ptr::{self, NonNull};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::free_list::FreeList;
use crate::hook::{PoolEventKind, PoolHook};
use crate::layout::BlockLayout;
use crate::slab::Slab;
use crate::stats::PoolStats;

/// Slab and free list serving one block layout
struct BlockClass {
    slab: Slab,
    free: FreeList,
    stats: PoolStats,
}

impl BlockClass {
    fn reserve(block: BlockLayout, config: &PoolConfig) -> PoolResult<Self> {
        Ok(Self {
            slab: Slab::reserve(block, config.capacity, config.carve_fill)?,
            free: FreeList::with_capacity(config.capacity),
            stats: PoolStats::empty(block, config.capacity),
        })
    }

    fn snapshot(&self) -> PoolStats {
        PoolStats {
            carved: self.slab.carved(),
            free_blocks: self.free.len(),
            ..self.stats
        }
    }
}

struct Inner {
    config: PoolConfig,
    hook: Box<dyn PoolHook>,
    classes: RefCell<Vec<BlockClass>>,
}

/// Reference-counted authority shared by copies and rebinds of a handle
#[derive(Clone)]
pub(crate) struct Authority {
    inner: Rc<Inner>,
}

/// Outcome of a release, decided while the class is borrowed
enum Released {
    Pushed,
    UnknownClass,
}

impl Authority {
    pub(crate) fn new(config: PoolConfig, hook: Box<dyn PoolHook>) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(Inner {
                config,
                hook,
                classes: RefCell::new(Vec::new()),
            }),
        })
    }

    pub(crate) fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Reserve the slab for `block` unless it already exists
    pub(crate) fn ensure_class(&self, block: BlockLayout) -> PoolResult<()> {
        let mut classes = self.inner.classes.borrow_mut();
        if !classes.iter().any(|c| c.slab.block() == block) {
            classes.push(BlockClass::reserve(block, &self.inner.config)?);
        }
        Ok(())
    }

    /// Hand out one block: reuse first, carve second, fail when both miss
    pub(crate) fn obtain(&self, block: BlockLayout) -> PoolResult<NonNull<u8>> {
        let (ptr, kind) = {
            let mut classes = self.inner.classes.borrow_mut();
            let index = match classes.iter().position(|c| c.slab.block() == block) {
                Some(index) => index,
                None => {
                    classes.push(BlockClass::reserve(block, &self.inner.config)?);
                    classes.len() - 1
                }
            };
            let class = &mut classes[index];

            if let Some(ptr) = class.free.pop() {
                class.stats.total_obtains += 1;
                class.stats.reused += 1;
                (ptr, PoolEventKind::Reused)
            } else if let Some(ptr) = class.slab.grow() {
                class.stats.total_obtains += 1;
                (ptr, PoolEventKind::Carved)
            } else {
                class.stats.exhausted += 1;
                debug!(block = %block, capacity = class.slab.capacity(), "pool exhausted");
                return Err(PoolError::pool_exhausted(
                    class.slab.capacity(),
                    block.size(),
                ));
            }
        };

        self.inner.hook.on_event(kind, ptr, block);
        Ok(ptr)
    }

    /// Push one block back onto its class's free list.
    ///
    /// # Safety
    /// `ptr` must have been obtained from this authority for `block` and must
    /// not be released twice.
    pub(crate) unsafe fn release(&self, block: BlockLayout, ptr: NonNull<u8>) {
        let outcome = {
            let mut classes = self.inner.classes.borrow_mut();
            match classes.iter_mut().find(|c| c.slab.block() == block) {
                Some(class) => {
                    debug_assert!(class.slab.contains(ptr), "block released to a foreign pool");
                    if let Some(pattern) = self.inner.config.release_fill {
                        // SAFETY: ptr is a block of `block.size()` bytes carved
                        // from this class (caller contract) and no longer in use.
                        unsafe { ptr::write_bytes(ptr.as_ptr(), pattern, block.size()) };
                    }
                    class.free.push(ptr);
                    class.stats.total_releases += 1;
                    Released::Pushed
                }
                None => Released::UnknownClass,
            }
        };

        match outcome {
            Released::Pushed => self.inner.hook.on_event(PoolEventKind::Released, ptr, block),
            Released::UnknownClass => {
                warn!(block = %block, addr = ?ptr.as_ptr(), "release for a block class this pool never reserved; ignored");
            }
        }
    }

    /// Count a release that was dropped because of its count
    pub(crate) fn record_ignored_release(&self, block: BlockLayout, count: usize) {
        warn!(block = %block, count, "release with unsupported count ignored");
        let mut classes = self.inner.classes.borrow_mut();
        if let Some(class) = classes.iter_mut().find(|c| c.slab.block() == block) {
            class.stats.ignored_releases += 1;
        }
    }

    /// Statistics for `block`; an unreserved class reports all zeros
    pub(crate) fn stats(&self, block: BlockLayout) -> PoolStats {
        self.inner
            .classes
            .borrow()
            .iter()
            .find(|c| c.slab.block() == block)
            .map_or_else(
                || PoolStats::empty(block, self.inner.config.capacity),
                BlockClass::snapshot,
            )
    }

    pub(crate) fn class_count(&self) -> usize {
        self.inner.classes.borrow().len()
    }
}

impl core::fmt::Debug for Authority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authority")
            .field("config", &self.inner.config)
            .field("classes", &self.class_count())
            .field("handles", &Rc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
