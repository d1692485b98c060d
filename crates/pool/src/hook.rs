//! Instrumentation hooks for pool events
//!
//! A hook sees every block that leaves or re-enters the pool. The default
//! hook does nothing, so pools are silent unless a caller asks otherwise.

use core::fmt;
use core::ptr::NonNull;

use crate::layout::BlockLayout;

/// What happened to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolEventKind {
    /// A fresh block was carved from slab storage
    Carved,
    /// A previously released block was handed out again
    Reused,
    /// A block was returned to the free list
    Released,
}

impl fmt::Display for PoolEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carved => write!(f, "carved"),
            Self::Reused => write!(f, "reused"),
            Self::Released => write!(f, "released"),
        }
    }
}

/// Observer of pool events.
///
/// Called after the pool's own bookkeeping is done, so a hook may call back
/// into the pool it observes. `layout` is the block class the address
/// belongs to.
pub trait PoolHook {
    fn on_event(&self, kind: PoolEventKind, block: NonNull<u8>, layout: BlockLayout);
}

/// Default hook that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl PoolHook for NoopHook {
    fn on_event(&self, _kind: PoolEventKind, _block: NonNull<u8>, _layout: BlockLayout) {}
}

/// Hook that emits a `trace` record per event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl PoolHook for TracingHook {
    fn on_event(&self, kind: PoolEventKind, block: NonNull<u8>, layout: BlockLayout) {
        tracing::trace!(
            event = %kind,
            block = ?block.as_ptr(),
            size = layout.size(),
            align = layout.align(),
            "pool block {kind}"
        );
    }
}

impl<F> PoolHook for F
where
    F: Fn(PoolEventKind, NonNull<u8>, BlockLayout),
{
    fn on_event(&self, kind: PoolEventKind, block: NonNull<u8>, layout: BlockLayout) {
        self(kind, block, layout);
    }
}
