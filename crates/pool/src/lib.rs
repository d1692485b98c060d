//! # reuse-pool
//!
//! Fixed-capacity block pool that recycles equally-sized memory blocks
//! instead of asking the global allocator for every object.
//!
//! The crate is built from three layers:
//! - [`slab`] - a capacity-bounded region of blocks, reserved once and never
//!   relocated
//! - [`free_list`] - a LIFO stack of released block addresses
//! - [`allocator`] - the [`AllocationAuthority`] contract and its pooled
//!   implementation, [`PoolAllocator`]
//!
//! On top of the contract sit an ownership handle ([`PoolBox`]) and
//! node-based containers ([`PoolMap`], [`PoolSet`]) that obtain their
//! internal nodes through a rebound authority.
//!
//! ## Quick Start
//!
//! ```rust
//! use reuse_pool::prelude::*;
//!
//! let pool = PoolAllocator::<u64>::with_capacity(2)?;
//!
//! let a = pool.obtain(1)?;
//! let b = pool.obtain(1)?;
//! assert!(pool.obtain(1).is_err());
//!
//! // SAFETY: `a` came from `pool` and is released exactly once.
//! unsafe { pool.release(a, 1) };
//! assert_eq!(pool.obtain(1)?, a);
//! # unsafe { pool.release(a, 1); pool.release(b, 1); }
//! # Ok::<(), reuse_pool::PoolError>(())
//! ```
//!
//! ## Threading
//!
//! Every handle shares its authority through an `Rc`, so handles are neither
//! `Send` nor `Sync`. Callers that need a pool on several threads build one
//! pool per thread.

#![allow(unsafe_code)]
// Pointer casts from `u8` blocks to element types are aligned by construction
#![allow(clippy::cast_ptr_alignment)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod free_list;
pub mod hook;
pub mod layout;
pub mod map;
pub mod pool_box;
pub mod set;
pub mod slab;
pub mod stats;

mod authority;

pub use allocator::{AllocationAuthority, HeapAuthority, PoolAllocator};
pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use hook::{NoopHook, PoolEventKind, PoolHook, TracingHook};
pub use layout::BlockLayout;
pub use map::PoolMap;
pub use pool_box::PoolBox;
pub use set::PoolSet;
pub use stats::PoolStats;

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::allocator::{AllocationAuthority, HeapAuthority, PoolAllocator};
    pub use crate::config::PoolConfig;
    pub use crate::error::{PoolError, PoolResult};
    pub use crate::hook::{NoopHook, PoolEventKind, PoolHook, TracingHook};
    pub use crate::layout::BlockLayout;
    pub use crate::map::PoolMap;
    pub use crate::pool_box::PoolBox;
    pub use crate::set::PoolSet;
    pub use crate::stats::PoolStats;
}
