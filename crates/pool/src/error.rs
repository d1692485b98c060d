//! Error types for the block pool
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use thiserror::Error;

/// Pool errors
///
/// Caller contract violations (foreign pointers, double release, use after the
/// authority is gone) are not represented here: they are undefined behavior,
/// not reported failures.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// `obtain`/`try_release` called with a count other than one
    #[error("unsupported block count {count}: the pool hands out exactly one block at a time")]
    UnsupportedSize { count: usize },

    /// Free list empty and slab at capacity
    #[error("pool exhausted: all {capacity} blocks of {block_size} bytes are outstanding")]
    PoolExhausted { capacity: usize, block_size: usize },

    #[error("invalid pool configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("slab size overflow: {capacity} blocks of {block_size} bytes")]
    SizeOverflow { block_size: usize, capacity: usize },

    /// The global allocator refused the slab region
    #[error("failed to reserve slab region of {size} bytes aligned to {align}")]
    ReservationFailed { size: usize, align: usize },
}

impl PoolError {
    /// Create unsupported size error
    #[must_use]
    pub fn unsupported_size(count: usize) -> Self {
        Self::UnsupportedSize { count }
    }

    /// Create pool exhausted error
    #[must_use]
    pub fn pool_exhausted(capacity: usize, block_size: usize) -> Self {
        Self::PoolExhausted {
            capacity,
            block_size,
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create size overflow error
    #[must_use]
    pub fn size_overflow(block_size: usize, capacity: usize) -> Self {
        Self::SizeOverflow {
            block_size,
            capacity,
        }
    }

    /// Create reservation failed error
    #[must_use]
    pub fn reservation_failed(size: usize, align: usize) -> Self {
        Self::ReservationFailed { size, align }
    }

    /// Whether a later attempt can succeed without changing the request.
    ///
    /// Only exhaustion qualifies, and only after some outstanding block is
    /// released by the caller; the pool itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedSize { .. } => "POOL:SIZE:UNSUPPORTED",
            Self::PoolExhausted { .. } => "POOL:EXHAUSTED",
            Self::InvalidConfig { .. } => "POOL:CONFIG:INVALID",
            Self::SizeOverflow { .. } => "POOL:SLAB:OVERFLOW",
            Self::ReservationFailed { .. } => "POOL:SLAB:RESERVE",
        }
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
