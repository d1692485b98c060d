//! Pool configuration

use crate::error::{PoolError, PoolResult};

/// Default number of blocks per block class
pub const DEFAULT_CAPACITY: usize = 1024;

/// Environment variable read by [`PoolConfig::from_env`]
pub const CAPACITY_ENV: &str = "REUSE_POOL_CAPACITY";

/// Configuration for a pool authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Blocks per block class; fixed once the slab is reserved
    pub capacity: usize,

    /// Fill pattern byte written over a block when it is released.
    ///
    /// `Some(_)` guarantees that a reused block carries nothing of the value
    /// that previously occupied it.
    pub release_fill: Option<u8>,

    /// Fill pattern byte written over the whole slab when it is reserved
    pub carve_fill: Option<u8>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            release_fill: Some(0x00),
            carve_fill: None,
        }
    }
}

impl PoolConfig {
    /// Default configuration with a specific capacity
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Debug configuration - recognizable patterns in fresh and released blocks
    #[must_use]
    pub fn debug() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            release_fill: Some(0xDD),
            carve_fill: Some(0xBB),
        }
    }

    /// Performance configuration - no scrubbing.
    ///
    /// Released blocks keep whatever bytes the dropped value left behind.
    #[must_use]
    pub fn performance() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            release_fill: None,
            carve_fill: None,
        }
    }

    /// Default configuration with the capacity taken from `REUSE_POOL_CAPACITY`
    /// when it is set.
    pub fn from_env() -> PoolResult<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(CAPACITY_ENV) {
            config.capacity = parse_capacity(&raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_release_fill(mut self, fill: Option<u8>) -> Self {
        self.release_fill = fill;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_carve_fill(mut self, fill: Option<u8>) -> Self {
        self.carve_fill = fill;
        self
    }

    /// Check the configuration before any storage is reserved
    pub fn validate(&self) -> PoolResult<()> {
        if self.capacity == 0 {
            return Err(PoolError::invalid_config("capacity must be at least one block"));
        }
        Ok(())
    }
}

/// Parse a capacity value as found in the environment or on a command line
pub fn parse_capacity(raw: &str) -> PoolResult<usize> {
    let capacity = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| PoolError::invalid_config(format!("capacity {raw:?}: {e}")))?;
    if capacity == 0 {
        return Err(PoolError::invalid_config("capacity must be at least one block"));
    }
    Ok(capacity)
}
