//! Pool-backed key/value store

use std::fmt;
use std::path::Path;

use reuse_pool::map::Node;
use reuse_pool::{AllocationAuthority, PoolAllocator, PoolConfig, PoolMap, PoolStats};
use tracing::{debug, trace};

use super::result::ConfigResult;
use crate::loaders::{lines, parse_line, read_file};

type Entries = PoolMap<String, String, PoolAllocator<(String, String)>>;

/// Parsed configuration entries.
///
/// Every entry occupies one block of the map's node pool, so the number of
/// distinct keys is bounded by the pool capacity.
pub struct ConfigMap {
    entries: Entries,
}

impl ConfigMap {
    /// Empty map with the default pool (1024 entries)
    pub fn new() -> ConfigResult<Self> {
        Self::with_pool_config(PoolConfig::default())
    }

    pub fn with_pool_config(config: PoolConfig) -> ConfigResult<Self> {
        Ok(Self::with_allocator(PoolAllocator::with_config(config)?))
    }

    /// Empty map drawing entries from an existing pool
    pub fn with_allocator(alloc: PoolAllocator<(String, String)>) -> Self {
        Self {
            entries: PoolMap::new_in(alloc),
        }
    }

    /// Read and apply the file at `path`; returns the number of entry lines applied.
    ///
    /// The file is read as raw bytes, so a line that is not valid UTF-8 does
    /// not spoil the rest of the file.
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `Pool` when the entry pool is full.
    /// Lines applied before a pool failure stay in the map.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<usize> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        let applied = self.parse_bytes(&bytes)?;
        debug!(path = %path.display(), applied, entries = self.len(), "parsed config file");
        Ok(applied)
    }

    /// Apply every `key=value` line of `text`; returns the number of entry lines applied
    pub fn parse_str(&mut self, text: &str) -> ConfigResult<usize> {
        self.parse_bytes(text.as_bytes())
    }

    /// Apply every `key=value` line of raw `bytes`; returns the number of entry lines applied
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> ConfigResult<usize> {
        let mut applied = 0;
        for (number, raw) in lines(bytes).enumerate() {
            let Some((key, value)) = parse_line(raw) else {
                trace!(line = number + 1, "skipped config line");
                continue;
            };
            self.entries.insert(key, value)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or the empty string when it is absent
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Statistics of the pool class holding the entries
    pub fn pool_stats(&self) -> PoolStats {
        self.entries
            .allocator()
            .rebind::<Node<String, String>>()
            .stats()
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
