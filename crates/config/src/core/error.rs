//! Error types for configuration reading

use std::io;
use std::path::PathBuf;

use reuse_pool::PoolError;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be opened or read
    #[error("cannot open file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The entry pool refused an allocation
    #[error("config storage: {0}")]
    Pool(#[from] PoolError),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable code for matching in logs and callers
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG:IO",
            Self::Pool(inner) => inner.code(),
        }
    }
}
