//! Result type and utilities for configuration operations

use super::error::ConfigError;

/// Standard result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Extension trait for configuration results
pub trait ConfigResultExt<T> {
    /// Convert to option, logging the error if present
    fn log_error(self) -> Option<T>;

    /// Convert to option with custom error handler
    fn handle_error<F>(self, f: F) -> Option<T>
    where
        F: FnOnce(&ConfigError);
}

impl<T> ConfigResultExt<T> for ConfigResult<T> {
    fn log_error(self) -> Option<T> {
        self.handle_error(|e| tracing::error!(code = e.code(), "configuration error: {e}"))
    }

    fn handle_error<F>(self, f: F) -> Option<T>
    where
        F: FnOnce(&ConfigError),
    {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                f(&e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reuse_pool::PoolError;

    #[test]
    fn test_handle_error_sees_error() {
        let result: ConfigResult<u8> = Err(PoolError::pool_exhausted(1, 8).into());
        let mut seen = None;
        assert_eq!(result.handle_error(|e| seen = Some(e.code())), None);
        assert_eq!(seen, Some("POOL:EXHAUSTED"));
    }

    #[test]
    fn test_log_error_passes_value() {
        let result: ConfigResult<u8> = Ok(7);
        assert_eq!(result.log_error(), Some(7));
    }
}
