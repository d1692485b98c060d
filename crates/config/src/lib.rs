//! # reuse-config
//!
//! Reader for `key = value` configuration files whose entries live in a
//! [`reuse_pool::PoolMap`].
//!
//! ## Format
//!
//! - every ASCII whitespace byte on a line is removed, interior ones included
//! - empty lines and lines starting with `#` are skipped
//! - lines without `=` are skipped
//! - the key is everything before the first `=`, the value everything after
//! - a later line for the same key wins
//!
//! ```
//! use reuse_config::ConfigMap;
//!
//! let mut config = ConfigMap::new()?;
//! config.parse_str("# server\nhost = localhost\nport=8080\n")?;
//!
//! assert_eq!(config.get("host"), Some("localhost"));
//! assert_eq!(config.value_or_empty("user"), "");
//! # Ok::<(), reuse_config::ConfigError>(())
//! ```

pub mod core;
pub mod loaders;

pub use crate::core::{ConfigError, ConfigMap, ConfigResult, ConfigResultExt};
pub use crate::loaders::parse_line;
