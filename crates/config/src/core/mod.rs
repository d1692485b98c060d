//! Core configuration types

mod config;
mod error;
mod result;

pub use config::ConfigMap;
pub use error::ConfigError;
pub use result::{ConfigResult, ConfigResultExt};
