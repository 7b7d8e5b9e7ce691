//! Configuration module for omnibot applications.
//!
//! This module provides layered configuration loading (defaults, files,
//! environment) for the router settings and logging options.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, OmnibotConfig, RouterConfig, SpanEventConfig,
};
pub use validation::validate_config;
