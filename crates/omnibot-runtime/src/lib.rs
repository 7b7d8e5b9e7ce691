//! Omnibot Runtime - application setup for omnibot routers.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `load_config`)
//! - Logging configuration (`LoggingBuilder`, `init_from_config`)
//!
//! ```ignore
//! use omnibot_runtime::{config::load_config, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let mut router = config.router.message_router();
//!     // register routes...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, OmnibotConfig, Profile, RouterConfig, load_config,
    load_config_from_file,
};
pub use logging::{LoggingBuilder, SpanEvents, init_from_config};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
