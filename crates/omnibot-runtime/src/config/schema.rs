//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use omnibot_framework::MessageRouter;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmnibotConfig {
    /// Message router settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Router
// =============================================================================

/// Message router settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Header text of the generated help.
    #[serde(default)]
    pub help: String,

    /// Whether unmatched messages fall back to help when no default handler
    /// is set.
    #[serde(default = "default_help_as_default")]
    pub help_as_default: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            help: String::new(),
            help_as_default: default_help_as_default(),
        }
    }
}

fn default_help_as_default() -> bool {
    true
}

impl RouterConfig {
    /// Creates an empty message router with these settings.
    pub fn message_router<R>(&self) -> MessageRouter<R> {
        MessageRouter::new()
            .with_help(self.help.clone())
            .help_as_default(self.help_as_default)
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level name as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Write to `LoggingConfig::file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, required when `output` is `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    #[serde(default)]
    pub file_location: bool,

    /// Per-module level overrides, e.g. `omnibot_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibot_core::{Actions, MatchType, MessageEvent};
    use serde_json::{Value, json};

    #[test]
    fn test_router_defaults() {
        let config: OmnibotConfig = serde_json::from_value(json!({})).unwrap();
        assert!(config.router.help.is_empty());
        assert!(config.router.help_as_default);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.output, LogOutput::Stdout);
    }

    #[test]
    fn test_message_router_from_config() {
        let config = RouterConfig {
            help: "Pings and pongs.".into(),
            help_as_default: true,
        };
        let router = config.message_router::<Value>();
        assert_eq!(router.help_message(), "Pings and pongs.");

        let help = router
            .dispatch(&MessageEvent::new(MatchType::Command, "anything"))
            .unwrap();
        assert_eq!(help, Value::from(router.render_help()));

        let config = RouterConfig {
            help_as_default: false,
            ..RouterConfig::default()
        };
        let router = config.message_router::<Actions>();
        assert!(!router.is_help_default());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let err = serde_json::from_value::<LoggingConfig>(json!({"level": "loud"}));
        assert!(err.is_err());
    }
}
