//! Error types for omnibot routing.
//!
//! Every failure the routers produce is a configuration or usage error that is
//! surfaced synchronously. Errors raised by user handlers are not represented
//! here; they travel inside the handler's own return type.

use std::fmt;

use thiserror::Error;

use crate::event::{EventScope, MatchType};

/// The single-set handler slots on a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    /// Fallback handler invoked when no route matched.
    Default,
    /// Custom help renderer.
    Help,
}

impl HandlerSlot {
    /// Returns the slot name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Help => "help",
        }
    }
}

impl fmt::Display for HandlerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while registering routes or dispatching events.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A structurally equal route pattern already exists for this match type.
    #[error("route '{rule}' is already defined for match type '{match_type}'")]
    RouteAlreadyDefined {
        /// The template that was registered twice.
        rule: String,
        /// The bucket the template was registered into.
        match_type: MatchType,
    },

    /// The callback id already exists in this event scope.
    #[error("callback '{callback_id}' is already defined for {scope}")]
    CallbackAlreadyDefined {
        /// The duplicated callback id.
        callback_id: String,
        /// The scope the callback was registered into.
        scope: EventScope,
    },

    /// A default or help handler was set a second time.
    #[error("a {0} route has already been set")]
    HandlerAlreadySet(HandlerSlot),

    /// A route template could not be compiled.
    #[error("invalid route pattern '{rule}': {source}")]
    InvalidPattern {
        /// The offending template.
        rule: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Nothing matched and no fallback was configured.
    #[error("no matched route: {0}")]
    NoMatchedRoute(String),

    /// The payload type tag is missing, unknown, or has no router configured.
    #[error(
        "payload type '{}' is currently unsupported",
        .payload_type.as_deref().unwrap_or("<missing>")
    )]
    UnsupportedPayload {
        /// The raw `omnibot_payload_type` value, if one was present.
        payload_type: Option<String>,
    },

    /// The payload could not be decoded into the expected event shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl RouterError {
    /// Creates a no-match error with the given description.
    pub fn no_match(msg: impl Into<String>) -> Self {
        Self::NoMatchedRoute(msg.into())
    }

    /// Creates an unsupported-payload error.
    pub fn unsupported(payload_type: Option<&str>) -> Self {
        Self::UnsupportedPayload {
            payload_type: payload_type.map(str::to_owned),
        }
    }

    /// Returns `true` for the "already defined" family: duplicate routes,
    /// duplicate callbacks and re-set default/help handlers.
    pub fn is_already_defined(&self) -> bool {
        matches!(
            self,
            Self::RouteAlreadyDefined { .. }
                | Self::CallbackAlreadyDefined { .. }
                | Self::HandlerAlreadySet(_)
        )
    }
}

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;
