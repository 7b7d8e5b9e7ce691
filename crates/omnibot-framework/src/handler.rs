//! Handler types for the omnibot routers.
//!
//! Handlers are plain functions or closures. The routers are generic over the
//! handler return type `R` and never inspect it, so a handler that can fail
//! simply returns a `Result` and its error reaches the caller unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use omnibot_framework::{MessageEvent, RouteParams};
//! use omnibot_core::{Actions, simple_post_message};
//!
//! // Route handler: receives the message and the template's named captures.
//! fn find_user(_message: &MessageEvent, params: &RouteParams) -> Actions {
//!     simple_post_message(format!("found {}", params.get("user").unwrap_or("nobody")))
//! }
//!
//! // Fallback handler: receives only the message.
//! fn unknown(_message: &MessageEvent) -> Actions {
//!     simple_post_message("Unrecognized command.")
//! }
//! ```

use std::sync::Arc;

use omnibot_core::{InteractiveEvent, MessageEvent, RouteParams};

/// A type-erased route handler for the message router.
pub type RouteHandler<R> = Arc<dyn Fn(&MessageEvent, &RouteParams) -> R + Send + Sync>;

/// A type-erased default or help handler for the message router.
pub type MessageHandler<R> = Arc<dyn Fn(&MessageEvent) -> R + Send + Sync>;

/// A type-erased handler for the interactive router.
pub type InteractiveHandler<R> = Arc<dyn Fn(&InteractiveEvent) -> R + Send + Sync>;

/// Boxes a route handler.
pub fn into_route_handler<F, R>(f: F) -> RouteHandler<R>
where
    F: Fn(&MessageEvent, &RouteParams) -> R + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boxes a default or help handler.
pub fn into_message_handler<F, R>(f: F) -> MessageHandler<R>
where
    F: Fn(&MessageEvent) -> R + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boxes an interactive handler.
pub fn into_interactive_handler<F, R>(f: F) -> InteractiveHandler<R>
where
    F: Fn(&InteractiveEvent) -> R + Send + Sync + 'static,
{
    Arc::new(f)
}
