//! Interactive component router.
//!
//! An [`InteractiveRouter`] maps interactive component callback ids to
//! handlers. Several component types can share one callback id, so routes may
//! be scoped to a specific event type:
//!
//! ```rust,ignore
//! use omnibot_framework::InteractiveRouter;
//! use omnibot_core::{EventScope, simple_reply};
//!
//! let mut router: InteractiveRouter = InteractiveRouter::new();
//!
//! // Any event type with callback id `ping_callback`
//! router.register("ping_callback", |_| simple_reply("pong").into())?;
//!
//! // Only dialog submissions with callback id `ping_callback`
//! router.register_scoped("ping_callback", "dialog_submission", |_| {
//!     simple_reply("submitted").into()
//! })?;
//! ```
//!
//! Lookup checks the bucket for the event's `type` first and falls back to the
//! [`EventScope::Any`] bucket.

use std::collections::HashMap;
use std::fmt;

use tracing::{Level, debug, span};

use crate::handler::{InteractiveHandler, into_interactive_handler};
use omnibot_core::{
    EventScope, HandlerSlot, InteractiveEvent, Response, RouterError, RouterResult,
};

struct InteractiveRoute<R> {
    callback_id: String,
    handler: InteractiveHandler<R>,
}

/// Routes interactive component events to handlers by callback id.
pub struct InteractiveRouter<R = Response> {
    default_route: Option<InteractiveHandler<R>>,
    routes: HashMap<EventScope, Vec<InteractiveRoute<R>>>,
}

impl<R> Default for InteractiveRouter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InteractiveRouter<R> {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            default_route: None,
            routes: HashMap::new(),
        }
    }

    /// Registers a handler for `callback_id` on any event type.
    ///
    /// # Errors
    ///
    /// [`RouterError::CallbackAlreadyDefined`] if `callback_id` is already
    /// registered without an event type.
    pub fn register<F>(&mut self, callback_id: &str, handler: F) -> RouterResult<()>
    where
        F: Fn(&InteractiveEvent) -> R + Send + Sync + 'static,
    {
        self.register_scoped(callback_id, EventScope::Any, handler)
    }

    /// Registers a handler for `callback_id` within `scope`.
    ///
    /// Scopes are checked independently: a callback id may be registered once
    /// for [`EventScope::Any`] and once for each specific event type.
    ///
    /// # Errors
    ///
    /// [`RouterError::CallbackAlreadyDefined`] if `callback_id` is already
    /// registered within `scope`.
    pub fn register_scoped<F>(
        &mut self,
        callback_id: &str,
        scope: impl Into<EventScope>,
        handler: F,
    ) -> RouterResult<()>
    where
        F: Fn(&InteractiveEvent) -> R + Send + Sync + 'static,
    {
        let scope = scope.into();
        let bucket = self.routes.entry(scope.clone()).or_default();

        if bucket.iter().any(|route| route.callback_id == callback_id) {
            return Err(RouterError::CallbackAlreadyDefined {
                callback_id: callback_id.to_owned(),
                scope,
            });
        }

        bucket.push(InteractiveRoute {
            callback_id: callback_id.to_owned(),
            handler: into_interactive_handler(handler),
        });

        debug!(callback_id = callback_id, scope = %scope, "Registered interactive route");
        Ok(())
    }

    /// Sets the handler for events no route matched.
    ///
    /// # Errors
    ///
    /// [`RouterError::HandlerAlreadySet`] if a default handler was already set.
    pub fn set_default<F>(&mut self, handler: F) -> RouterResult<()>
    where
        F: Fn(&InteractiveEvent) -> R + Send + Sync + 'static,
    {
        if self.default_route.is_some() {
            return Err(RouterError::HandlerAlreadySet(HandlerSlot::Default));
        }
        self.default_route = Some(into_interactive_handler(handler));
        Ok(())
    }

    /// Returns whether a default handler is set.
    pub fn has_default(&self) -> bool {
        self.default_route.is_some()
    }

    /// Returns the number of registered routes across all scopes.
    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    fn lookup(&self, scope: &EventScope, callback_id: &str) -> Option<&InteractiveHandler<R>> {
        self.routes
            .get(scope)?
            .iter()
            .find(|route| route.callback_id == callback_id)
            .map(|route| &route.handler)
    }

    fn find(&self, event: &InteractiveEvent) -> Option<&InteractiveHandler<R>> {
        let callback_id = event.callback_id.as_deref()?;

        event
            .event_type
            .as_deref()
            .and_then(|event_type| self.lookup(&EventScope::of(event_type), callback_id))
            .or_else(|| self.lookup(&EventScope::Any, callback_id))
    }

    /// Routes an interactive event to the handler registered for its callback
    /// id, preferring a route scoped to the event's type.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatchedRoute`] if no route matched and no default
    /// handler is set.
    pub fn dispatch(&self, event: &InteractiveEvent) -> RouterResult<R> {
        let span = span!(
            Level::DEBUG,
            "interactive_dispatch",
            callback_id = event.callback_id.as_deref().unwrap_or("<none>"),
            event_type = event.event_type.as_deref().unwrap_or("<none>")
        );
        let _enter = span.enter();

        if let Some(handler) = self.find(event) {
            debug!("Interactive route matched");
            return Ok(handler(event));
        }

        if let Some(default) = &self.default_route {
            debug!("No interactive route matched, using default route");
            return Ok(default(event));
        }

        Err(RouterError::no_match(format!(
            "no route \"{}\" and no default route set",
            event.callback_id.as_deref().unwrap_or_default()
        )))
    }
}

impl<R> fmt::Debug for InteractiveRouter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveRouter")
            .field("route_count", &self.route_count())
            .field("has_default", &self.default_route.is_some())
            .finish()
    }
}
