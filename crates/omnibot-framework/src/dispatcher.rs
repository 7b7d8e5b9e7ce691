//! Top-level dispatcher for omnibot payloads.
//!
//! The [`OmnibotRouter`] forwards each payload to the router configured for
//! its `omnibot_payload_type`:
//!
//! | Payload type            | Router                  |
//! |-------------------------|-------------------------|
//! | `message`, `reaction`   | [`MessageRouter`]       |
//! | `interactive_component` | [`InteractiveRouter`]   |
//!
//! ```rust,ignore
//! use omnibot_framework::{InteractiveRouter, MessageRouter, OmnibotRouter};
//!
//! let message_router = MessageRouter::new().with_help("This bot is used for pings and pongs.");
//! let interactive_router = InteractiveRouter::new();
//!
//! let router = OmnibotRouter::new()
//!     .with_message_router(message_router)
//!     .with_interactive_router(interactive_router);
//!
//! // In the webhook handler of your HTTP server:
//! let ret = router.dispatch(&payload)?;
//! ```
//!
//! # Tower Service Integration
//!
//! `OmnibotRouter` implements `tower::Service<serde_json::Value>`, so it can
//! be wrapped in Tower middleware by the HTTP layer that receives omnibot's
//! webhooks. The service is always ready and resolves immediately.

use std::fmt;
use std::future::{Ready, ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::Value;
use tower::Service;
use tracing::{Level, debug, span};

use crate::interactive::InteractiveRouter;
use crate::message::MessageRouter;
use omnibot_core::{
    Actions, InteractiveEvent, MessageEvent, OmnibotEvent, PAYLOAD_TYPE_KEY, PayloadType,
    Response, RouterError, RouterResult,
};

/// Forwards omnibot payloads to a message router or an interactive router.
///
/// The routers are held behind `Arc`, so an `OmnibotRouter` is cheap to clone
/// and the same routers can be shared with other dispatchers.
pub struct OmnibotRouter<R = Response> {
    message_router: Option<Arc<MessageRouter<R>>>,
    interactive_router: Option<Arc<InteractiveRouter<R>>>,
}

impl<R> Default for OmnibotRouter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for OmnibotRouter<R> {
    fn clone(&self) -> Self {
        Self {
            message_router: self.message_router.clone(),
            interactive_router: self.interactive_router.clone(),
        }
    }
}

impl<R> OmnibotRouter<R> {
    /// Creates a dispatcher with no routers configured.
    pub fn new() -> Self {
        Self {
            message_router: None,
            interactive_router: None,
        }
    }

    /// Sets the router for `message` and `reaction` payloads.
    pub fn with_message_router(mut self, router: impl Into<Arc<MessageRouter<R>>>) -> Self {
        self.message_router = Some(router.into());
        self
    }

    /// Sets the router for `interactive_component` payloads.
    pub fn with_interactive_router(
        mut self,
        router: impl Into<Arc<InteractiveRouter<R>>>,
    ) -> Self {
        self.interactive_router = Some(router.into());
        self
    }

    /// Returns the configured message router.
    pub fn message_router(&self) -> Option<&MessageRouter<R>> {
        self.message_router.as_deref()
    }

    /// Returns the configured interactive router.
    pub fn interactive_router(&self) -> Option<&InteractiveRouter<R>> {
        self.interactive_router.as_deref()
    }
}

impl<R: From<Actions>> OmnibotRouter<R> {
    /// Dispatches a raw omnibot payload.
    ///
    /// The payload type tag is checked before the payload is decoded, so a
    /// payload with no configured router is rejected as unsupported even if
    /// it is otherwise malformed.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnsupportedPayload`] if the tag is missing, unknown,
    ///   or has no router configured
    /// - [`RouterError::MalformedPayload`] if the payload does not decode
    /// - Any error of the selected router's `dispatch`
    pub fn dispatch(&self, payload: &Value) -> RouterResult<R> {
        let raw_type = payload.get(PAYLOAD_TYPE_KEY).and_then(Value::as_str);
        let span = span!(
            Level::DEBUG,
            "dispatch",
            payload_type = raw_type.unwrap_or("<missing>")
        );
        let _enter = span.enter();

        match PayloadType::of(payload) {
            Some(PayloadType::Message | PayloadType::Reaction) => {
                if let Some(router) = &self.message_router {
                    debug!("Forwarding to message router");
                    return router.dispatch(&MessageEvent::from_value(payload)?);
                }
            }
            Some(PayloadType::InteractiveComponent) => {
                if let Some(router) = &self.interactive_router {
                    debug!("Forwarding to interactive router");
                    return router.dispatch(&InteractiveEvent::from_value(payload)?);
                }
            }
            None => {}
        }

        Err(RouterError::unsupported(raw_type))
    }

    /// Dispatches an already decoded event.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnsupportedPayload`] if no router is configured for the
    /// event's payload type, or any error of the selected router's `dispatch`.
    pub fn dispatch_event(&self, event: &OmnibotEvent) -> RouterResult<R> {
        match (event, &self.message_router, &self.interactive_router) {
            (OmnibotEvent::Message(message) | OmnibotEvent::Reaction(message), Some(router), _) => {
                router.dispatch(message)
            }
            (OmnibotEvent::InteractiveComponent(interactive), _, Some(router)) => {
                router.dispatch(interactive)
            }
            _ => Err(RouterError::unsupported(Some(event.payload_type().as_str()))),
        }
    }
}

impl<R: From<Actions>> Service<Value> for OmnibotRouter<R> {
    type Response = R;
    type Error = RouterError;
    type Future = Ready<RouterResult<R>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, payload: Value) -> Self::Future {
        ready(self.dispatch(&payload))
    }
}

impl<R> fmt::Debug for OmnibotRouter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmnibotRouter")
            .field("message_router", &self.message_router)
            .field("interactive_router", &self.interactive_router)
            .finish()
    }
}
