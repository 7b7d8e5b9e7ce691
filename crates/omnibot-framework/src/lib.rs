//! # Omnibot Framework
//!
//! Routers that map omnibot payloads to handler functions.
//!
//! This layer provides:
//! - [`MessageRouter`] for command, regex and reaction messages, with
//!   generated help
//! - [`InteractiveRouter`] for interactive component callbacks
//! - [`OmnibotRouter`], which forwards payloads to either router by payload
//!   type and can be used as a `tower::Service`
//!
//! Routes are registered once at startup through `&mut self` methods;
//! dispatching only needs `&self`, so a fully built router can be shared
//! across threads.

pub mod dispatcher;
pub mod handler;
pub mod interactive;
pub mod message;
pub mod table;

pub use dispatcher::OmnibotRouter;
pub use handler::{InteractiveHandler, MessageHandler, RouteHandler};
pub use interactive::InteractiveRouter;
pub use message::MessageRouter;
pub use table::{HelpEntry, MessageRoute, RouteTable};

pub use omnibot_core::{
    EventScope, InteractiveEvent, MatchType, MessageEvent, OmnibotEvent, PayloadType,
    RouteParams, RouterError, RouterResult,
};
