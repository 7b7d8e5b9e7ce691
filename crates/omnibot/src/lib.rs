//! # Omnibot
//!
//! Route omnibot chat events to handler functions and build the responses
//! omnibot expects back.
//!
//! ## Overview
//!
//! Omnibot delivers chat events to bots as JSON payloads tagged with an
//! `omnibot_payload_type`. This crate turns those payloads into handler
//! calls:
//!
//! ```text
//! ┌──────────┐     ┌───────────────┐     ┌───────────────────┐
//! │ payload  │────▶│ OmnibotRouter │────▶│ MessageRouter     │──▶ command / regex / reaction routes
//! │  (JSON)  │     │               │────▶│ InteractiveRouter │──▶ callback_id routes
//! └──────────┘     └───────────────┘     └───────────────────┘
//! ```
//!
//! - **Core**: payload types, route patterns, response builders
//! - **Framework**: the routers and the top-level dispatcher
//! - **Runtime**: configuration loading and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use omnibot::prelude::*;
//!
//! let mut router = MessageRouter::new().with_help("This bot is used for pings and pongs.");
//! router.register_with_help("ping", MatchType::Command, "Responds to pings with pongs", |_, _| {
//!     simple_post_message("pong").into()
//! })?;
//!
//! let router = OmnibotRouter::new().with_message_router(router);
//! let response = router.dispatch(&payload)?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use omnibot_core as core;
pub use omnibot_framework as framework;
pub use omnibot_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use omnibot::prelude::*;
/// ```
pub mod prelude {
    // Routers
    pub use omnibot_framework::{InteractiveRouter, MessageRouter, OmnibotRouter};

    // Payloads and routing
    pub use omnibot_core::{
        EventScope, InteractiveEvent, MatchType, MessageEvent, OmnibotEvent, PayloadType,
        RouteParams, RouterError, RouterResult,
    };

    // Responses
    pub use omnibot_core::{
        Action, Actions, Attachment, AttachmentField, Replies, Reply, Response, ResponseType,
        SimplePostMessage, SimpleReply, extend_response, simple_post_message, simple_reply,
    };

    // Setup
    pub use omnibot_runtime::{ConfigLoader, LoggingBuilder, init_from_config, load_config};
}
