//! # Omnibot Core
//!
//! Core types shared by the omnibot routers.
//!
//! This layer provides:
//! - Typed views of inbound omnibot payloads ([`MessageEvent`], [`InteractiveEvent`])
//! - Route template compilation ([`RoutePattern`])
//! - Response envelopes and builders ([`Actions`], [`Replies`])
//! - The routing error taxonomy ([`RouterError`])
//!
//! Nothing here performs I/O; every type is plain data.

pub mod error;
pub mod event;
pub mod pattern;
pub mod response;

pub use error::{HandlerSlot, RouterError, RouterResult};
pub use event::{
    EventScope, InteractiveEvent, MatchType, MessageEvent, OmnibotEvent, PAYLOAD_TYPE_KEY,
    PayloadType,
};
pub use pattern::{RouteParams, RoutePattern};
pub use response::{
    Action, Actions, Attachment, AttachmentField, Replies, Reply, Response, ResponseType,
    SimplePostMessage, SimpleReply, extend_response, simple_post_message, simple_reply,
};
