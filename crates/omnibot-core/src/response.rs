//! Response envelopes and builders for frequently used responses.
//!
//! Handlers answer omnibot with one of two envelopes:
//!
//! - [`Actions`] - an ordered list of platform API calls
//!   (`{"actions": [{"action": ..., "kwargs": {...}}]}`)
//! - [`Replies`] - immediate replies to slash commands and interactive
//!   components (`{"responses": [{"response_type": ..., ...}]}`)
//!
//! # Example
//!
//! ```rust,ignore
//! use omnibot_core::response::{extend_response, simple_post_message, SimplePostMessage};
//!
//! let mut ret = simple_post_message("pong");
//! extend_response(&mut ret, SimplePostMessage::new("in channel").thread(false).build());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Posts a message to a channel or thread.
pub const POST_MESSAGE: &str = "chat.postMessage";

/// Posts a message visible only to the triggering user.
pub const POST_EPHEMERAL: &str = "chat.postEphemeral";

// ============================================================================
// Actions
// ============================================================================

/// A single upstream API call descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The API method name, e.g. `chat.postMessage`.
    pub action: String,
    /// Keyword arguments for the API method.
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl Action {
    /// Creates an action with no arguments.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            kwargs: Map::new(),
        }
    }

    /// Adds a keyword argument (builder pattern).
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// An envelope of API calls for omnibot to perform, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actions {
    /// The API calls.
    pub actions: Vec<Action>,
}

impl Actions {
    /// Creates an empty envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an envelope holding one action.
    pub fn single(action: Action) -> Self {
        Self {
            actions: vec![action],
        }
    }

    /// Appends an action.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Appends an action (builder pattern).
    pub fn with(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Returns the number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if there are no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Appends `extra`'s actions onto `base`, preserving order.
///
/// No validation of the action shapes is performed.
pub fn extend_response(base: &mut Actions, extra: Actions) {
    base.actions.extend(extra.actions);
}

// ============================================================================
// Replies
// ============================================================================

/// Visibility of an immediate reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible only to the triggering user.
    Ephemeral,
    /// Visible to the whole channel.
    InChannel,
}

/// An immediate reply to a slash command or interactive component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Who can see the reply.
    pub response_type: ResponseType,
    /// The reply text.
    pub text: String,
    /// Resources omnibot should parse before posting.
    pub omnibot_parse: Value,
    /// Whether to replace the original message instead of responding to it.
    pub replace_original: bool,
}

/// An envelope of immediate replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replies {
    /// The replies.
    pub responses: Vec<Reply>,
}

// ============================================================================
// Response
// ============================================================================

/// Either kind of envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// An `actions` envelope.
    Actions(Actions),
    /// A `responses` envelope.
    Replies(Replies),
}

impl From<Actions> for Response {
    fn from(actions: Actions) -> Self {
        Self::Actions(actions)
    }
}

impl From<Replies> for Response {
    fn from(replies: Replies) -> Self {
        Self::Replies(replies)
    }
}

impl From<Actions> for Value {
    fn from(actions: Actions) -> Self {
        json!({ "actions": actions.actions })
    }
}

impl From<Replies> for Value {
    fn from(replies: Replies) -> Self {
        json!({ "responses": replies.responses })
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        match response {
            Response::Actions(actions) => actions.into(),
            Response::Replies(replies) => replies.into(),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for a single, simple text message post.
///
/// Defaults: posted in thread, not ephemeral, no `omnibot_parse`.
#[derive(Debug, Clone)]
pub struct SimplePostMessage {
    text: String,
    thread: bool,
    omnibot_parse: Option<Value>,
    ephemeral: bool,
}

impl SimplePostMessage {
    /// Creates a builder for posting `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            thread: true,
            omnibot_parse: None,
            ephemeral: false,
        }
    }

    /// Sets whether to post the message in a thread.
    pub fn thread(mut self, thread: bool) -> Self {
        self.thread = thread;
        self
    }

    /// Sets the resources omnibot should parse before posting.
    pub fn omnibot_parse(mut self, omnibot_parse: impl Into<Value>) -> Self {
        self.omnibot_parse = Some(omnibot_parse.into());
        self
    }

    /// Sets whether to post an ephemeral message.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Builds the single-action envelope.
    pub fn build(self) -> Actions {
        let name = if self.ephemeral {
            POST_EPHEMERAL
        } else {
            POST_MESSAGE
        };

        let mut action = Action::new(name).kwarg("text", self.text);
        if let Some(parse) = self.omnibot_parse {
            action = action.kwarg("omnibot_parse", parse);
        }
        if !self.thread {
            action = action.kwarg("thread_ts", Value::Null);
        }

        Actions::single(action)
    }
}

/// Builds an envelope posting `text` in thread with the default options.
pub fn simple_post_message(text: impl Into<String>) -> Actions {
    SimplePostMessage::new(text).build()
}

/// Builder for a single immediate reply.
///
/// Defaults: in channel, empty `omnibot_parse`, does not replace the original.
#[derive(Debug, Clone)]
pub struct SimpleReply {
    text: String,
    omnibot_parse: Option<Value>,
    ephemeral: bool,
    replace_original: bool,
}

impl SimpleReply {
    /// Creates a builder replying with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            omnibot_parse: None,
            ephemeral: false,
            replace_original: false,
        }
    }

    /// Sets the resources omnibot should parse before posting.
    pub fn omnibot_parse(mut self, omnibot_parse: impl Into<Value>) -> Self {
        self.omnibot_parse = Some(omnibot_parse.into());
        self
    }

    /// Sets whether the reply is ephemeral.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Sets whether to replace the original message.
    pub fn replace_original(mut self, replace_original: bool) -> Self {
        self.replace_original = replace_original;
        self
    }

    /// Builds the single-reply envelope.
    pub fn build(self) -> Replies {
        let response_type = if self.ephemeral {
            ResponseType::Ephemeral
        } else {
            ResponseType::InChannel
        };

        Replies {
            responses: vec![Reply {
                response_type,
                text: self.text,
                omnibot_parse: self
                    .omnibot_parse
                    .unwrap_or_else(|| Value::Object(Map::new())),
                replace_original: self.replace_original,
            }],
        }
    }
}

/// Builds an in-channel reply with the default options.
pub fn simple_reply(text: impl Into<String>) -> Replies {
    SimpleReply::new(text).build()
}

// ============================================================================
// Attachments
// ============================================================================

/// A message attachment, as used by the generated help.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// The attachment title.
    pub title: String,
    /// The attachment fields.
    pub fields: Vec<AttachmentField>,
}

/// A titled field inside an [`Attachment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    /// The field title.
    pub title: String,
    /// The field body.
    pub value: String,
    /// Whether the field may be shown side by side with others.
    pub short: bool,
}
