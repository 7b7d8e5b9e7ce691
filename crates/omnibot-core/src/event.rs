//! Inbound omnibot payloads.
//!
//! This module provides the typed views of the events omnibot delivers:
//!
//! - [`PayloadType`] - The top-level `omnibot_payload_type` tag
//! - [`MatchType`] - Which message bucket a message is matched against
//! - [`MessageEvent`] - A command, regex or reaction message
//! - [`InteractiveEvent`] - An interactive component callback
//! - [`EventScope`] - The event-type partition of interactive routes
//!
//! Fields the routers do not interpret are kept in an `extra` map so handlers
//! still see the full upstream payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RouterError, RouterResult};

/// The key carrying the payload type tag on every omnibot event.
pub const PAYLOAD_TYPE_KEY: &str = "omnibot_payload_type";

// ============================================================================
// Payload Type
// ============================================================================

/// Classification of omnibot payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    /// A message directed at, or matched for, the bot.
    Message,
    /// A reaction added to a message.
    Reaction,
    /// A callback from an interactive component (buttons, dialogs, ...).
    InteractiveComponent,
}

impl PayloadType {
    /// Returns the wire name of this payload type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Reaction => "reaction",
            Self::InteractiveComponent => "interactive_component",
        }
    }

    /// Reads the payload type tag from a raw payload.
    ///
    /// Returns `None` when the tag is missing, not a string, or unknown.
    pub fn of(payload: &Value) -> Option<Self> {
        payload
            .get(PAYLOAD_TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

impl FromStr for PayloadType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Self::Message),
            "reaction" => Ok(Self::Reaction),
            "interactive_component" => Ok(Self::InteractiveComponent),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Match Type
// ============================================================================

/// The category of message matching in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// A message directed at the bot.
    Command,
    /// A channel message omnibot matched against the bot's regexes.
    Regex,
    /// A reaction event.
    Reaction,
}

impl MatchType {
    /// All match types, in bucket order.
    pub const ALL: [MatchType; 3] = [Self::Command, Self::Regex, Self::Reaction];

    /// Returns the wire name of this match type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Regex => "regex",
            Self::Reaction => "reaction",
        }
    }
}

impl FromStr for MatchType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(Self::Command),
            "regex" => Ok(Self::Regex),
            "reaction" => Ok(Self::Reaction),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Event Scope
// ============================================================================

/// The event-type partition an interactive route is registered under.
///
/// `Any` holds routes that apply regardless of the interactive event's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventScope {
    /// Matches every interactive event type.
    #[default]
    Any,
    /// Matches only events whose `type` equals the given name.
    Type(String),
}

impl EventScope {
    /// Creates a scope for a specific event type.
    pub fn of(event_type: impl Into<String>) -> Self {
        Self::Type(event_type.into())
    }
}

impl From<&str> for EventScope {
    fn from(event_type: &str) -> Self {
        Self::Type(event_type.to_owned())
    }
}

impl From<String> for EventScope {
    fn from(event_type: String) -> Self {
        Self::Type(event_type)
    }
}

impl<T: Into<EventScope>> From<Option<T>> for EventScope {
    fn from(event_type: Option<T>) -> Self {
        event_type.map_or(Self::Any, Into::into)
    }
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any event type"),
            Self::Type(name) => write!(f, "event type '{name}'"),
        }
    }
}

// ============================================================================
// Message Event
// ============================================================================

/// A message payload routed by the message router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// The bucket this message is matched against.
    pub match_type: MatchType,

    /// The text to match; empty when omnibot sent no arguments.
    #[serde(default)]
    pub args: String,

    /// Every other field of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageEvent {
    /// Creates a message event with no extra fields.
    pub fn new(match_type: MatchType, args: impl Into<String>) -> Self {
        Self {
            match_type,
            args: args.into(),
            extra: Map::new(),
        }
    }

    /// Adds an extra payload field (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Decodes a message event from a raw payload.
    pub fn from_value(payload: &Value) -> RouterResult<Self> {
        Self::deserialize(payload).map_err(RouterError::from)
    }

    /// Returns an extra payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

// ============================================================================
// Interactive Event
// ============================================================================

/// An interactive component payload routed by the interactive router.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractiveEvent {
    /// Identifies the component that produced the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,

    /// The interactive event subtype, e.g. `dialog_submission`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    /// Every other field of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InteractiveEvent {
    /// Creates an event for the given callback id with no subtype.
    pub fn new(callback_id: impl Into<String>) -> Self {
        Self {
            callback_id: Some(callback_id.into()),
            ..Self::default()
        }
    }

    /// Sets the event subtype (builder pattern).
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Adds an extra payload field (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Decodes an interactive event from a raw payload.
    pub fn from_value(payload: &Value) -> RouterResult<Self> {
        Self::deserialize(payload).map_err(RouterError::from)
    }

    /// Returns an extra payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

// ============================================================================
// Omnibot Event
// ============================================================================

/// A decoded omnibot payload of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum OmnibotEvent {
    /// A `message` payload.
    Message(MessageEvent),
    /// A `reaction` payload.
    Reaction(MessageEvent),
    /// An `interactive_component` payload.
    InteractiveComponent(InteractiveEvent),
}

impl OmnibotEvent {
    /// Decodes a raw payload according to its `omnibot_payload_type` tag.
    pub fn from_value(payload: &Value) -> RouterResult<Self> {
        let payload_type = PayloadType::of(payload).ok_or_else(|| {
            RouterError::unsupported(payload.get(PAYLOAD_TYPE_KEY).and_then(Value::as_str))
        })?;

        Ok(match payload_type {
            PayloadType::Message => Self::Message(MessageEvent::from_value(payload)?),
            PayloadType::Reaction => Self::Reaction(MessageEvent::from_value(payload)?),
            PayloadType::InteractiveComponent => {
                Self::InteractiveComponent(InteractiveEvent::from_value(payload)?)
            }
        })
    }

    /// Returns the payload type of this event.
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Message(_) => PayloadType::Message,
            Self::Reaction(_) => PayloadType::Reaction,
            Self::InteractiveComponent(_) => PayloadType::InteractiveComponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_event_defaults_args() {
        let event = MessageEvent::from_value(&json!({
            "match_type": "command",
            "channel": "C123",
        }))
        .unwrap();

        assert_eq!(event.match_type, MatchType::Command);
        assert_eq!(event.args, "");
        assert_eq!(event.get("channel"), Some(&json!("C123")));
    }

    #[test]
    fn test_message_event_rejects_unknown_match_type() {
        let err = MessageEvent::from_value(&json!({"match_type": "shout", "args": "hi"}))
            .unwrap_err();
        assert!(matches!(err, RouterError::MalformedPayload(_)));
    }

    #[test]
    fn test_interactive_event_reads_type() {
        let event = InteractiveEvent::from_value(&json!({
            "callback_id": "x",
            "type": "dialog_submission",
            "submission": {"name": "a"},
        }))
        .unwrap();

        assert_eq!(event.callback_id.as_deref(), Some("x"));
        assert_eq!(event.event_type.as_deref(), Some("dialog_submission"));
        assert_eq!(event.get("submission"), Some(&json!({"name": "a"})));
    }

    #[test]
    fn test_omnibot_event_unsupported_tag() {
        let err = OmnibotEvent::from_value(&json!({"omnibot_payload_type": "team_join"}))
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::UnsupportedPayload { payload_type: Some(ref t) } if t == "team_join"
        ));

        let err = OmnibotEvent::from_value(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            RouterError::UnsupportedPayload { payload_type: None }
        ));
    }

    #[test]
    fn test_omnibot_event_reaction() {
        let event = OmnibotEvent::from_value(&json!({
            "omnibot_payload_type": "reaction",
            "match_type": "reaction",
            "args": "heart",
        }))
        .unwrap();

        assert_eq!(event.payload_type(), PayloadType::Reaction);
        match event {
            OmnibotEvent::Reaction(message) => assert_eq!(message.args, "heart"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_event_scope_from_option() {
        assert_eq!(EventScope::from(None::<&str>), EventScope::Any);
        assert_eq!(
            EventScope::from(Some("dialog_submission")),
            EventScope::Type("dialog_submission".into())
        );
    }
}
