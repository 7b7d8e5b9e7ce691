//! Message router for command, regex and reaction messages.
//!
//! A [`MessageRouter`] maps route templates to handlers. Each message carries
//! a [`MatchType`] selecting the bucket it is matched against, and its `args`
//! text is matched against the bucket's templates in registration order.
//!
//! # Fallbacks
//!
//! When nothing matches, the router falls back to:
//!
//! 1. The default handler, if one was set
//! 2. The help handler, if `help_as_default` is enabled (the default); this is
//!    the custom help handler when set, otherwise the generated help
//! 3. A [`RouterError::NoMatchedRoute`] error
//!
//! # Example
//!
//! ```rust,ignore
//! use omnibot_framework::MessageRouter;
//! use omnibot_core::{MatchType, simple_post_message};
//!
//! let mut router: MessageRouter = MessageRouter::new()
//!     .with_help("This bot is used for pings and pongs.");
//!
//! router.register_with_help("ping", MatchType::Command, "Responds to pings with pongs", |_, _| {
//!     simple_post_message("pong").into()
//! })?;
//!
//! router.register("find <user>", MatchType::Command, |_, params| {
//!     simple_post_message(format!("found {}", params.get("user").unwrap_or_default())).into()
//! })?;
//! ```

use std::fmt;

use serde_json::json;
use tracing::{Level, debug, span};

use crate::handler::{MessageHandler, into_message_handler, into_route_handler};
use crate::table::{HelpEntry, MessageRoute, RouteTable};
use omnibot_core::response::POST_MESSAGE;
use omnibot_core::{
    Action, Actions, Attachment, AttachmentField, HandlerSlot, MatchType, MessageEvent,
    Response, RouteParams, RoutePattern, RouterError, RouterResult,
};

/// Match types listed in the generated help, with their attachment titles.
const HELP_SECTIONS: [(MatchType, &str); 2] = [
    (MatchType::Command, "Commands:"),
    (MatchType::Regex, "Regex matches:"),
];

/// Routes command, regex and reaction messages to handlers.
///
/// `R` is the handler return type. It must be constructible from [`Actions`]
/// so the generated help can be returned through [`dispatch`](Self::dispatch).
pub struct MessageRouter<R = Response> {
    help_message: String,
    help_as_default: bool,
    default_route: Option<MessageHandler<R>>,
    help_route: Option<MessageHandler<R>>,
    routes: RouteTable<R>,
}

impl<R> Default for MessageRouter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MessageRouter<R> {
    /// Creates a router with an empty help header and help as the default
    /// fallback.
    pub fn new() -> Self {
        Self {
            help_message: String::new(),
            help_as_default: true,
            default_route: None,
            help_route: None,
            routes: RouteTable::new(),
        }
    }

    /// Sets the header text of the generated help.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_message = help.into();
        self
    }

    /// Sets whether unmatched messages fall back to the help handler when no
    /// default handler is set.
    pub fn help_as_default(mut self, enabled: bool) -> Self {
        self.help_as_default = enabled;
        self
    }

    /// Returns the header text of the generated help.
    pub fn help_message(&self) -> &str {
        &self.help_message
    }

    /// Returns whether help is used as the fallback.
    pub fn is_help_default(&self) -> bool {
        self.help_as_default
    }

    /// Registers a route with no help description.
    pub fn register<F>(&mut self, rule: &str, match_type: MatchType, handler: F) -> RouterResult<()>
    where
        F: Fn(&MessageEvent, &RouteParams) -> R + Send + Sync + 'static,
    {
        self.register_with_help(rule, match_type, "", handler)
    }

    /// Registers a route for messages of `match_type` whose text matches `rule`.
    ///
    /// The template is compiled immediately, so malformed templates fail here
    /// rather than on first dispatch.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidPattern`] if the template does not compile
    /// - [`RouterError::RouteAlreadyDefined`] if an equal pattern is already
    ///   registered for `match_type`
    pub fn register_with_help<F>(
        &mut self,
        rule: &str,
        match_type: MatchType,
        help: impl Into<String>,
        handler: F,
    ) -> RouterResult<()>
    where
        F: Fn(&MessageEvent, &RouteParams) -> R + Send + Sync + 'static,
    {
        let pattern = RoutePattern::compile(rule)?;
        let route = MessageRoute::new(pattern, help, into_route_handler(handler));
        self.routes.insert(match_type, route)?;

        debug!(rule = rule, match_type = %match_type, "Registered message route");
        Ok(())
    }

    /// Sets the handler for messages no route matched.
    ///
    /// # Errors
    ///
    /// [`RouterError::HandlerAlreadySet`] if a default handler was already set.
    pub fn set_default<F>(&mut self, handler: F) -> RouterResult<()>
    where
        F: Fn(&MessageEvent) -> R + Send + Sync + 'static,
    {
        if self.default_route.is_some() {
            return Err(RouterError::HandlerAlreadySet(HandlerSlot::Default));
        }
        self.default_route = Some(into_message_handler(handler));
        Ok(())
    }

    /// Sets a custom help renderer.
    ///
    /// This does not route a `help` command; register one explicitly if a
    /// literal `help` command should reach the renderer.
    ///
    /// # Errors
    ///
    /// [`RouterError::HandlerAlreadySet`] if a help handler was already set.
    pub fn set_help<F>(&mut self, handler: F) -> RouterResult<()>
    where
        F: Fn(&MessageEvent) -> R + Send + Sync + 'static,
    {
        if self.help_route.is_some() {
            return Err(RouterError::HandlerAlreadySet(HandlerSlot::Help));
        }
        self.help_route = Some(into_message_handler(handler));
        Ok(())
    }

    /// Returns whether a default handler is set.
    pub fn has_default(&self) -> bool {
        self.default_route.is_some()
    }

    /// Returns whether a custom help handler is set.
    pub fn has_help(&self) -> bool {
        self.help_route.is_some()
    }

    /// Returns the number of registered routes across all match types.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns the help entries for `match_type`, in registration order.
    pub fn routes(&self, match_type: MatchType) -> impl Iterator<Item = &HelpEntry> {
        self.routes.bucket(match_type).iter().map(MessageRoute::help)
    }

    /// Renders the generated help.
    ///
    /// The envelope holds one `chat.postMessage` action whose text is the help
    /// header, with one attachment per non-empty `command` and `regex` bucket.
    pub fn render_help(&self) -> Actions {
        let attachments: Vec<Attachment> = HELP_SECTIONS
            .iter()
            .filter_map(|&(match_type, title)| {
                let fields: Vec<AttachmentField> = self
                    .routes(match_type)
                    .map(|entry| AttachmentField {
                        title: entry.label.clone(),
                        value: entry.description.clone(),
                        short: false,
                    })
                    .collect();

                (!fields.is_empty()).then(|| Attachment {
                    title: title.to_owned(),
                    fields,
                })
            })
            .collect();

        Actions::single(
            Action::new(POST_MESSAGE)
                .kwarg("text", self.help_message.as_str())
                .kwarg("attachments", json!(attachments)),
        )
    }
}

impl<R: From<Actions>> MessageRouter<R> {
    /// Returns the help for `message`: the custom help handler's result when
    /// set, otherwise the generated help.
    pub fn help(&self, message: &MessageEvent) -> R {
        match &self.help_route {
            Some(handler) => handler(message),
            None => self.render_help().into(),
        }
    }

    /// Routes a message to the first matching route's handler.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatchedRoute`] if no route matched, no default handler
    /// is set and help is not used as the fallback.
    pub fn dispatch(&self, message: &MessageEvent) -> RouterResult<R> {
        let span = span!(Level::DEBUG, "message_dispatch", match_type = %message.match_type);
        let _enter = span.enter();

        if let Some((route, params)) = self.routes.find(message.match_type, &message.args) {
            debug!(route = route.rule(), captures = params.len(), "Route matched");
            return Ok(route.call(message, &params));
        }

        if let Some(default) = &self.default_route {
            debug!("No route matched, using default route");
            return Ok(default(message));
        }

        if self.help_as_default {
            debug!(custom = self.help_route.is_some(), "No route matched, using help");
            return Ok(self.help(message));
        }

        Err(RouterError::no_match(format!(
            "no route \"{}\" for match type \"{}\" and no default route set",
            message.args, message.match_type
        )))
    }
}

impl<R> fmt::Debug for MessageRouter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("help_message", &self.help_message)
            .field("help_as_default", &self.help_as_default)
            .field("has_default", &self.default_route.is_some())
            .field("has_help", &self.help_route.is_some())
            .field("routes", &self.routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn command(args: &str) -> MessageEvent {
        MessageEvent::new(MatchType::Command, args)
    }

    fn regex(args: &str) -> MessageEvent {
        MessageEvent::new(MatchType::Regex, args)
    }

    #[test]
    fn test_command_route() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("ping", MatchType::Command, |_, _| json!("pong"))
            .unwrap();

        let err = router
            .register("ping", MatchType::Command, |_, _| json!("pong"))
            .unwrap_err();
        assert!(matches!(err, RouterError::RouteAlreadyDefined { .. }));
        assert!(err.is_already_defined());

        router
            .register("ping .*", MatchType::Command, |_, _| json!("extra pong"))
            .unwrap();

        assert_eq!(router.dispatch(&command("ping")).unwrap(), json!("pong"));
        assert_eq!(
            router.dispatch(&command("ping test")).unwrap(),
            json!("extra pong")
        );
    }

    #[test]
    fn test_command_route_with_arg() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("find <user>", MatchType::Command, |_, params| {
                json!(format!("found {}", params.get("user").unwrap_or_default()))
            })
            .unwrap();

        assert_eq!(
            router.dispatch(&command("find testuser")).unwrap(),
            json!("found testuser")
        );
    }

    #[test]
    fn test_regex_route_sees_message() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("123.*abc", MatchType::Regex, |message, _| {
                json!(message.args)
            })
            .unwrap();

        assert_eq!(
            router.dispatch(&regex("123 hello abc")).unwrap(),
            json!("123 hello abc")
        );
    }

    #[test]
    fn test_same_handler_for_multiple_routes() {
        fn echo_args(message: &MessageEvent, _: &RouteParams) -> Value {
            json!(message.args)
        }

        let mut router: MessageRouter<Value> = MessageRouter::new();
        router.register("123", MatchType::Command, echo_args).unwrap();
        router.register("123.*abc", MatchType::Regex, echo_args).unwrap();

        assert_eq!(router.dispatch(&command("123")).unwrap(), json!("123"));
        assert_eq!(
            router.dispatch(&regex("123 hello abc")).unwrap(),
            json!("123 hello abc")
        );
    }

    #[test]
    fn test_reaction_route() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("heart", MatchType::Reaction, |_, _| json!("loved"))
            .unwrap();

        let reaction = MessageEvent::new(MatchType::Reaction, "heart");
        assert_eq!(router.dispatch(&reaction).unwrap(), json!("loved"));
        // Reaction routes are not listed in the generated help.
        assert_eq!(
            router.render_help().actions[0].kwargs["attachments"],
            json!([])
        );
    }

    #[test]
    fn test_greedy_pattern_match() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("<a> to <b>", MatchType::Command, |_, p| {
                json!(format!("a is {}, b is {}", p.get("a").unwrap(), p.get("b").unwrap()))
            })
            .unwrap();

        assert_eq!(
            router.dispatch(&command("1 to 2")).unwrap(),
            json!("a is 1, b is 2")
        );
        assert_eq!(
            router.dispatch(&command("1 to 2 to 3")).unwrap(),
            json!("a is 1 to 2, b is 3")
        );
    }

    #[test]
    fn test_non_greedy_pattern_match() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register("<a?> to <b>", MatchType::Command, |_, p| {
                json!(format!("a is {}, b is {}", p.get("a").unwrap(), p.get("b").unwrap()))
            })
            .unwrap();

        assert_eq!(
            router.dispatch(&command("1 to 2")).unwrap(),
            json!("a is 1, b is 2")
        );
        assert_eq!(
            router.dispatch(&command("1 to 2 to 3")).unwrap(),
            json!("a is 1, b is 2 to 3")
        );
    }

    #[test]
    fn test_invalid_template_fails_at_registration() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        let err = router
            .register("find (<user>", MatchType::Command, |_, _| Value::Null)
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
        assert_eq!(router.route_count(), 0);
    }

    #[test]
    fn test_default_route() {
        let unknown = regex("unknown");

        let mut router: MessageRouter<Value> = MessageRouter::new().with_help("example message");
        router
            .register_with_help("ping", MatchType::Command, "A route to respond to pings.", |_, _| {
                Value::Null
            })
            .unwrap();

        // Routed to help when no default route is set
        assert_eq!(
            router.dispatch(&unknown).unwrap(),
            json!({"actions": [{
                "action": "chat.postMessage",
                "kwargs": {
                    "text": "example message",
                    "attachments": [{
                        "title": "Commands:",
                        "fields": [{
                            "title": "ping",
                            "value": "A route to respond to pings.",
                            "short": false,
                        }],
                    }],
                },
            }]})
        );

        let mut router: MessageRouter<Value> = MessageRouter::new()
            .with_help("example message")
            .help_as_default(false);

        let err = router.dispatch(&unknown).unwrap_err();
        assert!(matches!(err, RouterError::NoMatchedRoute(_)));

        router.set_default(|_| json!("default message")).unwrap();
        let err = router.set_default(|_| Value::Null).unwrap_err();
        assert!(matches!(
            err,
            RouterError::HandlerAlreadySet(HandlerSlot::Default)
        ));
        assert!(err.is_already_defined());

        assert_eq!(router.dispatch(&unknown).unwrap(), json!("default message"));
    }

    #[test]
    fn test_default_preferred_over_help() {
        let mut router: MessageRouter<Value> = MessageRouter::new().with_help("example message");
        router
            .register("ping", MatchType::Command, |_, _| json!("pong"))
            .unwrap();
        router.set_default(|_| json!("default message")).unwrap();

        assert_eq!(
            router.dispatch(&regex("unknown")).unwrap(),
            json!("default message")
        );
    }

    #[test]
    fn test_get_help() {
        let expected = json!({"actions": [{
            "action": "chat.postMessage",
            "kwargs": {
                "text": "example message",
                "attachments": [
                    {
                        "title": "Commands:",
                        "fields": [{
                            "title": "ping",
                            "value": "A route to respond to pings.",
                            "short": false,
                        }],
                    },
                    {
                        "title": "Regex matches:",
                        "fields": [{
                            "title": ".*test.*",
                            "value": "A test regex route.",
                            "short": false,
                        }],
                    },
                ],
            },
        }]});

        let mut router: MessageRouter<Value> = MessageRouter::new().with_help("example message");
        router
            .register_with_help("ping", MatchType::Command, "A route to respond to pings.", |_, _| {
                Value::Null
            })
            .unwrap();
        router
            .register_with_help(".*test.*", MatchType::Regex, "A test regex route.", |_, _| {
                Value::Null
            })
            .unwrap();

        let help = command("help");
        assert_eq!(router.dispatch(&help).unwrap(), expected);

        router.set_help(|_| json!("overridden help")).unwrap();
        let err = router.set_help(|_| Value::Null).unwrap_err();
        assert!(matches!(err, RouterError::HandlerAlreadySet(HandlerSlot::Help)));

        assert_eq!(router.dispatch(&help).unwrap(), json!("overridden help"));
    }

    #[test]
    fn test_help_fields_in_registration_order() {
        let mut router: MessageRouter = MessageRouter::new();
        for (rule, help) in [("zeta", "last letter"), ("alpha", "first letter"), ("mid <x>", "")] {
            router
                .register_with_help(rule, MatchType::Command, help, |_, _| Actions::new().into())
                .unwrap();
        }

        let labels: Vec<&str> = router
            .routes(MatchType::Command)
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(labels, ["zeta", "alpha", "mid <x>"]);

        let help = router.render_help();
        assert_eq!(
            help.actions[0].kwargs["attachments"][0]["fields"][2],
            json!({"title": "mid <x>", "value": "", "short": false})
        );
    }

    #[test]
    fn test_help_label_may_contain_colon() {
        let mut router: MessageRouter<Value> = MessageRouter::new();
        router
            .register_with_help("set <key>:<value>", MatchType::Command, "Sets a key", |_, _| {
                Value::Null
            })
            .unwrap();

        let entry = router.routes(MatchType::Command).next().unwrap();
        assert_eq!(entry.label, "set <key>:<value>");
        assert_eq!(entry.description, "Sets a key");
    }

    #[test]
    fn test_help_route_with_command() {
        let mut router: MessageRouter<Value> = MessageRouter::new().with_help("example message");
        router
            .register_with_help("help", MatchType::Command, "Help docs for this bot.", |_, _| {
                json!("overridden help")
            })
            .unwrap();
        router.set_help(|_| json!("overridden help")).unwrap();

        assert_eq!(
            router.dispatch(&command("help")).unwrap(),
            json!("overridden help")
        );
        assert_eq!(
            router.dispatch(&command("nope")).unwrap(),
            json!("overridden help")
        );
    }

    #[derive(Debug, PartialEq)]
    enum Outcome {
        Done(Response),
        Failed(String),
    }

    impl From<Actions> for Outcome {
        fn from(actions: Actions) -> Self {
            Self::Done(actions.into())
        }
    }

    #[test]
    fn test_handler_errors_pass_through() {
        let mut router: MessageRouter<Outcome> = MessageRouter::new();
        router
            .register("fail", MatchType::Command, |_, _| {
                Outcome::Failed("boom".to_owned())
            })
            .unwrap();

        assert_eq!(
            router.dispatch(&command("fail")).unwrap(),
            Outcome::Failed("boom".to_owned())
        );
        assert!(matches!(
            router.dispatch(&command("other")).unwrap(),
            Outcome::Done(Response::Actions(_))
        ));
    }
}
