//! Route table for the message router.
//!
//! The table keeps one ordered bucket of routes per [`MatchType`]. Within a
//! bucket, routes are checked in registration order and the first whose
//! pattern matches the whole message text wins.

use std::fmt;

use tracing::trace;

use crate::handler::RouteHandler;
use omnibot_core::{MatchType, MessageEvent, RouteParams, RoutePattern, RouterError, RouterResult};

/// Help documentation for a single route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    /// The route template, shown as the field title.
    pub label: String,
    /// The human description, shown as the field body.
    pub description: String,
}

/// A registered message route.
pub struct MessageRoute<R> {
    pattern: RoutePattern,
    help: HelpEntry,
    handler: RouteHandler<R>,
}

impl<R> MessageRoute<R> {
    /// Creates a route from a compiled pattern.
    ///
    /// The help label is the pattern's template.
    pub fn new(
        pattern: RoutePattern,
        description: impl Into<String>,
        handler: RouteHandler<R>,
    ) -> Self {
        let help = HelpEntry {
            label: pattern.rule().to_owned(),
            description: description.into(),
        };
        Self {
            pattern,
            help,
            handler,
        }
    }

    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the template this route was registered with.
    pub fn rule(&self) -> &str {
        self.pattern.rule()
    }

    /// Returns the help entry for this route.
    pub fn help(&self) -> &HelpEntry {
        &self.help
    }

    /// Invokes the route handler.
    pub fn call(&self, message: &MessageEvent, params: &RouteParams) -> R {
        (self.handler)(message, params)
    }
}

impl<R> fmt::Debug for MessageRoute<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRoute")
            .field("pattern", &self.pattern)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// Ordered route buckets keyed by match type.
pub struct RouteTable<R> {
    command: Vec<MessageRoute<R>>,
    regex: Vec<MessageRoute<R>>,
    reaction: Vec<MessageRoute<R>>,
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RouteTable<R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            command: Vec::new(),
            regex: Vec::new(),
            reaction: Vec::new(),
        }
    }

    /// Returns the routes registered for `match_type`, in registration order.
    pub fn bucket(&self, match_type: MatchType) -> &[MessageRoute<R>] {
        match match_type {
            MatchType::Command => &self.command,
            MatchType::Regex => &self.regex,
            MatchType::Reaction => &self.reaction,
        }
    }

    fn bucket_mut(&mut self, match_type: MatchType) -> &mut Vec<MessageRoute<R>> {
        match match_type {
            MatchType::Command => &mut self.command,
            MatchType::Regex => &mut self.regex,
            MatchType::Reaction => &mut self.reaction,
        }
    }

    /// Appends a route to the bucket for `match_type`.
    ///
    /// Fails with [`RouterError::RouteAlreadyDefined`] if an equal pattern is
    /// already in that bucket.
    pub fn insert(&mut self, match_type: MatchType, route: MessageRoute<R>) -> RouterResult<()> {
        let bucket = self.bucket_mut(match_type);
        if bucket.iter().any(|existing| existing.pattern == route.pattern) {
            return Err(RouterError::RouteAlreadyDefined {
                rule: route.rule().to_owned(),
                match_type,
            });
        }
        bucket.push(route);
        Ok(())
    }

    /// Finds the first route in the `match_type` bucket matching `text`.
    pub fn find(&self, match_type: MatchType, text: &str) -> Option<(&MessageRoute<R>, RouteParams)> {
        self.bucket(match_type).iter().find_map(|route| {
            trace!(route = route.rule(), "Checking route");
            route.pattern.captures(text).map(|params| (route, params))
        })
    }

    /// Returns the total number of routes across all buckets.
    pub fn len(&self) -> usize {
        self.command.len() + self.regex.len() + self.reaction.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> fmt::Debug for RouteTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("command", &self.command.len())
            .field("regex", &self.regex.len())
            .field("reaction", &self.reaction.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::into_route_handler;

    fn route(rule: &str, tag: &'static str) -> MessageRoute<&'static str> {
        MessageRoute::new(
            RoutePattern::compile(rule).unwrap(),
            "",
            into_route_handler(move |_, _| tag),
        )
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = RouteTable::new();
        table.insert(MatchType::Regex, route(".*ping.*", "first")).unwrap();
        table.insert(MatchType::Regex, route("ping.*", "second")).unwrap();

        let message = MessageEvent::new(MatchType::Regex, "ping me");
        let (matched, params) = table.find(MatchType::Regex, &message.args).unwrap();
        assert_eq!(matched.call(&message, &params), "first");
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut table = RouteTable::new();
        table.insert(MatchType::Command, route("ping", "command")).unwrap();
        table.insert(MatchType::Regex, route("ping", "regex")).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.find(MatchType::Reaction, "ping").is_none());

        let err = table
            .insert(MatchType::Command, route("ping", "again"))
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::RouteAlreadyDefined { match_type: MatchType::Command, .. }
        ));
    }
}
