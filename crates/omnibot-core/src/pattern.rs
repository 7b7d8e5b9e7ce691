//! Route template compilation.
//!
//! A route template is a regular expression that may contain named
//! placeholders:
//!
//! - `<name>` captures one or more characters greedily
//! - `<name?>` captures one or more characters non-greedily
//!
//! The compiled pattern is anchored at both ends, so a template only matches
//! the entire candidate text.
//!
//! ```rust,ignore
//! use omnibot_core::RoutePattern;
//!
//! let pattern = RoutePattern::compile("<a?> to <b>")?;
//! let params = pattern.captures("1 to 2 to 3").unwrap();
//! assert_eq!(params.get("a"), Some("1"));
//! assert_eq!(params.get("b"), Some("2 to 3"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::error::{RouterError, RouterResult};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(\w+)(\?)?>").expect("placeholder regex is valid"));

/// A compiled route template.
///
/// Two patterns are equal when their compiled regexes are textually identical.
#[derive(Clone)]
pub struct RoutePattern {
    rule: String,
    regex: Regex,
}

impl RoutePattern {
    /// Compiles a route template.
    ///
    /// Fails with [`RouterError::InvalidPattern`] when the expanded template is
    /// not a valid regex, including duplicate placeholder names.
    pub fn compile(rule: impl Into<String>) -> RouterResult<Self> {
        let rule = rule.into();
        let expanded = expand_placeholders(&rule);
        let anchored = format!("^(?:{expanded})$");

        let regex = Regex::new(&anchored).map_err(|source| RouterError::InvalidPattern {
            rule: rule.clone(),
            source,
        })?;

        trace!(rule = %rule, pattern = %anchored, "Compiled route pattern");
        Ok(Self { rule, regex })
    }

    /// Returns the template this pattern was compiled from.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Returns the compiled regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Checks whether the whole of `text` matches this pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Matches `text` and returns the named captures, or `None` if the text
    /// does not match.
    pub fn captures(&self, text: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(text)?;
        Some(RouteParams::from_captures(&self.regex, &caps))
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for RoutePattern {}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("rule", &self.rule)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)
    }
}

fn expand_placeholders(rule: &str) -> String {
    PLACEHOLDER
        .replace_all(rule, |caps: &Captures<'_>| {
            let quantifier = if caps.get(2).is_some() { ".+?" } else { ".+" };
            format!("(?P<{}>{})", &caps[1], quantifier)
        })
        .into_owned()
}

// ============================================================================
// Route Params
// ============================================================================

/// Named captures extracted from a matched route template.
///
/// Placeholders that did not take part in the match are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_captures(regex: &Regex, caps: &Captures<'_>) -> Self {
        let params = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_owned(), m.as_str().to_owned()))
            })
            .collect();
        Self(params)
    }

    /// Returns the text captured by the named placeholder.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns whether the named placeholder captured anything.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of captured placeholders.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
