//! Raw display attributes.
//!
//! Attributes arrive as loosely typed strings, either from a host that already
//! split them into pairs or from shortcode text such as
//! `[related-content type="page" limit=3 display='grid']`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attribute names understood by the resolver.
pub const KNOWN_ATTRIBUTES: &[&str] = &[
    "type",
    "category",
    "location",
    "location_tax",
    "limit",
    "relation",
    "operator",
    "orderby",
    "order",
    "display",
    "columns",
];

/// String-keyed attribute map with lowercased keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttributes(BTreeMap<String, String>);

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute; the key is trimmed and lowercased.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .insert(key.as_ref().trim().to_lowercase(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value as supplied (possibly empty).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value as supplied, or `default` when the attribute is absent.
    ///
    /// An attribute supplied as an empty string stays empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Value only when explicitly supplied and non-empty.
    pub fn explicit(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Attribute names the resolver does not understand.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| !KNOWN_ATTRIBUTES.contains(k))
    }

    /// Parse shortcode attribute text.
    ///
    /// Accepts either the bare attribute list or a whole `[tag ...]` tag.
    /// Values may be double-quoted, single-quoted or bare. Positional
    /// attributes without `=` are ignored.
    pub fn parse_shortcode(text: &str) -> Self {
        let mut body = text.trim();
        if let Some(inner) = body.strip_prefix('[') {
            let inner = inner.trim_end().trim_end_matches(']').trim_end_matches('/');
            // Drop the tag name.
            body = inner
                .trim_start()
                .split_once(char::is_whitespace)
                .map_or("", |(_, rest)| rest);
        }

        let mut attrs = Self::new();
        let mut chars = body.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let mut key = String::new();
            while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
                key.push(c);
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            if chars.next_if_eq(&'=').is_none() {
                debug!(attribute = %key, "ignoring positional shortcode attribute");
                continue;
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut value = String::new();
            match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        value.push(c);
                    }
                }
                _ => {
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }

            if !key.is_empty() {
                attrs.insert(&key, value);
            }
        }

        attrs
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
