//! Targeting query construction
//!
//! Targeting inputs arrive as comma-separated strings. They are split into
//! discrete tokens here and encoded as repeated query parameters, e.g.
//! `tags=production&tags=sensor`.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::deployment::Targeting;

/// Bytes escaped in query names and values: everything but `A-Za-z0-9-_.~`
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Ordered multi-value query parameters.
///
/// Names encode in alphabetical order; the values of a name keep their
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the DFU targeting query from every targeting field
    pub fn from_targeting(targeting: &Targeting) -> Self {
        let mut query = Self::new();
        for (name, raw) in targeting.fields() {
            if let Some(raw) = raw {
                query.add_comma_separated(name, raw);
            }
        }
        query
    }

    /// Append a single value under `name`
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.params
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Split `raw` on commas and append each trimmed, non-empty token
    /// under `name`. Nothing is added when no token survives.
    pub fn add_comma_separated(&mut self, name: &str, raw: &str) {
        for token in split_tokens(raw) {
            self.append(name, token);
        }
    }

    /// Values stored under `name`
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of distinct parameter names
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Form encoding sorted by name. Unreserved characters pass through,
    /// space becomes `+` and every other byte is percent-escaped.
    pub fn encode(&self) -> String {
        let mut pairs = Vec::new();
        for (name, values) in &self.params {
            let name = escape(name);
            for value in values {
                pairs.push(format!("{}={}", name, escape(value)));
            }
        }
        pairs.join("&")
    }
}

fn escape(raw: &str) -> String {
    raw.split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_ESCAPE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Split a comma-separated string into trimmed, non-empty tokens
pub fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}
