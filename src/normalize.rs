// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Value coercion helpers shared by the resolvers.
//!
//! The input tree carries no explicit type tags: a host entry is a scalar or
//! a list mixing IP literals, alias names and an optional trailing TTL. The
//! functions here turn such loosely shaped values into something the
//! resolvers can match on.

use serde_yaml::Value;
use std::net::IpAddr;

/// A list entry after IP detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The entry parsed as an IPv4 or IPv6 literal
    Address(IpAddr),
    /// Anything else is a hostname
    Name(String),
}

/// Coerce a value into a list.
///
/// Sequences are returned as they are, absent or empty values become an empty
/// list and every other value is wrapped as a single element.
///
/// # Examples
///
/// ```
/// use serde_yaml::Value;
/// use zonegen::normalize::to_sequence;
///
/// assert!(to_sequence(&Value::Null).is_empty());
/// assert_eq!(to_sequence(&Value::from("ns1")), vec![Value::from("ns1")]);
/// ```
#[must_use]
pub fn to_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Sequence(items) => items.clone(),
        Value::Tagged(tagged) => to_sequence(&tagged.value),
        other => vec![other.clone()],
    }
}

/// Detect whether a token is an IP literal.
///
/// # Examples
///
/// ```
/// use zonegen::normalize::{classify_ip, Token};
///
/// assert!(matches!(classify_ip("192.168.0.1"), Token::Address(_)));
/// assert!(matches!(classify_ip("fe80::"), Token::Address(_)));
/// assert_eq!(classify_ip("host1"), Token::Name("host1".to_string()));
/// ```
#[must_use]
pub fn classify_ip(token: &str) -> Token {
    match token.parse::<IpAddr>() {
        Ok(ip) => Token::Address(ip),
        Err(_) => Token::Name(token.to_string()),
    }
}

/// Qualify a hostname relative to a zone.
///
/// `.` is the zone apex, names with a trailing dot are already absolute and
/// everything else is placed below the zone.
///
/// # Examples
///
/// ```
/// use zonegen::normalize::qualify;
///
/// assert_eq!(qualify(".", "home.arpa"), "home.arpa.");
/// assert_eq!(qualify("ns1", "home.arpa"), "ns1.home.arpa.");
/// assert_eq!(qualify("mx.example.org.", "home.arpa"), "mx.example.org.");
/// ```
#[must_use]
pub fn qualify(host: &str, zone: &str) -> String {
    let zone = zone.trim_end_matches('.');
    if host == "." {
        format!("{zone}.")
    } else if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{host}.{zone}.")
    }
}

/// Integer value of a scalar, if it is a non-negative integer.
#[must_use]
pub fn as_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Pop a trailing integer off the list and return it as TTL override.
///
/// When the last element is not an integer the list is left untouched and
/// the TTL stays unset.
pub fn extract_trailing_ttl(values: &mut Vec<Value>) -> Option<u64> {
    let ttl = values.last().and_then(as_integer)?;
    values.pop();
    Some(ttl)
}

/// Textual form of a scalar used as a map key or list entry.
///
/// Numbers are accepted so that purely numeric labels survive YAML's typing.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Append `item` unless an equal element is present. Returns whether it was
/// appended.
pub fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        false
    } else {
        items.push(item);
        true
    }
}
