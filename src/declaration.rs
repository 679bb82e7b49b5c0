// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed view of the input document.
//!
//! The YAML tree is decoded once into the structs below. Sections whose
//! entries mix IPs, aliases and numbers (`addresses`, `hosts`, `mx`, `srv`)
//! stay as ordered [`Mapping`]s of raw values; the zone resolver interprets
//! them. Everything that has a fixed shape is decoded here, most notably the
//! three forms of a nameserver declaration.
//!
//! # Document layout
//!
//! ```yaml
//! defaults:
//!   email: hostmaster@example.com
//!   nameserver: [ns1, ns2]
//!   ttl: 3600
//! zones:
//!   example.com:
//!     hosts:
//!       www: [192.0.2.10, web]
//! reverse-zones:
//!   - 192.0.2.0/24
//! ```

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::constants::{KEY_DEFAULTS, KEY_REVERSE_ZONES, KEY_ZONES};
use crate::errors::ZoneError;
use crate::normalize::scalar_to_string;

/// Optional overrides of the SOA timers and default TTL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimingDecl {
    pub refresh: Option<u32>,
    pub retry: Option<u32>,
    pub expire: Option<u32>,
    #[serde(alias = "nrc_ttl")]
    pub nrc_ttl: Option<u32>,
    pub ttl: Option<u32>,
}

/// The three accepted shapes of a `nameserver` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NameserverDecl {
    /// `nameserver: ns1`
    Single(String),
    /// `nameserver: [ns1, ns2.example.com.]`
    List(Vec<String>),
    /// `nameserver: { ns1: 192.0.2.1, ns2: [192.0.2.2, 2001:db8::2, 300] }`
    MapWithIps(Mapping),
}

/// The `defaults` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultsDecl {
    pub email: Option<String>,
    pub nameserver: Option<NameserverDecl>,
    #[serde(flatten)]
    pub timings: TimingDecl,
}

/// One forward zone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ZoneDecl {
    pub email: Option<String>,
    pub nameserver: Option<NameserverDecl>,
    /// Address records without reverse mapping
    pub addresses: Option<Mapping>,
    /// Address records with reverse mapping
    pub hosts: Option<Mapping>,
    pub mx: Option<Mapping>,
    pub srv: Option<Mapping>,
    pub serial: Option<u64>,
    #[serde(flatten)]
    pub timings: TimingDecl,
}

/// One reverse zone, keyed by its CIDR.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReverseZoneDecl {
    pub email: Option<String>,
    pub nameserver: Option<NameserverDecl>,
    pub serial: Option<u64>,
    #[serde(flatten)]
    pub timings: TimingDecl,
}

/// The decoded input document, with zones in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub defaults: DefaultsDecl,
    pub zones: Vec<(String, ZoneDecl)>,
    pub reverse_zones: Vec<(String, ReverseZoneDecl)>,
}

impl Document {
    /// Decode a parsed YAML tree.
    ///
    /// Returns `Ok(None)` for an empty document. When the top-level mapping
    /// has none of `defaults`, `zones` and `reverse-zones` it is read as a
    /// plain mapping of zones.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::MalformedDocument`] if a section does not have
    /// the expected shape.
    pub fn from_value(value: &Value) -> Result<Option<Self>, ZoneError> {
        let root = match value {
            Value::Null => return Ok(None),
            Value::Mapping(root) => root,
            _ => return Err(malformed("<root>", "expected a mapping")),
        };

        let structured = [KEY_DEFAULTS, KEY_ZONES, KEY_REVERSE_ZONES]
            .iter()
            .any(|key| root.contains_key(*key));

        if !structured {
            return Ok(Some(Self {
                zones: decode_zones(root)?,
                ..Self::default()
            }));
        }

        let defaults = match root.get(KEY_DEFAULTS) {
            None | Some(Value::Null) => DefaultsDecl::default(),
            Some(v) => decode(KEY_DEFAULTS, v)?,
        };

        let zones = match root.get(KEY_ZONES) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(zones)) => decode_zones(zones)?,
            Some(_) => return Err(malformed(KEY_ZONES, "expected a mapping of zones")),
        };

        let reverse_zones = match root.get(KEY_REVERSE_ZONES) {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => decode_reverse_zones(v)?,
        };

        Ok(Some(Self {
            defaults,
            zones,
            reverse_zones,
        }))
    }

    /// Parse and decode a YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::MalformedDocument`] if the text is not YAML or
    /// does not have the expected shape.
    pub fn from_yaml(text: &str) -> Result<Option<Self>, ZoneError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| ZoneError::malformed("<input>", &e))?;
        Self::from_value(&value)
    }
}

fn decode<T>(location: &str, value: &Value) -> Result<T, ZoneError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_yaml::from_value(value.clone()).map_err(|e| ZoneError::malformed(location, &e))
}

fn malformed(location: &str, reason: &str) -> ZoneError {
    ZoneError::MalformedDocument {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

fn key_name(section: &str, key: &Value) -> Result<String, ZoneError> {
    scalar_to_string(key).ok_or_else(|| malformed(section, "keys must be names"))
}

fn decode_zones(zones: &Mapping) -> Result<Vec<(String, ZoneDecl)>, ZoneError> {
    zones
        .iter()
        .map(|(key, value)| {
            let name = key_name(KEY_ZONES, key)?;
            let decl = match value {
                Value::Null => ZoneDecl::default(),
                v => decode(&name, v)?,
            };
            Ok((name, decl))
        })
        .collect()
}

fn decode_reverse_zones(value: &Value) -> Result<Vec<(String, ReverseZoneDecl)>, ZoneError> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                let name = key_name(KEY_REVERSE_ZONES, item)?;
                Ok((name, ReverseZoneDecl::default()))
            })
            .collect(),
        Value::Mapping(entries) => entries
            .iter()
            .map(|(key, value)| {
                let name = key_name(KEY_REVERSE_ZONES, key)?;
                let decl = match value {
                    Value::Null => ReverseZoneDecl::default(),
                    v => decode(&name, v)?,
                };
                Ok((name, decl))
            })
            .collect(),
        Value::String(name) => Ok(vec![(name.clone(), ReverseZoneDecl::default())]),
        _ => Err(malformed(
            KEY_REVERSE_ZONES,
            "expected a list or mapping of networks",
        )),
    }
}
