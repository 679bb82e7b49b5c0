// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for zone resolution.
//!
//! Every error here is fatal to the current run: there is no retry and no
//! partial output. Resolution happens completely before any renderer writes,
//! so a `ZoneError` always aborts before output is committed.

use thiserror::Error;

/// Errors raised while turning a declaration into typed records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// Malformed argument list for an MX or SRV entry
    ///
    /// MX entries must start with an integer priority. SRV entries must be
    /// `[port, target]` or `[priority, weight, port, target]`, each with an
    /// optional trailing TTL.
    #[error("Invalid {kind} record '{name}' in zone '{zone}': {reason}")]
    InvalidRecordShape {
        /// The zone the entry belongs to
        zone: String,
        /// Record kind ("MX", "SRV")
        kind: &'static str,
        /// The owner or service key as declared
        name: String,
        /// What is wrong with the argument list
        reason: String,
    },

    /// Declared addresses contradict an existing address record
    #[error(
        "Conflicting addresses for '{name}' in zone '{zone}': declared [{declared}] but address records hold [{existing}]"
    )]
    ConflictingRecord {
        /// The zone the record belongs to
        zone: String,
        /// Fully qualified owner name
        name: String,
        /// The addresses in the new declaration
        declared: String,
        /// The addresses already recorded for the owner
        existing: String,
    },

    /// A construct that is not allowed in this position
    ///
    /// Typically an alias inside a nameserver or MX declaration, or a value
    /// of an unexpected kind inside an address list.
    #[error("Invalid declaration '{name}' in zone '{zone}': {reason}")]
    InvalidDeclaration {
        /// The zone (or "defaults") the declaration belongs to
        zone: String,
        /// The declared key
        name: String,
        /// Explanation of what is not allowed
        reason: String,
    },

    /// A field required to build the SOA record is absent
    #[error("Zone '{zone}' is missing required field '{field}'")]
    MissingRequiredField {
        /// The zone lacking the field
        zone: String,
        /// The missing field ("email", "nameserver")
        field: &'static str,
    },

    /// Unknown renderer selector
    #[error("Unsupported output format '{0}' (expected 'unbound' or 'nsd')")]
    UnsupportedFormat(String),

    /// A reverse-zone name that is not a CIDR network
    #[error("Reverse zone '{name}' is not a valid network: {reason}")]
    InvalidNetwork {
        /// The reverse-zone key as declared
        name: String,
        /// Parser message
        reason: String,
    },

    /// The input tree does not have the expected shape
    #[error("Malformed document at '{location}': {reason}")]
    MalformedDocument {
        /// Where in the document the problem was found
        location: String,
        /// Deserializer message
        reason: String,
    },
}

impl ZoneError {
    /// Shorthand for [`ZoneError::InvalidDeclaration`].
    pub(crate) fn invalid_declaration(
        zone: &str,
        name: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDeclaration {
            zone: zone.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ZoneError::InvalidRecordShape`].
    pub(crate) fn invalid_shape(
        zone: &str,
        kind: &'static str,
        name: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRecordShape {
            zone: zone.to_string(),
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ZoneError::MalformedDocument`].
    pub(crate) fn malformed(location: impl Into<String>, err: &serde_yaml::Error) -> Self {
        Self::MalformedDocument {
            location: location.into(),
            reason: err.to_string(),
        }
    }
}
