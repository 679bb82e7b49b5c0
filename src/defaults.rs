// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Run-wide defaults.
//!
//! The `defaults` block is resolved once per run into a [`Defaults`] value
//! which is then passed by reference into every zone and reverse-zone
//! resolution.

use crate::declaration::{DefaultsDecl, NameserverDecl, TimingDecl};
use crate::errors::ZoneError;
use crate::records::SoaTimings;

/// Fallbacks for fields a zone does not declare itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Responsible mailbox as declared (not yet dotted)
    pub email: Option<String>,
    /// Nameserver hosts, qualified per zone when applied
    pub nameservers: Vec<String>,
    pub timings: SoaTimings,
}

impl Defaults {
    /// Resolve the `defaults` block.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::InvalidDeclaration`] if the default nameserver is
    /// given as a mapping; addresses cannot be shared across zones.
    pub fn resolve(decl: &DefaultsDecl) -> Result<Self, ZoneError> {
        let nameservers = match &decl.nameserver {
            None => Vec::new(),
            Some(NameserverDecl::Single(name)) => vec![name.clone()],
            Some(NameserverDecl::List(names)) => names.clone(),
            Some(NameserverDecl::MapWithIps(_)) => {
                return Err(ZoneError::invalid_declaration(
                    "defaults",
                    "nameserver",
                    "default nameservers must be a hostname or a list of hostnames",
                ))
            }
        };

        Ok(Self {
            email: decl.email.clone(),
            nameservers,
            timings: SoaTimings::default().with_overrides(&decl.timings),
        })
    }
}

impl SoaTimings {
    /// Copy of these timings with every declared field replaced.
    #[must_use]
    pub fn with_overrides(&self, decl: &TimingDecl) -> Self {
        Self {
            refresh: decl.refresh.unwrap_or(self.refresh),
            retry: decl.retry.unwrap_or(self.retry),
            expire: decl.expire.unwrap_or(self.expire),
            negative_ttl: decl.nrc_ttl.unwrap_or(self.negative_ttl),
            ttl: decl.ttl.unwrap_or(self.ttl),
        }
    }
}

/// Dotted SOA mailbox form of an email address: `@` becomes `.` and a
/// trailing dot is enforced.
#[must_use]
pub fn soa_mailbox(email: &str) -> String {
    let dotted = email.replace('@', ".");
    if dotted.ends_with('.') {
        dotted
    } else {
        format!("{dotted}.")
    }
}
