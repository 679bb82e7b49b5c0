// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reverse zone resolution.
//!
//! A reverse zone is declared by its network (`192.168.0.0/24`,
//! `2001:db8::/48`). It holds no records of its own: the NSD renderer uses it
//! to pick, out of the PTR records of all forward zones, those whose address
//! lies inside the network.
//!
//! The reverse origin is cut from the network's reverse pointer at a label
//! boundary: `(32 - prefix) >> 3` octets for IPv4 and `(128 - prefix) >> 2`
//! nibbles for IPv6 are left to the record owners.

use ipnet::IpNet;
use std::net::IpAddr;
use tracing::warn;

use crate::constants::{IPV4_REVERSE_SUFFIX, IPV6_REVERSE_SUFFIX};
use crate::declaration::{NameserverDecl, ReverseZoneDecl};
use crate::defaults::{soa_mailbox, Defaults};
use crate::errors::ZoneError;
use crate::records::SoaTimings;

/// A resolved reverse zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseZone {
    name: String,
    network: IpNet,
    serial: u64,
    timings: SoaTimings,
    email: Option<String>,
    nameservers: Vec<String>,
}

impl ReverseZone {
    /// The network as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The network with host bits cleared.
    #[must_use]
    pub fn network(&self) -> IpNet {
        self.network
    }

    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    #[must_use]
    pub fn timings(&self) -> &SoaTimings {
        &self.timings
    }

    /// SOA mailbox in dotted form, if the zone or the defaults name one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Fully qualified nameserver hosts.
    #[must_use]
    pub fn nameservers(&self) -> &[String] {
        &self.nameservers
    }

    /// Number of reverse-pointer labels left to record owners.
    #[must_use]
    pub fn split_labels(&self) -> usize {
        let split = match self.network {
            IpNet::V4(net) => (32 - net.prefix_len()) >> 3,
            IpNet::V6(net) => (128 - net.prefix_len()) >> 2,
        };
        usize::from(split)
    }

    /// Reverse origin without trailing dot, e.g. `0.168.192.in-addr.arpa`.
    #[must_use]
    pub fn origin(&self) -> String {
        reverse_labels(self.network.network())
            .into_iter()
            .skip(self.split_labels())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Whether an address lies inside this network.
    #[must_use]
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.network.contains(ip)
    }

    /// Owner name of an address's PTR record within this zone.
    ///
    /// Relative to the origin when the address's reverse pointer lies below
    /// it, `@` when it is the origin itself, fully qualified otherwise. The
    /// last case occurs for networks whose prefix is not octet (IPv4) or
    /// nibble (IPv6) aligned.
    #[must_use]
    pub fn ptr_owner(&self, ip: &IpAddr) -> String {
        let pointer = reverse_pointer(*ip);
        let origin = self.origin();

        if pointer == origin {
            "@".to_string()
        } else if let Some(relative) = pointer.strip_suffix(&format!(".{origin}")) {
            relative.to_string()
        } else {
            format!("{pointer}.")
        }
    }
}

/// Labels of an address's reverse pointer, least significant first.
///
/// `192.168.0.1` gives `1, 0, 168, 192, in-addr, arpa`; IPv6 addresses give
/// 32 nibble labels followed by `ip6, arpa`.
#[must_use]
pub fn reverse_labels(ip: IpAddr) -> Vec<String> {
    let (mut labels, suffix): (Vec<String>, &str) = match ip {
        IpAddr::V4(v4) => (
            v4.octets().iter().rev().map(u8::to_string).collect(),
            IPV4_REVERSE_SUFFIX,
        ),
        IpAddr::V6(v6) => (
            v6.octets()
                .iter()
                .rev()
                .flat_map(|byte| [byte & 0x0f, byte >> 4])
                .map(|nibble| format!("{nibble:x}"))
                .collect(),
            IPV6_REVERSE_SUFFIX,
        ),
    };
    labels.extend(suffix.split('.').map(str::to_string));
    labels
}

/// Reverse pointer name of an address, without trailing dot.
///
/// # Examples
///
/// ```
/// use zonegen::reverse_zone::reverse_pointer;
///
/// assert_eq!(reverse_pointer("10.7.2.50".parse().unwrap()), "50.2.7.10.in-addr.arpa");
/// ```
#[must_use]
pub fn reverse_pointer(ip: IpAddr) -> String {
    reverse_labels(ip).join(".")
}

/// Build a reverse zone from its network name and declaration.
///
/// Nameservers should be absolute names. A relative one such as `ns1` is
/// qualified against the reverse origin (`ns1.0.168.192.in-addr.arpa.`),
/// which is rarely intended, so a warning is logged for it.
///
/// # Errors
///
/// Returns [`ZoneError::InvalidNetwork`] if `name` is not a CIDR network and
/// [`ZoneError::InvalidDeclaration`] if the nameserver is given as a mapping.
pub fn resolve_reverse_zone(
    name: &str,
    decl: &ReverseZoneDecl,
    defaults: &Defaults,
    serial: u64,
) -> Result<ReverseZone, ZoneError> {
    let network = name
        .parse::<IpNet>()
        .map_err(|e| ZoneError::InvalidNetwork {
            name: name.to_string(),
            reason: e.to_string(),
        })?
        .trunc();

    let hosts = match &decl.nameserver {
        None => defaults.nameservers.clone(),
        Some(NameserverDecl::Single(host)) => vec![host.clone()],
        Some(NameserverDecl::List(hosts)) => hosts.clone(),
        Some(NameserverDecl::MapWithIps(_)) => {
            return Err(ZoneError::invalid_declaration(
                name,
                "nameserver",
                "reverse zones take a hostname or a list of hostnames",
            ))
        }
    };

    let mut zone = ReverseZone {
        name: name.to_string(),
        network,
        serial: decl.serial.unwrap_or(serial),
        timings: defaults.timings.with_overrides(&decl.timings),
        email: decl
            .email
            .as_deref()
            .or(defaults.email.as_deref())
            .map(soa_mailbox),
        nameservers: Vec::new(),
    };

    let origin = zone.origin();
    zone.nameservers = hosts
        .iter()
        .map(|host| {
            if !host.ends_with('.') {
                warn!(
                    "Reverse zone {name} nameserver {host} is relative; qualifying against {origin}"
                );
            }
            crate::normalize::qualify(host, &origin)
        })
        .collect();

    Ok(zone)
}
