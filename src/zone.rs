// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Forward zone resolution.
//!
//! Turns one [`ZoneDecl`] into an immutable [`Zone`]. Sections are processed
//! in a fixed order, since later sections are checked against the address
//! records earlier ones produced:
//!
//! 1. `addresses` - address records, aliases get copies, no PTR
//! 2. `hosts` - like `addresses`, plus one PTR per distinct IP
//! 3. `nameserver` - NS records; declared IPs must agree with existing
//!    address records for the same name
//! 4. `mx` - MX records; existing address records are reused as they are
//! 5. `srv` - SRV records
//!
//! # Example
//!
//! ```
//! use zonegen::declaration::Document;
//! use zonegen::defaults::Defaults;
//! use zonegen::zone::resolve_zone;
//!
//! let doc = Document::from_yaml(r#"
//! home.arpa:
//!   email: test@home.arpa
//!   nameserver: ns1
//!   hosts:
//!     www: [192.168.0.10, web]
//! "#).unwrap().unwrap();
//!
//! let (name, decl) = &doc.zones[0];
//! let zone = resolve_zone(name, decl, &Defaults::default(), 4711).unwrap();
//!
//! assert_eq!(zone.primary_ns().name, "ns1.home.arpa.");
//! assert_eq!(zone.email(), "test.home.arpa.");
//! assert!(zone.addresses().contains("web.home.arpa."));
//! assert_eq!(zone.ptr().len(), 1);
//! ```

use serde_yaml::{Mapping, Value};
use std::net::IpAddr;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_SRV_PRIORITY, DEFAULT_SRV_WEIGHT};
use crate::declaration::{NameserverDecl, ZoneDecl};
use crate::defaults::{soa_mailbox, Defaults};
use crate::errors::ZoneError;
use crate::normalize::{
    as_integer, classify_ip, extract_trailing_ttl, push_unique, qualify, scalar_to_string,
    to_sequence, Token,
};
use crate::records::{
    AddressRecord, AddressTable, MxRecord, NsRecord, PtrPool, PtrRecord, SrvRecord, Zone,
};

/// Build a zone from its declaration.
///
/// # Arguments
///
/// * `name` - Zone name, with or without trailing dot
/// * `decl` - The zone's declaration
/// * `defaults` - Run-wide defaults
/// * `serial` - Serial used when the zone does not pin its own
///
/// # Errors
///
/// Returns:
/// - [`ZoneError::InvalidRecordShape`] for malformed MX or SRV entries
/// - [`ZoneError::ConflictingRecord`] if a nameserver's IPs contradict an
///   existing address record
/// - [`ZoneError::InvalidDeclaration`] for aliases on nameservers or MX
///   hosts, and for list entries that are neither address nor hostname
/// - [`ZoneError::MissingRequiredField`] if no email or no nameserver is
///   available
pub fn resolve_zone(
    name: &str,
    decl: &ZoneDecl,
    defaults: &Defaults,
    serial: u64,
) -> Result<Zone, ZoneError> {
    let mut builder = ZoneBuilder::new(name.trim_end_matches('.'));

    if let Some(addresses) = &decl.addresses {
        builder.add_addresses(addresses, false)?;
    }
    if let Some(hosts) = &decl.hosts {
        builder.add_addresses(hosts, true)?;
    }

    match &decl.nameserver {
        Some(nameserver) => builder.add_nameservers(nameserver)?,
        None => {
            for host in &defaults.nameservers {
                builder.add_ns(host, None);
            }
        }
    }

    if let Some(mx) = &decl.mx {
        builder.add_mail_exchangers(mx)?;
    }
    if let Some(srv) = &decl.srv {
        builder.add_services(srv)?;
    }

    let email = decl
        .email
        .as_deref()
        .or(defaults.email.as_deref())
        .map(soa_mailbox)
        .ok_or_else(|| ZoneError::MissingRequiredField {
            zone: builder.zone.clone(),
            field: "email",
        })?;

    if builder.ns.is_empty() {
        return Err(ZoneError::MissingRequiredField {
            zone: builder.zone,
            field: "nameserver",
        });
    }

    let zone = Zone {
        name: builder.zone,
        email,
        serial: decl.serial.unwrap_or(serial),
        timings: defaults.timings.with_overrides(&decl.timings),
        addresses: builder.addresses,
        ptr: builder.ptr.into_vec(),
        ns: builder.ns,
        mx: builder.mx,
        srv: builder.srv,
    };

    debug!(
        "Resolved zone {}: {} NS, {} MX, {} address, {} PTR, {} SRV records",
        zone.name,
        zone.ns.len(),
        zone.mx.len(),
        zone.addresses.len(),
        zone.ptr.len(),
        zone.srv.len()
    );

    Ok(zone)
}

/// The values of a host entry after TTL extraction and IP detection.
#[derive(Debug, Default)]
struct HostValues {
    ttl: Option<u32>,
    ips: Vec<IpAddr>,
    /// Qualified alias names
    aliases: Vec<String>,
}

/// Mutable state while a zone is being assembled.
struct ZoneBuilder {
    zone: String,
    apex: String,
    addresses: AddressTable,
    ptr: PtrPool,
    ns: Vec<NsRecord>,
    mx: Vec<MxRecord>,
    srv: Vec<SrvRecord>,
}

impl ZoneBuilder {
    fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            apex: format!("{zone}."),
            addresses: AddressTable::default(),
            ptr: PtrPool::default(),
            ns: Vec::new(),
            mx: Vec::new(),
            srv: Vec::new(),
        }
    }

    fn key_name(&self, key: &Value) -> Result<String, ZoneError> {
        scalar_to_string(key).ok_or_else(|| {
            ZoneError::invalid_declaration(&self.zone, &format!("{key:?}"), "keys must be names")
        })
    }

    fn ttl(&self, host: &str, ttl: u64) -> Result<u32, ZoneError> {
        u32::try_from(ttl).map_err(|_| {
            ZoneError::invalid_declaration(&self.zone, host, format!("TTL {ttl} is out of range"))
        })
    }

    /// Split a value list into TTL, addresses and aliases.
    fn host_values(&self, host: &str, mut values: Vec<Value>) -> Result<HostValues, ZoneError> {
        let mut parsed = HostValues {
            ttl: extract_trailing_ttl(&mut values)
                .map(|ttl| self.ttl(host, ttl))
                .transpose()?,
            ..HostValues::default()
        };

        for value in &values {
            let Value::String(token) = value else {
                return Err(ZoneError::invalid_declaration(
                    &self.zone,
                    host,
                    format!("expected an address or hostname, found {value:?}"),
                ));
            };

            match classify_ip(token) {
                Token::Address(ip) => {
                    push_unique(&mut parsed.ips, ip);
                }
                Token::Name(alias) => {
                    push_unique(&mut parsed.aliases, qualify(&alias, &self.zone));
                }
            }
        }

        Ok(parsed)
    }

    fn add_address(&mut self, name: &str, ip: IpAddr, ttl: Option<u32>) {
        self.addresses.insert(AddressRecord {
            name: name.to_string(),
            ip,
            ttl,
        });
    }

    fn add_ptr(&mut self, name: &str, ip: IpAddr, ttl: Option<u32>) {
        self.ptr.insert(PtrRecord {
            name: name.to_string(),
            ip,
            ttl,
        });
    }

    fn add_ns(&mut self, host: &str, ttl: Option<u32>) -> String {
        let name = qualify(host, &self.zone);
        push_unique(
            &mut self.ns,
            NsRecord {
                zone: self.apex.clone(),
                name: name.clone(),
                ttl,
            },
        );
        name
    }

    /// `addresses` and `hosts` sections. `reverse` selects PTR generation.
    fn add_addresses(&mut self, section: &Mapping, reverse: bool) -> Result<(), ZoneError> {
        for (key, value) in section {
            let host = self.key_name(key)?;
            let name = qualify(&host, &self.zone);
            let values = self.host_values(&host, to_sequence(value))?;
            let wildcard = host.starts_with('*');

            for &ip in &values.ips {
                self.add_address(&name, ip, values.ttl);
                if reverse && !wildcard {
                    self.add_ptr(&name, ip, values.ttl);
                }
                for alias in &values.aliases {
                    self.add_address(alias, ip, values.ttl);
                }
            }
        }
        Ok(())
    }

    fn add_nameservers(&mut self, decl: &NameserverDecl) -> Result<(), ZoneError> {
        match decl {
            NameserverDecl::Single(host) => {
                self.add_ns(host, None);
            }
            NameserverDecl::List(hosts) => {
                for host in hosts {
                    self.add_ns(host, None);
                }
            }
            NameserverDecl::MapWithIps(hosts) => {
                for (key, value) in hosts {
                    let host = self.key_name(key)?;
                    let values = self.host_values(&host, to_sequence(value))?;

                    if !values.aliases.is_empty() {
                        return Err(ZoneError::invalid_declaration(
                            &self.zone,
                            &host,
                            "aliases are not allowed in a nameserver declaration",
                        ));
                    }

                    let name = self.add_ns(&host, values.ttl);
                    if values.ips.is_empty() {
                        continue;
                    }

                    if self.addresses.contains(&name) {
                        let existing = self.addresses.addresses_of(&name);
                        if same_addresses(&existing, &values.ips) {
                            continue;
                        }
                        return Err(ZoneError::ConflictingRecord {
                            zone: self.zone.clone(),
                            name,
                            declared: join_addresses(&values.ips),
                            existing: join_addresses(&existing),
                        });
                    }

                    for &ip in &values.ips {
                        self.add_address(&name, ip, values.ttl);
                        self.add_ptr(&name, ip, values.ttl);
                    }
                }
            }
        }
        Ok(())
    }

    fn add_mail_exchangers(&mut self, section: &Mapping) -> Result<(), ZoneError> {
        for (key, value) in section {
            let host = self.key_name(key)?;
            let name = qualify(&host, &self.zone);
            let mut values = to_sequence(value);

            if values.is_empty() {
                return Err(ZoneError::invalid_shape(
                    &self.zone,
                    "MX",
                    &host,
                    "missing priority",
                ));
            }
            let first = values.remove(0);
            let priority = as_integer(&first)
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| {
                    ZoneError::invalid_shape(
                        &self.zone,
                        "MX",
                        &host,
                        format!("first argument must be an integer priority, found {first:?}"),
                    )
                })?;

            let values = self.host_values(&host, values)?;
            if !values.aliases.is_empty() {
                return Err(ZoneError::invalid_declaration(
                    &self.zone,
                    &host,
                    "aliases are not allowed in a mx declaration",
                ));
            }

            self.mx.push(MxRecord {
                zone: self.apex.clone(),
                name: name.clone(),
                priority,
                ttl: values.ttl,
            });

            if values.ips.is_empty() {
                continue;
            }

            if self.addresses.contains(&name) {
                let existing = self.addresses.addresses_of(&name);
                if !same_addresses(&existing, &values.ips) {
                    warn!(
                        "MX host {} in zone {} declares [{}] but already has [{}]; keeping existing address records",
                        name,
                        self.zone,
                        join_addresses(&values.ips),
                        join_addresses(&existing)
                    );
                }
                continue;
            }

            for &ip in &values.ips {
                self.add_address(&name, ip, values.ttl);
                self.add_ptr(&name, ip, values.ttl);
            }
        }
        Ok(())
    }

    fn add_services(&mut self, section: &Mapping) -> Result<(), ZoneError> {
        for (key, value) in section {
            let key = self.key_name(key)?;
            let service = self.service_name(&key)?;

            let mut values = to_sequence(value);
            let ttl = extract_trailing_ttl(&mut values)
                .map(|ttl| self.ttl(&key, ttl))
                .transpose()?;

            let shape_error = || {
                ZoneError::invalid_shape(
                    &self.zone,
                    "SRV",
                    &key,
                    format!(
                        "expected [port, target] or [priority, weight, port, target], found {values:?}"
                    ),
                )
            };
            let number = |v: &Value| as_integer(v).and_then(|n| u16::try_from(n).ok());

            let (priority, weight, port, target) = match values.as_slice() {
                [port, Value::String(target)] => (
                    DEFAULT_SRV_PRIORITY,
                    DEFAULT_SRV_WEIGHT,
                    number(port).ok_or_else(shape_error)?,
                    target,
                ),
                [priority, weight, port, Value::String(target)] => (
                    number(priority).ok_or_else(shape_error)?,
                    number(weight).ok_or_else(shape_error)?,
                    number(port).ok_or_else(shape_error)?,
                    target,
                ),
                _ => return Err(shape_error()),
            };

            self.srv.push(SrvRecord {
                target: qualify(target, &self.zone),
                service,
                priority,
                weight,
                port,
                ttl,
            });
        }
        Ok(())
    }

    /// `sip.tcp` becomes `_sip._tcp.<zone>.`; anything after the protocol
    /// label is kept as the domain part.
    fn service_name(&self, key: &str) -> Result<String, ZoneError> {
        let mut labels = key.split('.');
        let (Some(name), Some(protocol)) = (labels.next(), labels.next()) else {
            return Err(ZoneError::invalid_shape(
                &self.zone,
                "SRV",
                key,
                "service must be written as <service>.<protocol>[.<domain>]",
            ));
        };
        if name.is_empty() || protocol.is_empty() {
            return Err(ZoneError::invalid_shape(
                &self.zone,
                "SRV",
                key,
                "service and protocol labels must not be empty",
            ));
        }

        let underscored = |label: &str| {
            if label.starts_with('_') {
                label.to_string()
            } else {
                format!("_{label}")
            }
        };

        let mut parts = vec![underscored(name), underscored(protocol)];
        parts.extend(labels.map(str::to_string));
        Ok(qualify(&parts.join("."), &self.zone))
    }
}

/// Whether two address lists hold the same set of addresses.
fn same_addresses(a: &[IpAddr], b: &[IpAddr]) -> bool {
    a.iter().all(|ip| b.contains(ip)) && b.iter().all(|ip| a.contains(ip))
}

fn join_addresses(ips: &[IpAddr]) -> String {
    ips.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
