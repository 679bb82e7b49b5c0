// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed record sets produced by zone resolution.
//!
//! All types in this module are plain values. A [`Zone`] is assembled once by
//! the zone resolver and is read-only afterwards; renderers only borrow it.

use std::net::IpAddr;

use crate::constants::{
    DEFAULT_SOA_EXPIRE_SECS, DEFAULT_SOA_NEGATIVE_TTL_SECS, DEFAULT_SOA_REFRESH_SECS,
    DEFAULT_SOA_RETRY_SECS, DEFAULT_ZONE_TTL_SECS,
};

/// An A or AAAA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    /// Fully qualified owner name
    pub name: String,
    /// IPv4 or IPv6 address; selects A vs AAAA
    pub ip: IpAddr,
    /// TTL override, `None` falls back to the zone default
    pub ttl: Option<u32>,
}

impl AddressRecord {
    /// DNS type mnemonic for this record.
    #[must_use]
    pub fn record_type(&self) -> &'static str {
        if self.ip.is_ipv4() {
            "A"
        } else {
            "AAAA"
        }
    }
}

/// A reverse (address-to-name) record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtrRecord {
    /// Fully qualified name the address points back to
    pub name: String,
    pub ip: IpAddr,
    pub ttl: Option<u32>,
}

/// A nameserver record for a zone apex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsRecord {
    /// Fully qualified zone apex
    pub zone: String,
    /// Fully qualified nameserver host
    pub name: String,
    pub ttl: Option<u32>,
}

/// A mail exchange record for a zone apex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    /// Fully qualified zone apex
    pub zone: String,
    /// Fully qualified mail host
    pub name: String,
    pub priority: u16,
    pub ttl: Option<u32>,
}

/// A service locator record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    /// Fully qualified target host
    pub target: String,
    /// Fully qualified service owner, e.g. `_sip._tcp.example.com.`
    pub service: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub ttl: Option<u32>,
}

/// SOA timers and the default TTL of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoaTimings {
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    /// SOA minimum field, governs negative-answer caching
    pub negative_ttl: u32,
    /// `$TTL` of the zone
    pub ttl: u32,
}

impl Default for SoaTimings {
    fn default() -> Self {
        Self {
            refresh: DEFAULT_SOA_REFRESH_SECS,
            retry: DEFAULT_SOA_RETRY_SECS,
            expire: DEFAULT_SOA_EXPIRE_SECS,
            negative_ttl: DEFAULT_SOA_NEGATIVE_TTL_SECS,
            ttl: DEFAULT_ZONE_TTL_SECS,
        }
    }
}

/// Address records grouped by owner, in first-insertion order.
///
/// Each owner holds a list deduplicated by IP: inserting an address that the
/// owner already has is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable {
    owners: Vec<(String, Vec<AddressRecord>)>,
}

impl AddressTable {
    /// Add a record under its own owner name.
    ///
    /// Returns `false` if the owner already had this address.
    pub fn insert(&mut self, record: AddressRecord) -> bool {
        match self.owners.iter_mut().find(|(name, _)| *name == record.name) {
            Some((_, records)) => {
                if records.iter().any(|r| r.ip == record.ip) {
                    false
                } else {
                    records.push(record);
                    true
                }
            }
            None => {
                self.owners.push((record.name.clone(), vec![record]));
                true
            }
        }
    }

    /// Records of one owner, if it has any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[AddressRecord]> {
        self.owners
            .iter()
            .find(|(owner, _)| owner == name)
            .map(|(_, records)| records.as_slice())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Distinct addresses of one owner, in insertion order.
    #[must_use]
    pub fn addresses_of(&self, name: &str) -> Vec<IpAddr> {
        self.get(name)
            .map(|records| records.iter().map(|r| r.ip).collect())
            .unwrap_or_default()
    }

    /// Owners with their records, in insertion order.
    pub fn owners(&self) -> impl Iterator<Item = (&str, &[AddressRecord])> {
        self.owners
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// All records, owner by owner.
    pub fn records(&self) -> impl Iterator<Item = &AddressRecord> {
        self.owners.iter().flat_map(|(_, records)| records.iter())
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.iter().map(|(_, records)| records.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// PTR records of a zone, deduplicated by IP. The first record for an
/// address wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PtrPool {
    records: Vec<PtrRecord>,
}

impl PtrPool {
    /// Add a record unless its address is already mapped.
    pub fn insert(&mut self, record: PtrRecord) -> bool {
        if self.records.iter().any(|r| r.ip == record.ip) {
            return false;
        }
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<PtrRecord> {
        self.records
    }
}

/// A fully resolved forward zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) serial: u64,
    pub(crate) timings: SoaTimings,
    pub(crate) addresses: AddressTable,
    pub(crate) ptr: Vec<PtrRecord>,
    pub(crate) ns: Vec<NsRecord>,
    pub(crate) mx: Vec<MxRecord>,
    pub(crate) srv: Vec<SrvRecord>,
}

impl Zone {
    /// Zone name without the trailing dot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified zone apex.
    #[must_use]
    pub fn apex(&self) -> String {
        format!("{}.", self.name)
    }

    /// Responsible mailbox in dotted form, with trailing dot.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    #[must_use]
    pub fn timings(&self) -> &SoaTimings {
        &self.timings
    }

    /// The nameserver named in the SOA record.
    ///
    /// The resolver refuses to build a zone without nameservers, so the list
    /// is never empty.
    #[must_use]
    pub fn primary_ns(&self) -> &NsRecord {
        &self.ns[0]
    }

    #[must_use]
    pub fn addresses(&self) -> &AddressTable {
        &self.addresses
    }

    #[must_use]
    pub fn ptr(&self) -> &[PtrRecord] {
        &self.ptr
    }

    #[must_use]
    pub fn ns(&self) -> &[NsRecord] {
        &self.ns
    }

    #[must_use]
    pub fn mx(&self) -> &[MxRecord] {
        &self.mx
    }

    #[must_use]
    pub fn srv(&self) -> &[SrvRecord] {
        &self.srv
    }
}
