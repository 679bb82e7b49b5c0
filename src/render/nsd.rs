// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! NSD zone directory output.
//!
//! Layout of the output directory:
//!
//! ```text
//! <dir>/zones.conf
//! <dir>/master/home.arpa.zone
//! <dir>/master/0.168.192.in-addr.arpa.zone
//! ```
//!
//! `zones.conf` holds one `zone:` clause per generated file and is meant to
//! be included from `nsd.conf`. Each master file is in RFC 1035 format with
//! owner names written relative to `$ORIGIN`. The owner column is at least
//! [`NSD_OWNER_WIDTH`] wide and grows to the longest owner of the file, so
//! `ip6.arpa` files stay aligned.
//!
//! Rendering is split in two steps. [`plan`] builds every file body in
//! memory and may fail; [`NsdPlan::commit`] then writes the files, each one
//! atomically. A failure while planning therefore leaves the output
//! directory untouched.
//!
//! Reverse zones whose networks share a reverse origin (`10.0.0.0/23` and
//! `10.0.0.0/24` both map to `0.0.10.in-addr.arpa`) are merged into one file.
//! The first of them supplies the SOA and NS records.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ttl_column;
use crate::constants::{
    NSD_MASTER_DIR, NSD_OWNER_WIDTH, NSD_SOA_VALUE_WIDTH, NSD_TTL_WIDTH, NSD_TYPE_WIDTH,
    NSD_ZONES_CONF_FILENAME, NSD_ZONE_FILE_EXTENSION,
};
use crate::errors::ZoneError;
use crate::generate::ZoneSet;
use crate::records::{PtrRecord, SoaTimings, Zone};
use crate::reverse_zone::ReverseZone;

/// A file to be written, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// All files of one NSD run, built but not yet written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NsdPlan {
    /// Zone files in zone order, `zones.conf` last
    pub files: Vec<PlannedFile>,
}

impl NsdPlan {
    /// Contents of a planned file, looked up by its relative path.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.contents.as_str())
    }

    /// Write every planned file below `dir`.
    ///
    /// `zones.conf` is written last so that it never names a zone file that
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or a file cannot be
    /// written.
    pub fn commit(&self, dir: &Path) -> Result<()> {
        for file in &self.files {
            let path = dir.join(&file.path);
            crate::util::write_file(&path, file.contents.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }
        info!("Wrote {} files to {}", self.files.len(), dir.display());
        Ok(())
    }
}

/// Plan and commit the NSD output for a resolved run.
///
/// # Errors
///
/// Returns an error if planning fails (see [`plan`]) or files cannot be
/// written.
pub fn render(dir: &Path, set: &ZoneSet) -> Result<()> {
    let plan = plan(set)?;
    plan.commit(dir)
}

/// Build all zone files and the zone index in memory.
///
/// Reverse zones collect the PTR records of every forward zone whose address
/// lies inside their network. Reverse zones without any such record produce
/// no file.
///
/// # Errors
///
/// Returns:
/// - [`ZoneError::MissingRequiredField`] if a reverse zone that has records
///   lacks an email or a nameserver for its SOA record
/// - [`ZoneError::InvalidDeclaration`] if two zones would be written to the
///   same zone file
pub fn plan(set: &ZoneSet) -> Result<NsdPlan, ZoneError> {
    let mut files = Vec::new();
    let mut index = String::new();
    let mut names: Vec<String> = Vec::new();

    for zone in &set.zones {
        claim_name(&mut names, zone.name())?;
        let path = zone_file_path(zone.name());
        push_index_entry(&mut index, zone.name(), &path);
        files.push(PlannedFile {
            path,
            contents: forward_zone_file(zone),
        });
    }

    for (origin, members) in group_by_origin(&set.reverse_zones) {
        let records = merged_ptr_records(&members, &set.zones);

        if records.is_empty() {
            debug!("Skipping reverse zone {origin}: no PTR records inside the network");
            continue;
        }
        if members.len() > 1 {
            debug!("Merging {} reverse zones into {origin}", members.len());
        }

        claim_name(&mut names, &origin)?;
        let path = zone_file_path(&origin);
        push_index_entry(&mut index, &origin, &path);
        files.push(PlannedFile {
            path,
            contents: reverse_zone_file(members[0], &records)?,
        });
    }

    files.push(PlannedFile {
        path: PathBuf::from(NSD_ZONES_CONF_FILENAME),
        contents: index,
    });

    Ok(NsdPlan { files })
}

/// Record `name` as taken by a zone file, failing if it already is.
fn claim_name(names: &mut Vec<String>, name: &str) -> Result<(), ZoneError> {
    if names.iter().any(|n| n == name) {
        return Err(ZoneError::invalid_declaration(
            name,
            name,
            "another zone is already written to this zone file",
        ));
    }
    names.push(name.to_string());
    Ok(())
}

/// Reverse zones grouped by reverse origin, in first-declaration order.
fn group_by_origin(zones: &[ReverseZone]) -> Vec<(String, Vec<&ReverseZone>)> {
    let mut groups: Vec<(String, Vec<&ReverseZone>)> = Vec::new();
    for zone in zones {
        let origin = zone.origin();
        match groups.iter().position(|(o, _)| *o == origin) {
            Some(i) => groups[i].1.push(zone),
            None => groups.push((origin, vec![zone])),
        }
    }
    groups
}

/// PTR records of every member network, first record per address wins.
fn merged_ptr_records<'a>(members: &[&ReverseZone], zones: &'a [Zone]) -> Vec<&'a PtrRecord> {
    let mut records: Vec<&PtrRecord> = Vec::new();
    for reverse in members {
        for ptr in bucket_ptr_records(reverse, zones) {
            if !records.iter().any(|r| r.ip == ptr.ip) {
                records.push(ptr);
            }
        }
    }
    records
}

fn zone_file_path(origin: &str) -> PathBuf {
    Path::new(NSD_MASTER_DIR).join(format!("{origin}.{NSD_ZONE_FILE_EXTENSION}"))
}

fn push_index_entry(index: &mut String, name: &str, path: &Path) {
    let _ = writeln!(index, "zone:");
    let _ = writeln!(index, "    name: {name}");
    let _ = writeln!(index, "    zonefile: {}", path.display());
    let _ = writeln!(index);
}

/// SOA fields of a zone file.
struct Soa<'a> {
    primary_ns: &'a str,
    email: &'a str,
    serial: u64,
    timings: &'a SoaTimings,
}

/// One resource record line, owner already relative to the origin.
struct Row {
    owner: String,
    ttl: Option<u32>,
    kind: &'static str,
    data: String,
}

/// Collects the records of a zone file and lays them out on `finish`.
struct ZoneFileWriter {
    /// Fully qualified
    origin: String,
    rows: Vec<Row>,
}

impl ZoneFileWriter {
    fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            rows: Vec::new(),
        }
    }

    /// Owner name relative to the origin.
    fn relative(&self, name: &str) -> String {
        if name == self.origin {
            "@".to_string()
        } else if let Some(label) = name.strip_suffix(&format!(".{}", self.origin)) {
            label.to_string()
        } else {
            name.to_string()
        }
    }

    /// Append a record whose owner is already written relative to the origin.
    fn record_relative(
        &mut self,
        owner: String,
        ttl: Option<u32>,
        kind: &'static str,
        data: String,
    ) {
        self.rows.push(Row {
            owner,
            ttl,
            kind,
            data,
        });
    }

    /// Append a record with a fully qualified owner.
    fn record(&mut self, name: &str, ttl: Option<u32>, kind: &'static str, data: String) {
        let owner = self.relative(name);
        self.record_relative(owner, ttl, kind, data);
    }

    /// Render header, SOA block and records. Repeated owners are left blank.
    fn finish(self, ttl: u32, soa: &Soa<'_>) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.owner.len())
            .max()
            .unwrap_or(0)
            .max(NSD_OWNER_WIDTH);
        let indent = " ".repeat(width + 1);

        let mut out = String::new();
        let _ = writeln!(out, "$ORIGIN {}", self.origin);
        let _ = writeln!(out, "$TTL {ttl}");
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "{:<width$} {:<NSD_TTL_WIDTH$} IN {:<NSD_TYPE_WIDTH$} {} {} (",
            "@", "", "SOA", soa.primary_ns, soa.email
        );
        for (value, label) in [
            (soa.serial, "serial"),
            (u64::from(soa.timings.refresh), "refresh"),
            (u64::from(soa.timings.retry), "retry"),
            (u64::from(soa.timings.expire), "expire"),
            (u64::from(soa.timings.negative_ttl), "negative cache ttl"),
        ] {
            let _ = writeln!(out, "{indent}{value:<NSD_SOA_VALUE_WIDTH$} ; {label}");
        }
        let _ = writeln!(out, "{indent})");
        let _ = writeln!(out);

        let mut last_owner: Option<&str> = None;
        for row in &self.rows {
            let shown = if last_owner == Some(row.owner.as_str()) {
                ""
            } else {
                row.owner.as_str()
            };
            let line = format!(
                "{shown:<width$} {} IN {:<NSD_TYPE_WIDTH$} {}",
                ttl_column(row.ttl, NSD_TTL_WIDTH),
                row.kind,
                row.data
            );
            let _ = writeln!(out, "{}", line.trim_end());
            last_owner = Some(row.owner.as_str());
        }

        out
    }
}

fn forward_zone_file(zone: &Zone) -> String {
    let mut w = ZoneFileWriter::new(&zone.apex());

    for ns in zone.ns() {
        w.record(&ns.zone, ns.ttl, "NS", ns.name.clone());
    }
    for mx in zone.mx() {
        w.record(&mx.zone, mx.ttl, "MX", format!("{} {}", mx.priority, mx.name));
    }

    let addresses = zone.addresses();
    for record in addresses.records().filter(|r| r.ip.is_ipv4()) {
        w.record(&record.name, record.ttl, "A", record.ip.to_string());
    }
    for record in addresses.records().filter(|r| r.ip.is_ipv6()) {
        w.record(&record.name, record.ttl, "AAAA", record.ip.to_string());
    }

    for srv in zone.srv() {
        w.record(
            &srv.service,
            srv.ttl,
            "SRV",
            format!("{} {} {} {}", srv.priority, srv.weight, srv.port, srv.target),
        );
    }

    w.finish(
        zone.timings().ttl,
        &Soa {
            primary_ns: &zone.primary_ns().name,
            email: zone.email(),
            serial: zone.serial(),
            timings: zone.timings(),
        },
    )
}

fn reverse_zone_file(reverse: &ReverseZone, records: &[&PtrRecord]) -> Result<String, ZoneError> {
    let missing = |field| ZoneError::MissingRequiredField {
        zone: reverse.name().to_string(),
        field,
    };
    let email = reverse.email().ok_or_else(|| missing("email"))?;
    let primary_ns = reverse
        .nameservers()
        .first()
        .ok_or_else(|| missing("nameserver"))?;

    let origin = format!("{}.", reverse.origin());
    let mut w = ZoneFileWriter::new(&origin);

    for ns in reverse.nameservers() {
        w.record(&origin, None, "NS", ns.clone());
    }
    for ptr in records {
        let owner = reverse.ptr_owner(&ptr.ip);
        w.record_relative(owner, ptr.ttl, "PTR", ptr.name.clone());
    }

    debug!(
        "Planned reverse zone {origin} with {} PTR records",
        records.len()
    );
    Ok(w.finish(
        reverse.timings().ttl,
        &Soa {
            primary_ns,
            email,
            serial: reverse.serial(),
            timings: reverse.timings(),
        },
    ))
}

/// PTR records of all forward zones whose address lies inside a reverse
/// zone's network, in zone and record order.
#[must_use]
pub fn bucket_ptr_records<'a>(reverse: &ReverseZone, zones: &'a [Zone]) -> Vec<&'a PtrRecord> {
    zones
        .iter()
        .flat_map(Zone::ptr)
        .filter(|ptr| reverse.contains(&ptr.ip))
        .collect()
}

#[cfg(test)]
#[path = "nsd_tests.rs"]
mod nsd_tests;
