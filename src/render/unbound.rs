// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unbound `local-data` output.
//!
//! Produces a single `server:` clause for inclusion in `unbound.conf`:
//!
//! ```text
//! server:
//!
//!     local-zone:     home.arpa. static
//!     local-data:     "home.arpa.                               10800  IN SOA  ns1.home.arpa. ..."
//!     local-data:     "home.arpa.                                      IN NS   ns1.home.arpa."
//!     local-data:     "ns1.home.arpa.                                  IN A    192.168.0.1"
//!     local-data-ptr: "192.168.0.1                                     ns1.home.arpa."
//! ```
//!
//! Records without a TTL override leave the TTL column blank.

use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;

use super::ttl_column;
use crate::constants::{
    UNBOUND_COMMAND_WIDTH, UNBOUND_INDENT, UNBOUND_LOCAL_DATA, UNBOUND_LOCAL_DATA_PTR,
    UNBOUND_LOCAL_ZONE, UNBOUND_OWNER_WIDTH, UNBOUND_TTL_WIDTH, UNBOUND_TYPE_WIDTH,
};
use crate::records::Zone;

/// Write the directives for all zones.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn render<W: Write + ?Sized>(writer: &mut W, zones: &[Zone]) -> Result<()> {
    writeln!(writer, "server:").context("Failed to write unbound output")?;

    for zone in zones {
        write_zone(writer, zone)
            .with_context(|| format!("Failed to write unbound data for zone {}", zone.name()))?;
        debug!("Rendered unbound data for zone {}", zone.name());
    }

    writer.flush().context("Failed to flush unbound output")?;
    Ok(())
}

fn write_zone<W: Write + ?Sized>(w: &mut W, zone: &Zone) -> std::io::Result<()> {
    let apex = zone.apex();
    let timings = zone.timings();

    writeln!(w)?;
    writeln!(
        w,
        "{UNBOUND_INDENT}{UNBOUND_LOCAL_ZONE:<UNBOUND_COMMAND_WIDTH$} {apex} static"
    )?;

    write_line(
        w,
        UNBOUND_LOCAL_DATA,
        &apex,
        Some(timings.ttl),
        "IN SOA",
        &format!(
            "{} {} {} {} {} {} {}",
            zone.primary_ns().name,
            zone.email(),
            zone.serial(),
            timings.refresh,
            timings.retry,
            timings.expire,
            timings.negative_ttl
        ),
    )?;

    for ns in zone.ns() {
        write_line(w, UNBOUND_LOCAL_DATA, &ns.zone, ns.ttl, "IN NS", &ns.name)?;
    }

    for mx in zone.mx() {
        write_line(
            w,
            UNBOUND_LOCAL_DATA,
            &mx.zone,
            mx.ttl,
            "IN MX",
            &format!("{} {}", mx.priority, mx.name),
        )?;
    }

    for record in zone.addresses().records() {
        write_line(
            w,
            UNBOUND_LOCAL_DATA,
            &record.name,
            record.ttl,
            &format!("IN {}", record.record_type()),
            &record.ip.to_string(),
        )?;
    }

    for srv in zone.srv() {
        write_line(
            w,
            UNBOUND_LOCAL_DATA,
            &srv.service,
            srv.ttl,
            "IN SRV",
            &format!("{} {} {} {}", srv.priority, srv.weight, srv.port, srv.target),
        )?;
    }

    for ptr in zone.ptr() {
        write_line(
            w,
            UNBOUND_LOCAL_DATA_PTR,
            &ptr.ip.to_string(),
            ptr.ttl,
            "",
            &ptr.name,
        )?;
    }

    Ok(())
}

/// One quoted, column-aligned directive.
fn write_line<W: Write + ?Sized>(
    w: &mut W,
    command: &str,
    owner: &str,
    ttl: Option<u32>,
    kind: &str,
    data: &str,
) -> std::io::Result<()> {
    writeln!(
        w,
        "{UNBOUND_INDENT}{command:<UNBOUND_COMMAND_WIDTH$} \"{owner:<UNBOUND_OWNER_WIDTH$} {} {kind:<UNBOUND_TYPE_WIDTH$} {data}\"",
        ttl_column(ttl, UNBOUND_TTL_WIDTH),
    )
}

#[cfg(test)]
#[path = "unbound_tests.rs"]
mod unbound_tests;
