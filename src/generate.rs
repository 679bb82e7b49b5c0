// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Run orchestration.
//!
//! One run: decode the document, resolve the defaults once, resolve every
//! zone and reverse zone in declaration order, then hand the immutable result
//! to the selected renderer. Resolution completes before rendering starts,
//! so any [`ZoneError`] aborts the run before output is produced.

use anyhow::{bail, Result};
use serde_yaml::Value;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::declaration::Document;
use crate::defaults::Defaults;
use crate::errors::ZoneError;
use crate::records::Zone;
use crate::render::{nsd, unbound};
use crate::reverse_zone::{resolve_reverse_zone, ReverseZone};
use crate::zone::resolve_zone;

/// Renderer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Inline `local-zone`/`local-data` directives
    Unbound,
    /// Directory of master zone files plus `zones.conf`
    Nsd,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Nsd => "nsd",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbound" => Ok(Self::Unbound),
            "nsd" => Ok(Self::Nsd),
            other => Err(ZoneError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Where rendered output goes.
pub enum Destination<'a> {
    /// A text stream (unbound)
    Stream(&'a mut dyn Write),
    /// An output directory (nsd)
    Directory(&'a Path),
}

/// Everything one run resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneSet {
    pub zones: Vec<Zone>,
    pub reverse_zones: Vec<ReverseZone>,
}

/// Resolve the defaults, all zones and all reverse zones of a document.
///
/// # Errors
///
/// Returns the first [`ZoneError`] raised by any zone.
pub fn resolve(document: &Document, serial: u64) -> Result<ZoneSet, ZoneError> {
    let defaults = Defaults::resolve(&document.defaults)?;

    let zones = document
        .zones
        .iter()
        .map(|(name, decl)| resolve_zone(name, decl, &defaults, serial))
        .collect::<Result<Vec<_>, _>>()?;

    let reverse_zones = document
        .reverse_zones
        .iter()
        .map(|(name, decl)| resolve_reverse_zone(name, decl, &defaults, serial))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Resolved {} zones and {} reverse zones",
        zones.len(),
        reverse_zones.len()
    );

    Ok(ZoneSet {
        zones,
        reverse_zones,
    })
}

/// Resolve a parsed YAML tree and render it.
///
/// Returns `Ok(false)` without rendering anything when the document is
/// empty.
///
/// # Errors
///
/// Returns an error if resolution fails, if the destination does not fit the
/// format (unbound needs a stream, nsd a directory), or if writing fails.
pub fn process(
    input: &Value,
    serial: u64,
    format: OutputFormat,
    destination: Destination<'_>,
) -> Result<bool> {
    let Some(document) = Document::from_value(input)? else {
        info!("Input document is empty, nothing to generate");
        return Ok(false);
    };

    let set = resolve(&document, serial)?;

    match (format, destination) {
        (OutputFormat::Unbound, Destination::Stream(writer)) => {
            unbound::render(writer, &set.zones)?;
        }
        (OutputFormat::Nsd, Destination::Directory(dir)) => {
            nsd::render(dir, &set)?;
        }
        (OutputFormat::Unbound, Destination::Directory(dir)) => {
            bail!(
                "unbound output is a single stream, not a directory: {}",
                dir.display()
            );
        }
        (OutputFormat::Nsd, Destination::Stream(_)) => {
            bail!("nsd output needs an output directory");
        }
    }

    Ok(true)
}
