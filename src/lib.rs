// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # zonegen - DNS zone configuration from declarative YAML
//!
//! zonegen reads a hierarchical description of DNS zones (hosts, nameservers,
//! mail exchangers, services and reverse-lookup networks) and writes
//! configuration for two DNS servers:
//!
//! - **unbound** - a `server:` clause of `local-zone`/`local-data` directives
//! - **nsd** - a directory of master zone files plus a `zones.conf` index
//!
//! ## Overview
//!
//! Data flows one way:
//!
//! ```text
//! YAML tree -> Document -> Defaults + per-zone resolution -> ZoneSet -> renderer
//! ```
//!
//! ## Modules
//!
//! - [`declaration`] - Typed view of the input document
//! - [`defaults`] - Run-wide fallbacks for zone fields
//! - [`zone`] - Forward zone resolution (aliases, conflicts, PTR pool)
//! - [`reverse_zone`] - Reverse zone networks and PTR ownership
//! - [`records`] - Resolved record types
//! - [`render`] - unbound and nsd output
//! - [`generate`] - Orchestration of a run
//! - [`serial`] - Date-encoded SOA serials and their persistence
//!
//! ## Example
//!
//! ```rust
//! use zonegen::generate::{process, Destination, OutputFormat};
//!
//! let input: serde_yaml::Value = serde_yaml::from_str(r#"
//! zones:
//!   home.arpa:
//!     email: test@home.arpa
//!     nameserver:
//!       ns1: 192.168.0.1
//! "#).unwrap();
//!
//! let mut out = Vec::new();
//! process(&input, 4711, OutputFormat::Unbound, Destination::Stream(&mut out)).unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("local-data-ptr:"));
//! ```

pub mod constants;
pub mod declaration;
pub mod defaults;
pub mod errors;
pub mod generate;
pub mod normalize;
pub mod records;
pub mod render;
pub mod reverse_zone;
pub mod serial;
pub mod util;
pub mod zone;

pub use errors::ZoneError;

#[cfg(test)]
mod reverse_zone_tests;
