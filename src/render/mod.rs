// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Renderers for resolved zones.
//!
//! - [`unbound`] - one `server:` block of `local-zone`/`local-data` directives
//! - [`nsd`] - a directory with `zones.conf` and one master file per zone

pub mod nsd;
pub mod unbound;

/// Left-justify `value` in a column of `width`, rendering `None` as blanks.
pub(crate) fn ttl_column(ttl: Option<u32>, width: usize) -> String {
    match ttl {
        Some(ttl) => format!("{ttl:<width$}"),
        None => " ".repeat(width),
    }
}
