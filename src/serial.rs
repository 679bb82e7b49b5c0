// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SOA serial numbers.
//!
//! Serials follow the `YYYYMMDDnn` convention: the date of the run with two
//! trailing digits for revisions on the same day. A new serial is always at
//! least one above the previous one, so a stale or future-dated serial file
//! still produces a strictly increasing sequence.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::constants::{SERIAL_DAY_FACTOR, SERIAL_MONTH_FACTOR, SERIAL_YEAR_FACTOR};
use crate::util::write_file;

/// Date-encoded serial for a day, with the revision digits at zero.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use zonegen::serial::date_serial;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// assert_eq!(date_serial(day), 2024010200);
/// ```
#[must_use]
pub fn date_serial(today: NaiveDate) -> u64 {
    // Years before the common era have no meaningful serial.
    let year = u64::try_from(today.year()).unwrap_or(0);
    year * SERIAL_YEAR_FACTOR
        + u64::from(today.month()) * SERIAL_MONTH_FACTOR
        + u64::from(today.day()) * SERIAL_DAY_FACTOR
}

/// Next serial after `previous` on `today`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use zonegen::serial::calc_serial;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// assert_eq!(calc_serial(day, 0), 2024010200);
/// assert_eq!(calc_serial(day, 2024010200), 2024010201);
/// assert_eq!(calc_serial(day, 9900000000), 9900000001);
/// ```
#[must_use]
pub fn calc_serial(today: NaiveDate, previous: u64) -> u64 {
    date_serial(today).max(previous.saturating_add(1))
}

/// Next serial after `previous` using the local calendar date.
#[must_use]
pub fn next_serial(previous: u64) -> u64 {
    calc_serial(Local::now().date_naive(), previous)
}

/// Read the last issued serial.
///
/// A missing or empty file yields 0.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold an unsigned
/// integer.
pub fn load_serial(path: &Path) -> Result<u64> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No serial file at {}, starting from 0", path.display());
            return Ok(0);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read serial file {}", path.display()))
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    text.parse::<u64>()
        .with_context(|| format!("Serial file {} does not hold a number: '{text}'", path.display()))
}

/// Persist the serial issued by this run.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_serial(path: &Path, serial: u64) -> Result<()> {
    write_file(path, format!("{serial}\n").as_bytes())
        .with_context(|| format!("Failed to write serial file {}", path.display()))
}
