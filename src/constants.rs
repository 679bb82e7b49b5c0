// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for zonegen.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// SOA Timing Defaults
// ============================================================================

/// Default SOA refresh interval (2 hours)
pub const DEFAULT_SOA_REFRESH_SECS: u32 = 7200;

/// Default SOA retry interval (1 hour)
pub const DEFAULT_SOA_RETRY_SECS: u32 = 3600;

/// Default SOA expire time (14 days)
pub const DEFAULT_SOA_EXPIRE_SECS: u32 = 1_209_600;

/// Default SOA negative cache TTL (1 hour)
pub const DEFAULT_SOA_NEGATIVE_TTL_SECS: u32 = 3600;

/// Default zone TTL (3 hours)
pub const DEFAULT_ZONE_TTL_SECS: u32 = 10800;

// ============================================================================
// Record Defaults
// ============================================================================

/// SRV priority used by the short `[port, target]` form
pub const DEFAULT_SRV_PRIORITY: u16 = 5;

/// SRV weight used by the short `[port, target]` form
pub const DEFAULT_SRV_WEIGHT: u16 = 0;

// ============================================================================
// Serial Constants
// ============================================================================

/// Default path of the file holding the last issued serial
pub const DEFAULT_SERIAL_FILE: &str = ".serial";

/// Multiplier applied to the year in a date-encoded serial (`YYYYMMDDnn`)
pub const SERIAL_YEAR_FACTOR: u64 = 1_000_000;

/// Multiplier applied to the month in a date-encoded serial
pub const SERIAL_MONTH_FACTOR: u64 = 10_000;

/// Multiplier applied to the day in a date-encoded serial
pub const SERIAL_DAY_FACTOR: u64 = 100;

// ============================================================================
// Input Document Keys
// ============================================================================

/// Top-level key holding the default block
pub const KEY_DEFAULTS: &str = "defaults";

/// Top-level key holding the forward zones
pub const KEY_ZONES: &str = "zones";

/// Top-level key holding the reverse zones
pub const KEY_REVERSE_ZONES: &str = "reverse-zones";

// ============================================================================
// Unbound Output Layout
// ============================================================================

/// Indentation in front of every directive below `server:`
pub const UNBOUND_INDENT: &str = "    ";

/// Column width of the directive name
pub const UNBOUND_COMMAND_WIDTH: usize = 15;

/// Column width of the owner name
pub const UNBOUND_OWNER_WIDTH: usize = 40;

/// Column width of the TTL override
pub const UNBOUND_TTL_WIDTH: usize = 6;

/// Column width of the class/type pair
pub const UNBOUND_TYPE_WIDTH: usize = 7;

/// Directive for zone-local records
pub const UNBOUND_LOCAL_DATA: &str = "local-data:";

/// Directive declaring a local zone
pub const UNBOUND_LOCAL_ZONE: &str = "local-zone:";

/// Directive for reverse records
pub const UNBOUND_LOCAL_DATA_PTR: &str = "local-data-ptr:";

// ============================================================================
// NSD Output Layout
// ============================================================================

/// Name of the zone index written at the top of the output directory
pub const NSD_ZONES_CONF_FILENAME: &str = "zones.conf";

/// Subdirectory holding the master zone files
pub const NSD_MASTER_DIR: &str = "master";

/// Extension of every generated zone file
pub const NSD_ZONE_FILE_EXTENSION: &str = "zone";

/// Column width of owner names in zone files
pub const NSD_OWNER_WIDTH: usize = 24;

/// Column width of the TTL override in zone files
pub const NSD_TTL_WIDTH: usize = 8;

/// Column width of the record type in zone files
pub const NSD_TYPE_WIDTH: usize = 6;

/// Column width of SOA timer values
pub const NSD_SOA_VALUE_WIDTH: usize = 12;

/// Suffix of IPv4 reverse names
pub const IPV4_REVERSE_SUFFIX: &str = "in-addr.arpa";

/// Suffix of IPv6 reverse names
pub const IPV6_REVERSE_SUFFIX: &str = "ip6.arpa";
