// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end tests for zonegen
//!
//! These tests drive `zonegen::generate::process` from YAML text to rendered
//! output, the way the binary does.
//!
//! Run with: cargo test --test end_to_end

use chrono::Local;
use std::fs;
use tempfile::TempDir;
use zonegen::constants::{
    DEFAULT_SOA_EXPIRE_SECS, DEFAULT_SOA_NEGATIVE_TTL_SECS, DEFAULT_SOA_REFRESH_SECS,
    DEFAULT_SOA_RETRY_SECS, DEFAULT_ZONE_TTL_SECS,
};
use zonegen::generate::{process, Destination, OutputFormat};
use zonegen::serial::{calc_serial, date_serial, load_serial, next_serial, save_serial};
use zonegen::ZoneError;

const SERIAL: u64 = 4711;

// ============================================================================
// Helper Functions
// ============================================================================

/// Render unbound output and split every line on whitespace.
fn process_lines(yaml: &str, serial: u64) -> anyhow::Result<Vec<Vec<String>>> {
    let input: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let mut out = Vec::new();
    process(
        &input,
        serial,
        OutputFormat::Unbound,
        Destination::Stream(&mut out),
    )?;

    Ok(String::from_utf8(out)?
        .lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect())
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn assert_header(output: &[Vec<String>], domain: &str, nameserver: &str, email: &str, serial: u64) {
    assert_eq!(output[0], words(&["server:"]));
    assert!(output[1].is_empty());
    assert_eq!(output[2], words(&["local-zone:", domain, "static"]));
    assert_eq!(
        output[3],
        vec![
            "local-data:".to_string(),
            format!("\"{domain}"),
            DEFAULT_ZONE_TTL_SECS.to_string(),
            "IN".to_string(),
            "SOA".to_string(),
            nameserver.to_string(),
            email.to_string(),
            serial.to_string(),
            DEFAULT_SOA_REFRESH_SECS.to_string(),
            DEFAULT_SOA_RETRY_SECS.to_string(),
            DEFAULT_SOA_EXPIRE_SECS.to_string(),
            format!("{DEFAULT_SOA_NEGATIVE_TTL_SECS}\""),
        ]
    );
}

fn assert_ns_record(output: &[Vec<String>], domain: &str, name: &str) {
    let expected = words(&["local-data:", &format!("\"{domain}"), "IN", "NS", &format!("{name}\"")]);
    assert!(output.contains(&expected), "missing NS {name} in {output:?}");
}

fn assert_mx_record(output: &[Vec<String>], domain: &str, name: &str, priority: u16) {
    let expected = words(&[
        "local-data:",
        &format!("\"{domain}"),
        "IN",
        "MX",
        &priority.to_string(),
        &format!("{name}\""),
    ]);
    assert!(output.contains(&expected), "missing MX {name} in {output:?}");
}

fn assert_a_record(output: &[Vec<String>], name: &str, ip: &str) {
    let expected = words(&["local-data:", &format!("\"{name}"), "IN", "A", &format!("{ip}\"")]);
    assert!(output.contains(&expected), "missing A {name} {ip} in {output:?}");
}

fn assert_ptr_record(output: &[Vec<String>], name: &str, ip: &str) {
    let expected = words(&["local-data-ptr:", &format!("\"{ip}"), &format!("{name}\"")]);
    assert!(output.contains(&expected), "missing PTR {ip} {name} in {output:?}");
}

fn assert_a_ptr_records(output: &[Vec<String>], name: &str, ip: &str) {
    assert_a_record(output, name, ip);
    assert_ptr_record(output, name, ip);
}

// ============================================================================
// Serial Tests
// ============================================================================

#[test]
fn test_serial_from_zero_is_today() {
    let today = date_serial(Local::now().date_naive());
    assert_eq!(next_serial(0), today);
}

#[test]
fn test_serial_same_day_increments() {
    let today = date_serial(Local::now().date_naive());
    assert_eq!(next_serial(today), today + 1);
}

#[test]
fn test_serial_future_value_supersedes_date() {
    assert_eq!(next_serial(9_900_000_000), 9_900_000_001);
}

#[test]
fn test_serial_old_value_jumps_to_today() {
    let old = 1_990_010_203;
    assert!(next_serial(old) > old + 1);
}

#[test]
fn test_serial_strictly_increases() {
    let today = Local::now().date_naive();
    let first = calc_serial(today, 0);
    let second = calc_serial(today, first);
    let third = calc_serial(today, second);
    assert!(first < second && second < third);
}

#[test]
fn test_serial_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".serial");

    assert_eq!(load_serial(&path).unwrap(), 0);
    let serial = next_serial(load_serial(&path).unwrap());
    save_serial(&path, serial).unwrap();

    assert_eq!(load_serial(&path).unwrap(), serial);
    assert_eq!(next_serial(load_serial(&path).unwrap()), serial + 1);
}

// ============================================================================
// Unbound Tests
// ============================================================================

#[test]
fn test_minimal() {
    let output = process_lines(
        "home.arpa:\n  email: test@home.arpa\n  nameserver: ns1.home.arpa.\n",
        SERIAL,
    )
    .unwrap();

    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
}

#[test]
fn test_ns_array() {
    let output = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    - ns1.home.arpa.
    - ns2
    - ns3.home.arpa.
",
        SERIAL,
    )
    .unwrap();

    assert_eq!(output.len(), 7);
    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
    assert_ns_record(&output, "home.arpa.", "ns2.home.arpa.");
    assert_ns_record(&output, "home.arpa.", "ns3.home.arpa.");
}

#[test]
fn test_ns_obj() {
    let output = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    ns1.home.arpa.: 192.168.0.1
    ns2.home.arpa.: 192.168.0.2
    ns3: 192.168.0.3
",
        SERIAL,
    )
    .unwrap();

    assert_eq!(output.len(), 13);
    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    for n in 1..=3 {
        let name = format!("ns{n}.home.arpa.");
        assert_ns_record(&output, "home.arpa.", &name);
        assert_a_ptr_records(&output, &name, &format!("192.168.0.{n}"));
    }
}

#[test]
fn test_ns_host_expansion() {
    let output = process_lines(
        "home.arpa:\n  email: test@home.arpa\n  nameserver: ns1\n",
        SERIAL,
    )
    .unwrap();

    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
}

#[test]
fn test_ns_ignore_duplicate_ip() {
    let output = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    ns1.home.arpa.: 192.168.0.1
  hosts:
    host1: [ns1, 192.168.0.1]
",
        SERIAL,
    )
    .unwrap();

    assert_eq!(output.len(), 8);
    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
    assert_a_record(&output, "ns1.home.arpa.", "192.168.0.1");
    assert_a_ptr_records(&output, "host1.home.arpa.", "192.168.0.1");
}

#[test]
fn test_ns_conflicting_ip_fails() {
    let err = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    ns1.home.arpa.: 192.168.0.2
  hosts:
    host1: [ns1, 192.168.0.1]
",
        SERIAL,
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ZoneError>(),
        Some(ZoneError::ConflictingRecord { name, .. }) if name == "ns1.home.arpa."
    ));
}

#[test]
fn test_mx() {
    let output = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    ns1.home.arpa.: 192.168.0.1
  mx:
    mail: [10, 192.168.0.2]
",
        SERIAL,
    )
    .unwrap();

    assert_eq!(output.len(), 10);
    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
    assert_mx_record(&output, "home.arpa.", "mail.home.arpa.", 10);
    assert_a_ptr_records(&output, "ns1.home.arpa.", "192.168.0.1");
    assert_a_ptr_records(&output, "mail.home.arpa.", "192.168.0.2");
}

#[test]
fn test_mx_ignore_duplicate_ip() {
    let output = process_lines(
        r"
home.arpa:
  email: test@home.arpa
  nameserver:
    ns1.home.arpa.: 192.168.0.1
  mx:
    mail: [10, 192.168.0.2]
  hosts:
    host1: [mail, 192.168.0.2]
",
        SERIAL,
    )
    .unwrap();

    assert_eq!(output.len(), 11);
    assert_header(&output, "home.arpa.", "ns1.home.arpa.", "test.home.arpa.", SERIAL);
    assert_ns_record(&output, "home.arpa.", "ns1.home.arpa.");
    assert_mx_record(&output, "home.arpa.", "mail.home.arpa.", 10);
    assert_a_ptr_records(&output, "ns1.home.arpa.", "192.168.0.1");
    assert_a_record(&output, "mail.home.arpa.", "192.168.0.2");
    assert_a_ptr_records(&output, "host1.home.arpa.", "192.168.0.2");
}

#[test]
fn test_unknown_format_is_rejected() {
    let err = "bind".parse::<OutputFormat>().unwrap_err();
    assert_eq!(err, ZoneError::UnsupportedFormat("bind".to_string()));
}

// ============================================================================
// NSD Tests
// ============================================================================

#[test]
fn test_nsd_directory() {
    let dir = TempDir::new().unwrap();
    let input: serde_yaml::Value = serde_yaml::from_str(
        r#"
defaults:
  email: hostmaster@home.arpa
  nameserver: ns1.home.arpa.
  ttl: 3600
zones:
  home.arpa:
    nameserver:
      ns1: [192.168.0.1, "2001:db8::1"]
    hosts:
      www: [192.168.0.10, web]
      "*.apps": 192.168.0.20
reverse-zones:
  192.168.0.0/24:
  2001:db8::/48:
    ttl: 600
"#,
    )
    .unwrap();

    let generated = process(
        &input,
        SERIAL,
        OutputFormat::Nsd,
        Destination::Directory(dir.path()),
    )
    .unwrap();
    assert!(generated);

    let index = fs::read_to_string(dir.path().join("zones.conf")).unwrap();
    assert_eq!(index.matches("zone:\n").count(), 3);
    assert!(index.contains("name: home.arpa\n"));
    assert!(index.contains("name: 0.168.192.in-addr.arpa\n"));
    assert!(index.contains("name: 0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa\n"));

    let forward = fs::read_to_string(dir.path().join("master/home.arpa.zone")).unwrap();
    assert!(forward.starts_with("$ORIGIN home.arpa.\n$TTL 3600\n"));
    assert!(forward.contains("4711"));
    assert!(forward.contains("*.apps"));

    let reverse_v4 =
        fs::read_to_string(dir.path().join("master/0.168.192.in-addr.arpa.zone")).unwrap();
    assert_eq!(reverse_v4.matches(" PTR ").count(), 2);
    assert!(!reverse_v4.contains("apps"));

    let reverse_v6 = fs::read_to_string(
        dir.path()
            .join("master/0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa.zone"),
    )
    .unwrap();
    assert!(reverse_v6.contains("$TTL 600\n"));
    assert_eq!(reverse_v6.matches(" PTR ").count(), 1);
}

#[test]
fn test_nsd_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input: serde_yaml::Value = serde_yaml::from_str(
        r"
zones:
  home.arpa:
    email: test@home.arpa
    nameserver: ns1
    hosts:
      www: 192.168.0.10
  lab.arpa:
    email: test@lab.arpa
    nameserver: ns1
    mx:
      mail: [mail.lab.arpa.]
",
    )
    .unwrap();

    let err = process(
        &input,
        SERIAL,
        OutputFormat::Nsd,
        Destination::Directory(dir.path()),
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ZoneError>(),
        Some(ZoneError::InvalidRecordShape { kind: "MX", .. })
    ));
    assert!(!dir.path().join("zones.conf").exists());
    assert!(!dir.path().join("master").exists());
}

#[test]
fn test_nsd_zone_file_collision_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input: serde_yaml::Value = serde_yaml::from_str(
        r"
defaults:
  email: hostmaster@example.org
  nameserver: ns1.example.org.
zones:
  example.org:
    hosts:
      a: 10.0.0.5
  0.0.10.in-addr.arpa:
reverse-zones:
  - 10.0.0.0/23
  - 10.0.0.0/24
",
    )
    .unwrap();

    let err = process(
        &input,
        SERIAL,
        OutputFormat::Nsd,
        Destination::Directory(dir.path()),
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ZoneError>(),
        Some(ZoneError::InvalidDeclaration { .. })
    ));
    assert!(!dir.path().join("zones.conf").exists());
    assert!(!dir.path().join("master").exists());
}
