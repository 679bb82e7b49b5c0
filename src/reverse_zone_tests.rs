// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for reverse zone resolution.

#[cfg(test)]
mod tests {
    use crate::declaration::{NameserverDecl, ReverseZoneDecl, TimingDecl};
    use crate::defaults::Defaults;
    use crate::errors::ZoneError;
    use crate::reverse_zone::*;
    use serde_yaml::Mapping;
    use std::net::IpAddr;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn reverse(name: &str) -> ReverseZone {
        resolve_reverse_zone(name, &ReverseZoneDecl::default(), &Defaults::default(), 1).unwrap()
    }

    // ========================================================================
    // Reverse pointers
    // ========================================================================

    #[test]
    fn test_reverse_pointer_v4() {
        assert_eq!(
            reverse_pointer(ip("192.168.0.1")),
            "1.0.168.192.in-addr.arpa"
        );
    }

    #[test]
    fn test_reverse_pointer_v6() {
        let pointer = reverse_pointer(ip("2001:db8::1"));
        assert!(pointer.starts_with("1.0.0.0.0.0.0.0."));
        assert!(pointer.ends_with(".8.b.d.0.1.0.0.2.ip6.arpa"));
        assert_eq!(reverse_labels(ip("2001:db8::1")).len(), 34);
    }

    // ========================================================================
    // Origins
    // ========================================================================

    #[test]
    fn test_origin_v4_octet_aligned() {
        let zone = reverse("192.168.0.0/24");
        assert_eq!(zone.split_labels(), 1);
        assert_eq!(zone.origin(), "0.168.192.in-addr.arpa");

        let zone = reverse("10.0.0.0/8");
        assert_eq!(zone.split_labels(), 3);
        assert_eq!(zone.origin(), "10.in-addr.arpa");
    }

    #[test]
    fn test_origin_v6_nibble_aligned() {
        let zone = reverse("2001:db8::/32");
        assert_eq!(zone.split_labels(), 24);
        assert_eq!(zone.origin(), "8.b.d.0.1.0.0.2.ip6.arpa");

        let zone = reverse("2001:db8:0:1::/64");
        assert_eq!(zone.split_labels(), 16);
        assert_eq!(zone.origin(), "1.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa");
    }

    #[test]
    fn test_host_bits_are_cleared() {
        let zone = reverse("192.168.0.77/24");
        assert_eq!(zone.name(), "192.168.0.77/24");
        assert_eq!(zone.network().to_string(), "192.168.0.0/24");
        assert_eq!(zone.origin(), "0.168.192.in-addr.arpa");
    }

    #[test]
    fn test_contains() {
        let zone = reverse("192.168.0.0/24");
        assert!(zone.contains(&ip("192.168.0.1")));
        assert!(zone.contains(&ip("192.168.0.255")));
        assert!(!zone.contains(&ip("192.168.1.1")));
        assert!(!zone.contains(&ip("2001:db8::1")));
    }

    // ========================================================================
    // PTR owners
    // ========================================================================

    #[test]
    fn test_ptr_owner_relative() {
        assert_eq!(reverse("192.168.0.0/24").ptr_owner(&ip("192.168.0.10")), "10");
        assert_eq!(reverse("192.168.0.0/16").ptr_owner(&ip("192.168.1.10")), "10.1");
        assert_eq!(
            reverse("2001:db8::/112").ptr_owner(&ip("2001:db8::1")),
            "1.0.0.0"
        );
    }

    #[test]
    fn test_ptr_owner_apex() {
        assert_eq!(reverse("192.168.0.1/32").ptr_owner(&ip("192.168.0.1")), "@");
    }

    #[test]
    fn test_ptr_owner_unaligned_prefix() {
        let zone = reverse("192.168.0.0/23");
        assert_eq!(zone.origin(), "0.168.192.in-addr.arpa");
        assert_eq!(zone.ptr_owner(&ip("192.168.0.5")), "5");
        assert_eq!(
            zone.ptr_owner(&ip("192.168.1.5")),
            "5.1.168.192.in-addr.arpa."
        );
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    #[test]
    fn test_invalid_network() {
        let err = resolve_reverse_zone(
            "192.168.0.0",
            &ReverseZoneDecl::default(),
            &Defaults::default(),
            1,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ZoneError::InvalidNetwork { ref name, .. } if name == "192.168.0.0"
        ));
    }

    #[test]
    fn test_defaults_apply() {
        let defaults = Defaults {
            email: Some("hostmaster@example.org".into()),
            nameservers: vec!["ns1.example.org.".into()],
            ..Defaults::default()
        };
        let zone =
            resolve_reverse_zone("192.168.0.0/24", &ReverseZoneDecl::default(), &defaults, 42)
                .unwrap();

        assert_eq!(zone.email(), Some("hostmaster.example.org."));
        assert_eq!(zone.nameservers(), &["ns1.example.org.".to_string()]);
        assert_eq!(zone.serial(), 42);
        assert_eq!(zone.timings().ttl, 10800);
    }

    #[test]
    fn test_declaration_overrides_defaults() {
        let defaults = Defaults {
            email: Some("hostmaster@example.org".into()),
            nameservers: vec!["ns1.example.org.".into()],
            ..Defaults::default()
        };
        let decl = ReverseZoneDecl {
            email: Some("noc@example.net".into()),
            nameserver: Some(NameserverDecl::List(vec!["ns2.example.net.".into()])),
            serial: Some(7),
            timings: TimingDecl {
                ttl: Some(300),
                ..TimingDecl::default()
            },
        };
        let zone = resolve_reverse_zone("10.0.0.0/8", &decl, &defaults, 42).unwrap();

        assert_eq!(zone.email(), Some("noc.example.net."));
        assert_eq!(zone.nameservers(), &["ns2.example.net.".to_string()]);
        assert_eq!(zone.serial(), 7);
        assert_eq!(zone.timings().ttl, 300);
    }

    #[test]
    fn test_relative_nameserver_is_qualified_against_origin() {
        let decl = ReverseZoneDecl {
            nameserver: Some(NameserverDecl::Single("ns1".into())),
            ..ReverseZoneDecl::default()
        };
        let zone = resolve_reverse_zone("10.0.0.0/8", &decl, &Defaults::default(), 1).unwrap();
        assert_eq!(zone.nameservers(), &["ns1.10.in-addr.arpa.".to_string()]);
    }

    #[test]
    fn test_absolute_nameservers_are_kept() {
        let decl = ReverseZoneDecl {
            nameserver: Some(NameserverDecl::List(vec![
                "ns1.home.arpa.".into(),
                "ns2".into(),
            ])),
            ..ReverseZoneDecl::default()
        };
        let zone =
            resolve_reverse_zone("192.168.0.0/24", &decl, &Defaults::default(), 1).unwrap();
        assert_eq!(
            zone.nameservers(),
            &[
                "ns1.home.arpa.".to_string(),
                "ns2.0.168.192.in-addr.arpa.".to_string()
            ]
        );
    }

    #[test]
    fn test_without_email_or_nameserver() {
        let zone = reverse("10.0.0.0/8");
        assert_eq!(zone.email(), None);
        assert!(zone.nameservers().is_empty());
    }

    #[test]
    fn test_nameserver_mapping_is_rejected() {
        let decl = ReverseZoneDecl {
            nameserver: Some(NameserverDecl::MapWithIps(Mapping::new())),
            ..ReverseZoneDecl::default()
        };
        let err = resolve_reverse_zone("10.0.0.0/8", &decl, &Defaults::default(), 1).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidDeclaration { .. }));
    }
}
