//! Address classifier
//!
//! Pure, total functions over arbitrary input strings. Malformed input yields
//! `false`, never an error. The private-range check selects the rule set
//! automatically from the literal's syntax.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// True iff `s` is a dotted-decimal IPv4 literal: exactly four octets, each
/// in [0,255], with no surrounding garbage.
pub fn is_valid_v4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// True iff `s` is a standards-conformant IPv6 literal, including compressed
/// (`::`) and mixed (`::ffff:1.2.3.4`) forms.
pub fn is_valid_v6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// True iff `s` is a valid literal inside a reserved private-use range.
///
/// IPv4: RFC1918 blocks, loopback, link-local.
/// IPv6: unique-local (fc00::/7), loopback, link-local (fe80::/10).
pub fn is_private(s: &str) -> bool {
    match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        Ok(IpAddr::V6(v6)) => v6.is_unique_local() || v6.is_loopback() || v6.is_unicast_link_local(),
        Err(_) => false,
    }
}
