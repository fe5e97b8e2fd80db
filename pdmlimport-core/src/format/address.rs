//! Address formatting for reconstructed protocol entries.
//!
//! Entry fields store addresses the way the traffic generator does: a MAC
//! address in the low 48 bits of a u64, an IPv4 address as a u32 in network
//! order, and an IPv6 address as two u64 halves.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Format a UInt32 as an IPv4 address string in dotted-decimal notation.
///
/// # Example
///
/// ```
/// use pdmlimport_core::format::format_ipv4;
///
/// assert_eq!(format_ipv4(0xC0A80101), "192.168.1.1");
/// assert_eq!(format_ipv4(0x0A000001), "10.0.0.1");
/// ```
pub fn format_ipv4(value: u32) -> String {
    Ipv4Addr::from(value.to_be_bytes()).to_string()
}

/// Format the two halves of an IPv6 address.
///
/// # Example
///
/// ```
/// use pdmlimport_core::format::format_ipv6;
///
/// assert_eq!(format_ipv6(0x2001_0db8_0000_0000, 1), "2001:db8::1");
/// ```
pub fn format_ipv6(hi: u64, lo: u64) -> String {
    let value = ((hi as u128) << 64) | lo as u128;
    Ipv6Addr::from(value).to_string()
}

/// Format the low 48 bits of a u64 as a colon-separated MAC address.
///
/// # Example
///
/// ```
/// use pdmlimport_core::format::format_mac;
///
/// assert_eq!(format_mac(0xaabb_ccdd_eeff), "aa:bb:cc:dd:ee:ff");
/// ```
pub fn format_mac(value: u64) -> String {
    let b = value.to_be_bytes();
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        b[2], b[3], b[4], b[5], b[6], b[7]
    )
}
