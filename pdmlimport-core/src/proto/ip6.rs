//! IPv6 header message.

use serde_json::json;

use super::Message;
use crate::format::format_ipv6;
use crate::schema::{FieldSpec, WireKind};

/// Explicit-override flags of an [`Ip6`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ip6Overrides {
    pub version: bool,
    pub payload_length: bool,
    pub next_header: bool,
}

impl Ip6Overrides {
    pub const ALL: Self = Self {
        version: true,
        payload_length: true,
        next_header: true,
    };

    /// Set every flag that is set in `other`.
    pub fn merge(&mut self, other: Self) {
        self.version |= other.version;
        self.payload_length |= other.payload_length;
        self.next_header |= other.next_header;
    }
}

/// IPv6 header. Addresses are split into high and low 64-bit halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ip6 {
    pub version: u32,
    pub traffic_class: u32,
    pub flow_label: u32,
    pub payload_length: u32,
    pub next_header: u32,
    pub hop_limit: u32,
    pub src_addr_hi: u64,
    pub src_addr_lo: u64,
    pub dst_addr_hi: u64,
    pub dst_addr_lo: u64,
    pub overrides: Ip6Overrides,
}

impl Default for Ip6 {
    fn default() -> Self {
        Self {
            version: 6,
            traffic_class: 0,
            flow_label: 0,
            payload_length: 0,
            next_header: 0,
            hop_limit: 127,
            src_addr_hi: 0,
            src_addr_lo: 0,
            dst_addr_hi: 0,
            dst_addr_lo: 0,
            overrides: Ip6Overrides::default(),
        }
    }
}

impl Ip6 {
    pub const IS_OVERRIDE_VERSION: u32 = 1;
    pub const IS_OVERRIDE_PAYLOAD_LENGTH: u32 = 2;
    pub const IS_OVERRIDE_NEXT_HEADER: u32 = 3;
    pub const VERSION: u32 = 4;
    pub const TRAFFIC_CLASS: u32 = 5;
    pub const FLOW_LABEL: u32 = 6;
    pub const PAYLOAD_LENGTH: u32 = 7;
    pub const NEXT_HEADER: u32 = 8;
    pub const HOP_LIMIT: u32 = 9;
    pub const SRC_ADDR_HI: u32 = 10;
    pub const SRC_ADDR_LO: u32 = 11;
    pub const DST_ADDR_HI: u32 = 16;
    pub const DST_ADDR_LO: u32 = 17;

    /// Store a 16-byte source address.
    pub fn set_src_addr(&mut self, octets: [u8; 16]) {
        (self.src_addr_hi, self.src_addr_lo) = split_addr(octets);
    }

    /// Store a 16-byte destination address.
    pub fn set_dst_addr(&mut self, octets: [u8; 16]) {
        (self.dst_addr_hi, self.dst_addr_lo) = split_addr(octets);
    }
}

fn split_addr(octets: [u8; 16]) -> (u64, u64) {
    let value = u128::from_be_bytes(octets);
    ((value >> 64) as u64, value as u64)
}

impl Message for Ip6 {
    const NAME: &'static str = "ip6";
    const PROTOCOL_ID: u32 = 302;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::unsupported(Self::IS_OVERRIDE_VERSION, "is_override_version", WireKind::Bool),
        FieldSpec::unsupported(
            Self::IS_OVERRIDE_PAYLOAD_LENGTH,
            "is_override_payload_length",
            WireKind::Bool,
        ),
        FieldSpec::unsupported(
            Self::IS_OVERRIDE_NEXT_HEADER,
            "is_override_next_header",
            WireKind::Bool,
        ),
        FieldSpec::uint32(Self::VERSION, "version", |m, v| m.version = v),
        FieldSpec::uint32(Self::TRAFFIC_CLASS, "traffic_class", |m, v| m.traffic_class = v),
        FieldSpec::uint32(Self::FLOW_LABEL, "flow_label", |m, v| m.flow_label = v),
        FieldSpec::uint32(Self::PAYLOAD_LENGTH, "payload_length", |m, v| m.payload_length = v),
        FieldSpec::uint32(Self::NEXT_HEADER, "next_header", |m, v| m.next_header = v),
        FieldSpec::uint32(Self::HOP_LIMIT, "hop_limit", |m, v| m.hop_limit = v),
        FieldSpec::uint64(Self::SRC_ADDR_HI, "src_addr_hi", |m, v| m.src_addr_hi = v),
        FieldSpec::uint64(Self::SRC_ADDR_LO, "src_addr_lo", |m, v| m.src_addr_lo = v),
        FieldSpec::uint64(Self::DST_ADDR_HI, "dst_addr_hi", |m, v| m.dst_addr_hi = v),
        FieldSpec::uint64(Self::DST_ADDR_LO, "dst_addr_lo", |m, v| m.dst_addr_lo = v),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "version": self.version,
            "traffic_class": self.traffic_class,
            "flow_label": self.flow_label,
            "payload_length": self.payload_length,
            "next_header": self.next_header,
            "hop_limit": self.hop_limit,
            "src_addr": format_ipv6(self.src_addr_hi, self.src_addr_lo),
            "dst_addr": format_ipv6(self.dst_addr_hi, self.dst_addr_lo),
            "is_override_version": self.overrides.version,
            "is_override_payload_length": self.overrides.payload_length,
            "is_override_next_header": self.overrides.next_header,
        })
    }

    fn summary(&self) -> String {
        format!(
            "ip6 {} > {} nxt {} plen {}",
            format_ipv6(self.src_addr_hi, self.src_addr_lo),
            format_ipv6(self.dst_addr_hi, self.dst_addr_lo),
            self.next_header,
            self.payload_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_address() {
        let mut ip = Ip6::default();
        let mut octets = [0u8; 16];
        octets[0] = 0xfe;
        octets[1] = 0x80;
        octets[15] = 0x01;
        ip.set_src_addr(octets);

        assert_eq!(ip.src_addr_hi, 0xfe80_0000_0000_0000);
        assert_eq!(ip.src_addr_lo, 1);
    }

    #[test]
    fn test_set_next_header() {
        let mut ip = Ip6::default();
        ip.set_field(Ip6::NEXT_HEADER, "3a", None).unwrap();
        assert_eq!(ip.next_header, 58);
    }
}
