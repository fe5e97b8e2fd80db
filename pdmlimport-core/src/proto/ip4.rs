//! IPv4 header message.

use serde_json::json;

use super::Message;
use crate::format::format_ipv4;
use crate::schema::{FieldSpec, WireKind};

/// Explicit-override flags of an [`Ip4`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ip4Overrides {
    pub version: bool,
    pub header_length: bool,
    pub total_length: bool,
    pub protocol: bool,
    pub checksum: bool,
}

impl Ip4Overrides {
    /// Every structural field marked.
    pub const ALL: Self = Self {
        version: true,
        header_length: true,
        total_length: true,
        protocol: true,
        checksum: true,
    };

    /// Set every flag that is set in `other`.
    pub fn merge(&mut self, other: Self) {
        self.version |= other.version;
        self.header_length |= other.header_length;
        self.total_length |= other.total_length;
        self.protocol |= other.protocol;
        self.checksum |= other.checksum;
    }
}

/// IPv4 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ip4 {
    /// Version and header length nibbles, as on the wire
    pub ver_hdrlen: u32,
    pub tos: u32,
    pub totlen: u32,
    pub id: u32,
    /// The three flag bits, right-aligned
    pub flags: u32,
    pub frag_ofs: u32,
    pub ttl: u32,
    pub proto: u32,
    pub cksum: u32,
    pub src_ip: u32,
    pub dst_ip: u32,
    pub overrides: Ip4Overrides,
}

impl Default for Ip4 {
    fn default() -> Self {
        Self {
            ver_hdrlen: 0x45,
            tos: 0,
            totlen: 0,
            id: 1234,
            flags: 0,
            frag_ofs: 0,
            ttl: 127,
            proto: 0,
            cksum: 0,
            src_ip: 0,
            dst_ip: 0,
            overrides: Ip4Overrides::default(),
        }
    }
}

impl Ip4 {
    pub const IS_OVERRIDE_VER: u32 = 1;
    pub const IS_OVERRIDE_HDRLEN: u32 = 2;
    pub const IS_OVERRIDE_TOTLEN: u32 = 3;
    pub const IS_OVERRIDE_CKSUM: u32 = 4;
    pub const VER_HDRLEN: u32 = 5;
    pub const TOS: u32 = 6;
    pub const TOTLEN: u32 = 7;
    pub const ID: u32 = 8;
    pub const FLAGS: u32 = 9;
    pub const FRAG_OFS: u32 = 10;
    pub const TTL: u32 = 11;
    pub const PROTO: u32 = 12;
    pub const CKSUM: u32 = 13;
    pub const SRC_IP: u32 = 14;
    pub const DST_IP: u32 = 18;
    pub const IS_OVERRIDE_PROTO: u32 = 30;
}

impl Message for Ip4 {
    const NAME: &'static str = "ip4";
    const PROTOCOL_ID: u32 = 301;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::unsupported(Self::IS_OVERRIDE_VER, "is_override_ver", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_HDRLEN, "is_override_hdrlen", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_TOTLEN, "is_override_totlen", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_CKSUM, "is_override_cksum", WireKind::Bool),
        FieldSpec::uint32(Self::VER_HDRLEN, "ver_hdrlen", |m, v| m.ver_hdrlen = v),
        FieldSpec::uint32(Self::TOS, "tos", |m, v| m.tos = v),
        FieldSpec::uint32(Self::TOTLEN, "totlen", |m, v| m.totlen = v),
        FieldSpec::uint32(Self::ID, "id", |m, v| m.id = v),
        FieldSpec::uint32(Self::FLAGS, "flags", |m, v| m.flags = v),
        FieldSpec::uint32(Self::FRAG_OFS, "frag_ofs", |m, v| m.frag_ofs = v),
        FieldSpec::uint32(Self::TTL, "ttl", |m, v| m.ttl = v),
        FieldSpec::uint32(Self::PROTO, "proto", |m, v| m.proto = v),
        FieldSpec::uint32(Self::CKSUM, "cksum", |m, v| m.cksum = v),
        FieldSpec::uint32(Self::SRC_IP, "src_ip", |m, v| m.src_ip = v),
        FieldSpec::uint32(Self::DST_IP, "dst_ip", |m, v| m.dst_ip = v),
        FieldSpec::unsupported(Self::IS_OVERRIDE_PROTO, "is_override_proto", WireKind::Bool),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "ver_hdrlen": self.ver_hdrlen,
            "tos": self.tos,
            "totlen": self.totlen,
            "id": self.id,
            "flags": self.flags,
            "frag_ofs": self.frag_ofs,
            "ttl": self.ttl,
            "proto": self.proto,
            "cksum": self.cksum,
            "src_ip": format_ipv4(self.src_ip),
            "dst_ip": format_ipv4(self.dst_ip),
            "is_override_ver": self.overrides.version,
            "is_override_hdrlen": self.overrides.header_length,
            "is_override_totlen": self.overrides.total_length,
            "is_override_proto": self.overrides.protocol,
            "is_override_cksum": self.overrides.checksum,
        })
    }

    fn summary(&self) -> String {
        format!(
            "ip4 {} > {} proto {} len {}",
            format_ipv4(self.src_ip),
            format_ipv4(self.dst_ip),
            self.proto,
            self.totlen
        )
    }
}
