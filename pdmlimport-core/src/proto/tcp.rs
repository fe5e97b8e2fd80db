//! TCP header message.
//!
//! Options and payload are not part of this message; they follow it in the
//! stack as separate [`HexDump`](super::HexDump) entries.

use serde_json::json;

use super::Message;
use crate::schema::{FieldSpec, WireKind};

/// Explicit-override flags of a [`Tcp`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpOverrides {
    pub src_port: bool,
    pub dst_port: bool,
    pub header_length: bool,
    pub checksum: bool,
}

impl TcpOverrides {
    pub const ALL: Self = Self {
        src_port: true,
        dst_port: true,
        header_length: true,
        checksum: true,
    };

    /// Set every flag that is set in `other`.
    pub fn merge(&mut self, other: Self) {
        self.src_port |= other.src_port;
        self.dst_port |= other.dst_port;
        self.header_length |= other.header_length;
        self.checksum |= other.checksum;
    }
}

/// TCP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tcp {
    pub src_port: u32,
    pub dst_port: u32,
    pub seq_num: u32,
    pub ack_num: u32,
    /// Data offset and reserved bits, as on the wire
    pub hdrlen_rsvd: u32,
    pub flags: u32,
    pub window: u32,
    pub cksum: u32,
    pub urg_ptr: u32,
    pub overrides: TcpOverrides,
}

impl Default for Tcp {
    fn default() -> Self {
        Self {
            src_port: 49152,
            dst_port: 49153,
            seq_num: 129018,
            ack_num: 0,
            hdrlen_rsvd: 0x50,
            flags: 0,
            window: 1024,
            cksum: 0,
            urg_ptr: 0,
            overrides: TcpOverrides::default(),
        }
    }
}

impl Tcp {
    pub const IS_OVERRIDE_SRC_PORT: u32 = 1;
    pub const IS_OVERRIDE_DST_PORT: u32 = 2;
    pub const IS_OVERRIDE_HDRLEN: u32 = 3;
    pub const IS_OVERRIDE_CKSUM: u32 = 4;
    pub const SRC_PORT: u32 = 5;
    pub const DST_PORT: u32 = 6;
    pub const SEQ_NUM: u32 = 7;
    pub const ACK_NUM: u32 = 8;
    pub const HDRLEN_RSVD: u32 = 9;
    pub const FLAGS: u32 = 10;
    pub const WINDOW: u32 = 11;
    pub const CKSUM: u32 = 12;
    pub const URG_PTR: u32 = 13;
}

impl Message for Tcp {
    const NAME: &'static str = "tcp";
    const PROTOCOL_ID: u32 = 400;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::unsupported(Self::IS_OVERRIDE_SRC_PORT, "is_override_src_port", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_DST_PORT, "is_override_dst_port", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_HDRLEN, "is_override_hdrlen", WireKind::Bool),
        FieldSpec::unsupported(Self::IS_OVERRIDE_CKSUM, "is_override_cksum", WireKind::Bool),
        FieldSpec::uint32(Self::SRC_PORT, "src_port", |m, v| m.src_port = v),
        FieldSpec::uint32(Self::DST_PORT, "dst_port", |m, v| m.dst_port = v),
        FieldSpec::uint32(Self::SEQ_NUM, "seq_num", |m, v| m.seq_num = v),
        FieldSpec::uint32(Self::ACK_NUM, "ack_num", |m, v| m.ack_num = v),
        FieldSpec::uint32(Self::HDRLEN_RSVD, "hdrlen_rsvd", |m, v| m.hdrlen_rsvd = v),
        FieldSpec::uint32(Self::FLAGS, "flags", |m, v| m.flags = v),
        FieldSpec::uint32(Self::WINDOW, "window", |m, v| m.window = v),
        FieldSpec::uint32(Self::CKSUM, "cksum", |m, v| m.cksum = v),
        FieldSpec::uint32(Self::URG_PTR, "urg_ptr", |m, v| m.urg_ptr = v),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "src_port": self.src_port,
            "dst_port": self.dst_port,
            "seq_num": self.seq_num,
            "ack_num": self.ack_num,
            "hdrlen_rsvd": self.hdrlen_rsvd,
            "flags": self.flags,
            "window": self.window,
            "cksum": self.cksum,
            "urg_ptr": self.urg_ptr,
            "is_override_src_port": self.overrides.src_port,
            "is_override_dst_port": self.overrides.dst_port,
            "is_override_hdrlen": self.overrides.header_length,
            "is_override_cksum": self.overrides.checksum,
        })
    }

    fn summary(&self) -> String {
        format!(
            "tcp {} > {} flags {:#04x} seq {}",
            self.src_port, self.dst_port, self.flags, self.seq_num
        )
    }
}
