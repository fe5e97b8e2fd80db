//! IPv4 decoder.

use tracing::{debug, warn};

use super::{lookup_field, parse_hex_u32, Decoder, FieldNode, HookContext};
use crate::proto::{Ip4, ProtocolEntry, ProtocolKind};

const FIELD_MAP: &[(&str, u32)] = &[
    ("ip.version", Ip4::VER_HDRLEN),
    ("ip.dsfield", Ip4::TOS),
    ("ip.len", Ip4::TOTLEN),
    ("ip.id", Ip4::ID),
    ("ip.frag_offset", Ip4::FRAG_OFS),
    ("ip.ttl", Ip4::TTL),
    ("ip.proto", Ip4::PROTO),
    ("ip.checksum", Ip4::CKSUM),
    ("ip.src", Ip4::SRC_IP),
    ("ip.dst", Ip4::DST_IP),
];

/// IPv4 header decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ip4Decoder;

impl Decoder for Ip4Decoder {
    fn name(&self) -> &'static str {
        "ip"
    }

    fn display_name(&self) -> &'static str {
        "IPv4"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::Ip4)
    }

    fn field_id(&self, name: &str) -> Option<u32> {
        lookup_field(FIELD_MAP, name)
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        if field.name != "ip.flags" {
            return;
        }
        let Some(ip4) = ctx.entry_mut().and_then(ProtocolEntry::as_ip4_mut) else {
            return;
        };
        // The flags byte carries the top 3 bits of the fragment offset word
        match field.value().and_then(parse_hex_u32) {
            Some(value) => {
                ip4.flags = value >> 5;
                debug!(flags = ip4.flags, "ip flags");
            }
            None => warn!(value = ?field.value(), "ip.flags is not hex, dropping"),
        }
    }

    fn close(&self, ctx: &mut HookContext<'_>) {
        let policy = ctx.config.overrides.ip4;
        if let Some(ip4) = ctx.entry_mut().and_then(ProtocolEntry::as_ip4_mut) {
            ip4.overrides.merge(policy);
        }
    }
}
