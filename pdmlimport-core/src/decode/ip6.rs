//! IPv6 decoder.
//!
//! Addresses arrive as one 32-digit hex string and are split into the
//! high and low 64-bit halves the target schema stores.

use tracing::warn;

use super::{decode_hex_bytes, lookup_field, Decoder, FieldNode, HookContext};
use crate::proto::{Ip6, ProtocolEntry, ProtocolKind};

const FIELD_MAP: &[(&str, u32)] = &[
    ("ipv6.version", Ip6::VERSION),
    ("ipv6.class", Ip6::TRAFFIC_CLASS),
    ("ipv6.flow", Ip6::FLOW_LABEL),
    ("ipv6.plen", Ip6::PAYLOAD_LENGTH),
    ("ipv6.nxt", Ip6::NEXT_HEADER),
    ("ipv6.hlim", Ip6::HOP_LIMIT),
];

/// IPv6 header decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ip6Decoder;

impl Decoder for Ip6Decoder {
    fn name(&self) -> &'static str {
        "ipv6"
    }

    fn display_name(&self) -> &'static str {
        "IPv6"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::Ip6)
    }

    fn field_id(&self, name: &str) -> Option<u32> {
        lookup_field(FIELD_MAP, name)
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        let is_src = match field.name {
            "ipv6.src" => true,
            "ipv6.dst" => false,
            _ => return,
        };
        let Some(ip6) = ctx.entry_mut().and_then(ProtocolEntry::as_ip6_mut) else {
            return;
        };

        let octets: Option<[u8; 16]> = field
            .value()
            .and_then(decode_hex_bytes)
            .and_then(|bytes| bytes.try_into().ok());
        match (octets, is_src) {
            (Some(octets), true) => ip6.set_src_addr(octets),
            (Some(octets), false) => ip6.set_dst_addr(octets),
            (None, _) => warn!(
                field = field.name,
                value = ?field.value(),
                "not a 16-byte address, dropping"
            ),
        }
    }

    fn close(&self, ctx: &mut HookContext<'_>) {
        let policy = ctx.config.overrides.ip6;
        if let Some(ip6) = ctx.entry_mut().and_then(ProtocolEntry::as_ip6_mut) {
            ip6.overrides.merge(policy);
        }
    }
}
