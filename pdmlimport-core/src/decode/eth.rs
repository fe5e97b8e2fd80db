//! Ethernet decoder.
//!
//! Addresses land in a [`Mac`] entry. The type field has no place there:
//! it becomes a separate [`Eth2`] entry with its override flag set, so the
//! captured value survives even when it disagrees with the next layer.

use tracing::{debug, warn};

use super::{lookup_field, parse_hex_u32, Decoder, FieldNode, HookContext};
use crate::proto::{Eth2, Mac, ProtocolKind};

const FIELD_MAP: &[(&str, u32)] = &[("eth.dst", Mac::DST_MAC), ("eth.src", Mac::SRC_MAC)];

/// Ethernet II decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthDecoder;

impl Decoder for EthDecoder {
    fn name(&self) -> &'static str {
        "eth"
    }

    fn display_name(&self) -> &'static str {
        "Ethernet"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::Mac)
    }

    fn field_id(&self, name: &str) -> Option<u32> {
        lookup_field(FIELD_MAP, name)
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        if field.name != "eth.type" {
            return;
        }
        match field.value().and_then(parse_hex_u32) {
            Some(ether_type) => {
                let index = ctx.stream.push(Eth2::with_override(ether_type));
                debug!(ether_type, index, "ethertype entry");
            }
            None => warn!(value = ?field.value(), "eth.type is not hex, dropping"),
        }
    }
}
