//! TCP decoder.
//!
//! The target schema stacks TCP options and segment data as separate
//! entries after the TCP header. Options are held in the node state and
//! emitted as a hex dump on close. Segment data is staged on the stream and
//! flushed when the packet is committed.

use tracing::{debug, warn};

use super::{lookup_field, Decoder, FieldNode, HookContext, NodeAttributes};
use crate::proto::{HexDump, ProtocolEntry, ProtocolKind, Tcp};

const FIELD_MAP: &[(&str, u32)] = &[
    ("tcp.srcport", Tcp::SRC_PORT),
    ("tcp.dstport", Tcp::DST_PORT),
    ("tcp.seq", Tcp::SEQ_NUM),
    ("tcp.ack", Tcp::ACK_NUM),
    ("tcp.hdr_len", Tcp::HDRLEN_RSVD),
    ("tcp.flags", Tcp::FLAGS),
    ("tcp.window_size", Tcp::WINDOW),
    ("tcp.checksum", Tcp::CKSUM),
    ("tcp.urgent_pointer", Tcp::URG_PTR),
];

/// Display text prefix of the anonymous field carrying the segment payload.
const SEGMENT_DATA: &str = "TCP segment data";

/// TCP header decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDecoder;

impl Decoder for TcpDecoder {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn display_name(&self) -> &'static str {
        "TCP"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::Tcp)
    }

    fn field_id(&self, name: &str) -> Option<u32> {
        lookup_field(FIELD_MAP, name)
    }

    fn open(&self, _attributes: &NodeAttributes, ctx: &mut HookContext<'_>) {
        ctx.state.reset();
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        if field.name == "tcp.options" {
            match field.raw_bytes() {
                Some(options) => {
                    debug!(len = options.len(), "buffering tcp options");
                    ctx.state.options = options;
                }
                None => warn!(value = ?field.value(), "tcp.options is not hex, dropping"),
            }
        } else if field.name.is_empty()
            && field.show().is_some_and(|show| show.starts_with(SEGMENT_DATA))
        {
            match field.raw_bytes() {
                Some(payload) => {
                    debug!(len = payload.len(), "staging segment data");
                    ctx.stream.stage_payload(&payload);
                }
                None => warn!("segment data is not hex, dropping"),
            }
        }
    }

    fn close(&self, ctx: &mut HookContext<'_>) {
        let policy = ctx.config.overrides.tcp;
        if let Some(tcp) = ctx.entry_mut().and_then(ProtocolEntry::as_tcp_mut) {
            tcp.overrides.merge(policy);
        }

        let options = std::mem::take(&mut ctx.state.options);
        if !options.is_empty() {
            let index = ctx.stream.push(HexDump::new(options));
            debug!(index, "tcp options entry");
        }
        ctx.state.reset();
    }
}
