//! Generic raw-bytes decoders.
//!
//! Any protocol without a dedicated decoder is imported as a hex dump: the
//! concatenation of its field bytes in document order, with zero bytes
//! wherever the dissector left part of the protocol's span uncovered.
//!
//! ```text
//! span [0, 8), fields "aabb" at 0 and "ccdd" at 6
//!   -> aa bb 00 00 00 00 cc dd
//! ```

use tracing::{debug, warn};

use super::{Decoder, FieldNode, HookContext, NodeAttributes};
use crate::proto::{ProtocolEntry, ProtocolKind};

/// Gap-filling hex-dump decoder, the registry's fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexDumpDecoder;

impl Decoder for HexDumpDecoder {
    fn name(&self) -> &'static str {
        "hexdump"
    }

    fn display_name(&self) -> &'static str {
        "Hex dump"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::HexDump)
    }

    fn open(&self, attributes: &NodeAttributes, ctx: &mut HookContext<'_>) {
        let (entry, state) = ctx.entry_and_state();
        state.reset();

        let pos = attributes.parse_u32("pos");
        let end = pos
            .zip(attributes.parse_u32("size"))
            .and_then(|(pos, size)| pos.checked_add(size));
        if let Some(end) = end {
            state.expected_pos = pos;
            state.end_pos = Some(end);
        }

        if let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) {
            dump.pad_until_end = false;
        }
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        let (entry, state) = ctx.entry_and_state();
        let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) else {
            return;
        };

        if let (Some(pos), Some(expected), Some(end)) =
            (field.pos, state.expected_pos, state.end_pos)
        {
            // Never fill past the declared span
            let fill_to = pos.min(end);
            if fill_to > expected {
                debug!(field = field.name, pos, gap = fill_to - expected, "zero-filling gap");
                dump.pad((fill_to - expected) as usize);
                state.expected_pos = Some(fill_to);
            }
        }

        if field.pos != state.expected_pos {
            return;
        }

        match field.raw_bytes() {
            Some(bytes) => {
                dump.content.extend_from_slice(&bytes);
                state.expected_pos = state
                    .expected_pos
                    .map(|pos| pos.saturating_add(bytes.len() as u32));
            }
            None => warn!(field = field.name, "field value is not hex, leaving a gap"),
        }
    }

    fn close(&self, ctx: &mut HookContext<'_>) {
        let check_span = ctx.config.check_span;
        let (entry, state) = ctx.entry_and_state();

        if let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) {
            if let (Some(expected), Some(end)) = (state.expected_pos, state.end_pos) {
                if end > expected {
                    dump.pad((end - expected) as usize);
                } else if expected > end {
                    let overrun = (expected - end) as usize;
                    if check_span {
                        warn!(expected, end, overrun, "fields overran the declared span");
                    }
                    let keep = dump.content.len().saturating_sub(overrun);
                    dump.content.truncate(keep);
                }
            }
            dump.pad_until_end = false;
        }

        state.reset();
    }
}

/// Decoder for Wireshark's `fake-field-wrapper` pseudo protocol.
///
/// Collects the fields that start exactly where the previous one ended,
/// beginning at offset 0. No gap filling and no trailing padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeFieldWrapperDecoder;

impl Decoder for FakeFieldWrapperDecoder {
    fn name(&self) -> &'static str {
        "fake-field-wrapper"
    }

    fn kind(&self) -> Option<ProtocolKind> {
        Some(ProtocolKind::HexDump)
    }

    fn open(&self, _attributes: &NodeAttributes, ctx: &mut HookContext<'_>) {
        let (entry, state) = ctx.entry_and_state();
        state.reset();
        state.expected_pos = Some(0);
        if let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) {
            dump.pad_until_end = false;
        }
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        let (entry, state) = ctx.entry_and_state();
        let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) else {
            return;
        };
        if field.pos.is_none() || field.pos != state.expected_pos || field.size.is_none() {
            return;
        }
        let Some(bytes) = field.raw_hex().and_then(super::decode_hex_bytes) else {
            return;
        };

        dump.content.extend_from_slice(&bytes);
        state.expected_pos = state
            .expected_pos
            .map(|pos| pos.saturating_add(bytes.len() as u32));
    }

    fn close(&self, ctx: &mut HookContext<'_>) {
        let (entry, state) = ctx.entry_and_state();
        if let Some(dump) = entry.and_then(ProtocolEntry::as_hex_dump_mut) {
            dump.pad_until_end = false;
        }
        state.reset();
    }
}
