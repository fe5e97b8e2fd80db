//! Packet-under-construction state.

use tracing::debug;

use super::Stream;
use crate::proto::{HexDump, ProtocolEntry, ProtocolKind};

/// Accumulates the protocol stack of the packet currently being walked.
///
/// Raw trailing payload (e.g. TCP segment data) is staged in a dedicated
/// buffer and only becomes a trailing [`HexDump`] entry when the packet is
/// finished, so that it lands after every protocol entry of the packet.
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    stream: Stream,
    pending_payload: Vec<u8>,
}

impl StreamBuilder {
    /// Start an enabled stream with the given id.
    pub fn new(id: u32) -> Self {
        Self {
            stream: Stream {
                id,
                enabled: true,
                frame_len: None,
                protocols: Vec::new(),
            },
            pending_payload: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.stream.id
    }

    /// Append an entry, returning its index in the stack.
    pub fn push(&mut self, entry: impl Into<ProtocolEntry>) -> usize {
        self.stream.protocols.push(entry.into());
        self.stream.protocols.len() - 1
    }

    /// Append a default entry of the given kind, returning its index.
    pub fn push_kind(&mut self, kind: ProtocolKind) -> usize {
        self.push(ProtocolEntry::new(kind))
    }

    pub fn entry(&self, index: usize) -> Option<&ProtocolEntry> {
        self.stream.protocols.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut ProtocolEntry> {
        self.stream.protocols.get_mut(index)
    }

    pub fn set_frame_len(&mut self, frame_len: u32) {
        self.stream.frame_len = Some(frame_len);
    }

    /// Stage raw payload bytes for the trailing entry.
    pub fn stage_payload(&mut self, bytes: &[u8]) {
        self.pending_payload.extend_from_slice(bytes);
    }

    pub fn pending_payload(&self) -> &[u8] {
        &self.pending_payload
    }

    /// Flush staged payload into a trailing entry and hand out the stream.
    pub fn finish(mut self) -> Stream {
        if !self.pending_payload.is_empty() {
            debug!(
                stream = self.stream.id,
                bytes = self.pending_payload.len(),
                "flushing staged payload"
            );
            let payload = std::mem::take(&mut self.pending_payload);
            self.stream.protocols.push(HexDump::new(payload).into());
        }
        self.stream
    }
}
