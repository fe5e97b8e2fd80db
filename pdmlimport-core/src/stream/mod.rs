//! Reconstructed packet streams.
//!
//! A [`Stream`] is the committed output for one dissected packet: an ordered
//! stack of protocol entries, outermost first. Streams are assembled by a
//! [`StreamBuilder`] while the packet's dissection is being walked.
//!
//! ## Example
//!
//! ```rust
//! use pdmlimport_core::proto::ProtocolKind;
//! use pdmlimport_core::stream::StreamBuilder;
//!
//! let mut builder = StreamBuilder::new(0);
//! builder.push_kind(ProtocolKind::Mac);
//! builder.stage_payload(&[0xde, 0xad]);
//!
//! let stream = builder.finish();
//! assert_eq!(stream.kinds(), vec![ProtocolKind::Mac, ProtocolKind::HexDump]);
//! ```

mod builder;

pub use builder::StreamBuilder;

use serde_json::json;

use crate::proto::{ProtocolEntry, ProtocolKind};

/// One committed packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// 0-based order of the packet in its document
    pub id: u32,
    pub enabled: bool,
    /// Frame length on the wire, including FCS, when the dissection gave one
    pub frame_len: Option<u32>,
    /// Protocol stack, outermost first
    pub protocols: Vec<ProtocolEntry>,
}

impl Stream {
    /// Kinds of the protocol stack, in order.
    pub fn kinds(&self) -> Vec<ProtocolKind> {
        self.protocols.iter().map(ProtocolEntry::kind).collect()
    }

    /// Render as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "enabled": self.enabled,
            "frame_len": self.frame_len,
            "protocols": self.protocols.iter().map(ProtocolEntry::to_json).collect::<Vec<_>>(),
        })
    }
}
