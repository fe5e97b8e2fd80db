//! Raw byte span message.

use serde_json::json;

use super::Message;
use crate::schema::{FieldSpec, WireKind};

/// Verbatim bytes of an unmodeled protocol, or of a modeled protocol's
/// unstructured trailing content (options, payload).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexDump {
    pub content: Vec<u8>,
    /// Whether the generator should pad the content to the frame length
    pub pad_until_end: bool,
}

impl HexDump {
    pub const CONTENT: u32 = 1;
    pub const PAD_UNTIL_END: u32 = 2;

    /// A dump of `content` that is never padded.
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            pad_until_end: false,
        }
    }

    /// Append `len` zero bytes.
    pub fn pad(&mut self, len: usize) {
        self.content.resize(self.content.len() + len, 0);
    }
}

impl Message for HexDump {
    const NAME: &'static str = "hexdump";
    const PROTOCOL_ID: u32 = 104;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::bytes(Self::CONTENT, "content", |m, v| m.content = v),
        FieldSpec::unsupported(Self::PAD_UNTIL_END, "pad_until_end", WireKind::Bool),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "content": hex::encode(&self.content),
            "pad_until_end": self.pad_until_end,
        })
    }

    fn summary(&self) -> String {
        format!("hexdump {} bytes", self.content.len())
    }
}
