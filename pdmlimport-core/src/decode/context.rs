//! Node attributes and per-node hook context.

use compact_str::CompactString;
use smallvec::SmallVec;

use super::field::decode_hex_bytes;
use crate::config::ImportConfig;
use crate::proto::ProtocolEntry;
use crate::stream::StreamBuilder;

/// Attribute entry: (name, value).
pub type AttributeEntry = (CompactString, CompactString);

/// Attributes of a protocol or field node, in document order.
///
/// PDML nodes carry a handful of attributes (name, showname, size, pos,
/// show, value, unmaskedvalue, hide), so they stay inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    entries: SmallVec<[AttributeEntry; 8]>,
}

impl NodeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any earlier value.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = CompactString::from(value),
            None => self
                .entries
                .push((CompactString::from(name), CompactString::from(value))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, treating an empty value as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Attribute parsed as a decimal u32.
    pub fn parse_u32(&self, name: &str) -> Option<u32> {
        self.non_empty(name)?.trim().parse().ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for NodeAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = NodeAttributes::new();
        for (k, v) in iter {
            attributes.insert(k.as_ref(), v.as_ref());
        }
        attributes
    }
}

/// A dissected field, as seen by a decoder.
#[derive(Debug, Clone, Copy)]
pub struct FieldNode<'a> {
    /// Dissector field name (e.g., "ip.flags"); empty for anonymous text fields
    pub name: &'a str,
    /// Byte offset within the frame
    pub pos: Option<u32>,
    /// Byte length
    pub size: Option<u32>,
    pub attributes: &'a NodeAttributes,
}

impl<'a> FieldNode<'a> {
    pub fn from_attributes(attributes: &'a NodeAttributes) -> Self {
        Self {
            name: attributes.get("name").unwrap_or_default(),
            pos: attributes.parse_u32("pos"),
            size: attributes.parse_u32("size"),
            attributes,
        }
    }

    /// Hex-encoded value.
    pub fn value(&self) -> Option<&'a str> {
        self.attributes.get("value")
    }

    /// Hex-encoded value before the dissector applied a bitmask, if any.
    pub fn unmasked_value(&self) -> Option<&'a str> {
        self.attributes.non_empty("unmaskedvalue")
    }

    /// Display text.
    pub fn show(&self) -> Option<&'a str> {
        self.attributes.get("show")
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.get("hide") == Some("yes")
    }

    /// Raw hex of the field, preferring the unmasked value.
    pub fn raw_hex(&self) -> Option<&'a str> {
        self.unmasked_value().or_else(|| self.attributes.non_empty("value"))
    }

    /// Raw octets of the field, preferring the unmasked value.
    ///
    /// A field without a value yields no octets; None means the value is
    /// not valid hex.
    pub fn raw_bytes(&self) -> Option<Vec<u8>> {
        match self.raw_hex() {
            Some(hex) => decode_hex_bytes(hex),
            None => Some(Vec::new()),
        }
    }
}

/// Transient state of one open protocol node.
///
/// Decoders are shared by every node of their protocol, so anything a
/// decoder tracks between hooks lives here and is dropped with the node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeState {
    /// Next byte offset the gap filler expects
    pub expected_pos: Option<u32>,
    /// End of the node's declared span
    pub end_pos: Option<u32>,
    /// Buffered option bytes awaiting their own entry
    pub options: Vec<u8>,
}

impl NodeState {
    pub fn reset(&mut self) {
        self.expected_pos = None;
        self.end_pos = None;
        self.options.clear();
    }
}

/// Everything a decoder hook may touch.
pub struct HookContext<'a> {
    /// Packet under construction
    pub stream: &'a mut StreamBuilder,
    /// Index of the entry opened for this node, None for placeholder protocols
    pub entry: Option<usize>,
    pub state: &'a mut NodeState,
    pub config: &'a ImportConfig,
}

impl<'a> HookContext<'a> {
    pub fn new(
        stream: &'a mut StreamBuilder,
        entry: Option<usize>,
        state: &'a mut NodeState,
        config: &'a ImportConfig,
    ) -> Self {
        Self {
            stream,
            entry,
            state,
            config,
        }
    }

    /// The entry opened for this node.
    pub fn entry_mut(&mut self) -> Option<&mut ProtocolEntry> {
        let index = self.entry?;
        self.stream.entry_mut(index)
    }

    /// The node's entry and state, borrowed together.
    pub fn entry_and_state(&mut self) -> (Option<&mut ProtocolEntry>, &mut NodeState) {
        let entry = match self.entry {
            Some(index) => self.stream.entry_mut(index),
            None => None,
        };
        (entry, &mut *self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_lookup() {
        let attrs: NodeAttributes = [("name", "ip.len"), ("pos", "16"), ("size", "")]
            .into_iter()
            .collect();

        assert_eq!(attrs.get("name"), Some("ip.len"));
        assert_eq!(attrs.parse_u32("pos"), Some(16));
        assert_eq!(attrs.get("size"), Some(""));
        assert_eq!(attrs.non_empty("size"), None);
        assert_eq!(attrs.get("value"), None);
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_insert_replaces() {
        let mut attrs = NodeAttributes::new();
        attrs.insert("value", "01");
        attrs.insert("value", "02");
        assert_eq!(attrs.get("value"), Some("02"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_field_node_positions() {
        let attrs: NodeAttributes = [("name", "tcp.seq"), ("pos", "38"), ("size", "4")]
            .into_iter()
            .collect();
        let field = FieldNode::from_attributes(&attrs);

        assert_eq!(field.name, "tcp.seq");
        assert_eq!(field.pos, Some(38));
        assert_eq!(field.size, Some(4));
        assert!(!field.is_hidden());
    }

    #[test]
    fn test_field_node_bad_position() {
        let attrs: NodeAttributes = [("name", "x"), ("pos", "-1")].into_iter().collect();
        assert_eq!(FieldNode::from_attributes(&attrs).pos, None);
    }

    #[test]
    fn test_raw_bytes_prefers_unmasked() {
        let attrs: NodeAttributes = [("value", "00"), ("unmaskedvalue", "4a")]
            .into_iter()
            .collect();
        assert_eq!(FieldNode::from_attributes(&attrs).raw_bytes(), Some(vec![0x4a]));

        let attrs: NodeAttributes = [("value", "00"), ("unmaskedvalue", "")]
            .into_iter()
            .collect();
        assert_eq!(FieldNode::from_attributes(&attrs).raw_bytes(), Some(vec![0x00]));
    }

    #[test]
    fn test_raw_bytes_missing_and_malformed() {
        let attrs = NodeAttributes::new();
        assert_eq!(FieldNode::from_attributes(&attrs).raw_bytes(), Some(vec![]));

        let attrs: NodeAttributes = [("value", "xyz")].into_iter().collect();
        assert_eq!(FieldNode::from_attributes(&attrs).raw_bytes(), None);
    }

    #[test]
    fn test_node_state_reset() {
        let mut state = NodeState {
            expected_pos: Some(4),
            end_pos: Some(8),
            options: vec![1, 2],
        };
        state.reset();
        assert_eq!(state, NodeState::default());
    }
}
