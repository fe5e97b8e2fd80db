//! Document walker.
//!
//! Push-driven state machine over the structural events of a PDML document.
//! Each `<packet>` becomes one [`Stream`]; each `<proto>` is dispatched to
//! the decoder the registry resolves for its name; each `<field>` goes
//! either to the entry's typed field table or to the decoder's hook.
//!
//! Excluded protocols and hidden fields put the walker in a skipping state
//! that swallows the whole subtree:
//!
//! ```text
//! <proto name="expert">     Skipping(1)
//!   <field .../>            Skipping(2) -> Skipping(1)
//! </proto>                  back to normal dispatch
//! ```

use tracing::{debug, trace, warn};

use crate::config::ImportConfig;
use crate::decode::{
    registry_for, BuiltinDecoder, Decoder, DecoderRegistry, FieldNode, HookContext,
    NodeAttributes, NodeState,
};
use crate::error::ParseError;
use crate::proto::ProtocolKind;
use crate::stream::{Stream, StreamBuilder};

/// Structural element of a PDML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Document,
    Packet,
    Proto,
    Field,
    /// Anything else; ignored, but still counted while skipping
    Other,
}

impl Element {
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"pdml" => Element::Document,
            b"packet" => Element::Packet,
            b"proto" => Element::Proto,
            b"field" => Element::Field,
            _ => Element::Other,
        }
    }
}

/// Observable walker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Idle,
    InDocument,
    InPacket,
    InProtocol,
    /// Inside an ignored subtree, with its current nesting depth
    Skipping(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Normal,
    Skipping { depth: u32 },
}

/// A protocol node that has been opened and not yet closed.
#[derive(Debug)]
struct OpenNode {
    decoder: BuiltinDecoder,
    entry: Option<usize>,
    state: NodeState,
}

/// Builds streams from structural document events.
///
/// Committed streams are appended to the output as each packet closes, so
/// they survive a later fatal error.
pub struct DocumentWalker<'a> {
    registry: DecoderRegistry,
    config: ImportConfig,
    output: &'a mut Vec<Stream>,
    packet_count: u32,
    in_document: bool,
    current: Option<StreamBuilder>,
    nodes: Vec<OpenNode>,
    dispatch: Dispatch,
}

impl<'a> DocumentWalker<'a> {
    /// Create a walker with the registry the configuration calls for.
    pub fn new(config: ImportConfig, output: &'a mut Vec<Stream>) -> Self {
        let registry = registry_for(&config);
        Self::with_registry(registry, config, output)
    }

    pub fn with_registry(
        registry: DecoderRegistry,
        config: ImportConfig,
        output: &'a mut Vec<Stream>,
    ) -> Self {
        Self {
            registry,
            config,
            output,
            packet_count: 0,
            in_document: false,
            current: None,
            nodes: Vec::new(),
            dispatch: Dispatch::Normal,
        }
    }

    pub fn state(&self) -> WalkState {
        match self.dispatch {
            Dispatch::Skipping { depth } => WalkState::Skipping(depth),
            Dispatch::Normal if !self.nodes.is_empty() => WalkState::InProtocol,
            Dispatch::Normal if self.current.is_some() => WalkState::InPacket,
            Dispatch::Normal if self.in_document => WalkState::InDocument,
            Dispatch::Normal => WalkState::Idle,
        }
    }

    /// Number of packets committed so far.
    pub fn packet_count(&self) -> u32 {
        self.packet_count
    }

    /// Handle an element start.
    pub fn start_element(&mut self, element: Element, attributes: &NodeAttributes) {
        if let Dispatch::Skipping { depth } = &mut self.dispatch {
            *depth += 1;
            trace!(?element, depth = *depth, "skipping");
            return;
        }

        match element {
            Element::Document => self.start_document(),
            Element::Packet => self.start_packet(),
            Element::Proto => self.start_proto(attributes),
            Element::Field => self.start_field(attributes),
            Element::Other => trace!("ignoring unknown element"),
        }
    }

    /// Handle an element end.
    pub fn end_element(&mut self, element: Element) {
        if let Dispatch::Skipping { depth } = &mut self.dispatch {
            *depth = depth.saturating_sub(1);
            trace!(?element, depth = *depth, "skipping");
            if *depth == 0 {
                self.dispatch = Dispatch::Normal;
            }
            return;
        }

        match element {
            Element::Document => {
                trace!(packets = self.packet_count, "document close");
                self.in_document = false;
            }
            Element::Packet => self.end_packet(),
            Element::Proto => self.end_proto(),
            Element::Field | Element::Other => {}
        }
    }

    /// Abort the walk.
    ///
    /// Discards the packet under construction and returns the error for the
    /// caller to report. Streams already committed are left in the output.
    pub fn fatal_error(
        &mut self,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> ParseError {
        if let Some(discarded) = self.current.take() {
            debug!(stream = discarded.id(), "discarding packet in progress");
        }
        self.nodes.clear();
        self.dispatch = Dispatch::Normal;

        ParseError {
            packet: self.packet_count as usize + 1,
            line,
            column,
            message: message.into(),
        }
    }

    fn start_document(&mut self) {
        trace!("document open");
        self.in_document = true;
        self.packet_count = 0;
    }

    fn start_packet(&mut self) {
        if let Some(unfinished) = self.current.take() {
            warn!(
                stream = unfinished.id(),
                "packet opened inside another, discarding the outer one"
            );
        }
        self.nodes.clear();
        trace!(packet = self.packet_count, "packet open");
        self.current = Some(StreamBuilder::new(self.packet_count));
    }

    fn end_packet(&mut self) {
        self.nodes.clear();
        let Some(builder) = self.current.take() else {
            debug!("packet close without an open packet");
            return;
        };

        let stream = builder.finish();
        trace!(
            stream = stream.id,
            protocols = stream.protocols.len(),
            "packet committed"
        );
        self.output.push(stream);
        self.packet_count += 1;
    }

    fn start_proto(&mut self, attributes: &NodeAttributes) {
        let name = attributes.get("name").unwrap_or_default();
        if self.config.is_excluded(name) {
            trace!(name, "skipping protocol");
            self.dispatch = Dispatch::Skipping { depth: 1 };
            return;
        }
        let Some(stream) = self.current.as_mut() else {
            debug!(name, "protocol outside a packet, skipping");
            self.dispatch = Dispatch::Skipping { depth: 1 };
            return;
        };

        // A nested protocol ends the raw bytes of an enclosing hex dump
        if let Some(top) = self.nodes.last_mut() {
            if top.decoder.kind() == Some(ProtocolKind::HexDump) {
                debug!(outer = top.decoder.name(), inner = name, "flushing hex dump");
                let mut ctx = HookContext::new(stream, top.entry, &mut top.state, &self.config);
                top.decoder.close(&mut ctx);
            }
        }

        let decoder = *self.registry.lookup(name);
        let entry = decoder.kind().map(|kind| stream.push_kind(kind));
        trace!(name, decoder = decoder.name(), ?entry, "protocol open");

        let mut node = OpenNode {
            decoder,
            entry,
            state: NodeState::default(),
        };
        let mut ctx = HookContext::new(stream, entry, &mut node.state, &self.config);
        decoder.open(attributes, &mut ctx);
        self.nodes.push(node);
    }

    fn end_proto(&mut self) {
        let Some(mut node) = self.nodes.pop() else {
            debug!("protocol close without an open protocol");
            return;
        };
        let Some(stream) = self.current.as_mut() else {
            return;
        };

        trace!(decoder = node.decoder.name(), "protocol close");
        let mut ctx = HookContext::new(stream, node.entry, &mut node.state, &self.config);
        node.decoder.close(&mut ctx);
    }

    fn start_field(&mut self, attributes: &NodeAttributes) {
        let field = FieldNode::from_attributes(attributes);
        if field.is_hidden() {
            trace!(name = field.name, "skipping hidden field");
            self.dispatch = Dispatch::Skipping { depth: 1 };
            return;
        }
        let (Some(stream), Some(node)) = (self.current.as_mut(), self.nodes.last_mut()) else {
            trace!(name = field.name, "field outside a protocol");
            return;
        };

        trace!(name = field.name, pos = ?field.pos, size = ?field.size, "field");
        match node.decoder.field_id(field.name) {
            Some(id) => {
                let entry = match node.entry {
                    Some(index) => stream.entry_mut(index),
                    None => None,
                };
                let Some(entry) = entry else {
                    debug!(name = field.name, "modeled field without an entry");
                    return;
                };
                let Some(value) = field.value() else {
                    debug!(name = field.name, "modeled field without a value");
                    return;
                };
                if let Err(err) = entry.set_field(id, value, field.unmasked_value()) {
                    warn!(name = field.name, %err, "dropping field");
                }
            }
            None => {
                let mut ctx = HookContext::new(stream, node.entry, &mut node.state, &self.config);
                node.decoder.unmapped_field(&field, &mut ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::ProtocolEntry;

    fn attrs(pairs: &[(&str, &str)]) -> NodeAttributes {
        pairs.iter().copied().collect()
    }

    fn proto(walker: &mut DocumentWalker<'_>, pairs: &[(&str, &str)]) {
        walker.start_element(Element::Proto, &attrs(pairs));
    }

    fn field(walker: &mut DocumentWalker<'_>, pairs: &[(&str, &str)]) {
        walker.start_element(Element::Field, &attrs(pairs));
        walker.end_element(Element::Field);
    }

    #[test]
    fn test_element_names() {
        assert_eq!(Element::from_name(b"pdml"), Element::Document);
        assert_eq!(Element::from_name(b"packet"), Element::Packet);
        assert_eq!(Element::from_name(b"proto"), Element::Proto);
        assert_eq!(Element::from_name(b"field"), Element::Field);
        assert_eq!(Element::from_name(b"section"), Element::Other);
    }

    #[test]
    fn test_state_transitions() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);
        let none = NodeAttributes::new();

        assert_eq!(walker.state(), WalkState::Idle);
        walker.start_element(Element::Document, &none);
        assert_eq!(walker.state(), WalkState::InDocument);
        walker.start_element(Element::Packet, &none);
        assert_eq!(walker.state(), WalkState::InPacket);
        proto(&mut walker, &[("name", "eth")]);
        assert_eq!(walker.state(), WalkState::InProtocol);
        walker.end_element(Element::Proto);
        assert_eq!(walker.state(), WalkState::InPacket);
        walker.end_element(Element::Packet);
        assert_eq!(walker.state(), WalkState::InDocument);
        walker.end_element(Element::Document);
        assert_eq!(walker.state(), WalkState::Idle);
        assert_eq!(walker.packet_count(), 1);
    }

    #[test]
    fn test_stream_ids_follow_packet_order() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);
        let none = NodeAttributes::new();

        walker.start_element(Element::Document, &none);
        for _ in 0..3 {
            walker.start_element(Element::Packet, &none);
            walker.end_element(Element::Packet);
        }
        walker.end_element(Element::Document);

        let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(out.iter().all(|s| s.enabled));
    }

    #[test]
    fn test_excluded_subtree_skipped() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);
        let none = NodeAttributes::new();

        walker.start_element(Element::Packet, &none);
        proto(&mut walker, &[("name", "expert")]);
        assert_eq!(walker.state(), WalkState::Skipping(1));
        proto(&mut walker, &[("name", "tcp")]);
        assert_eq!(walker.state(), WalkState::Skipping(2));
        field(&mut walker, &[("name", "tcp.srcport"), ("value", "0050")]);
        walker.end_element(Element::Proto);
        assert_eq!(walker.state(), WalkState::Skipping(1));
        walker.end_element(Element::Proto);
        assert_eq!(walker.state(), WalkState::InPacket);
        walker.end_element(Element::Packet);

        assert!(out[0].protocols.is_empty());
    }

    #[test]
    fn test_unnamed_protocol_skipped() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("showname", "Malformed")]);
        assert_eq!(walker.state(), WalkState::Skipping(1));
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        assert!(out[0].protocols.is_empty());
    }

    #[test]
    fn test_hidden_field_and_children_skipped() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("name", "ip")]);
        walker.start_element(
            Element::Field,
            &attrs(&[("name", "ip.ttl"), ("value", "01"), ("hide", "yes")]),
        );
        field(&mut walker, &[("name", "ip.proto"), ("value", "11")]);
        walker.end_element(Element::Field);
        assert_eq!(walker.state(), WalkState::InProtocol);
        field(&mut walker, &[("name", "ip.len"), ("value", "0028")]);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        let ProtocolEntry::Ip4(ip4) = &out[0].protocols[0] else {
            panic!("expected ip4 entry");
        };
        assert_eq!(ip4.ttl, 127);
        assert_eq!(ip4.proto, 0);
        assert_eq!(ip4.totlen, 0x28);
    }

    #[test]
    fn test_nested_protocol_flushes_hex_dump() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("name", "foo"), ("pos", "0"), ("size", "4")]);
        field(&mut walker, &[("name", "foo.a"), ("pos", "0"), ("size", "1"), ("value", "01")]);
        proto(&mut walker, &[("name", "bar"), ("pos", "2"), ("size", "2")]);
        field(&mut walker, &[("name", "bar.a"), ("pos", "2"), ("size", "2"), ("value", "0203")]);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        let dumps: Vec<Vec<u8>> = out[0]
            .protocols
            .iter()
            .filter_map(|p| p.as_hex_dump().map(|d| d.content.clone()))
            .collect();
        assert_eq!(dumps, vec![vec![0x01, 0, 0, 0], vec![0x02, 0x03]]);
    }

    #[test]
    fn test_placeholder_protocol_opens_no_entry() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("name", "geninfo"), ("pos", "0"), ("size", "60")]);
        field(&mut walker, &[("name", "len"), ("pos", "0"), ("size", "60"), ("show", "60")]);
        walker.end_element(Element::Proto);
        proto(&mut walker, &[("name", "frame")]);
        field(&mut walker, &[("name", "frame.len"), ("show", "60")]);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        assert!(out[0].protocols.is_empty());
        assert_eq!(out[0].frame_len, Some(64));
    }

    #[test]
    fn test_schema_mismatch_is_not_fatal() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("name", "ip")]);
        field(&mut walker, &[("name", "ip.ttl"), ("value", "not hex")]);
        field(&mut walker, &[("name", "ip.id"), ("value", "0001")]);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        let ProtocolEntry::Ip4(ip4) = &out[0].protocols[0] else {
            panic!("expected ip4 entry");
        };
        assert_eq!(ip4.ttl, 127);
        assert_eq!(ip4.id, 1);
    }

    #[test]
    fn test_modeled_field_without_value_dropped() {
        let mut out = Vec::new();
        let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);

        walker.start_element(Element::Packet, &NodeAttributes::new());
        proto(&mut walker, &[("name", "ip")]);
        field(&mut walker, &[("name", "ip.ttl"), ("pos", "22"), ("size", "1")]);
        field(&mut walker, &[("name", "ip.id"), ("value", "1c46")]);
        field(&mut walker, &[("name", "ip.id"), ("show", "7238")]);
        walker.end_element(Element::Proto);
        walker.end_element(Element::Packet);

        // Defaults and earlier values survive a missing value
        let ProtocolEntry::Ip4(ip4) = &out[0].protocols[0] else {
            panic!("expected ip4 entry");
        };
        assert_eq!(ip4.ttl, 127);
        assert_eq!(ip4.id, 0x1c46);
    }

    #[test]
    fn test_fatal_error_discards_current_packet() {
        let mut out = Vec::new();
        let err = {
            let mut walker = DocumentWalker::new(ImportConfig::default(), &mut out);
            let none = NodeAttributes::new();
            walker.start_element(Element::Document, &none);
            walker.start_element(Element::Packet, &none);
            walker.end_element(Element::Packet);
            walker.start_element(Element::Packet, &none);
            proto(&mut walker, &[("name", "eth")]);
            walker.fatal_error(12, 7, "mismatched end tag")
        };

        assert_eq!(out.len(), 1);
        assert_eq!(err.packet, 2);
        assert_eq!(err.line, 12);
        assert_eq!(err.column, 7);
        assert_eq!(
            err.to_string(),
            "XML parse error for packet 2 at line 12, column 7: mismatched end tag"
        );
    }
}
