//! Test utilities for decoders and the document walker.
//!
//! [`DecoderHarness`] drives a single decoder through open, field and close
//! hooks the way the walker does. The PDML builders produce document text
//! for end-to-end tests.

use super::{Decoder, FieldNode, HookContext, NodeAttributes, NodeState};
use crate::config::ImportConfig;
use crate::pdml::PdmlReader;
use crate::proto::ProtocolEntry;
use crate::stream::{Stream, StreamBuilder};

/// Runs one decoder against a stream under construction.
pub struct DecoderHarness<D: Decoder> {
    pub decoder: D,
    pub stream: StreamBuilder,
    pub state: NodeState,
    pub config: ImportConfig,
    /// Entry opened by the last `open`
    pub entry: Option<usize>,
}

impl<D: Decoder> DecoderHarness<D> {
    pub fn new(decoder: D) -> Self {
        Self::with_config(decoder, ImportConfig::default())
    }

    pub fn with_config(decoder: D, config: ImportConfig) -> Self {
        Self {
            decoder,
            stream: StreamBuilder::new(0),
            state: NodeState::default(),
            config,
            entry: None,
        }
    }

    /// Open a protocol node with the given attributes.
    pub fn open(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        let attributes: NodeAttributes = attrs.iter().copied().collect();
        self.entry = self.decoder.kind().map(|kind| self.stream.push_kind(kind));
        let mut ctx = HookContext::new(&mut self.stream, self.entry, &mut self.state, &self.config);
        self.decoder.open(&attributes, &mut ctx);
        self
    }

    /// Deliver a field node: modeled fields go to the entry, others to the hook.
    pub fn field(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        let attributes: NodeAttributes = attrs.iter().copied().collect();
        let field = FieldNode::from_attributes(&attributes);
        match self.decoder.field_id(field.name) {
            Some(id) => {
                let index = self.entry.expect("modeled field without an entry");
                let entry = self.stream.entry_mut(index).expect("entry should exist");
                entry
                    .set_field(id, field.value().unwrap_or_default(), field.unmasked_value())
                    .expect("field should convert");
            }
            None => {
                let mut ctx =
                    HookContext::new(&mut self.stream, self.entry, &mut self.state, &self.config);
                self.decoder.unmapped_field(&field, &mut ctx);
            }
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        let mut ctx = HookContext::new(&mut self.stream, self.entry, &mut self.state, &self.config);
        self.decoder.close(&mut ctx);
        self
    }

    /// Entry opened by the last `open`.
    pub fn entry(&self) -> Option<&ProtocolEntry> {
        self.entry.and_then(|index| self.stream.entry(index))
    }

    pub fn finish(self) -> Stream {
        self.stream.finish()
    }
}

/// Builder for a `<proto>` element.
#[derive(Debug, Clone, Default)]
pub struct ProtoBuilder {
    name: String,
    span: Option<(u32, u32)>,
    children: Vec<String>,
}

impl ProtoBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn span(mut self, pos: u32, size: u32) -> Self {
        self.span = Some((pos, size));
        self
    }

    /// Add a field with position, size and hex value.
    pub fn field(self, name: &str, pos: u32, size: u32, value: &str) -> Self {
        self.child(field(name, pos, size, value))
    }

    /// Add a field marked hidden.
    pub fn hidden_field(self, name: &str, pos: u32, size: u32, value: &str) -> Self {
        self.child(format!(
            r#"<field name="{name}" pos="{pos}" size="{size}" value="{value}" hide="yes"/>"#
        ))
    }

    /// Add raw child markup (nested protocols, nested fields).
    pub fn child(mut self, markup: impl Into<String>) -> Self {
        self.children.push(markup.into());
        self
    }

    pub fn build(self) -> String {
        let span = self
            .span
            .map(|(pos, size)| format!(r#" pos="{pos}" size="{size}""#))
            .unwrap_or_default();
        format!(
            r#"<proto name="{}"{span}>{}</proto>"#,
            self.name,
            self.children.concat()
        )
    }
}

/// A self-closing `<field>` element.
pub fn field(name: &str, pos: u32, size: u32, value: &str) -> String {
    format!(r#"<field name="{name}" pos="{pos}" size="{size}" value="{value}"/>"#)
}

/// A `<packet>` element with the given protocols.
pub fn packet(protos: &[String]) -> String {
    format!("<packet>{}</packet>", protos.concat())
}

/// A complete document with the given packets.
pub fn pdml(packets: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<pdml version=\"0\" creator=\"wireshark\">\n{}\n</pdml>\n",
        packets.join("\n")
    )
}

/// Ethernet header announcing IPv4, at offset 0.
pub fn eth_ipv4() -> String {
    ProtoBuilder::new("eth")
        .span(0, 14)
        .field("eth.dst", 0, 6, "ffffffffffff")
        .field("eth.src", 6, 6, "001122334455")
        .field("eth.type", 12, 2, "0800")
        .build()
}

/// Import a document with the default configuration.
pub fn import(text: &str) -> Vec<Stream> {
    import_with(text, ImportConfig::default())
}

/// Import a document, panicking on a parse error.
pub fn import_with(text: &str, config: ImportConfig) -> Vec<Stream> {
    let mut streams = Vec::new();
    PdmlReader::new(config)
        .read_str(text, &mut streams)
        .expect("document should parse");
    streams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proto_builder_markup() {
        let markup = ProtoBuilder::new("foo")
            .span(4, 2)
            .field("foo.a", 4, 2, "abcd")
            .build();
        assert_eq!(
            markup,
            r#"<proto name="foo" pos="4" size="2"><field name="foo.a" pos="4" size="2" value="abcd"/></proto>"#
        );
    }

    #[test]
    fn test_document_wraps_packets() {
        let doc = pdml(&[packet(&[eth_ipv4()])]);
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<packet><proto name=\"eth\""));
        assert!(doc.trim_end().ends_with("</pdml>"));
    }
}
