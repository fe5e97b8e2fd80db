//! PDML tokenizer adapter.
//!
//! Feeds [`quick_xml`] events to a [`DocumentWalker`] and turns tokenizer
//! failures into a located [`ParseError`].

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::walker::{DocumentWalker, Element};
use crate::config::ImportConfig;
use crate::decode::NodeAttributes;
use crate::error::ParseError;
use crate::stream::Stream;

/// Reads PDML documents into streams.
///
/// # Example
///
/// ```rust
/// use pdmlimport_core::config::ImportConfig;
/// use pdmlimport_core::pdml::PdmlReader;
///
/// let text = r#"<pdml><packet>
///   <proto name="data" pos="0" size="2">
///     <field name="data.data" pos="0" size="2" value="cafe"/>
///   </proto>
/// </packet></pdml>"#;
///
/// let mut streams = Vec::new();
/// let count = PdmlReader::new(ImportConfig::default())
///     .read_str(text, &mut streams)
///     .unwrap();
///
/// assert_eq!(count, 1);
/// let dump = streams[0].protocols[0].as_hex_dump().unwrap();
/// assert_eq!(dump.content, vec![0xca, 0xfe]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdmlReader {
    config: ImportConfig,
}

impl PdmlReader {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Walk `text`, appending one stream per packet to `streams`.
    ///
    /// Returns the number of streams appended. On a fatal error, the streams
    /// committed before it stay in `streams`.
    pub fn read_str(&self, text: &str, streams: &mut Vec<Stream>) -> Result<usize, ParseError> {
        let before = streams.len();
        let mut walker = DocumentWalker::new(self.config.clone(), streams);
        let mut reader = Reader::from_str(text);
        let mut depth = 0usize;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let (line, column) = line_column(text, reader.error_position() as usize);
                    return Err(walker.fatal_error(line, column, err.to_string()));
                }
            };

            match event {
                Event::Start(start) => {
                    let attributes = match collect_attributes(&start) {
                        Ok(attributes) => attributes,
                        Err(message) => {
                            let (line, column) =
                                line_column(text, reader.buffer_position() as usize);
                            return Err(walker.fatal_error(line, column, message));
                        }
                    };
                    walker.start_element(Element::from_name(start.name().as_ref()), &attributes);
                    depth += 1;
                }
                Event::Empty(start) => {
                    let attributes = match collect_attributes(&start) {
                        Ok(attributes) => attributes,
                        Err(message) => {
                            let (line, column) =
                                line_column(text, reader.buffer_position() as usize);
                            return Err(walker.fatal_error(line, column, message));
                        }
                    };
                    let element = Element::from_name(start.name().as_ref());
                    walker.start_element(element, &attributes);
                    walker.end_element(element);
                }
                Event::End(end) => {
                    walker.end_element(Element::from_name(end.name().as_ref()));
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => {
                    if depth > 0 {
                        let (line, column) = line_column(text, text.len());
                        return Err(walker.fatal_error(
                            line,
                            column,
                            format!("unexpected end of document, {depth} element(s) still open"),
                        ));
                    }
                    break;
                }
                _ => {}
            }
        }

        debug!(packets = walker.packet_count(), "document read");
        drop(walker);
        Ok(streams.len() - before)
    }

    /// Read and walk a PDML file.
    pub fn read_file(
        &self,
        path: impl AsRef<Path>,
        streams: &mut Vec<Stream>,
    ) -> crate::Result<usize> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(self.read_str(&text, streams)?)
    }
}

fn collect_attributes(start: &BytesStart<'_>) -> Result<NodeAttributes, String> {
    let mut attributes = NodeAttributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attributes.insert(key, &value);
    }
    Ok(attributes)
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let consumed = &text.as_bytes()[..offset.min(text.len())];
    let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match consumed.iter().rposition(|&b| b == b'\n') {
        Some(newline) => consumed.len() - newline,
        None => consumed.len() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::test_utils::{
        eth_ipv4, field, import, import_with, packet, pdml, ProtoBuilder,
    };
    use crate::proto::{ProtocolEntry, ProtocolKind};

    #[test]
    fn test_line_column() {
        let text = "ab\ncd\nef";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 1), (1, 2));
        assert_eq!(line_column(text, 3), (2, 1));
        assert_eq!(line_column(text, 7), (3, 2));
        assert_eq!(line_column(text, 100), (3, 3));
    }

    #[test]
    fn test_empty_document() {
        let streams = import(&pdml(&[]));
        assert!(streams.is_empty());
    }

    #[test]
    fn test_one_stream_per_packet() {
        let doc = pdml(&[packet(&[eth_ipv4()]), packet(&[eth_ipv4()]), packet(&[])]);
        let streams = import(&doc);

        assert_eq!(streams.len(), 3);
        assert_eq!(streams.iter().map(|s| s.id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(streams[0].kinds(), vec![ProtocolKind::Mac, ProtocolKind::Eth2]);
        assert!(streams[2].protocols.is_empty());
    }

    #[test]
    fn test_attribute_entities_unescaped() {
        let doc = pdml(&[packet(&[
            ProtoBuilder::new("x&amp;y").span(0, 1).field("x", 0, 1, "01").build(),
            ProtoBuilder::new("data").span(1, 1).field("data.data", 1, 1, "02").build(),
        ])]);
        let config = ImportConfig::default().with_excluded("x&y");
        let streams = import_with(&doc, config);

        let dumps: Vec<_> = streams[0]
            .protocols
            .iter()
            .filter_map(ProtocolEntry::as_hex_dump)
            .map(|d| d.content.clone())
            .collect();
        assert_eq!(dumps, vec![vec![0x02]]);
    }

    #[test]
    fn test_hidden_field_markup() {
        let doc = pdml(&[packet(&[ProtoBuilder::new("foo")
            .span(0, 2)
            .field("foo.a", 0, 1, "aa")
            .hidden_field("foo.b", 1, 1, "bb")
            .build()])]);
        let streams = import(&doc);

        let dump = streams[0].protocols[0].as_hex_dump().unwrap();
        assert_eq!(dump.content, vec![0xaa, 0x00]);
    }

    #[test]
    fn test_nested_field_markup() {
        let doc = pdml(&[packet(&[ProtoBuilder::new("foo")
            .span(0, 2)
            .child(format!(
                r#"<field name="foo.flags" pos="0" size="2" value="8001">{}</field>"#,
                field("foo.flags.x", 0, 2, "8000")
            ))
            .build()])]);
        let streams = import(&doc);

        let dump = streams[0].protocols[0].as_hex_dump().unwrap();
        assert_eq!(dump.content, vec![0x80, 0x01]);
    }

    #[test]
    fn test_mismatched_tag_is_fatal() {
        let text = "<pdml>\n<packet></packet>\n<packet><proto name=\"eth\"></packet>\n</pdml>";
        let mut streams = Vec::new();
        let err = PdmlReader::default()
            .read_str(text, &mut streams)
            .unwrap_err();

        assert_eq!(streams.len(), 1);
        assert_eq!(err.packet, 2);
        assert_eq!(err.line, 3);
        assert!(err.to_string().starts_with("XML parse error for packet 2 at line 3, column "));
    }

    #[test]
    fn test_truncated_document_is_fatal() {
        let text = "<pdml><packet></packet><packet><proto name=\"eth\">";
        let mut streams = Vec::new();
        let err = PdmlReader::default()
            .read_str(text, &mut streams)
            .unwrap_err();

        assert_eq!(streams.len(), 1);
        assert_eq!(err.packet, 2);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.pdml");
        std::fs::write(&path, pdml(&[packet(&[eth_ipv4()])])).unwrap();

        let mut streams = Vec::new();
        let count = PdmlReader::default().read_file(&path, &mut streams).unwrap();
        assert_eq!(count, 1);
        assert_eq!(streams.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let mut streams = Vec::new();
        let err = PdmlReader::default()
            .read_file("/nonexistent/capture.pdml", &mut streams)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
