//! # pdmlimport-core
//!
//! Imports Wireshark PDML dissections into typed protocol stacks for a
//! traffic generator.
//!
//! Every `<packet>` of a PDML document becomes a [`Stream`]: an ordered
//! stack of protocol entries (MAC addresses, Ethernet type, IPv4, IPv6,
//! TCP, raw hex dumps) whose fields follow the generator's numeric schema.
//! Protocols without a dedicated decoder are kept byte-exact as hex dumps.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdmlimport_core::prelude::*;
//!
//! let text = r#"<pdml><packet>
//!   <proto name="eth" pos="0" size="14">
//!     <field name="eth.dst" pos="0" size="6" value="ffffffffffff"/>
//!     <field name="eth.src" pos="6" size="6" value="001122334455"/>
//!     <field name="eth.type" pos="12" size="2" value="0800"/>
//!   </proto>
//! </packet></pdml>"#;
//!
//! let mut streams = Vec::new();
//! PdmlReader::new(ImportConfig::default())
//!     .read_str(text, &mut streams)
//!     .unwrap();
//!
//! assert_eq!(streams[0].kinds(), vec![ProtocolKind::Mac, ProtocolKind::Eth2]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        pdmlimport-core                              |
//! +---------------------------------------------------------------------+
//! |  pdml/       - quick-xml adapter and document walker state machine  |
//! |  decode/     - Decoder trait, registry, per-protocol decoders,      |
//! |                field value codec                                    |
//! |  proto/      - Target schema messages and ProtocolEntry             |
//! |  schema/     - WireKind, FieldDescriptor, typed setter tables       |
//! |  stream/     - Stream and StreamBuilder                             |
//! |  config      - ImportConfig, OverridePolicy                         |
//! |  format/     - Address formatting utilities                         |
//! |  error/      - Error types                                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Supported Protocols
//!
//! | PDML protocol | Entries |
//! |---------------|---------|
//! | eth | mac, eth2 |
//! | ip | ip4 |
//! | ipv6 | ip6 |
//! | tcp | tcp, hexdump (options, segment data) |
//! | geninfo, frame | none |
//! | anything else | hexdump |

pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod pdml;
pub mod prelude;
pub mod proto;
pub mod schema;
pub mod stream;

// Re-export commonly used types at crate root for convenience
pub use config::{ImportConfig, ModeledProtocol, OverridePolicy};
pub use decode::{
    decode_value, default_registry, registry_for, BuiltinDecoder, Decoder, DecoderRegistry,
    FieldValue,
};
pub use error::{CodecError, Error, ParseError, Result, SchemaMismatch};
pub use format::{format_ipv4, format_ipv6, format_mac};
pub use pdml::{import_str, DocumentWalker, PdmlReader};
pub use proto::{ProtocolEntry, ProtocolKind};
pub use schema::{FieldDescriptor, WireKind};
pub use stream::{Stream, StreamBuilder};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
