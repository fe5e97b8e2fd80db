//! Protocol decoders.
//!
//! A decoder turns the fields of one dissected protocol node into target
//! protocol entries. Each decoder declares the dissector fields it models
//! directly (set through the entry's typed field table) and gets a hook for
//! every other field, where it can synthesize extra entries, buffer bytes or
//! track byte ranges.
//!
//! | PDML protocol | Decoder | Entry |
//! |---------------|---------|-------|
//! | eth | [`EthDecoder`] | `mac`, plus `eth2` for the type |
//! | ip | [`Ip4Decoder`] | `ip4` |
//! | ipv6 | [`Ip6Decoder`] | `ip6` |
//! | tcp | [`TcpDecoder`] | `tcp`, plus `hexdump` for options |
//! | geninfo | [`GenInfoDecoder`] | none (sets the frame length) |
//! | frame | [`DefaultDecoder`] | none |
//! | fake-field-wrapper | [`FakeFieldWrapperDecoder`] | `hexdump` (opt-in) |
//! | anything else | [`HexDumpDecoder`] | `hexdump` |
//!
//! # Example
//!
//! ```rust
//! use pdmlimport_core::decode::{default_registry, Decoder};
//! use pdmlimport_core::proto::ProtocolKind;
//!
//! let registry = default_registry();
//! assert_eq!(registry.lookup("ip").kind(), Some(ProtocolKind::Ip4));
//! assert!(registry.lookup("ip").has_field("ip.ttl"));
//!
//! // Unknown protocols are kept as raw bytes
//! assert_eq!(registry.lookup("udp").kind(), Some(ProtocolKind::HexDump));
//! ```

mod context;
mod eth;
mod field;
mod hexdump;
mod ip4;
mod ip6;
mod meta;
mod registry;
mod tcp;

#[cfg(test)]
pub mod test_utils;

pub use context::{AttributeEntry, FieldNode, HookContext, NodeAttributes, NodeState};
pub use eth::EthDecoder;
pub use field::{decode_hex_bytes, decode_value, parse_hex_u32, parse_hex_u64, FieldValue};
pub use hexdump::{FakeFieldWrapperDecoder, HexDumpDecoder};
pub use ip4::Ip4Decoder;
pub use ip6::Ip6Decoder;
pub use meta::{DefaultDecoder, GenInfoDecoder};
pub use registry::{BuiltinDecoder, Decoder, DecoderRegistry};
pub use tcp::TcpDecoder;

use crate::config::{ImportConfig, ModeledProtocol};

/// Look up a dissector field name in a decoder's field map.
pub(crate) fn lookup_field(map: &[(&str, u32)], name: &str) -> Option<u32> {
    map.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

/// Create a registry with the default set of decoders.
pub fn default_registry() -> DecoderRegistry {
    registry_for(&ImportConfig::default())
}

/// Create a registry for the given import configuration.
///
/// Modeled protocols that the configuration disables are left out, so their
/// nodes resolve to the hex-dump fallback.
pub fn registry_for(config: &ImportConfig) -> DecoderRegistry {
    let mut registry = DecoderRegistry::new();

    // Frame metadata
    registry.register(GenInfoDecoder);
    registry.register(DefaultDecoder::frame());
    if config.fake_field_wrapper {
        registry.register(FakeFieldWrapperDecoder);
    }

    for protocol in &config.modeled {
        match protocol {
            ModeledProtocol::Eth => registry.register(EthDecoder),
            ModeledProtocol::Ip => registry.register(Ip4Decoder),
            ModeledProtocol::Ipv6 => registry.register(Ip6Decoder),
            ModeledProtocol::Tcp => registry.register(TcpDecoder),
        }
    }

    registry
}
