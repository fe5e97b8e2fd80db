//! Decoder registry.

use std::collections::HashMap;

use crate::proto::ProtocolKind;

use super::{
    DefaultDecoder, EthDecoder, FakeFieldWrapperDecoder, FieldNode, GenInfoDecoder, HexDumpDecoder,
    HookContext, Ip4Decoder, Ip6Decoder, NodeAttributes, TcpDecoder,
};

/// Core trait every protocol decoder implements.
///
/// A decoder is shared by every node of its protocol for a whole import
/// session. Whatever it tracks between hooks lives in the node's
/// [`NodeState`](super::NodeState), never in the decoder itself.
pub trait Decoder: Send + Sync {
    /// Protocol name as declared by the dissection document (e.g., "ip").
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Kind of entry opened for each node of this protocol.
    ///
    /// Placeholder protocols return `None`: no entry is opened and only
    /// their hooks run.
    fn kind(&self) -> Option<ProtocolKind> {
        None
    }

    /// Target field id for a directly modeled dissector field.
    fn field_id(&self, _name: &str) -> Option<u32> {
        None
    }

    /// Whether the dissector field is directly modeled.
    fn has_field(&self, name: &str) -> bool {
        self.field_id(name).is_some()
    }

    /// Called once per node, before any field or child event.
    fn open(&self, _attributes: &NodeAttributes, _ctx: &mut HookContext<'_>) {}

    /// Called once per node, after every field and child event.
    fn close(&self, _ctx: &mut HookContext<'_>) {}

    /// Called for every field the decoder does not model.
    fn unmapped_field(&self, _field: &FieldNode<'_>, _ctx: &mut HookContext<'_>) {}
}

/// Enum of all built-in decoders.
///
/// Static dispatch over every decoder the importer ships with.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinDecoder {
    Default(DefaultDecoder),
    HexDump(HexDumpDecoder),
    FakeFieldWrapper(FakeFieldWrapperDecoder),
    GenInfo(GenInfoDecoder),
    Eth(EthDecoder),
    Ip4(Ip4Decoder),
    Ip6(Ip6Decoder),
    Tcp(TcpDecoder),
}

/// Macro to delegate Decoder trait methods to inner types.
macro_rules! delegate_decoder {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinDecoder::Default(d) => d.$method($($arg),*),
            BuiltinDecoder::HexDump(d) => d.$method($($arg),*),
            BuiltinDecoder::FakeFieldWrapper(d) => d.$method($($arg),*),
            BuiltinDecoder::GenInfo(d) => d.$method($($arg),*),
            BuiltinDecoder::Eth(d) => d.$method($($arg),*),
            BuiltinDecoder::Ip4(d) => d.$method($($arg),*),
            BuiltinDecoder::Ip6(d) => d.$method($($arg),*),
            BuiltinDecoder::Tcp(d) => d.$method($($arg),*),
        }
    };
}

impl Decoder for BuiltinDecoder {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_decoder!(self, name)
    }

    #[inline]
    fn display_name(&self) -> &'static str {
        delegate_decoder!(self, display_name)
    }

    #[inline]
    fn kind(&self) -> Option<ProtocolKind> {
        delegate_decoder!(self, kind)
    }

    #[inline]
    fn field_id(&self, name: &str) -> Option<u32> {
        delegate_decoder!(self, field_id, name)
    }

    #[inline]
    fn has_field(&self, name: &str) -> bool {
        delegate_decoder!(self, has_field, name)
    }

    #[inline]
    fn open(&self, attributes: &NodeAttributes, ctx: &mut HookContext<'_>) {
        delegate_decoder!(self, open, attributes, ctx)
    }

    #[inline]
    fn close(&self, ctx: &mut HookContext<'_>) {
        delegate_decoder!(self, close, ctx)
    }

    #[inline]
    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        delegate_decoder!(self, unmapped_field, field, ctx)
    }
}

/// Conversion traits for ergonomic registration.
impl From<DefaultDecoder> for BuiltinDecoder {
    fn from(d: DefaultDecoder) -> Self {
        BuiltinDecoder::Default(d)
    }
}

impl From<HexDumpDecoder> for BuiltinDecoder {
    fn from(d: HexDumpDecoder) -> Self {
        BuiltinDecoder::HexDump(d)
    }
}

impl From<FakeFieldWrapperDecoder> for BuiltinDecoder {
    fn from(d: FakeFieldWrapperDecoder) -> Self {
        BuiltinDecoder::FakeFieldWrapper(d)
    }
}

impl From<GenInfoDecoder> for BuiltinDecoder {
    fn from(d: GenInfoDecoder) -> Self {
        BuiltinDecoder::GenInfo(d)
    }
}

impl From<EthDecoder> for BuiltinDecoder {
    fn from(d: EthDecoder) -> Self {
        BuiltinDecoder::Eth(d)
    }
}

impl From<Ip4Decoder> for BuiltinDecoder {
    fn from(d: Ip4Decoder) -> Self {
        BuiltinDecoder::Ip4(d)
    }
}

impl From<Ip6Decoder> for BuiltinDecoder {
    fn from(d: Ip6Decoder) -> Self {
        BuiltinDecoder::Ip6(d)
    }
}

impl From<TcpDecoder> for BuiltinDecoder {
    fn from(d: TcpDecoder) -> Self {
        BuiltinDecoder::Tcp(d)
    }
}

/// Registry mapping protocol names to decoders.
///
/// Lookup is an exact name match; unknown names resolve to the generic
/// hex-dump decoder.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<&'static str, BuiltinDecoder>,
    fallback: BuiltinDecoder,
}

impl DecoderRegistry {
    /// Create a registry with no named decoders.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            fallback: HexDumpDecoder.into(),
        }
    }

    /// Register a decoder under its protocol name, replacing any earlier one.
    pub fn register<D: Into<BuiltinDecoder>>(&mut self, decoder: D) {
        let decoder = decoder.into();
        self.decoders.insert(decoder.name(), decoder);
    }

    /// Get a decoder by exact protocol name.
    pub fn get(&self, name: &str) -> Option<&BuiltinDecoder> {
        self.decoders.get(name)
    }

    /// Resolve the decoder for a protocol node.
    #[inline]
    pub fn lookup(&self, name: &str) -> &BuiltinDecoder {
        self.decoders.get(name).unwrap_or(&self.fallback)
    }

    /// Decoder used for unrecognized protocol names.
    pub fn fallback(&self) -> &BuiltinDecoder {
        &self.fallback
    }

    /// All named decoders, sorted by protocol name.
    pub fn all_decoders(&self) -> Vec<&BuiltinDecoder> {
        let mut decoders: Vec<_> = self.decoders.values().collect();
        decoders.sort_by_key(|d| d.name());
        decoders
    }

    /// Get the number of named decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Check if no named decoder is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
