//! Target protocol-stack schema.
//!
//! Each reconstructed packet is an ordered stack of [`ProtocolEntry`] values,
//! outermost first. Every entry kind is a plain message type with a
//! compile-time field table ([`Message::FIELDS`]) mapping numeric field ids
//! to typed setters, plus explicit-override flags for the fields a
//! downstream engine would otherwise recompute.
//!
//! | Kind | Id | Message |
//! |------|----|---------|
//! | Link layer addresses | 100 | [`Mac`] |
//! | Raw bytes | 104 | [`HexDump`] |
//! | Ethernet II type | 200 | [`Eth2`] |
//! | IPv4 | 301 | [`Ip4`] |
//! | IPv6 | 302 | [`Ip6`] |
//! | TCP | 400 | [`Tcp`] |

mod eth2;
mod hexdump;
mod ip4;
mod ip6;
mod mac;
mod tcp;

pub use eth2::{Eth2, Eth2Overrides};
pub use hexdump::HexDump;
pub use ip4::{Ip4, Ip4Overrides};
pub use ip6::{Ip6, Ip6Overrides};
pub use mac::Mac;
pub use tcp::{Tcp, TcpOverrides};

use crate::error::SchemaMismatch;
use crate::schema::{find_spec, FieldDescriptor, FieldSpec};

/// A message type of the target schema.
pub trait Message: Default + 'static {
    /// Short schema name (e.g., "ip4").
    const NAME: &'static str;

    /// Numeric protocol id used by the traffic generator.
    const PROTOCOL_ID: u32;

    /// Field id to typed setter table.
    const FIELDS: &'static [FieldSpec<Self>];

    /// Render the message as a JSON object.
    fn to_json(&self) -> serde_json::Value;

    /// One-line human-readable summary.
    fn summary(&self) -> String;

    /// Decode `value` into the field with the given id.
    fn set_field(
        &mut self,
        id: u32,
        value: &str,
        unmasked: Option<&str>,
    ) -> Result<(), SchemaMismatch> {
        let spec = find_spec(Self::FIELDS, id).ok_or(SchemaMismatch::UnknownField {
            protocol: Self::NAME,
            id,
        })?;
        spec.apply(Self::NAME, self, value, unmasked)
    }

    /// Descriptors of every field in the message.
    fn descriptors() -> Vec<FieldDescriptor> {
        Self::FIELDS.iter().map(|spec| spec.descriptor).collect()
    }
}

/// Kind of a protocol entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    Mac,
    Eth2,
    Ip4,
    Ip6,
    Tcp,
    HexDump,
}

impl ProtocolKind {
    /// All entry kinds, in protocol id order.
    pub const ALL: [ProtocolKind; 6] = [
        ProtocolKind::Mac,
        ProtocolKind::HexDump,
        ProtocolKind::Eth2,
        ProtocolKind::Ip4,
        ProtocolKind::Ip6,
        ProtocolKind::Tcp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProtocolKind::Mac => Mac::NAME,
            ProtocolKind::Eth2 => Eth2::NAME,
            ProtocolKind::Ip4 => Ip4::NAME,
            ProtocolKind::Ip6 => Ip6::NAME,
            ProtocolKind::Tcp => Tcp::NAME,
            ProtocolKind::HexDump => HexDump::NAME,
        }
    }

    pub fn protocol_id(&self) -> u32 {
        match self {
            ProtocolKind::Mac => Mac::PROTOCOL_ID,
            ProtocolKind::Eth2 => Eth2::PROTOCOL_ID,
            ProtocolKind::Ip4 => Ip4::PROTOCOL_ID,
            ProtocolKind::Ip6 => Ip6::PROTOCOL_ID,
            ProtocolKind::Tcp => Tcp::PROTOCOL_ID,
            ProtocolKind::HexDump => HexDump::PROTOCOL_ID,
        }
    }

    /// Field descriptors of the kind's message.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        match self {
            ProtocolKind::Mac => Mac::descriptors(),
            ProtocolKind::Eth2 => Eth2::descriptors(),
            ProtocolKind::Ip4 => Ip4::descriptors(),
            ProtocolKind::Ip6 => Ip6::descriptors(),
            ProtocolKind::Tcp => Tcp::descriptors(),
            ProtocolKind::HexDump => HexDump::descriptors(),
        }
    }
}

impl std::fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a reconstructed protocol stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEntry {
    Mac(Mac),
    Eth2(Eth2),
    Ip4(Ip4),
    Ip6(Ip6),
    Tcp(Tcp),
    HexDump(HexDump),
}

/// Delegate Message methods to the wrapped message.
macro_rules! delegate_message {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            ProtocolEntry::Mac(m) => m.$method($($arg),*),
            ProtocolEntry::Eth2(m) => m.$method($($arg),*),
            ProtocolEntry::Ip4(m) => m.$method($($arg),*),
            ProtocolEntry::Ip6(m) => m.$method($($arg),*),
            ProtocolEntry::Tcp(m) => m.$method($($arg),*),
            ProtocolEntry::HexDump(m) => m.$method($($arg),*),
        }
    };
}

impl ProtocolEntry {
    /// Create an entry of the given kind with schema defaults.
    pub fn new(kind: ProtocolKind) -> Self {
        match kind {
            ProtocolKind::Mac => ProtocolEntry::Mac(Mac::default()),
            ProtocolKind::Eth2 => ProtocolEntry::Eth2(Eth2::default()),
            ProtocolKind::Ip4 => ProtocolEntry::Ip4(Ip4::default()),
            ProtocolKind::Ip6 => ProtocolEntry::Ip6(Ip6::default()),
            ProtocolKind::Tcp => ProtocolEntry::Tcp(Tcp::default()),
            ProtocolKind::HexDump => ProtocolEntry::HexDump(HexDump::default()),
        }
    }

    pub fn kind(&self) -> ProtocolKind {
        match self {
            ProtocolEntry::Mac(_) => ProtocolKind::Mac,
            ProtocolEntry::Eth2(_) => ProtocolKind::Eth2,
            ProtocolEntry::Ip4(_) => ProtocolKind::Ip4,
            ProtocolEntry::Ip6(_) => ProtocolKind::Ip6,
            ProtocolEntry::Tcp(_) => ProtocolKind::Tcp,
            ProtocolEntry::HexDump(_) => ProtocolKind::HexDump,
        }
    }

    pub fn protocol_id(&self) -> u32 {
        self.kind().protocol_id()
    }

    /// Decode `value` into the field with the given id.
    #[inline]
    pub fn set_field(
        &mut self,
        id: u32,
        value: &str,
        unmasked: Option<&str>,
    ) -> Result<(), SchemaMismatch> {
        delegate_message!(self, set_field, id, value, unmasked)
    }

    /// Render as `{"protocol": <name>, "protocol_id": <id>, ...fields}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("protocol".to_string(), self.kind().name().into());
        obj.insert("protocol_id".to_string(), self.protocol_id().into());
        if let serde_json::Value::Object(fields) = delegate_message!(self, to_json) {
            obj.extend(fields);
        }
        serde_json::Value::Object(obj)
    }

    pub fn summary(&self) -> String {
        delegate_message!(self, summary)
    }

    pub fn as_hex_dump(&self) -> Option<&HexDump> {
        match self {
            ProtocolEntry::HexDump(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_hex_dump_mut(&mut self) -> Option<&mut HexDump> {
        match self {
            ProtocolEntry::HexDump(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_ip4_mut(&mut self) -> Option<&mut Ip4> {
        match self {
            ProtocolEntry::Ip4(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_ip6_mut(&mut self) -> Option<&mut Ip6> {
        match self {
            ProtocolEntry::Ip6(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tcp_mut(&mut self) -> Option<&mut Tcp> {
        match self {
            ProtocolEntry::Tcp(m) => Some(m),
            _ => None,
        }
    }
}

impl From<HexDump> for ProtocolEntry {
    fn from(m: HexDump) -> Self {
        ProtocolEntry::HexDump(m)
    }
}

impl From<Eth2> for ProtocolEntry {
    fn from(m: Eth2) -> Self {
        ProtocolEntry::Eth2(m)
    }
}
