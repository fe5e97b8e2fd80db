//! Wire kinds of target schema fields.

/// Storage kind of a field in the traffic generator's protocol schema.
///
/// Only the first four kinds have a conversion rule from dissected text;
/// the rest exist in the schema but are never filled from a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// Enumeration, stored as an unsigned 32-bit integer
    Enum,

    /// Unsigned 32-bit integer (also used for IPv4 addresses)
    UInt32,

    /// Unsigned 64-bit integer (MAC addresses, IPv6 address halves)
    UInt64,

    /// Raw octet sequence
    Bytes,

    /// Boolean (explicit-override flags, padding switches)
    Bool,

    /// 64-bit floating point
    Double,
}

impl WireKind {
    /// Human-readable type name for display.
    pub fn type_name(&self) -> &'static str {
        match self {
            WireKind::Enum => "enum",
            WireKind::UInt32 => "u32",
            WireKind::UInt64 => "u64",
            WireKind::Bytes => "bytes",
            WireKind::Bool => "bool",
            WireKind::Double => "f64",
        }
    }

    /// Hex digits a value of this kind renders to, 0 when the width varies.
    pub fn hex_width(&self) -> usize {
        match self {
            WireKind::Enum | WireKind::UInt32 => 8,
            WireKind::UInt64 => 16,
            WireKind::Bytes | WireKind::Bool | WireKind::Double => 0,
        }
    }

    /// Whether dissected text can be converted into this kind.
    pub fn is_convertible(&self) -> bool {
        matches!(
            self,
            WireKind::Enum | WireKind::UInt32 | WireKind::UInt64 | WireKind::Bytes
        )
    }
}

impl std::fmt::Display for WireKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
