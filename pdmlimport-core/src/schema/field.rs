//! Field descriptors and typed-setter tables for protocol entries.

use super::WireKind;
use crate::decode::{decode_value, FieldValue};
use crate::error::{CodecError, SchemaMismatch};

/// Descriptor of one field of a target protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Numeric field id within the protocol message
    pub id: u32,

    /// Field name (snake_case, e.g., "src_port")
    pub name: &'static str,

    /// Storage kind
    pub kind: WireKind,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub const fn new(id: u32, name: &'static str, kind: WireKind) -> Self {
        Self { id, name, kind }
    }
}

/// Typed setter for one field of message `M`.
///
/// The variant is chosen when the table is built, so a decoded value can
/// only ever reach a setter of the matching type.
pub enum Setter<M> {
    UInt32(fn(&mut M, u32)),
    UInt64(fn(&mut M, u64)),
    Bytes(fn(&mut M, Vec<u8>)),
    /// Present in the schema, never filled from dissected text
    Unsupported,
}

/// One row of a message's compile-time field table.
pub struct FieldSpec<M: 'static> {
    pub descriptor: FieldDescriptor,
    pub setter: Setter<M>,
}

impl<M> FieldSpec<M> {
    pub const fn uint32(id: u32, name: &'static str, set: fn(&mut M, u32)) -> Self {
        Self {
            descriptor: FieldDescriptor::new(id, name, WireKind::UInt32),
            setter: Setter::UInt32(set),
        }
    }

    pub const fn enumeration(id: u32, name: &'static str, set: fn(&mut M, u32)) -> Self {
        Self {
            descriptor: FieldDescriptor::new(id, name, WireKind::Enum),
            setter: Setter::UInt32(set),
        }
    }

    pub const fn uint64(id: u32, name: &'static str, set: fn(&mut M, u64)) -> Self {
        Self {
            descriptor: FieldDescriptor::new(id, name, WireKind::UInt64),
            setter: Setter::UInt64(set),
        }
    }

    pub const fn bytes(id: u32, name: &'static str, set: fn(&mut M, Vec<u8>)) -> Self {
        Self {
            descriptor: FieldDescriptor::new(id, name, WireKind::Bytes),
            setter: Setter::Bytes(set),
        }
    }

    /// A field the importer never writes (explicit-override flags and the like).
    pub const fn unsupported(id: u32, name: &'static str, kind: WireKind) -> Self {
        Self {
            descriptor: FieldDescriptor::new(id, name, kind),
            setter: Setter::Unsupported,
        }
    }

    /// Decode `value` according to the field's wire kind and store it.
    ///
    /// Byte-string fields prefer the `unmasked` alternate when one is given.
    pub fn apply(
        &self,
        protocol: &'static str,
        msg: &mut M,
        value: &str,
        unmasked: Option<&str>,
    ) -> Result<(), SchemaMismatch> {
        let mismatch = |source| SchemaMismatch::Codec {
            protocol,
            field: self.descriptor.name,
            source,
        };

        let text = match self.descriptor.kind {
            WireKind::Bytes => unmasked.unwrap_or(value),
            _ => value,
        };
        let decoded = decode_value(self.descriptor.kind, text).map_err(mismatch)?;

        match (&self.setter, decoded) {
            (Setter::UInt32(set), FieldValue::UInt32(v)) => set(msg, v),
            (Setter::UInt64(set), FieldValue::UInt64(v)) => set(msg, v),
            (Setter::Bytes(set), FieldValue::Bytes(v)) => set(msg, v),
            _ => return Err(mismatch(CodecError::Unsupported(self.descriptor.kind))),
        }
        Ok(())
    }
}

/// Look up a field spec by id in a message table.
pub fn find_spec<M>(table: &'static [FieldSpec<M>], id: u32) -> Option<&'static FieldSpec<M>> {
    table.iter().find(|spec| spec.descriptor.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        word: u32,
        wide: u64,
        raw: Vec<u8>,
    }

    const PROBE_FIELDS: &[FieldSpec<Probe>] = &[
        FieldSpec::uint32(1, "word", |m, v| m.word = v),
        FieldSpec::uint64(2, "wide", |m, v| m.wide = v),
        FieldSpec::bytes(3, "raw", |m, v| m.raw = v),
        FieldSpec::unsupported(4, "flag", WireKind::Bool),
    ];

    #[test]
    fn test_apply_typed_setters() {
        let mut probe = Probe::default();

        find_spec(PROBE_FIELDS, 1)
            .unwrap()
            .apply("probe", &mut probe, "0800", None)
            .unwrap();
        find_spec(PROBE_FIELDS, 2)
            .unwrap()
            .apply("probe", &mut probe, "001122334455", None)
            .unwrap();
        find_spec(PROBE_FIELDS, 3)
            .unwrap()
            .apply("probe", &mut probe, "ffff", Some("0a0b"))
            .unwrap();

        assert_eq!(probe.word, 0x0800);
        assert_eq!(probe.wide, 0x0011_2233_4455);
        assert_eq!(probe.raw, vec![0x0a, 0x0b]);
    }

    #[test]
    fn test_unmasked_ignored_for_integers() {
        let mut probe = Probe::default();
        find_spec(PROBE_FIELDS, 1)
            .unwrap()
            .apply("probe", &mut probe, "10", Some("ff"))
            .unwrap();
        assert_eq!(probe.word, 0x10);
    }

    #[test]
    fn test_unsupported_kind_is_mismatch() {
        let mut probe = Probe::default();
        let err = find_spec(PROBE_FIELDS, 4)
            .unwrap()
            .apply("probe", &mut probe, "1", None)
            .unwrap_err();

        assert_eq!(
            err,
            SchemaMismatch::Codec {
                protocol: "probe",
                field: "flag",
                source: CodecError::Unsupported(WireKind::Bool),
            }
        );
    }

    #[test]
    fn test_missing_id() {
        assert!(find_spec(PROBE_FIELDS, 99).is_none());
    }
}
