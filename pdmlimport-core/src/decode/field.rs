//! Field value codec.
//!
//! Dissected field values arrive as hex-encoded text. This module converts
//! that text into a typed [`FieldValue`] according to the [`WireKind`] of the
//! target field, and renders typed values back to hex.

use crate::error::CodecError;
use crate::schema::WireKind;

/// Typed value decoded from a dissected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned 32-bit integer (also carries enumerations)
    UInt32(u32),
    /// Unsigned 64-bit integer
    UInt64(u64),
    /// Raw octets
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Render as hex, most significant byte first, zero-padded to the width
    /// of the value's kind.
    pub fn to_hex(&self) -> String {
        match self {
            FieldValue::UInt32(v) => format!("{v:0width$x}", width = WireKind::UInt32.hex_width()),
            FieldValue::UInt64(v) => format!("{v:0width$x}", width = WireKind::UInt64.hex_width()),
            FieldValue::Bytes(b) => hex::encode(b),
        }
    }
}

/// Convert hex-encoded `text` into a value of the given wire kind.
pub fn decode_value(kind: WireKind, text: &str) -> Result<FieldValue, CodecError> {
    let malformed = || CodecError::Malformed {
        kind,
        value: text.to_string(),
    };

    match kind {
        WireKind::Enum | WireKind::UInt32 => {
            parse_hex_u32(text).map(FieldValue::UInt32).ok_or_else(malformed)
        }
        WireKind::UInt64 => parse_hex_u64(text).map(FieldValue::UInt64).ok_or_else(malformed),
        WireKind::Bytes => decode_hex_bytes(text).map(FieldValue::Bytes).ok_or_else(malformed),
        WireKind::Bool | WireKind::Double => Err(CodecError::Unsupported(kind)),
    }
}

/// Parse base-16 text as u32. A leading `0x` is accepted.
pub fn parse_hex_u32(text: &str) -> Option<u32> {
    u32::from_str_radix(strip_hex_prefix(text)?, 16).ok()
}

/// Parse base-16 text as u64. A leading `0x` is accepted.
pub fn parse_hex_u64(text: &str) -> Option<u64> {
    u64::from_str_radix(strip_hex_prefix(text)?, 16).ok()
}

/// Decode hex text into raw octets. Empty text decodes to no octets.
pub fn decode_hex_bytes(text: &str) -> Option<Vec<u8>> {
    hex::decode(text.trim()).ok()
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    // from_str_radix accepts a sign, dissected values never carry one
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integers() {
        assert_eq!(
            decode_value(WireKind::UInt32, "0800"),
            Ok(FieldValue::UInt32(0x0800))
        );
        assert_eq!(
            decode_value(WireKind::Enum, "2"),
            Ok(FieldValue::UInt32(2))
        );
        assert_eq!(
            decode_value(WireKind::UInt64, "001122334455"),
            Ok(FieldValue::UInt64(0x0011_2233_4455))
        );
        assert_eq!(parse_hex_u32("0xC0A80101"), Some(0xc0a8_0101));
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(
            decode_value(WireKind::Bytes, "aabbcc"),
            Ok(FieldValue::Bytes(vec![0xaa, 0xbb, 0xcc]))
        );
        assert_eq!(decode_value(WireKind::Bytes, ""), Ok(FieldValue::Bytes(vec![])));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            decode_value(WireKind::UInt32, "1ffffffff"),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decode_value(WireKind::UInt32, "+10"),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decode_value(WireKind::UInt64, ""),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decode_value(WireKind::Bytes, "abc"),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unconvertible_kinds_dropped() {
        assert_eq!(
            decode_value(WireKind::Bool, "1"),
            Err(CodecError::Unsupported(WireKind::Bool))
        );
        assert_eq!(
            decode_value(WireKind::Double, "1"),
            Err(CodecError::Unsupported(WireKind::Double))
        );
    }

    #[test]
    fn test_hex_round_trip() {
        let cases = [
            (WireKind::UInt32, "00000800"),
            (WireKind::UInt32, "C0A80101"),
            (WireKind::Enum, "00000003"),
            (WireKind::UInt64, "0000001122334455"),
            (WireKind::UInt64, "FE80000000000000"),
            (WireKind::Bytes, "0102fffe"),
        ];

        for (kind, text) in cases {
            let value = decode_value(kind, text).unwrap();
            let hex = value.to_hex();
            assert!(hex.eq_ignore_ascii_case(text), "{kind}: {text} -> {hex}");
            if kind.hex_width() > 0 {
                assert_eq!(hex.len(), kind.hex_width());
            }
        }
    }
}
