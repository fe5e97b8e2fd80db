//! Link-layer address message.

use serde_json::json;

use super::Message;
use crate::format::format_mac;
use crate::schema::FieldSpec;

/// Destination and source MAC addresses of a frame.
///
/// Addresses occupy the low 48 bits of a u64.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mac {
    pub dst_mac: u64,
    /// Address mode: 0 = fixed, 1 = increment, 2 = decrement
    pub dst_mac_mode: u32,
    pub src_mac: u64,
    pub src_mac_mode: u32,
}

impl Mac {
    pub const DST_MAC: u32 = 1;
    pub const DST_MAC_MODE: u32 = 2;
    pub const SRC_MAC: u32 = 5;
    pub const SRC_MAC_MODE: u32 = 6;
}

impl Message for Mac {
    const NAME: &'static str = "mac";
    const PROTOCOL_ID: u32 = 100;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::uint64(Self::DST_MAC, "dst_mac", |m, v| m.dst_mac = v),
        FieldSpec::enumeration(Self::DST_MAC_MODE, "dst_mac_mode", |m, v| m.dst_mac_mode = v),
        FieldSpec::uint64(Self::SRC_MAC, "src_mac", |m, v| m.src_mac = v),
        FieldSpec::enumeration(Self::SRC_MAC_MODE, "src_mac_mode", |m, v| m.src_mac_mode = v),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "dst_mac": format_mac(self.dst_mac),
            "dst_mac_mode": self.dst_mac_mode,
            "src_mac": format_mac(self.src_mac),
            "src_mac_mode": self.src_mac_mode,
        })
    }

    fn summary(&self) -> String {
        format!("mac {} > {}", format_mac(self.src_mac), format_mac(self.dst_mac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_addresses() {
        let mut mac = Mac::default();
        mac.set_field(Mac::DST_MAC, "ffffffffffff", None).unwrap();
        mac.set_field(Mac::SRC_MAC, "001122334455", None).unwrap();

        assert_eq!(mac.dst_mac, 0xffff_ffff_ffff);
        assert_eq!(mac.src_mac, 0x0011_2233_4455);
        assert_eq!(mac.summary(), "mac 00:11:22:33:44:55 > ff:ff:ff:ff:ff:ff");
    }
}
