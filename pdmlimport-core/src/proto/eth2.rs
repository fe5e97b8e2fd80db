//! Ethernet II type message.

use serde_json::json;

use super::Message;
use crate::schema::{FieldSpec, WireKind};

/// Explicit-override flags of an [`Eth2`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eth2Overrides {
    pub ether_type: bool,
}

/// Ethernet II type, layered as its own entry after the [`Mac`](super::Mac) entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eth2 {
    pub ether_type: u32,
    pub overrides: Eth2Overrides,
}

impl Eth2 {
    pub const TYPE: u32 = 1;
    pub const IS_OVERRIDE_TYPE: u32 = 2;

    /// An entry carrying a captured type value that must not be recomputed.
    pub fn with_override(ether_type: u32) -> Self {
        Self {
            ether_type,
            overrides: Eth2Overrides { ether_type: true },
        }
    }
}

impl Message for Eth2 {
    const NAME: &'static str = "eth2";
    const PROTOCOL_ID: u32 = 200;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::uint32(Self::TYPE, "type", |m, v| m.ether_type = v),
        FieldSpec::unsupported(Self::IS_OVERRIDE_TYPE, "is_override_type", WireKind::Bool),
    ];

    fn to_json(&self) -> serde_json::Value {
        json!({
            "type": self.ether_type,
            "is_override_type": self.overrides.ether_type,
        })
    }

    fn summary(&self) -> String {
        format!("eth2 type {:#06x}", self.ether_type)
    }
}
