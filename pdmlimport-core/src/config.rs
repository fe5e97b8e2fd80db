//! Import configuration.
//!
//! ```rust
//! use pdmlimport_core::config::{ImportConfig, ModeledProtocol, OverridePolicy};
//!
//! let config = ImportConfig::default()
//!     .with_excluded("malformed")
//!     .without_modeled(ModeledProtocol::Tcp)
//!     .with_overrides(OverridePolicy::none());
//!
//! assert!(config.is_excluded("expert"));
//! assert!(config.is_excluded("malformed"));
//! assert!(!config.is_modeled(ModeledProtocol::Tcp));
//! ```

use crate::proto::{Ip4Overrides, Ip6Overrides, TcpOverrides};

/// Dissected protocols that have a dedicated decoder.
///
/// A protocol that is not modeled is imported through the generic hex-dump
/// decoder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeledProtocol {
    Eth,
    Ip,
    Ipv6,
    Tcp,
}

impl ModeledProtocol {
    pub const ALL: [ModeledProtocol; 4] = [
        ModeledProtocol::Eth,
        ModeledProtocol::Ip,
        ModeledProtocol::Ipv6,
        ModeledProtocol::Tcp,
    ];

    /// Protocol name as declared by the dissection document.
    pub fn pdml_name(&self) -> &'static str {
        match self {
            ModeledProtocol::Eth => "eth",
            ModeledProtocol::Ip => "ip",
            ModeledProtocol::Ipv6 => "ipv6",
            ModeledProtocol::Tcp => "tcp",
        }
    }

    pub fn from_pdml_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.pdml_name() == name)
    }
}

/// Which fields are marked explicit-override when a modeled protocol closes.
///
/// A marked field keeps its captured value in the traffic generator instead
/// of being recomputed from the rest of the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverridePolicy {
    pub ip4: Ip4Overrides,
    pub ip6: Ip6Overrides,
    pub tcp: TcpOverrides,
}

impl OverridePolicy {
    /// Mark nothing; the generator recomputes every derived field.
    pub fn none() -> Self {
        Self {
            ip4: Ip4Overrides::default(),
            ip6: Ip6Overrides::default(),
            tcp: TcpOverrides::default(),
        }
    }
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            ip4: Ip4Overrides::ALL,
            ip6: Ip6Overrides::ALL,
            tcp: TcpOverrides::ALL,
        }
    }
}

/// Settings for one import session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Protocol names whose subtree is skipped. The empty name is always skipped.
    pub excluded_protocols: Vec<String>,

    /// Protocols imported through their dedicated decoder.
    pub modeled: Vec<ModeledProtocol>,

    /// Register the decoder for Wireshark's `fake-field-wrapper` pseudo protocol.
    pub fake_field_wrapper: bool,

    /// Bytes added to the dissected frame size to form the frame length.
    pub fcs_len: u32,

    pub overrides: OverridePolicy,

    /// Log hex-dump spans whose fields overran the declared length.
    pub check_span: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            excluded_protocols: vec!["expert".to_string()],
            modeled: ModeledProtocol::ALL.to_vec(),
            fake_field_wrapper: false,
            fcs_len: 4,
            overrides: OverridePolicy::default(),
            check_span: true,
        }
    }
}

impl ImportConfig {
    pub fn is_excluded(&self, name: &str) -> bool {
        name.is_empty() || self.excluded_protocols.iter().any(|p| p == name)
    }

    pub fn is_modeled(&self, protocol: ModeledProtocol) -> bool {
        self.modeled.contains(&protocol)
    }

    pub fn with_excluded(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.excluded_protocols.contains(&name) {
            self.excluded_protocols.push(name);
        }
        self
    }

    pub fn without_modeled(mut self, protocol: ModeledProtocol) -> Self {
        self.modeled.retain(|p| *p != protocol);
        self
    }

    pub fn with_overrides(mut self, overrides: OverridePolicy) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_fcs_len(mut self, fcs_len: u32) -> Self {
        self.fcs_len = fcs_len;
        self
    }

    pub fn with_fake_field_wrapper(mut self, enabled: bool) -> Self {
        self.fake_field_wrapper = enabled;
        self
    }
}
