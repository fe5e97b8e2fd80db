//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use pdmlimport_core::{ImportConfig, ModeledProtocol, OverridePolicy};

use super::OutputFormat;

/// Modeled protocols that can be imported as raw bytes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RawProtocol {
    Eth,
    Ip,
    Ipv6,
    Tcp,
}

impl From<RawProtocol> for ModeledProtocol {
    fn from(protocol: RawProtocol) -> Self {
        match protocol {
            RawProtocol::Eth => ModeledProtocol::Eth,
            RawProtocol::Ip => ModeledProtocol::Ip,
            RawProtocol::Ipv6 => ModeledProtocol::Ipv6,
            RawProtocol::Tcp => ModeledProtocol::Tcp,
        }
    }
}

/// Import Wireshark PDML dissections as traffic-generator streams.
#[derive(Parser, Debug)]
#[command(name = "pdmlimport")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PDML file to import (tshark -T pdml)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Skip every protocol node with this name (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PROTO")]
    pub exclude: Vec<String>,

    /// Import a modeled protocol as a raw hex dump (repeatable)
    #[arg(long = "raw", value_enum, value_name = "PROTO")]
    pub raw: Vec<RawProtocol>,

    /// Do not mark captured length and checksum fields as overrides
    #[arg(long = "no-override")]
    pub no_override: bool,

    /// Bytes added to the dissected frame size for the frame check sequence
    #[arg(long = "fcs-len", default_value = "4", value_name = "BYTES")]
    pub fcs_len: u32,

    /// Import Wireshark's fake-field-wrapper nodes contiguously
    #[arg(long = "fake-field-wrapper")]
    pub fake_field_wrapper: bool,

    /// List registered protocol decoders
    #[arg(long = "list-protocols")]
    pub list_protocols: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Check if this is an info-only command (no PDML file needed).
    pub fn is_info_only(&self) -> bool {
        self.list_protocols
    }

    /// Build the import configuration described by the flags.
    pub fn to_config(&self) -> ImportConfig {
        let mut config = ImportConfig::default()
            .with_fcs_len(self.fcs_len)
            .with_fake_field_wrapper(self.fake_field_wrapper);

        for name in &self.exclude {
            config = config.with_excluded(name.as_str());
        }
        for protocol in &self.raw {
            config = config.without_modeled((*protocol).into());
        }
        if self.no_override {
            config = config.with_overrides(OverridePolicy::none());
        }
        config
    }
}
