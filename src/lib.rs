//! pdmlimport - Import Wireshark PDML dissections as traffic-generator streams.
//!
//! This crate is the command-line front end over [`pdmlimport_core`]. It
//! reads a PDML file, keeps whatever packets were committed before a fatal
//! parse error, and renders the streams as a table, JSON lines or a
//! per-entry summary.
//!
//! # Example
//!
//! ```
//! use pdmlimport::cli::{OutputFormat, OutputFormatter};
//! use pdmlimport::import::import_text;
//! use pdmlimport_core::ImportConfig;
//!
//! let outcome = import_text("<pdml><packet/></pdml>", ImportConfig::default());
//!
//! let mut out = Vec::new();
//! OutputFormatter::new(OutputFormat::Json)
//!     .write(&outcome.streams, &mut out)
//!     .unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("{"));
//! ```

pub mod cli;
pub mod error;
pub mod import;

pub use error::{Error, Result};
