//! Error types for pdmlimport-core.
//!
//! This module provides structured error types for all pdmlimport-core operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`ParseError`] - Fatal, location-carrying failure of the PDML document walk
//! - [`CodecError`] - A field value that could not be converted to its wire kind
//! - [`SchemaMismatch`] - A dissected field that could not be stored in its entry
//!
//! Only [`ParseError`] aborts an import. The other two are reported through
//! `tracing` by the walker and the offending field is dropped.

use thiserror::Error;

use crate::schema::WireKind;

/// Main error type for pdmlimport-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unparsable PDML document
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal structural failure while walking a PDML document.
///
/// Streams committed before the failure stay valid; the packet being built
/// when the failure occurred is discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("XML parse error for packet {packet} at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based index of the packet being built when the failure occurred
    pub packet: usize,
    /// 1-based line number reported by the tokenizer
    pub line: usize,
    /// 1-based column number reported by the tokenizer
    pub column: usize,
    /// Tokenizer message
    pub message: String,
}

/// Errors converting a textual field value into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The wire kind has no conversion rule
    #[error("no conversion rule for wire kind {0}")]
    Unsupported(WireKind),

    /// The text is not valid for the wire kind
    #[error("cannot decode {value:?} as {kind}")]
    Malformed { kind: WireKind, value: String },
}

/// A dissected field that could not be stored in its protocol entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaMismatch {
    /// The entry schema has no field with this id
    #[error("{protocol}: no field with id {id}")]
    UnknownField { protocol: &'static str, id: u32 },

    /// The field exists but its value could not be converted
    #[error("{protocol}.{field}: {source}")]
    Codec {
        protocol: &'static str,
        field: &'static str,
        #[source]
        source: CodecError,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
