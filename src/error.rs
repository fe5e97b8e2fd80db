//! Error types for pdmlimport.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pdmlimport operations.
#[derive(Error, Debug)]
pub enum Error {
    /// PDML file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
