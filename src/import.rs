//! File import with partial results.
//!
//! A fatal parse error does not throw away the packets committed before it:
//! the outcome carries both, and the caller decides how to report them.

use std::path::Path;

use pdmlimport_core::{ImportConfig, ParseError, PdmlReader, Stream};
use tracing::info;

use crate::error::{Error, Result};

/// Streams imported from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Streams committed before the walk ended
    pub streams: Vec<Stream>,
    /// The fatal error that ended the walk early, if any
    pub error: Option<ParseError>,
}

impl ImportOutcome {
    /// Whether the whole document was walked.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Import PDML text.
pub fn import_text(text: &str, config: ImportConfig) -> ImportOutcome {
    let mut streams = Vec::new();
    let error = PdmlReader::new(config).read_str(text, &mut streams).err();
    info!(streams = streams.len(), complete = error.is_none(), "import finished");
    ImportOutcome { streams, error }
}

/// Read and import a PDML file.
///
/// Only failing to read the file is an error; a malformed document yields
/// an incomplete outcome.
pub fn import_file(path: &Path, config: ImportConfig) -> Result<ImportOutcome> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "read pdml file");
    Ok(import_text(&text, config))
}
