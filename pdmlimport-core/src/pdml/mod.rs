//! PDML document import.
//!
//! [`DocumentWalker`] is the push-driven state machine that builds streams
//! from structural events; [`PdmlReader`] drives it from PDML text.

mod reader;
mod walker;

pub use reader::PdmlReader;
pub use walker::{DocumentWalker, Element, WalkState};

use crate::config::ImportConfig;
use crate::error::ParseError;
use crate::stream::Stream;

/// Import a whole document, returning every stream or the first fatal error.
///
/// Use [`PdmlReader::read_str`] to keep the streams committed before an error.
pub fn import_str(text: &str, config: ImportConfig) -> Result<Vec<Stream>, ParseError> {
    let mut streams = Vec::new();
    PdmlReader::new(config).read_str(text, &mut streams)?;
    Ok(streams)
}
