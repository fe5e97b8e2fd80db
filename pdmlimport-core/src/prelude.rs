//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```rust
//! use pdmlimport_core::prelude::*;
//!
//! let registry = default_registry();
//! assert!(registry.get("tcp").is_some());
//! ```

// Configuration
pub use crate::config::{ImportConfig, ModeledProtocol, OverridePolicy};

// Import
pub use crate::pdml::{import_str, PdmlReader};

// Decoders
pub use crate::decode::{default_registry, registry_for, Decoder, DecoderRegistry};

// Output
pub use crate::proto::{ProtocolEntry, ProtocolKind};
pub use crate::stream::Stream;

// Error types
pub use crate::error::{Error, ParseError, Result};
