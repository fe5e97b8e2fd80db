//! Target protocol-stack schema types.
//!
//! This module describes the fields of the traffic generator's protocol
//! messages without depending on any particular message type.
//!
//! # Example
//!
//! ```rust
//! use pdmlimport_core::schema::{FieldDescriptor, WireKind};
//!
//! let fields = [
//!     FieldDescriptor::new(5, "src_port", WireKind::UInt32),
//!     FieldDescriptor::new(1, "is_override_src_port", WireKind::Bool),
//! ];
//! assert!(fields[0].kind.is_convertible());
//! ```

mod field;
mod kind;

pub use field::{find_spec, FieldDescriptor, FieldSpec, Setter};
pub use kind::WireKind;
