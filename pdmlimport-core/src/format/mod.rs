//! Human-readable rendering of entry field values.

mod address;

pub use address::{format_ipv4, format_ipv6, format_mac};
