//! Placeholder decoders for frame metadata.
//!
//! Neither opens a protocol entry. `geninfo` records the frame length;
//! `frame` only exists so its fields never end up in a hex dump.

use tracing::trace;

use super::{Decoder, FieldNode, HookContext};

/// No-op decoder registered under a fixed protocol name.
#[derive(Debug, Clone, Copy)]
pub struct DefaultDecoder {
    name: &'static str,
}

impl DefaultDecoder {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Placeholder for the `frame` protocol.
    pub const fn frame() -> Self {
        Self::new("frame")
    }
}

impl Decoder for DefaultDecoder {
    fn name(&self) -> &'static str {
        self.name
    }
}

/// General capture information: frame number, length and timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenInfoDecoder;

impl Decoder for GenInfoDecoder {
    fn name(&self) -> &'static str {
        "geninfo"
    }

    fn display_name(&self) -> &'static str {
        "General information"
    }

    fn unmapped_field(&self, field: &FieldNode<'_>, ctx: &mut HookContext<'_>) {
        // Every geninfo field spans the whole frame
        if let Some(size) = field.size {
            let frame_len = size.saturating_add(ctx.config.fcs_len);
            trace!(field = field.name, frame_len, "frame length");
            ctx.stream.set_frame_len(frame_len);
        }
    }
}
