//! Output formatting for imported streams.
//!
//! Streams are rendered as a table with one row per stream, as JSON lines,
//! or as an indented per-entry summary with a byte preview for hex dumps.

use std::io::Write;

use clap::ValueEnum;
use pdmlimport_core::{ProtocolEntry, Stream};

/// Hex-dump bytes shown in the summary preview.
const PREVIEW_BYTES: usize = 16;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table (default)
    Table,
    /// JSON Lines (one JSON object per stream)
    Json,
    /// One line per protocol entry
    Summary,
}

/// Formats streams for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format streams and write to the given writer.
    pub fn write<W: Write>(&self, streams: &[Stream], writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(streams, writer),
            OutputFormat::Json => self.write_json(streams, writer),
            OutputFormat::Summary => self.write_summary(streams, writer),
        }
    }

    fn write_table<W: Write>(&self, streams: &[Stream], writer: &mut W) -> std::io::Result<()> {
        use comfy_table::{Cell, Table};

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("stream"),
            Cell::new("frame_len"),
            Cell::new("protocols"),
            Cell::new("summary"),
        ]);

        for stream in streams {
            let kinds: Vec<&str> = stream.kinds().iter().map(|k| k.name()).collect();
            let summaries: Vec<String> =
                stream.protocols.iter().map(ProtocolEntry::summary).collect();
            table.add_row(vec![
                Cell::new(stream.id),
                Cell::new(
                    stream
                        .frame_len
                        .map(|len| len.to_string())
                        .unwrap_or_default(),
                ),
                Cell::new(kinds.join(" / ")),
                Cell::new(summaries.join("\n")),
            ]);
        }

        writeln!(writer, "{table}")
    }

    fn write_json<W: Write>(&self, streams: &[Stream], writer: &mut W) -> std::io::Result<()> {
        for stream in streams {
            let line = serde_json::to_string(&stream.to_json())
                .map_err(std::io::Error::other)?;
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, streams: &[Stream], writer: &mut W) -> std::io::Result<()> {
        for stream in streams {
            match stream.frame_len {
                Some(len) => writeln!(writer, "stream {} ({len} bytes)", stream.id)?,
                None => writeln!(writer, "stream {}", stream.id)?,
            }
            for entry in &stream.protocols {
                match entry.as_hex_dump() {
                    Some(dump) if !dump.content.is_empty() => {
                        writeln!(writer, "  {}: {}", entry.summary(), preview(&dump.content))?
                    }
                    _ => writeln!(writer, "  {}", entry.summary())?,
                }
            }
        }
        Ok(())
    }
}

fn preview(content: &[u8]) -> String {
    let shown = &content[..content.len().min(PREVIEW_BYTES)];
    if content.len() > PREVIEW_BYTES {
        format!("{}...", hex::encode(shown))
    } else {
        hex::encode(shown)
    }
}
