//! pdmlimport CLI entry point.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pdmlimport::cli::{Args, OutputFormatter};
use pdmlimport::import::import_file;
use pdmlimport_core::{registry_for, Decoder, ImportConfig, ProtocolKind};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let config = args.to_config();

    // Handle info-only commands
    if args.is_info_only() {
        list_protocols(&config);
        return Ok(());
    }

    // Require a PDML file for imports
    let pdml_file = args
        .file
        .context("PDML file required. Use --help for usage.")?;

    let outcome = import_file(&pdml_file, config)
        .with_context(|| format!("Failed to import PDML file: {}", pdml_file.display()))?;

    // Committed streams are printed even when the document broke off
    let mut stdout = io::stdout().lock();
    OutputFormatter::new(args.format)
        .write(&outcome.streams, &mut stdout)
        .context("Failed to write streams")?;
    stdout.flush()?;

    if let Some(err) = outcome.error {
        warn!(streams = outcome.streams.len(), "import stopped early");
        return Err(err).with_context(|| {
            format!(
                "Imported {} stream(s) from {} before a fatal error",
                outcome.streams.len(),
                pdml_file.display()
            )
        });
    }

    Ok(())
}

fn list_protocols(config: &ImportConfig) {
    let registry = registry_for(config);

    println!("Registered Protocol Decoders:");
    println!("{:-<50}", "");

    for decoder in registry.all_decoders() {
        println!("  {} ({})", decoder.display_name(), decoder.name());

        if let Some(kind) = decoder.kind() {
            println!("    -> Produces: {kind}");
        }
    }

    let fallback = registry.fallback();
    println!(
        "  {} ({}) for every other protocol",
        fallback.display_name(),
        fallback.name()
    );

    println!();
    println!("Protocol Entries:");
    println!("{:-<50}", "");

    for kind in ProtocolKind::ALL {
        println!(
            "  {:<10} id {:<4} fields {}",
            kind.name(),
            kind.protocol_id(),
            kind.descriptors().len()
        );
    }
}
