// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};
use zonegen::{
    constants::DEFAULT_SERIAL_FILE,
    generate::{process, Destination, OutputFormat},
    serial::{load_serial, next_serial, save_serial},
    util::write_file,
};

/// Generate unbound or NSD zone configuration from YAML.
#[derive(Debug, Parser)]
#[command(name = "zonegen", version, about)]
struct Args {
    /// Input YAML data (default stdin)
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file for unbound (default stdout), output directory for nsd
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// File containing the last issued serial number
    #[arg(
        short = 's',
        long = "serial",
        value_name = "SERIAL_FILE",
        default_value = DEFAULT_SERIAL_FILE
    )]
    serial: PathBuf,

    /// Output format: unbound or nsd
    #[arg(short = 'f', long = "format", value_name = "FORMAT", default_value = "unbound")]
    format: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let format: OutputFormat = args.format.parse()?;

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read input from stdin")?;
            text
        }
    };
    let input: serde_yaml::Value =
        serde_yaml::from_str(&text).context("Failed to parse input as YAML")?;

    let previous = load_serial(&args.serial)?;
    let serial = next_serial(previous);
    debug!("Serial {} -> {}", previous, serial);

    let generated = match (format, &args.output) {
        (OutputFormat::Nsd, Some(dir)) => {
            process(&input, serial, format, Destination::Directory(dir))?
        }
        (OutputFormat::Nsd, None) => {
            anyhow::bail!("nsd output needs an output directory (-o DIR)")
        }
        (OutputFormat::Unbound, Some(path)) => {
            let mut buffer = Vec::new();
            let generated = process(&input, serial, format, Destination::Stream(&mut buffer))?;
            if generated {
                write_file(path, &buffer)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            generated
        }
        (OutputFormat::Unbound, None) => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            process(&input, serial, format, Destination::Stream(&mut lock))?
        }
    };

    if generated {
        save_serial(&args.serial, serial)?;
        info!("Generated {} output with serial {}", format, serial);
    }

    Ok(())
}

/// Initialize logging on stderr.
///
/// Respects RUST_LOG if set, otherwise logs at INFO (DEBUG with `-v`).
/// RUST_LOG_FORMAT=json switches to JSON lines.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .compact()
                .init();
        }
    }
}
