//! Render a serialized query as prompt text.
//!
//! Reads a query produced by `serialize_query` from a file or stdin,
//! validates it, and prints the formatted prompt.
//!
//! # Examples
//!
//! ```sh
//! # Format a stored query
//! promptdoc query.json
//!
//! # Pipe from stdin with a custom formatter config
//! cat query.json | promptdoc --config promptdoc.toml
//!
//! # Drop the conversation log and use tabs for nested lists
//! promptdoc query.json --exclude-memory --indent $'\t'
//!
//! # Only check that the query is well formed
//! promptdoc query.json --check
//! ```

use clap::Parser;
use promptdoc::format::{FormatConfig, TextFormatter};
use promptdoc::{Query, SpecialKind, deserialize_query};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Render a serialized query as prompt text.
#[derive(Parser)]
#[command(name = "promptdoc", version)]
struct Cli {
    /// Serialized query (JSON). Reads stdin when omitted or `-`.
    query: Option<PathBuf>,

    // ── Formatting ─────────────────────────────────────────────
    /// TOML file with formatter settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Indentation unit for nested list items
    #[arg(long)]
    indent: Option<String>,

    /// Prefix for list items
    #[arg(long)]
    bullet: Option<String>,

    /// Omit the memory section
    #[arg(long)]
    exclude_memory: bool,

    /// Omit the tools section
    #[arg(long)]
    exclude_tools: bool,

    /// Omit the output-specs section
    #[arg(long)]
    exclude_output_schema: bool,

    // ── Mode ───────────────────────────────────────────────────
    /// Validate the query and print a summary instead of the prompt
    #[arg(long)]
    check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "promptdoc=debug",
        _ => "promptdoc=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {e}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

/// File settings first, then command-line overrides.
fn build_config(cli: &Cli) -> Result<FormatConfig, String> {
    let mut config = match &cli.config {
        Some(path) => FormatConfig::load(path).map_err(|e| e.to_string())?,
        None => FormatConfig::default(),
    };
    if let Some(indent) = &cli.indent {
        config.indent = indent.clone();
    }
    if let Some(bullet) = &cli.bullet {
        config.list_item_prefix = bullet.clone();
    }
    config.exclude_memory |= cli.exclude_memory;
    config.exclude_tools |= cli.exclude_tools;
    config.exclude_output_schema |= cli.exclude_output_schema;
    Ok(config)
}

fn summary(query: &Query) -> String {
    let specials: Vec<String> = SpecialKind::ALL
        .iter()
        .filter(|kind| query.prompt.special_section(**kind).is_some())
        .map(ToString::to_string)
        .collect();
    format!(
        "ok: {} top-level blocks, {} memory items, {} tools, {} output, special sections: [{}]",
        query.prompt.contents.len(),
        query.memory.as_ref().map_or(0, |m| m.len()),
        query.tools.as_ref().map_or(0, |t| t.len()),
        query.output.schema_name().map_or("text".to_string(), |n| format!("json ({n})")),
        specials.join(", ")
    )
}

fn run(cli: &Cli) -> Result<String, String> {
    let input = read_input(cli.query.as_ref())?;
    let query = deserialize_query(&input).map_err(|e| e.to_string())?;
    if cli.check {
        return Ok(summary(&query));
    }
    let config = build_config(cli)?;
    debug!(?config, "formatter config");
    TextFormatter::new(config)
        .format(&query)
        .map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            info!(bytes = output.len(), "done");
            println!("{output}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
