//! CLI binary for deck2grid.
//!
//! A thin shim over the library crate that maps CLI flags to `GridConfig`
//! and prints a single JSON result object on stdout: either
//! `{"output": …, "slides": …, "grid": …}` or `{"error": …}`. Callers
//! distinguish the outcomes by the presence of the `error` field; logs go
//! to stderr so stdout stays machine-parseable.

use anyhow::{Context, Result};
use clap::Parser;
use deck2grid::{generate, GridConfig};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Grid with defaults (4 columns, 150 DPI, thumbnails.jpg)
  thumbnails talk.pptx

  # Custom prefix and a wider grid
  thumbnails talk.pptx review --cols 6

  # Higher-resolution rasterisation
  thumbnails talk.pptx --dpi 300

  # Substitute converter binaries
  thumbnails talk.pptx --renderer /opt/libreoffice/soffice

OUTPUT:
  A single JSON object on stdout.
    success:  {"output": "thumbnails.jpg", "slides": 12, "grid": "3x4"}
    failure:  {"error": "<message>"}, exit status 1

REQUIREMENTS:
  A page renderer (default: soffice, from LibreOffice) and a raster
  extractor (default: pdftoppm, from poppler-utils) on PATH.
"#;

/// Render a presentation deck into a contact-sheet grid image.
#[derive(Parser, Debug)]
#[command(
    name = "thumbnails",
    version,
    about = "Render a presentation deck into a contact-sheet grid image",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the source deck.
    file: PathBuf,

    /// Output file prefix; the grid is written as "<prefix>.jpg".
    #[arg(default_value = "thumbnails")]
    output: String,

    /// Grid column count.
    #[arg(long, env = "DECK2GRID_COLS", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Raster resolution in DPI.
    #[arg(long, env = "DECK2GRID_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Page-renderer command (deck → page-description document).
    #[arg(long, env = "DECK2GRID_RENDERER", default_value = "soffice")]
    renderer: String,

    /// Raster-extractor command (document → per-page images).
    #[arg(long, env = "DECK2GRID_EXTRACTOR", default_value = "pdftoppm")]
    extractor: String,

    /// Per-converter time budget in seconds.
    #[arg(long, env = "DECK2GRID_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DECK2GRID_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "DECK2GRID_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // stdout carries exactly one JSON object; everything else goes to
    // stderr through tracing.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = GridConfig::builder()
        .cols(cli.cols)
        .dpi(cli.dpi)
        .renderer_command(&cli.renderer)
        .extractor_command(&cli.extractor)
        .convert_timeout_secs(cli.timeout)
        .build();

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    };

    // ── Run pipeline ─────────────────────────────────────────────────────
    match generate(&cli.file, &cli.output, &config).await {
        Ok(result) => {
            let payload = serde_json::to_string_pretty(&result)
                .context("Failed to serialise result")?;
            println!("{payload}");
            Ok(())
        }
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
