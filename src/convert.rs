//! Pipeline orchestration: the full deck-to-grid run.
//!
//! The run is strictly sequential: validate input, render the
//! page-description document, extract raster pages (with the single
//! documented encoding fallback), then decode and compose. No stage starts
//! before the prior one completes, no stage re-enters an earlier one, and
//! the first error aborts the whole run.
//!
//! ## Why a scoped temporary directory?
//!
//! The intermediate document and the per-page raster files are meaningless
//! outside one run. Holding them in a [`tempfile::TempDir`] owned by this
//! function means they are removed on every exit path (success, error
//! return, or panic unwind), so repeated invocations never leak artifacts
//! into each other. The only durable artefact is the written grid image.

use crate::config::GridConfig;
use crate::error::GridError;
use crate::output::GridOutput;
use crate::pipeline::{compose, extract, input, load, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Generate a contact-sheet grid image for `deck`, written as
/// `<output_prefix>.jpg`.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`GridError::InputNotFound`] / [`GridError::PermissionDenied`]: the
///   deck cannot be read; no external process has been spawned.
/// - [`GridError::ConversionError`]: either external stage exited
///   non-zero, timed out, or produced no usable output after the fallback.
/// - [`GridError::DecodeError`] / [`GridError::EmptySetError`]: the
///   extracted raster set is unusable.
/// - [`GridError::OutputWriteFailed`]: the composed canvas could not be
///   persisted; no partial file is left behind.
pub async fn generate(
    deck: impl AsRef<Path>,
    output_prefix: &str,
    config: &GridConfig,
) -> Result<GridOutput, GridError> {
    let started = Instant::now();
    let deck = deck.as_ref();
    info!("Generating contact sheet for {}", deck.display());

    // ── Stage 1: Validate input ──────────────────────────────────────────
    let deck = input::resolve_deck(deck)?;

    // ── Stage 2: Scoped working directory ────────────────────────────────
    // Dropped (and removed) on every exit path below.
    let workdir = tempfile::tempdir()
        .map_err(|e| GridError::Internal(format!("Failed to create temp directory: {e}")))?;

    // ── Stage 3: Deck → page-description document ────────────────────────
    let document = render::render_document(&deck, workdir.path(), config).await?;

    // ── Stage 4: Document → ordered raster pages ─────────────────────────
    let pages = extract::extract_pages(&document, workdir.path(), config).await?;
    info!("Extracted {} raster pages", pages.len());

    // ── Stage 5: Decode + compose + write ────────────────────────────────
    // CPU-bound image work runs off the async workers.
    let prefix = output_prefix.to_string();
    let cfg = config.clone();
    let result = tokio::task::spawn_blocking(move || {
        let images = load::load_images(&pages)?;
        compose::compose_and_write(&images, &prefix, &cfg)
    })
    .await
    .map_err(|e| GridError::Internal(format!("Composition task panicked: {e}")))??;

    debug!(
        "Contact sheet complete: {} slides, {} grid, {}ms",
        result.slides,
        result.grid,
        started.elapsed().as_millis()
    );

    Ok(result)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    deck: impl AsRef<Path>,
    output_prefix: &str,
    config: &GridConfig,
) -> Result<GridOutput, GridError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| GridError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(deck, output_prefix, config))
}
