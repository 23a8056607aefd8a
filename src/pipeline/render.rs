//! Page rendering: deck → page-description document via an external
//! converter.
//!
//! ## Why an external process?
//!
//! Faithful slide rendering needs the authoring ecosystem's own layout
//! engine; no in-process library reproduces it. The converter is treated as
//! a black box with a narrow contract (input path, output directory, time
//! budget), accessed only through its exit code, stderr text, and produced
//! files. Any conformant renderer can be substituted via
//! [`crate::GridConfig::renderer_command`].
//!
//! The child is spawned with `kill_on_drop` so a timeout (or a caller
//! dropping the future) reaps the process rather than leaking it.

use crate::config::GridConfig;
use crate::error::GridError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Render the deck into a single page-description document inside `out_dir`.
///
/// Returns the path of the produced document. The expected name is the
/// deck's stem with a `.pdf` extension; if the renderer chose a different
/// name, the first `.pdf` in directory-listing order is accepted instead.
pub async fn render_document(
    deck: &Path,
    out_dir: &Path,
    config: &GridConfig,
) -> Result<PathBuf, GridError> {
    info!("Rendering deck to page-description document");

    let output = run_renderer(deck, out_dir, config).await?;
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        return Err(GridError::ConversionError {
            detail: format!("PDF conversion failed: {stderr}"),
        });
    }

    // Expected derived name first, then any file with the right extension.
    let expected = out_dir.join(
        Path::new(deck.file_name().unwrap_or_default()).with_extension("pdf"),
    );
    if expected.exists() {
        debug!("Renderer produced {}", expected.display());
        return Ok(expected);
    }

    match first_with_extension(out_dir, "pdf") {
        Some(found) => {
            debug!("Renderer produced {} (alternate naming)", found.display());
            Ok(found)
        }
        None => Err(GridError::ConversionError {
            detail: format!("PDF conversion failed: {stderr}"),
        }),
    }
}

/// Spawn the renderer and wait for it, enforcing the configured time budget.
async fn run_renderer(
    deck: &Path,
    out_dir: &Path,
    config: &GridConfig,
) -> Result<std::process::Output, GridError> {
    let budget = Duration::from_secs(config.convert_timeout_secs);

    let child = Command::new(&config.renderer_command)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(out_dir)
        .arg(deck)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| GridError::ConversionError {
            detail: format!(
                "PDF conversion failed: could not spawn '{}': {e}",
                config.renderer_command
            ),
        })?;

    match tokio::time::timeout(budget, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(GridError::ConversionError {
            detail: format!("PDF conversion failed: {e}"),
        }),
        Err(_) => Err(GridError::ConversionError {
            detail: format!(
                "PDF conversion timed out after {}s",
                config.convert_timeout_secs
            ),
        }),
    }
}

/// First file in `dir` (directory-listing order) with the given extension.
fn first_with_extension(dir: &Path, ext: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == ext) {
            return Some(path);
        }
    }
    None
}
