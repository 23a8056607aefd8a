//! Raster extraction: page-description document → ordered per-page image
//! files via an external converter.
//!
//! ## The encoding fallback
//!
//! The primary attempt asks for JPEG pages. Some extractor builds ship
//! without JPEG support and produce nothing; when the primary attempt
//! yields zero matching files we re-run once asking for PNG (lossless)
//! at the same resolution. This is deliberately a two-attempt branch, not
//! a retry loop: the attempts differ in encoding, not in flakiness, and
//! the fallback is taken at most once.
//!
//! A timeout aborts immediately: a converter that hangs on JPEG will hang
//! on PNG too, and the caller's time budget is already spent.

use crate::config::GridConfig;
use crate::error::GridError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Prefix for extracted page files, `<prefix>-N.<ext>`.
const PAGE_PREFIX: &str = "slide";

/// Raster encodings the extractor is asked for, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Primary: lossy, small, fast to decode.
    Jpeg,
    /// Fallback: lossless, always compiled in.
    Png,
}

impl RasterFormat {
    fn flag(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "-jpeg",
            RasterFormat::Png => "-png",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
        }
    }
}

/// Rasterise every page of `document` into `out_dir`.
///
/// Returns the produced files sorted so that lexicographic order equals
/// page order (the extractor zero-pads page numbers). The ordering is
/// correctness-critical: the composer labels cell `i` as slide `i`.
pub async fn extract_pages(
    document: &Path,
    out_dir: &Path,
    config: &GridConfig,
) -> Result<Vec<PathBuf>, GridError> {
    info!("Extracting raster pages at {} DPI", config.dpi);

    let (pages, primary_diag) = attempt(document, out_dir, RasterFormat::Jpeg, config).await?;
    if !pages.is_empty() {
        debug!("Primary (JPEG) extraction produced {} pages", pages.len());
        return Ok(pages);
    }

    warn!("Primary (JPEG) extraction produced no pages, retrying as PNG");
    let (pages, fallback_diag) = attempt(document, out_dir, RasterFormat::Png, config).await?;
    if !pages.is_empty() {
        debug!("Fallback (PNG) extraction produced {} pages", pages.len());
        return Ok(pages);
    }

    let diag = if fallback_diag.is_empty() {
        primary_diag
    } else {
        fallback_diag
    };
    let mut detail =
        "Failed to convert PDF pages to images. Ensure pdftoppm (poppler) is installed."
            .to_string();
    if !diag.is_empty() {
        detail.push_str(&format!(" ({diag})"));
    }
    Err(GridError::ConversionError { detail })
}

/// Run one extraction attempt and collect whatever page files it produced.
///
/// A non-zero exit or a spawn failure is not fatal here: the emptiness of
/// the produced set is the gate, so the caller can still take the encoding
/// fallback. Only a timeout is returned as `Err`.
async fn attempt(
    document: &Path,
    out_dir: &Path,
    format: RasterFormat,
    config: &GridConfig,
) -> Result<(Vec<PathBuf>, String), GridError> {
    let budget = Duration::from_secs(config.convert_timeout_secs);
    let prefix = out_dir.join(PAGE_PREFIX);

    let spawned = Command::new(&config.extractor_command)
        .arg(format.flag())
        .arg("-r")
        .arg(config.dpi.to_string())
        .arg(document)
        .arg(&prefix)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let diag = match spawned {
        Ok(child) => match tokio::time::timeout(budget, child.wait_with_output()).await {
            Ok(Ok(output)) => String::from_utf8_lossy(&output.stderr).trim().to_string(),
            Ok(Err(e)) => e.to_string(),
            Err(_) => {
                return Err(GridError::ConversionError {
                    detail: format!(
                        "Raster extraction timed out after {}s",
                        config.convert_timeout_secs
                    ),
                });
            }
        },
        Err(e) => format!("could not spawn '{}': {e}", config.extractor_command),
    };

    Ok((collect_pages(out_dir, format.extension()), diag))
}

/// Collect `slide-*.<ext>` files in lexicographic filename order.
fn collect_pages(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut pages: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|e| e == ext)
                && p.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.starts_with(&format!("{PAGE_PREFIX}-")))
        })
        .collect();

    pages.sort();
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn collect_pages_sorts_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "slide-03.jpg");
        touch(dir.path(), "slide-01.jpg");
        touch(dir.path(), "slide-02.jpg");

        let pages = collect_pages(dir.path(), "jpg");
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["slide-01.jpg", "slide-02.jpg", "slide-03.jpg"]);
    }

    #[test]
    fn collect_pages_filters_extension_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "slide-1.jpg");
        touch(dir.path(), "slide-2.png");
        touch(dir.path(), "deck.pdf");
        touch(dir.path(), "cover.jpg");

        let jpgs = collect_pages(dir.path(), "jpg");
        assert_eq!(jpgs.len(), 1);
        assert_eq!(jpgs[0].file_name().unwrap(), "slide-1.jpg");

        let pngs = collect_pages(dir.path(), "png");
        assert_eq!(pngs.len(), 1);
        assert_eq!(pngs[0].file_name().unwrap(), "slide-2.png");
    }

    #[test]
    fn format_flags_match_extractor_cli() {
        assert_eq!(RasterFormat::Jpeg.flag(), "-jpeg");
        assert_eq!(RasterFormat::Png.flag(), "-png");
        assert_eq!(RasterFormat::Jpeg.extension(), "jpg");
        assert_eq!(RasterFormat::Png.extension(), "png");
    }

    #[tokio::test]
    async fn both_attempts_empty_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("deck.pdf");
        std::fs::write(&doc, b"stub").unwrap();

        // `true` exits 0 without producing any page files.
        let config = GridConfig::builder()
            .extractor_command("true")
            .build()
            .unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let err = extract_pages(&doc, out_dir.path(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::ConversionError { .. }));
        assert!(err.to_string().contains("Failed to convert PDF pages"));
    }
}
