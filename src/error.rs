//! Error types for the deck2grid library.
//!
//! Every failure in the pipeline is fatal: the contact sheet is a single
//! composite artefact, so there is no notion of a partially-successful run.
//! One enum, [`GridError`], therefore covers the whole taxonomy:
//!
//! * input problems (missing/unreadable deck),
//! * external-converter problems (non-zero exit, timeout, no output even
//!   after the encoding fallback),
//! * raster problems (undecodable or empty page set),
//! * output problems (the canvas could not be persisted).
//!
//! The CLI serialises `GridError` straight into the `{"error": …}` JSON
//! object, so the `Display` strings here *are* the user-visible protocol.
//! In particular [`GridError::InputNotFound`] must render exactly
//! `File not found: <path>`; callers match on that text.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the deck2grid library.
#[derive(Debug, Error)]
pub enum GridError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source deck was not found at the given path.
    #[error("File not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the deck.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// An external conversion stage exited non-zero, timed out, or produced
    /// no usable output after the encoding fallback. The detail carries the
    /// converter's diagnostic output verbatim.
    #[error("{detail}")]
    ConversionError { detail: String },

    /// A produced raster file could not be decoded as an image.
    #[error("Failed to decode raster page '{path}': {source}")]
    DecodeError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Zero raster pages after all fallbacks.
    #[error("No raster pages were produced from the deck")]
    EmptySetError,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not encode or write the output grid image.
    #[error("Failed to write output image '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_display_matches_cli_protocol() {
        let e = GridError::InputNotFound {
            path: PathBuf::from("deck.pptx"),
        };
        assert_eq!(e.to_string(), "File not found: deck.pptx");
    }

    #[test]
    fn conversion_error_display_is_the_detail() {
        let e = GridError::ConversionError {
            detail: "PDF conversion failed: soffice: not found".into(),
        };
        assert_eq!(e.to_string(), "PDF conversion failed: soffice: not found");
    }

    #[test]
    fn empty_set_display() {
        assert!(GridError::EmptySetError
            .to_string()
            .contains("No raster pages"));
    }

    #[test]
    fn output_write_failed_display() {
        let e = GridError::OutputWriteFailed {
            path: PathBuf::from("thumbnails.jpg"),
            detail: "disk full".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("thumbnails.jpg"), "got: {msg}");
        assert!(msg.contains("disk full"), "got: {msg}");
    }
}
