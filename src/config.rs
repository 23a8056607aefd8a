//! Configuration types for contact-sheet generation.
//!
//! All pipeline behaviour is controlled through [`GridConfig`], built via
//! its [`GridConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs, serialise them for logging, and diff two runs
//! to understand why their outputs differ.
//!
//! The layout constants (thumbnail width, padding, label height) and the
//! converter commands are deliberately fields rather than module-level
//! constants: tests override them deterministically, and deployments can
//! substitute any conformant renderer/extractor binary without a rebuild.

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one contact-sheet generation run.
///
/// Built via [`GridConfig::builder()`] or using [`GridConfig::default()`].
///
/// # Example
/// ```rust
/// use deck2grid::GridConfig;
///
/// let config = GridConfig::builder()
///     .cols(6)
///     .dpi(96)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid column count. Must be ≥ 1. Default: 4.
    pub cols: u32,

    /// Raster resolution in dots-per-inch passed to the extraction stage.
    /// Default: 150.
    ///
    /// 150 DPI keeps slide text legible at the 400-px thumbnail width while
    /// the intermediate page images stay small enough to decode quickly.
    pub dpi: u32,

    /// Thumbnail width in pixels. Default: 400.
    ///
    /// Every cell shares this width; the height is derived once from the
    /// first raster page's aspect ratio.
    pub thumb_width: u32,

    /// Blank space around and between cells, in pixels. Default: 10.
    pub padding: u32,

    /// Height of the label strip above each thumbnail, in pixels. Default: 20.
    pub label_height: u32,

    /// JPEG quality for the output grid (1–100). Default: 90.
    pub jpeg_quality: u8,

    /// Time budget for each external converter invocation, in seconds.
    /// Default: 60.
    ///
    /// A converter that exceeds this is killed; the timeout surfaces as a
    /// `ConversionError` exactly like a non-zero exit.
    pub convert_timeout_secs: u64,

    /// Command invoked to turn the deck into a page-description document
    /// (one page per slide). Default: `soffice`.
    ///
    /// The contract is narrow: `<cmd> --headless --convert-to pdf
    /// --outdir <dir> <deck>` must leave a `.pdf` file in `<dir>`. Any
    /// conformant renderer can be substituted here.
    pub renderer_command: String,

    /// Command invoked to rasterise document pages into numbered image
    /// files. Default: `pdftoppm`.
    ///
    /// The contract: `<cmd> -jpeg|-png -r <dpi> <doc> <prefix>` must write
    /// `<prefix>-N.<ext>` files whose lexicographic order is page order.
    pub extractor_command: String,

    /// Font file used for cell labels. If `None`, common system font
    /// locations are probed; if none load, labels are skipped.
    pub font_path: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 4,
            dpi: 150,
            thumb_width: 400,
            padding: 10,
            label_height: 20,
            jpeg_quality: 90,
            convert_timeout_secs: 60,
            renderer_command: "soffice".to_string(),
            extractor_command: "pdftoppm".to_string(),
            font_path: None,
        }
    }
}

impl GridConfig {
    /// Create a new builder for `GridConfig`.
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GridConfig`].
#[derive(Debug)]
pub struct GridConfigBuilder {
    config: GridConfig,
}

impl GridConfigBuilder {
    pub fn cols(mut self, cols: u32) -> Self {
        self.config.cols = cols.max(1);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn thumb_width(mut self, px: u32) -> Self {
        self.config.thumb_width = px;
        self
    }

    pub fn padding(mut self, px: u32) -> Self {
        self.config.padding = px;
        self
    }

    pub fn label_height(mut self, px: u32) -> Self {
        self.config.label_height = px;
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q.clamp(1, 100);
        self
    }

    pub fn convert_timeout_secs(mut self, secs: u64) -> Self {
        self.config.convert_timeout_secs = secs.max(1);
        self
    }

    pub fn renderer_command(mut self, cmd: impl Into<String>) -> Self {
        self.config.renderer_command = cmd.into();
        self
    }

    pub fn extractor_command(mut self, cmd: impl Into<String>) -> Self {
        self.config.extractor_command = cmd.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GridConfig, GridError> {
        let c = &self.config;
        if c.cols == 0 {
            return Err(GridError::InvalidConfig("Columns must be ≥ 1".into()));
        }
        if c.dpi == 0 {
            return Err(GridError::InvalidConfig("DPI must be ≥ 1".into()));
        }
        if c.thumb_width == 0 {
            return Err(GridError::InvalidConfig(
                "Thumbnail width must be ≥ 1 pixel".into(),
            ));
        }
        if c.renderer_command.is_empty() || c.extractor_command.is_empty() {
            return Err(GridError::InvalidConfig(
                "Converter commands must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = GridConfig::default();
        assert_eq!(c.cols, 4);
        assert_eq!(c.dpi, 150);
        assert_eq!(c.thumb_width, 400);
        assert_eq!(c.padding, 10);
        assert_eq!(c.label_height, 20);
        assert_eq!(c.jpeg_quality, 90);
        assert_eq!(c.convert_timeout_secs, 60);
        assert_eq!(c.renderer_command, "soffice");
        assert_eq!(c.extractor_command, "pdftoppm");
    }

    #[test]
    fn cols_setter_clamps_to_one() {
        let c = GridConfig::builder().cols(0).build().unwrap();
        assert_eq!(c.cols, 1);
    }

    #[test]
    fn jpeg_quality_clamped() {
        let c = GridConfig::builder().jpeg_quality(200).build().unwrap();
        assert_eq!(c.jpeg_quality, 100);
    }

    #[test]
    fn empty_extractor_command_rejected() {
        let err = GridConfig::builder()
            .extractor_command("")
            .build()
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }
}
