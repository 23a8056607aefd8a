//! Grid composition: scale raster pages to thumbnails and paint them onto
//! a single labelled contact sheet.
//!
//! ## Geometry
//!
//! All geometry is derived once, up front, into an immutable [`GridLayout`]:
//!
//! ```text
//! rows      = ceil(N / cols)
//! thumb_h   = round(thumb_w * first.height / first.width)
//! canvas_w  = cols * (thumb_w + padding) + padding
//! canvas_h  = rows * (thumb_h + padding + label_h) + padding
//! ```
//!
//! The thumbnail height comes from the *first* page's aspect ratio and is
//! shared by every cell; pages with a different native ratio are stretched,
//! not letterboxed. Cell `i` sits at `(row = i / cols, col = i % cols)`,
//! with a `label_h`-pixel strip above the thumbnail carrying the
//! `"Slide {i}"` caption (0-indexed).
//!
//! The canvas is fully painted before anything touches the filesystem, and
//! the file lands via temp-name + rename, so a failure mid-composition
//! leaves no partial output behind.

use crate::config::GridConfig;
use crate::error::GridError;
use crate::output::GridOutput;
use ab_glyph::FontVec;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CANVAS_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Derived grid geometry. Computed once per run, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub padding: u32,
    pub label_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl GridLayout {
    /// Compute the layout for `count` pages whose shared thumbnail ratio
    /// comes from the first page's `first_width`/`first_height`.
    pub fn compute(count: usize, first_width: u32, first_height: u32, config: &GridConfig) -> Self {
        let columns = config.cols.max(1);
        let rows = (count as u32).div_ceil(columns);

        let thumb_width = config.thumb_width;
        let thumb_height =
            (thumb_width as f64 * first_height as f64 / first_width as f64).round() as u32;

        let padding = config.padding;
        let label_height = config.label_height;

        Self {
            columns,
            rows,
            thumb_width,
            thumb_height,
            padding,
            label_height,
            canvas_width: columns * (thumb_width + padding) + padding,
            canvas_height: rows * (thumb_height + padding + label_height) + padding,
        }
    }

    /// Top-left corner of cell `index`'s label strip; the thumbnail starts
    /// `label_height` pixels below it.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let col = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        (
            self.padding + col * (self.thumb_width + self.padding),
            self.padding + row * (self.thumb_height + self.padding + self.label_height),
        )
    }
}

/// Caption for cell `index` (0-indexed slide position).
fn label_text(index: usize) -> String {
    format!("Slide {index}")
}

/// Paint all pages onto a fresh canvas.
///
/// Thumbnails are downscaled with Lanczos resampling to the shared cell
/// size. Labels are drawn when a font is available; composition never
/// fails on font problems.
pub fn compose(images: &[DynamicImage], config: &GridConfig) -> Result<(RgbImage, GridLayout), GridError> {
    let first = images.first().ok_or(GridError::EmptySetError)?;
    let layout = GridLayout::compute(images.len(), first.width(), first.height(), config);
    debug!(
        "Grid layout: {}x{} cells, {}x{} canvas",
        layout.rows, layout.columns, layout.canvas_width, layout.canvas_height
    );

    let mut canvas = RgbImage::from_pixel(layout.canvas_width, layout.canvas_height, CANVAS_COLOR);
    let font = load_label_font(config);
    let font_scale = (config.label_height as f32 - 4.0).max(8.0);

    for (i, img) in images.iter().enumerate() {
        let (x, y) = layout.cell_origin(i);

        let thumb = img
            .resize_exact(layout.thumb_width, layout.thumb_height, FilterType::Lanczos3)
            .to_rgb8();
        imageops::overlay(&mut canvas, &thumb, x as i64, (y + layout.label_height) as i64);

        if let Some(ref font) = font {
            draw_text_mut(
                &mut canvas,
                LABEL_COLOR,
                (x + 4) as i32,
                (y + 2) as i32,
                font_scale,
                font,
                &label_text(i),
            );
        }
    }

    Ok((canvas, layout))
}

/// Compose the grid and persist it as `<output_prefix>.jpg`.
pub fn compose_and_write(
    images: &[DynamicImage],
    output_prefix: &str,
    config: &GridConfig,
) -> Result<GridOutput, GridError> {
    let (canvas, layout) = compose(images, config)?;

    let out_path = PathBuf::from(format!("{output_prefix}.jpg"));
    write_jpeg(&canvas, &out_path, config.jpeg_quality)?;
    info!("Grid written to {}", out_path.display());

    Ok(GridOutput {
        output: out_path.display().to_string(),
        slides: images.len(),
        grid: format!("{}x{}", layout.rows, layout.columns),
    })
}

/// Write the canvas via temp-name + rename so no partial file survives a
/// failed encode.
fn write_jpeg(canvas: &RgbImage, path: &Path, quality: u8) -> Result<(), GridError> {
    let tmp = path.with_extension("jpg.tmp");

    let encoded = (|| -> Result<(), String> {
        let file = File::create(&tmp).map_err(|e| e.to_string())?;
        let mut writer = BufWriter::new(file);
        canvas
            .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
            .map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| e.to_string())
    })();

    match encoded {
        Ok(()) => std::fs::rename(&tmp, path).map_err(|e| GridError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Err(detail) => {
            let _ = std::fs::remove_file(&tmp);
            Err(GridError::OutputWriteFailed {
                path: path.to_path_buf(),
                detail,
            })
        }
    }
}

/// Load the label font: explicit config path first, then common system
/// locations. Returns `None` (labels skipped) when nothing loads.
fn load_label_font(config: &GridConfig) -> Option<FontVec> {
    if let Some(ref path) = config.font_path {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                debug!("Loaded label font: {}", path.display());
                return Some(font);
            }
        }
        warn!(
            "Failed to load label font {}, probing system fonts",
            path.display()
        );
    }

    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in &font_paths {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                debug!("Loaded system font: {path}");
                return Some(font);
            }
        }
    }

    warn!("No usable label font found, slide labels will be skipped");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_cols(cols: u32) -> GridConfig {
        GridConfig::builder().cols(cols).build().unwrap()
    }

    fn solid(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
    }

    #[test]
    fn single_page_is_one_row_for_any_column_count() {
        for cols in 1..=8 {
            let layout = GridLayout::compute(1, 800, 600, &config_with_cols(cols));
            assert_eq!(layout.rows, 1, "cols={cols}");
        }
    }

    #[test]
    fn ten_pages_four_columns_geometry() {
        let layout = GridLayout::compute(10, 800, 600, &config_with_cols(4));
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.thumb_height, 300); // round(400 * 600/800)
        assert_eq!(layout.canvas_width, 4 * (400 + 10) + 10); // 1650
        assert_eq!(layout.canvas_height, 3 * (300 + 10 + 20) + 10); // 1000
    }

    #[test]
    fn thumb_height_rounds_to_nearest() {
        // 400 * 601 / 800 = 300.5 → 301
        let layout = GridLayout::compute(1, 800, 601, &config_with_cols(4));
        assert_eq!(layout.thumb_height, 301);
    }

    #[test]
    fn cell_origin_walks_rows_and_columns() {
        let layout = GridLayout::compute(10, 800, 600, &config_with_cols(4));
        assert_eq!(layout.cell_origin(0), (10, 10));
        assert_eq!(layout.cell_origin(3), (10 + 3 * 410, 10));
        assert_eq!(layout.cell_origin(4), (10, 10 + 330)); // second row
        assert_eq!(layout.cell_origin(5), (420, 340));
    }

    #[test]
    fn label_text_is_zero_indexed() {
        assert_eq!(label_text(0), "Slide 0");
        assert_eq!(label_text(9), "Slide 9");
    }

    #[test]
    fn thumb_height_comes_from_first_image_only() {
        // Second image has a wildly different ratio; the layout (and hence
        // every cell) still follows the first image's 4:3.
        let images = vec![
            solid(800, 600, Rgb([200, 0, 0])),
            solid(200, 50, Rgb([0, 0, 200])),
        ];
        let config = config_with_cols(2);
        let (canvas, layout) = compose(&images, &config).unwrap();

        assert_eq!(layout.thumb_height, 300);
        assert_eq!(canvas.width(), 2 * (400 + 10) + 10);
        assert_eq!(canvas.height(), 300 + 10 + 20 + 10);
    }

    #[test]
    fn compose_paints_thumbnails_and_background() {
        let images = vec![
            solid(80, 60, Rgb([200, 0, 0])),
            solid(80, 60, Rgb([0, 0, 200])),
        ];
        let config = config_with_cols(2);
        let (canvas, layout) = compose(&images, &config).unwrap();
        assert_eq!(layout.thumb_height, 300);

        // Padding stays background white.
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));

        // Interior of cell 0's thumbnail (x 10..410, y 30..330) is red.
        assert_eq!(*canvas.get_pixel(200, 150), Rgb([200, 0, 0]));

        // Interior of cell 1's thumbnail (x 420..820) is blue.
        assert_eq!(*canvas.get_pixel(600, 150), Rgb([0, 0, 200]));
    }

    #[test]
    fn compose_rejects_empty_set() {
        let err = compose(&[], &config_with_cols(4)).unwrap_err();
        assert!(matches!(err, GridError::EmptySetError));
    }

    #[test]
    fn compose_and_write_reports_grid_shape() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("contact").display().to_string();

        let images: Vec<DynamicImage> =
            (0..3).map(|_| solid(80, 60, Rgb([128, 128, 128]))).collect();
        let config = config_with_cols(4);

        let out = compose_and_write(&images, &prefix, &config).unwrap();
        assert_eq!(out.slides, 3);
        assert_eq!(out.grid, "1x4");
        assert_eq!(out.output, format!("{prefix}.jpg"));

        // The written file decodes back to the computed canvas size, and no
        // temp file is left behind.
        let written = image::open(&out.output).unwrap();
        assert_eq!(written.width(), 4 * (400 + 10) + 10);
        assert_eq!(written.height(), 300 + 10 + 20 + 10);
        assert!(!Path::new(&format!("{prefix}.jpg.tmp")).exists());
    }

    #[test]
    fn geometry_is_reproducible() {
        let config = config_with_cols(4);
        let a = GridLayout::compute(7, 1024, 768, &config);
        let b = GridLayout::compute(7, 1024, 768, &config);
        assert_eq!(a, b);
    }
}
