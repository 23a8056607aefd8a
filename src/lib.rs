//! # deck2grid
//!
//! Render a presentation deck into a single contact-sheet ("grid") image
//! for quick visual review, without opening the original editor.
//!
//! ## Why this crate?
//!
//! Reviewing a fifty-slide deck means either opening the authoring tool or
//! clicking through an export dialog. This crate drives the conversion
//! head-lessly: the deck is rendered to a page-oriented document by an
//! external converter, each page is rasterised, and the pages are composed
//! into one labelled grid image you can eyeball in any viewer.
//!
//! ## Pipeline Overview
//!
//! ```text
//! deck
//!  │
//!  ├─ 1. Input    validate and canonicalise the deck path
//!  ├─ 2. Render   deck → page-description document (external converter)
//!  ├─ 3. Extract  document → numbered raster pages (external converter;
//!  │              JPEG first, PNG fallback if JPEG yields nothing)
//!  ├─ 4. Load     decode pages in slide order
//!  └─ 5. Compose  grid geometry + thumbnails + labels → <prefix>.jpg
//! ```
//!
//! Intermediate artifacts live in a scoped temporary directory that is
//! removed on every exit path; the grid image is the only durable output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deck2grid::{generate, GridConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GridConfig::default();
//!     let result = generate("talk.pptx", "thumbnails", &config).await?;
//!     println!("{} slides → {} ({})", result.slides, result.output, result.grid);
//!     Ok(())
//! }
//! ```
//!
//! ## External collaborators
//!
//! Two converter binaries are consumed as black boxes, accessed only via
//! exit code, stderr, and produced files: a page renderer (default
//! `soffice`) and a raster extractor (default `pdftoppm`). Both commands
//! are [`GridConfig`] fields, so any conformant tool can substitute.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `thumbnails` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GridConfig, GridConfigBuilder};
pub use convert::{generate, generate_sync};
pub use error::GridError;
pub use output::GridOutput;
pub use pipeline::compose::GridLayout;
