//! Result types returned by the pipeline.

use serde::{Deserialize, Serialize};

/// Successful result of one contact-sheet generation run.
///
/// Serialises to the JSON object the CLI prints on stdout:
/// `{"output": "...", "slides": N, "grid": "RxC"}`. Failure is the `Err`
/// arm of the pipeline's `Result`, so the two are mutually exclusive by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOutput {
    /// Path of the written grid image.
    pub output: String,

    /// Number of slides composited into the grid.
    pub slides: usize,

    /// Grid shape descriptor, `"{rows}x{cols}"`.
    pub grid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_to_cli_protocol_shape() {
        let out = GridOutput {
            output: "thumbnails.jpg".into(),
            slides: 12,
            grid: "3x4".into(),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["output"], "thumbnails.jpg");
        assert_eq!(json["slides"], 12);
        assert_eq!(json["grid"], "3x4");
    }
}
