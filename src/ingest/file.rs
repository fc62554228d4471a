//! Detection files written by the upstream detector.
//!
//! Two layouts are accepted:
//!
//! ```json
//! [{"label": "person", "box": [0, 0, 100, 200], "confidence": 0.91}]
//! ```
//!
//! ```json
//! {"image": {"width": 640, "height": 480}, "detections": [ ... ]}
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::normalize::normalize_label;
use crate::detect::Detection;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Parsed detector output for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionFile {
    pub image: Option<ImageInfo>,
    pub detections: Vec<Detection>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDetectionFile {
    Bare(Vec<Detection>),
    Wrapped {
        #[serde(default)]
        image: Option<ImageInfo>,
        detections: Vec<Detection>,
    },
}

/// Parse a detection payload and normalize every label.
pub fn parse_detections(payload: &[u8]) -> Result<DetectionFile> {
    let raw: RawDetectionFile =
        serde_json::from_slice(payload).map_err(|e| anyhow!("parse error: {}", e))?;
    let (image, mut detections) = match raw {
        RawDetectionFile::Bare(detections) => (None, detections),
        RawDetectionFile::Wrapped { image, detections } => (image, detections),
    };
    for det in &mut detections {
        det.label = normalize_label(&det.label);
    }
    Ok(DetectionFile { image, detections })
}

/// Read a detection file and drop detections below `min_confidence`.
pub fn load_detections(path: &Path, min_confidence: f32) -> Result<DetectionFile> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read detections from {}", path.display()))?;
    let mut file = parse_detections(&raw)
        .with_context(|| format!("invalid detection file {}", path.display()))?;

    let before = file.detections.len();
    file.detections.retain(|det| det.confidence >= min_confidence);
    let dropped = before - file.detections.len();
    if dropped > 0 {
        log::info!(
            "dropped {} of {} detection(s) below confidence {}",
            dropped,
            before,
            min_confidence
        );
    }
    Ok(file)
}
