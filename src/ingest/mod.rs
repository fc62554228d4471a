//! Detector-output ingestion.
//!
//! The compliance engine consumes detections that are already typed and
//! carry normalized labels. This module is the boundary that gets them there:
//! - Parsing detector JSON (a bare array, or an object with `detections`)
//! - Normalizing labels (`"Hard-Hat"` becomes `"hardhat"`)
//! - Dropping detections below the configured confidence floor
//!
//! Ingestion MUST NOT reinterpret geometry; boxes pass through untouched.

pub mod file;
mod normalize;

pub use file::{load_detections, parse_detections, DetectionFile, ImageInfo};
pub use normalize::normalize_label;
