//! PPE Sentinel
//!
//! Decision engine for personal-protective-equipment compliance on a single
//! image. Input is the detector's list of labeled boxes (persons, helmets,
//! vests, masks and explicit no-mask markers). Output is a verdict per person
//! and a site-level compliance report.
//!
//! # Pipeline
//!
//! ```text
//! detections -> Evidence::partition -> assoc::resolve (per person)
//!            -> PersonAssessment -> SiteSummary::aggregate
//! ```
//!
//! The engine is a pure function of its input and configuration: no I/O, no
//! state kept between images, no failure path. Degenerate boxes, unknown
//! labels and empty scenes all collapse to well-defined results.
//!
//! # Module Structure
//!
//! - `detect`: detector output types and the label vocabulary
//! - `geometry`: overlap ratio, centroids, head band containment
//! - `assoc`: binds PPE items to persons
//! - `compliance`: per-person scoring and site aggregation
//! - `engine`: one evaluation pass over an image
//! - `render`: color and label text for the annotation layer
//! - `report`: JSON and text reports
//! - `config`: calibration parameters (file + env)
//! - `ingest`: detector JSON parsing and label normalization

pub mod assoc;
pub mod compliance;
pub mod config;
pub mod detect;
pub mod engine;
pub mod geometry;
pub mod ingest;
pub mod render;
pub mod report;

pub use assoc::{resolve, Association, AssociationParams, Evidence, MaskPolicy};
pub use compliance::{CategoryCounts, MaskState, PersonAssessment, RiskTier, SiteSummary, Verdict};
pub use config::EngineConfig;
pub use detect::{BoundingBox, Category, Detection, LabelMap};
pub use engine::{ComplianceEngine, Evaluation, PersonReport};
pub use geometry::overlap_ratio;
pub use render::{Annotation, Rgb};
pub use report::{render_text, Report};
