//! Association of PPE items to persons.
//!
//! The detector reports persons and PPE items as independent boxes with no
//! identity linkage. For each person this module decides which categories of
//! equipment belong to them, using a spatial test chosen per category:
//!
//! - helmets: item centroid strictly inside the person's head band
//! - vests: overlap ratio against the whole person box above a threshold
//! - masks and no-mask markers: overlap ratio, combined under a [`MaskPolicy`]
//!
//! Every test degrades to "not present" when there is no evidence. Nothing
//! here can fail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::detect::{BoundingBox, Category, Detection, LabelMap};
use crate::geometry::{centroid, head_band_contains, overlap_ratio};

pub const DEFAULT_HEAD_BAND_FRACTION: f64 = 0.35;
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.1;

/// How mask evidence is turned into a [`MaskState`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPolicy {
    /// Positive mask items and no-mask markers both count. A person with
    /// neither is [`MaskState::Unknown`].
    #[default]
    TriState,
    /// Only no-mask markers count. A person without a marker is
    /// [`MaskState::Mask`]; positive mask items are ignored.
    NegativeOnly,
}

impl MaskPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MaskPolicy::TriState => "tri_state",
            MaskPolicy::NegativeOnly => "negative_only",
        }
    }
}

impl std::str::FromStr for MaskPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "tri_state" | "tristate" => Ok(MaskPolicy::TriState),
            "negative_only" | "negativeonly" | "binary" => Ok(MaskPolicy::NegativeOnly),
            other => Err(anyhow::anyhow!(
                "unknown mask policy '{}' (expected tri_state or negative_only)",
                other
            )),
        }
    }
}

/// Mask status of one person. Decided once per evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaskState {
    Mask,
    NoMask,
    /// No evidence either way. Scored as non-compliant.
    Unknown,
}

/// Tunable geometry of the association tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssociationParams {
    /// Fraction of person height, from the top, that forms the head band.
    pub head_band_fraction: f64,
    /// Overlap ratio a vest, mask or marker must exceed (strictly).
    pub overlap_threshold: f64,
    pub mask_policy: MaskPolicy,
}

impl Default for AssociationParams {
    fn default() -> Self {
        Self {
            head_band_fraction: DEFAULT_HEAD_BAND_FRACTION,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            mask_policy: MaskPolicy::default(),
        }
    }
}

/// Detections of one image, split by category.
///
/// Built once per image and shared read-only across all person tests.
#[derive(Clone, Debug, Default)]
pub struct Evidence {
    pub persons: Vec<BoundingBox>,
    pub helmets: Vec<BoundingBox>,
    pub vests: Vec<BoundingBox>,
    pub masks: Vec<BoundingBox>,
    pub no_masks: Vec<BoundingBox>,
    /// Detections whose label is not in the vocabulary.
    pub ignored: usize,
    /// Distinct unrecognized labels, sorted.
    pub ignored_labels: BTreeSet<String>,
}

impl Evidence {
    /// Partition detections by category. Input order is preserved within
    /// each category.
    pub fn partition(detections: &[Detection], labels: &LabelMap) -> Self {
        let mut evidence = Self::default();
        for det in detections {
            match labels.classify(&det.label) {
                Some(Category::Person) => evidence.persons.push(det.bbox),
                Some(Category::Helmet) => evidence.helmets.push(det.bbox),
                Some(Category::Vest) => evidence.vests.push(det.bbox),
                Some(Category::Mask) => evidence.masks.push(det.bbox),
                Some(Category::NoMask) => evidence.no_masks.push(det.bbox),
                None => {
                    evidence.ignored += 1;
                    evidence.ignored_labels.insert(det.label.clone());
                }
            }
        }
        evidence
    }
}

/// Equipment attributed to one person.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Association {
    pub has_helmet: bool,
    pub has_vest: bool,
    pub mask_state: MaskState,
}

/// Decide which equipment belongs to `person`.
pub fn resolve(person: &BoundingBox, evidence: &Evidence, params: &AssociationParams) -> Association {
    Association {
        has_helmet: has_helmet(person, &evidence.helmets, params.head_band_fraction),
        has_vest: any_overlapping(person, &evidence.vests, params.overlap_threshold),
        mask_state: mask_state(person, evidence, params),
    }
}

/// First helmet whose centroid sits inside the head band wins.
pub fn has_helmet(person: &BoundingBox, helmets: &[BoundingBox], head_band_fraction: f64) -> bool {
    helmets
        .iter()
        .any(|helmet| head_band_contains(person, centroid(helmet), head_band_fraction))
}

fn any_overlapping(person: &BoundingBox, items: &[BoundingBox], threshold: f64) -> bool {
    items
        .iter()
        .any(|item| overlap_ratio(person, item) > threshold)
}

/// A matching no-mask marker always takes precedence over positive evidence.
pub fn mask_state(person: &BoundingBox, evidence: &Evidence, params: &AssociationParams) -> MaskState {
    if any_overlapping(person, &evidence.no_masks, params.overlap_threshold) {
        return MaskState::NoMask;
    }
    match params.mask_policy {
        MaskPolicy::NegativeOnly => MaskState::Mask,
        MaskPolicy::TriState => {
            if any_overlapping(person, &evidence.masks, params.overlap_threshold) {
                MaskState::Mask
            } else {
                MaskState::Unknown
            }
        }
    }
}
