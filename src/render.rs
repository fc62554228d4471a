//! What the annotation layer needs to draw one person.
//!
//! Pixel work happens elsewhere; this only decides color, text and placement.

use serde::{Deserialize, Serialize};

use crate::compliance::{PersonAssessment, Verdict};
use crate::detect::BoundingBox;

/// Vertical gap between the label baseline and the top of the box.
pub const LABEL_OFFSET_PX: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub color: Rgb,
    pub label_text: String,
    /// Where the label text starts, `(x, y)`.
    pub label_anchor: (i32, i32),
}

impl Annotation {
    pub fn for_person(bbox: BoundingBox, assessment: &PersonAssessment) -> Self {
        let color = match assessment.verdict {
            Verdict::Safe => Rgb::GREEN,
            Verdict::Unsafe => Rgb::RED,
        };
        Self {
            bbox,
            color,
            label_text: label_text(assessment),
            label_anchor: (bbox.x1, bbox.y1.saturating_sub(LABEL_OFFSET_PX).max(0)),
        }
    }
}

/// `"SAFE | 100%"`, `"UNSAFE | 67%"`.
pub fn label_text(assessment: &PersonAssessment) -> String {
    format!(
        "{} | {}%",
        assessment.verdict.as_str(),
        assessment.confidence
    )
}
