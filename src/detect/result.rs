use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
///
/// Well-formed boxes have `x1 < x2` and `y1 < y2`. This is not enforced:
/// inverted or empty boxes are carried through and simply never overlap
/// anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        f64::from(self.x2) - f64::from(self.x1)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.y2) - f64::from(self.y1)
    }

    /// Signed area; negative for inverted boxes.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One labeled box produced by the upstream object detector.
///
/// `label` is expected to be normalized already (see
/// [`crate::ingest::normalize_label`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence,
        }
    }
}

fn default_confidence() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_round_trips_as_array() {
        let det: Detection =
            serde_json::from_str(r#"{"label":"person","box":[1,2,30,40],"confidence":0.9}"#)
                .unwrap();
        assert_eq!(det.bbox, BoundingBox::new(1, 2, 30, 40));
        let json = serde_json::to_value(&det).unwrap();
        assert_eq!(json["box"], serde_json::json!([1, 2, 30, 40]));
    }

    #[test]
    fn missing_confidence_defaults_to_certain() {
        let det: Detection = serde_json::from_str(r#"{"label":"vest","box":[0,0,1,1]}"#).unwrap();
        assert_eq!(det.confidence, 1.0);
    }

    #[test]
    fn inverted_box_has_negative_area() {
        let b = BoundingBox::new(10, 10, 0, 20);
        assert!(b.area() < 0.0);
    }
}
