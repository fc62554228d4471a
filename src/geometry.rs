//! Geometric primitives shared by the association tests.

use crate::detect::BoundingBox;

/// Additive guard in the union term so two degenerate boxes never divide by zero.
pub const OVERLAP_EPSILON: f64 = 1e-6;

/// Intersection over union of two boxes, in `[0, 1]` for well-formed input.
///
/// Degenerate or inverted boxes yield a ratio of (approximately) zero rather
/// than an error.
pub fn overlap_ratio(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let iw = (f64::from(ix2) - f64::from(ix1)).max(0.0);
    let ih = (f64::from(iy2) - f64::from(iy1)).max(0.0);
    let inter = iw * ih;

    let ratio = inter / (a.area() + b.area() - inter + OVERLAP_EPSILON);
    // Inverted boxes can make the union negative.
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Center point of a box.
pub fn centroid(b: &BoundingBox) -> (f64, f64) {
    (
        (f64::from(b.x1) + f64::from(b.x2)) / 2.0,
        (f64::from(b.y1) + f64::from(b.y2)) / 2.0,
    )
}

/// Lower edge of the head band: `top + fraction * height`.
///
/// Neither this limit nor [`centroid`] is truncated to whole pixels, so a
/// centroid at y=69.5 is inside a band ending at 69.65.
pub fn head_band_limit(person: &BoundingBox, fraction: f64) -> f64 {
    f64::from(person.y1) + fraction * person.height()
}

/// True when `point` lies strictly inside the person's head band.
///
/// The band spans the full width of the person box and runs from its top
/// edge down to [`head_band_limit`]. All four bounds are exclusive.
pub fn head_band_contains(person: &BoundingBox, point: (f64, f64), fraction: f64) -> bool {
    let (x, y) = point;
    f64::from(person.x1) < x
        && x < f64::from(person.x2)
        && f64::from(person.y1) < y
        && y < head_band_limit(person, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_boxes_overlap_fully() {
        let b = BoundingBox::new(0, 0, 100, 200);
        let r = overlap_ratio(&b, &b);
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(20, 20, 30, 30);
        assert_eq!(overlap_ratio(&a, &b), 0.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(10, 0, 20, 10);
        assert_eq!(overlap_ratio(&a, &b), 0.0);
    }

    #[test]
    fn half_overlap_is_one_third() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 0, 15, 10);
        let r = overlap_ratio(&a, &b);
        assert!((r - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_boxes_yield_zero() {
        let p = BoundingBox::new(5, 5, 5, 5);
        assert_eq!(overlap_ratio(&p, &p), 0.0);

        let inverted = BoundingBox::new(10, 10, 0, 0);
        let normal = BoundingBox::new(0, 0, 10, 10);
        assert_eq!(overlap_ratio(&inverted, &normal), 0.0);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = BoundingBox::new(0, 0, 40, 60);
        let b = BoundingBox::new(10, 20, 70, 90);
        assert_eq!(overlap_ratio(&a, &b), overlap_ratio(&b, &a));
    }

    #[test]
    fn head_band_is_open_on_every_edge() {
        let person = BoundingBox::new(0, 0, 100, 200);
        assert!(head_band_contains(&person, (50.0, 20.0), 0.35));
        assert!(!head_band_contains(&person, (50.0, 70.0), 0.35));
        assert!(!head_band_contains(&person, (0.0, 20.0), 0.35));
        assert!(!head_band_contains(&person, (100.0, 20.0), 0.35));
        assert!(!head_band_contains(&person, (50.0, 0.0), 0.35));
        assert!(head_band_contains(&person, (50.0, 69.5), 0.35));
    }

    #[test]
    fn head_band_uses_fractional_pixels() {
        let person = BoundingBox::new(0, 0, 100, 199);
        let helmet = BoundingBox::new(40, 60, 60, 79);
        assert!((head_band_limit(&person, 0.35) - 69.65).abs() < 1e-9);
        assert!(head_band_contains(&person, centroid(&helmet), 0.35));
    }

    #[test]
    fn centroid_keeps_half_pixels() {
        assert_eq!(centroid(&BoundingBox::new(0, 0, 5, 9)), (2.5, 4.5));
    }
}
