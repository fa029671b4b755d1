use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated
/// closing vertex contributes nothing and may be present or omitted.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Signed area between the chord `a → b` and a circular arc spanning
/// `sweep` radians over it.
///
/// Positive sweeps bulge to the right of the chord when travelling
/// counter-clockwise around the polygon, i.e. they add area.
#[must_use]
pub fn arc_segment_area(a: &Point2, b: &Point2, sweep: f64) -> f64 {
    if sweep.abs() < TOLERANCE {
        return 0.0;
    }
    let chord = (b - a).norm();
    let half_sin = (sweep.abs() * 0.5).sin();
    if chord < TOLERANCE || half_sin.abs() < TOLERANCE {
        return 0.0;
    }
    let radius = chord / (2.0 * half_sin);
    let area = 0.5 * radius * radius * (sweep.abs() - sweep.abs().sin());
    area.copysign(sweep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area_2d(&unit_square()), 1.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts: Vec<Point2> = unit_square().into_iter().rev().collect();
        assert_relative_eq!(signed_area_2d(&pts), -1.0);
    }

    #[test]
    fn signed_area_ignores_repeated_closing_vertex() {
        let mut pts = unit_square();
        pts.push(pts[0]);
        assert_relative_eq!(signed_area_2d(&pts), 1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(signed_area_2d(&collinear).abs() < TOLERANCE);
    }

    #[test]
    fn semicircle_segment_area() {
        // Chord of length 2 with a half-turn sweep is a unit half-disc.
        let a = Point2::new(-1.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert_relative_eq!(arc_segment_area(&a, &b, PI), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(arc_segment_area(&a, &b, -PI), -PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn straight_segment_has_no_arc_area() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!(arc_segment_area(&a, &b, 0.0).abs() < TOLERANCE);
    }
}
