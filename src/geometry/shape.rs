use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::math::polygon_2d::{arc_segment_area, signed_area_2d};
use crate::math::{points_coincide, Point2, Point3, TOLERANCE};

/// Point as it appears in the external shape document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl From<ExternalPoint> for Point3 {
    fn from(p: ExternalPoint) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

/// One straight or circular segment of an external polyline.
///
/// `arc_angle` is the signed sweep in radians; `0` means a straight line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSegment {
    pub start_point: ExternalPoint,
    pub end_point: ExternalPoint,
    #[serde(default)]
    pub arc_angle: f64,
}

/// A closed chain of segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPolyline {
    pub polyline_segments: Vec<ExternalSegment>,
}

impl ExternalPolyline {
    /// Builds a straight-edged closed polyline through `points` at elevation `z`.
    #[must_use]
    pub fn from_corners(points: &[(f64, f64)], z: f64) -> Self {
        let n = points.len();
        let polyline_segments = (0..n)
            .map(|i| {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % n];
                ExternalSegment {
                    start_point: ExternalPoint { x: x0, y: y0, z },
                    end_point: ExternalPoint { x: x1, y: y1, z },
                    arc_angle: 0.0,
                }
            })
            .collect();
        Self { polyline_segments }
    }
}

/// External slab shape: one outer contour and any number of holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalShape {
    pub contour_polyline: ExternalPolyline,
    #[serde(default)]
    pub hole_polylines: Vec<ExternalPolyline>,
}

/// An arc on a polygon edge, addressed by 1-based vertex indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyArc {
    pub begin_index: usize,
    pub end_index: usize,
    pub arc_angle: f64,
}

/// Polygon buffers in the document model's layout.
///
/// Each sub-polygon repeats its first vertex at its end. `sub_poly_ends`
/// holds the cumulative 1-based index of every sub-polygon's closing vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonMemo {
    pub coords: Vec<Point2>,
    pub sub_poly_ends: Vec<usize>,
    pub arcs: Vec<PolyArc>,
}

impl PolygonMemo {
    /// Returns vertex `index` (1-based), or `None` if out of range.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<&Point2> {
        index.checked_sub(1).and_then(|i| self.coords.get(i))
    }
}

/// Result of decoding an external shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedShape {
    pub sub_poly_count: usize,
    pub vertex_count: usize,
    pub arc_count: usize,
    /// Absolute elevation of the shape, taken from the contour's first point.
    pub level: f64,
    pub memo: PolygonMemo,
}

/// Largest count the host polygon header can hold.
const MAX_COUNT: usize = i32::MAX as usize;

/// Converts an [`ExternalShape`] into the document model's polygon buffers.
pub struct DecodeShape<'a> {
    shape: &'a ExternalShape,
}

impl<'a> DecodeShape<'a> {
    /// Creates a new `DecodeShape` operation.
    #[must_use]
    pub fn new(shape: &'a ExternalShape) -> Self {
        Self { shape }
    }

    /// Executes the decode.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if any polyline is empty, too short,
    /// disconnected, open, non-finite or encloses no area, or if a count
    /// overflows the host's range.
    pub fn execute(&self) -> Result<DecodedShape, GeometryError> {
        let mut memo = PolygonMemo::default();
        let polylines =
            std::iter::once(&self.shape.contour_polyline).chain(&self.shape.hole_polylines);

        for polyline in polylines {
            validate_polyline(polyline)?;
            append_polyline(&mut memo, polyline);
        }

        let sub_poly_count = memo.sub_poly_ends.len();
        let vertex_count = memo.coords.len();
        let arc_count = memo.arcs.len();
        for count in [sub_poly_count, vertex_count, arc_count] {
            if count > MAX_COUNT {
                return Err(GeometryError::CountOverflow(count));
            }
        }

        // validate_polyline guarantees a non-empty contour
        let level = self
            .shape
            .contour_polyline
            .polyline_segments
            .first()
            .map_or(0.0, |s| s.start_point.z);

        Ok(DecodedShape {
            sub_poly_count,
            vertex_count,
            arc_count,
            level,
            memo,
        })
    }
}

fn validate_polyline(polyline: &ExternalPolyline) -> Result<(), GeometryError> {
    let segments = &polyline.polyline_segments;
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return Err(GeometryError::EmptyPolyline);
    };

    let has_arcs = segments.iter().any(|s| s.arc_angle.abs() > TOLERANCE);
    if segments.len() < 3 && !has_arcs {
        return Err(GeometryError::TooFewSegments(segments.len()));
    }

    for s in segments {
        let values = [
            s.start_point.x,
            s.start_point.y,
            s.start_point.z,
            s.end_point.x,
            s.end_point.y,
            s.end_point.z,
            s.arc_angle,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteValue);
        }
    }

    for (index, pair) in segments.windows(2).enumerate() {
        let prev_end = Point3::from(pair[0].end_point);
        let next_start = Point3::from(pair[1].start_point);
        if !points_coincide(&prev_end, &next_start) {
            return Err(GeometryError::DisconnectedSegments { index: index + 1 });
        }
    }

    if !points_coincide(&last.end_point.into(), &first.start_point.into()) {
        return Err(GeometryError::OpenPolyline);
    }

    let corners: Vec<Point2> = segments
        .iter()
        .map(|s| Point2::new(s.start_point.x, s.start_point.y))
        .collect();
    let mut area = signed_area_2d(&corners);
    for s in segments {
        let a = Point2::new(s.start_point.x, s.start_point.y);
        let b = Point2::new(s.end_point.x, s.end_point.y);
        area += arc_segment_area(&a, &b, s.arc_angle);
    }
    if area.abs() < TOLERANCE {
        return Err(GeometryError::DegenerateContour);
    }

    Ok(())
}

fn append_polyline(memo: &mut PolygonMemo, polyline: &ExternalPolyline) {
    let base = memo.coords.len();
    let segments = &polyline.polyline_segments;

    for (i, s) in segments.iter().enumerate() {
        memo.coords
            .push(Point2::new(s.start_point.x, s.start_point.y));
        if s.arc_angle.abs() > TOLERANCE {
            memo.arcs.push(PolyArc {
                begin_index: base + i + 1,
                end_index: base + i + 2,
                arc_angle: s.arc_angle,
            });
        }
    }
    // Close the sub-polygon by repeating its first vertex.
    let first = memo.coords[base];
    memo.coords.push(first);
    memo.sub_poly_ends.push(memo.coords.len());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn square(z: f64) -> ExternalPolyline {
        ExternalPolyline::from_corners(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], z)
    }

    #[test]
    fn square_counts_include_closing_vertex() {
        let shape = ExternalShape {
            contour_polyline: square(3.0),
            hole_polylines: vec![],
        };
        let decoded = DecodeShape::new(&shape).execute().unwrap();
        assert_eq!(decoded.sub_poly_count, 1);
        assert_eq!(decoded.vertex_count, 5);
        assert_eq!(decoded.arc_count, 0);
        assert_relative_eq!(decoded.level, 3.0);
        assert_eq!(decoded.memo.sub_poly_ends, vec![5]);
        assert_eq!(decoded.memo.coord(1), decoded.memo.coord(5));
        assert!(decoded.memo.coord(0).is_none());
        assert!(decoded.memo.coord(6).is_none());
    }

    #[test]
    fn hole_appends_sub_polygon() {
        let hole =
            ExternalPolyline::from_corners(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)], 0.0);
        let shape = ExternalShape {
            contour_polyline: square(0.0),
            hole_polylines: vec![hole],
        };
        let decoded = DecodeShape::new(&shape).execute().unwrap();
        assert_eq!(decoded.sub_poly_count, 2);
        assert_eq!(decoded.vertex_count, 10);
        assert_eq!(decoded.memo.sub_poly_ends, vec![5, 10]);
        let p = decoded.memo.coord(6).unwrap();
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn arcs_use_one_based_vertex_indices() {
        let mut contour = square(0.0);
        contour.polyline_segments[1].arc_angle = PI / 2.0;
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let decoded = DecodeShape::new(&shape).execute().unwrap();
        assert_eq!(decoded.arc_count, 1);
        let arc = decoded.memo.arcs[0];
        assert_eq!((arc.begin_index, arc.end_index), (2, 3));
        assert_relative_eq!(arc.arc_angle, PI / 2.0);
    }

    #[test]
    fn circle_from_two_arcs_is_accepted() {
        let a = ExternalPoint { x: -1.0, y: 0.0, z: 0.0 };
        let b = ExternalPoint { x: 1.0, y: 0.0, z: 0.0 };
        let contour = ExternalPolyline {
            polyline_segments: vec![
                ExternalSegment { start_point: a, end_point: b, arc_angle: PI },
                ExternalSegment { start_point: b, end_point: a, arc_angle: PI },
            ],
        };
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let decoded = DecodeShape::new(&shape).execute().unwrap();
        assert_eq!(decoded.vertex_count, 3);
        assert_eq!(decoded.arc_count, 2);
    }

    #[test]
    fn empty_contour_is_rejected() {
        let shape = ExternalShape::default();
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::EmptyPolyline));
    }

    #[test]
    fn two_straight_segments_are_too_few() {
        let mut contour = square(0.0);
        contour.polyline_segments.truncate(2);
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::TooFewSegments(2)));
    }

    #[test]
    fn gap_between_segments_is_rejected() {
        let mut contour = square(0.0);
        contour.polyline_segments[2].start_point.x = 5.0;
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::DisconnectedSegments { index: 2 }));
    }

    #[test]
    fn open_polyline_is_rejected() {
        let mut contour = square(0.0);
        contour.polyline_segments[3].end_point.y = 1.0;
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::OpenPolyline));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut contour = square(0.0);
        contour.polyline_segments[0].arc_angle = f64::NAN;
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::NonFiniteValue));
    }

    #[test]
    fn zero_area_contour_is_rejected() {
        let contour =
            ExternalPolyline::from_corners(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 0.0);
        let shape = ExternalShape {
            contour_polyline: contour,
            hole_polylines: vec![],
        };
        let err = DecodeShape::new(&shape).execute().unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateContour));
    }

    #[test]
    fn deserializes_from_camel_case_json() {
        let json = serde_json::json!({
            "contourPolyline": {
                "polylineSegments": [
                    { "startPoint": { "x": 0.0, "y": 0.0, "z": 1.5 }, "endPoint": { "x": 1.0, "y": 0.0, "z": 1.5 } },
                    { "startPoint": { "x": 1.0, "y": 0.0, "z": 1.5 }, "endPoint": { "x": 0.0, "y": 1.0, "z": 1.5 } },
                    { "startPoint": { "x": 0.0, "y": 1.0, "z": 1.5 }, "endPoint": { "x": 0.0, "y": 0.0, "z": 1.5 } }
                ]
            }
        });
        let shape: ExternalShape = serde_json::from_value(json).unwrap();
        let decoded = DecodeShape::new(&shape).execute().unwrap();
        assert_eq!(decoded.vertex_count, 4);
        assert_relative_eq!(decoded.level, 1.5);
    }
}
