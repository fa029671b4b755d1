pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if two points coincide within [`TOLERANCE`].
#[must_use]
pub fn points_coincide(a: &Point3, b: &Point3) -> bool {
    (a - b).norm() < TOLERANCE
}
