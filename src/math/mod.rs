pub mod azimuth;
pub mod segment_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// Absolute tolerance on the 2D cross product when testing whether a point
/// lies on a segment.
pub const BETWEEN_TOLERANCE: f64 = 1e-7;
