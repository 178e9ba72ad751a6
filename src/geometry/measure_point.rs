use crate::math::{Point2, Point3};

/// Anything that exposes planar coordinates and an optional elevation.
pub trait PointLike {
    fn x(&self) -> f64;
    fn y(&self) -> f64;

    /// Elevation, if the point is 3D.
    fn z(&self) -> Option<f64> {
        None
    }
}

impl<T: PointLike + ?Sized> PointLike for &T {
    fn x(&self) -> f64 {
        (**self).x()
    }

    fn y(&self) -> f64 {
        (**self).y()
    }

    fn z(&self) -> Option<f64> {
        (**self).z()
    }
}

impl PointLike for Point2 {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl PointLike for Point3 {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> Option<f64> {
        Some(self.z)
    }
}

impl PointLike for [f64; 2] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }
}

impl PointLike for [f64; 3] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }

    fn z(&self) -> Option<f64> {
        Some(self[2])
    }
}

impl PointLike for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

impl PointLike for (f64, f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }

    fn z(&self) -> Option<f64> {
        Some(self.2)
    }
}

/// A 2D or 3D coordinate with an optional along-line measure.
///
/// Without `z` the point is planar for every distance and elevation purpose.
/// Equality is attribute-wise and exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurePoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl MeasurePoint {
    /// Creates a planar point without measure.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates an elevated point without measure.
    #[must_use]
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Copies the coordinates of any [`PointLike`], without measure.
    #[must_use]
    pub fn from_point_like(point: &impl PointLike) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
            z: point.z(),
            m: None,
        }
    }

    /// Returns this point with its measure set.
    #[must_use]
    pub fn with_m(self, m: f64) -> Self {
        Self { m: Some(m), ..self }
    }

    /// Returns `true` if the point carries an elevation.
    #[must_use]
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// Planar part of the point.
    #[must_use]
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// The point in 3D, if it carries an elevation.
    #[must_use]
    pub fn xyz(&self) -> Option<Point3> {
        self.z.map(|z| Point3::new(self.x, self.y, z))
    }

    /// `[x, y]` or `[x, y, z]`, without the measure.
    #[must_use]
    pub fn coordinate_list(&self) -> Vec<f64> {
        match self.z {
            Some(z) => vec![self.x, self.y, z],
            None => vec![self.x, self.y],
        }
    }

    /// Euclidean distance to `other`.
    ///
    /// 3D when both points carry an elevation and `force_2d` is `false`,
    /// planar otherwise. NaN coordinates propagate.
    #[must_use]
    pub fn distance(&self, other: &impl PointLike, force_2d: bool) -> f64 {
        match (self.z, other.z()) {
            (Some(z), Some(other_z)) if !force_2d => ((other.x() - self.x).powi(2)
                + (other.y() - self.y).powi(2)
                + (other_z - z).powi(2))
            .sqrt(),
            _ => ((self.x - other.x()).powi(2) + (self.y - other.y()).powi(2)).sqrt(),
        }
    }
}

impl PointLike for MeasurePoint {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> Option<f64> {
        self.z
    }
}

impl From<Point2> for MeasurePoint {
    fn from(point: Point2) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<Point3> for MeasurePoint {
    fn from(point: Point3) -> Self {
        Self::new_3d(point.x, point.y, point.z)
    }
}
