use super::{Point2, Point3, BETWEEN_TOLERANCE};
use crate::geometry::PointLike;

fn xy(p: &impl PointLike) -> Point2 {
    Point2::new(p.x(), p.y())
}

/// Projects `p` orthogonally onto the line through `a` and `b` in the XY plane.
///
/// With `clamp_to_segment` the projection parameter is clamped to `[0, 1]`,
/// returning the closest point on the segment instead of the infinite line.
/// A degenerate segment (`a == b` in XY) returns `a`.
#[must_use]
pub fn project_point_on_segment(
    a: &impl PointLike,
    b: &impl PointLike,
    p: &impl PointLike,
    clamp_to_segment: bool,
) -> Point2 {
    let a = xy(a);
    let b = xy(b);
    if a == b {
        return a;
    }

    let ab = b - a;
    let ap = xy(p) - a;
    let t = ap.dot(&ab) / ab.dot(&ab);
    let t = if clamp_to_segment { t.clamp(0.0, 1.0) } else { t };

    a + ab * t
}

/// Returns whether `c` lies on the closed segment `a → b`.
///
/// Collinearity is tested on the 2D cross product against [`BETWEEN_TOLERANCE`],
/// then the dot product must fall within `[0, |ab|²]`.
#[must_use]
pub fn is_between(a: &impl PointLike, b: &impl PointLike, c: &impl PointLike) -> bool {
    let (ax, ay) = (a.x(), a.y());
    let (bx, by) = (b.x(), b.y());
    let (cx, cy) = (c.x(), c.y());

    let cross = (cy - ay) * (bx - ax) - (cx - ax) * (by - ay);
    if cross.abs() > BETWEEN_TOLERANCE {
        return false;
    }

    let dot = (cx - ax) * (bx - ax) + (cy - ay) * (by - ay);
    if dot < 0.0 {
        return false;
    }

    let len_sq = (bx - ax) * (bx - ax) + (by - ay) * (by - ay);
    dot <= len_sq
}

/// Interpolates the elevation at `at`, an XY location on segment `a → b`.
///
/// The ratio is taken along the axis with the larger variation. Falls back to
/// the other axis when that one is flat, and to the mean elevation when the
/// segment is degenerate in XY.
#[must_use]
pub fn elevation_at(a: &Point3, b: &Point3, at: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;

    if dx.abs() >= dy.abs() && dx != 0.0 {
        ((at.x - a.x) / dx) * dz + a.z
    } else if dy != 0.0 {
        ((at.y - a.y) / dy) * dz + a.z
    } else {
        (a.z + b.z) / 2.0
    }
}

/// Returns the XY point at `fraction` of the way from `a` to `b`.
#[must_use]
pub fn point_at_fraction(a: &impl PointLike, b: &impl PointLike, fraction: f64) -> Point2 {
    let a = xy(a);
    a + (xy(b) - a) * fraction
}

/// Planar distance from the start of segment `a → b` to the closest point
/// on the segment to `p`.
#[must_use]
pub fn locate_on_segment(a: &impl PointLike, b: &impl PointLike, p: &impl PointLike) -> f64 {
    let closest = project_point_on_segment(a, b, p, true);
    (closest - xy(a)).norm()
}

/// Returns the XY point at planar `distance` along segment `a → b`,
/// clamped to the segment.
#[must_use]
pub fn interpolate_on_segment(a: &impl PointLike, b: &impl PointLike, distance: f64) -> Point2 {
    let start = xy(a);
    let length = (xy(b) - start).norm();
    if length <= 0.0 {
        return start;
    }
    point_at_fraction(a, b, (distance / length).clamp(0.0, 1.0))
}

/// Minimum planar distance from `p` to segment `a → b`.
#[must_use]
pub fn distance_to_segment(a: &impl PointLike, b: &impl PointLike, p: &impl PointLike) -> f64 {
    (xy(p) - project_point_on_segment(a, b, p, true)).norm()
}
