use std::cmp::Ordering;
use std::fmt;

use super::segment_2d::{distance_to_segment, interpolate_on_segment, locate_on_segment};
use super::Point2;
use crate::geometry::PointLike;

/// Bearing from `from` to `to` in degrees, north = 0, clockwise, in `[0, 360)`.
#[must_use]
pub fn azimuth(from: &impl PointLike, to: &impl PointLike) -> f64 {
    // atan2(dx, dy) measures from north instead of from the x axis.
    let angle = (to.x() - from.x()).atan2(to.y() - from.y());
    if angle >= 0.0 {
        angle.to_degrees()
    } else {
        angle.to_degrees() + 360.0
    }
}

/// Brings any azimuth into `[0, 360)`.
#[must_use]
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    azimuth.rem_euclid(360.0)
}

/// Returns the point at `distance` from `origin` heading along `azimuth`.
#[must_use]
pub fn point_on_azimuth(origin: &impl PointLike, azimuth: f64, distance: f64) -> Point2 {
    let angle = (90.0 - normalize_azimuth(azimuth)).to_radians();
    Point2::new(
        origin.x() + distance * angle.cos(),
        origin.y() + distance * angle.sin(),
    )
}

/// Classification of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideOfLine {
    Left,
    Right,
    On,
}

impl fmt::Display for SideOfLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::On => "On",
        };
        f.write_str(label)
    }
}

/// Classifies `point` as left of, right of, or on the directed segment
/// `start → end`.
///
/// Points closer to the segment than `margin` are `On`. Otherwise a probe is
/// cast from `point` along `azimuth` for `probe_length`, both are located on
/// the segment, and the sign of the cross product of
/// (probe on line → point on line) and (probe on line → point) decides the side.
///
/// When both locations coincide (typically past the segment end) the point's
/// location is moved back by `nudge`, or the probe's forward when the point
/// sits at the segment start.
#[must_use]
pub fn side_of_line<A: PointLike, B: PointLike>(
    point: &impl PointLike,
    azimuth: f64,
    segment: (&A, &B),
    margin: f64,
    probe_length: f64,
    nudge: f64,
) -> SideOfLine {
    let (start, end) = segment;
    if distance_to_segment(start, end, point) < margin {
        return SideOfLine::On;
    }

    let probe = point_on_azimuth(point, azimuth, probe_length);
    let mut point_measure = locate_on_segment(start, end, point);
    let mut probe_measure = locate_on_segment(start, end, &probe);
    #[allow(clippy::float_cmp)]
    let coincide = point_measure == probe_measure;
    if coincide {
        if point_measure - nudge >= 0.0 {
            point_measure -= nudge;
        } else {
            probe_measure += nudge;
        }
    }

    let on_line = interpolate_on_segment(start, end, point_measure);
    let probe_on_line = interpolate_on_segment(start, end, probe_measure);

    let cross = (on_line.x - probe_on_line.x) * (point.y() - probe_on_line.y)
        - (on_line.y - probe_on_line.y) * (point.x() - probe_on_line.x);

    match cross.partial_cmp(&0.0) {
        Some(Ordering::Less) => SideOfLine::Left,
        Some(Ordering::Greater) => SideOfLine::Right,
        _ => SideOfLine::On,
    }
}
