use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::debug::{DebugDraw, NOOP_DRAW};
use crate::error::{OperationError, Result};
use crate::geometry::{MeasurePoint, MeasuredPolyline, PointLike};
use crate::math::azimuth::{azimuth, point_on_azimuth, side_of_line, SideOfLine};
use crate::math::segment_2d::{elevation_at, is_between, project_point_on_segment};
use crate::math::BETWEEN_TOLERANCE;

/// Parameters controlling side-of-line and direction classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Points closer to the line than this are `On` it.
    pub side_margin: f64,
    /// Length of the probe cast along the azimuth for side-of-line.
    pub side_probe_length: f64,
    /// Backward shift applied when point and probe locate at the same spot.
    pub end_nudge: f64,
    /// Length of the probe cast along a caller azimuth for functional direction.
    pub direction_probe_length: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            side_margin: 0.2,
            side_probe_length: 0.2,
            end_nudge: 1e-5,
            direction_probe_length: 0.5,
        }
    }
}

/// How a caller-supplied heading relates to the direction of increasing measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalDirection {
    /// Heading runs with increasing measure.
    Downstream,
    /// Heading runs against increasing measure.
    Upstream,
    /// No heading given, or the heading is perpendicular to the line.
    Unknown,
}

/// Result of projecting a point onto a measured polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    /// The queried point.
    pub point: MeasurePoint,
    /// Location on the line, with `m` set to the distance along the line.
    pub point_on_line: MeasurePoint,
    /// Azimuth used for classification: the caller's, or the segment's.
    pub azimuth: f64,
    pub functional_direction: FunctionalDirection,
    pub side_of_line: SideOfLine,
    pub distance_to_line_2d: f64,
    /// Present when both the query point and the line are elevated.
    pub distance_to_line_3d: Option<f64>,
    pub distance_along_line: f64,
}

/// Segment a projection resolves against.
#[derive(Debug, Clone, Copy)]
struct ResolvedSegment {
    start: usize,
    end: usize,
    /// The point lies before the line; the result is clamped to its start.
    undershoot: bool,
}

/// Projects a point onto a measured polyline.
///
/// The nearest vertex decides which segment is authoritative:
/// - two exactly equidistant nearest vertices: the segment joining them
/// - nearest is the first vertex: the first segment, or an undershoot clamp
///   to the start when the projection falls before it
/// - nearest is the last vertex: the last segment, clamped at the end
/// - otherwise: whichever adjacent segment contains the projection, the
///   outgoing one when both or neither do
pub struct Project<'a> {
    point: MeasurePoint,
    azimuth: Option<f64>,
    params: ProjectionParams,
    debug: &'a dyn DebugDraw,
}

impl<'a> Project<'a> {
    /// Creates a new `Project` query for `point`.
    #[must_use]
    pub fn new(point: &impl PointLike) -> Self {
        Self {
            point: MeasurePoint::from_point_like(point),
            azimuth: None,
            params: ProjectionParams::default(),
            debug: &NOOP_DRAW,
        }
    }

    /// Uses a caller heading instead of the segment azimuth.
    #[must_use]
    pub fn with_azimuth(mut self, azimuth: f64) -> Self {
        self.azimuth = Some(azimuth);
        self
    }

    /// Overrides the side-of-line and direction tunables.
    #[must_use]
    pub fn with_params(mut self, params: ProjectionParams) -> Self {
        self.params = params;
        self
    }

    /// Draws the projection through `debug`.
    #[must_use]
    pub fn with_debug(mut self, debug: &'a dyn DebugDraw) -> Self {
        self.debug = debug;
        self
    }

    /// Executes the projection.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Unsupported` if the polyline's measures were
    /// given: they cannot be derived from the nearest point on the geometry.
    pub fn execute(&self, line: &MeasuredPolyline) -> Result<ProjectionResult> {
        if line.m_given() {
            return Err(OperationError::Unsupported(
                "projection onto a polyline with given measures",
            )
            .into());
        }

        let segment = self.resolve_segment(line);
        let result = self.project_on_segment(line, segment);

        debug!(
            start = segment.start,
            end = segment.end,
            undershoot = segment.undershoot,
            distance_along_line = result.distance_along_line,
            side = %result.side_of_line,
            "projected point onto polyline"
        );
        self.draw(&result);

        Ok(result)
    }

    fn resolve_segment(&self, line: &MeasuredPolyline) -> ResolvedSegment {
        let points = line.points();

        // Stable sort keeps index order between equal distances.
        let mut by_distance: Vec<(usize, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, v)| (i, self.point.distance(v, true)))
            .collect();
        by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (nearest, nearest_distance) = by_distance[0];
        let (second, second_distance) = by_distance[1];

        #[allow(clippy::float_cmp)]
        let equidistant = nearest_distance == second_distance;
        if equidistant {
            trace!(nearest, second, "equidistant between two vertices");
            return ResolvedSegment {
                start: nearest,
                end: second,
                undershoot: false,
            };
        }

        let last = points.len() - 1;
        if nearest == 0 {
            let projected = project_point_on_segment(&points[0], &points[1], &self.point, false);
            let undershoot = !is_between(&points[0], &points[1], &projected);
            if undershoot {
                trace!("point lies before the line start");
            }
            return ResolvedSegment {
                start: 0,
                end: 1,
                undershoot,
            };
        }

        if nearest == last {
            return ResolvedSegment {
                start: last - 1,
                end: last,
                undershoot: false,
            };
        }

        let (prev, closest, next) = (&points[nearest - 1], &points[nearest], &points[nearest + 1]);
        let on_previous = is_between(
            prev,
            closest,
            &project_point_on_segment(prev, closest, &self.point, false),
        );
        let on_next = is_between(
            closest,
            next,
            &project_point_on_segment(closest, next, &self.point, false),
        );

        if on_previous && !on_next {
            ResolvedSegment {
                start: nearest - 1,
                end: nearest,
                undershoot: false,
            }
        } else {
            // Only on the next segment, or at the vertex itself.
            ResolvedSegment {
                start: nearest,
                end: nearest + 1,
                undershoot: false,
            }
        }
    }

    fn project_on_segment(
        &self,
        line: &MeasuredPolyline,
        segment: ResolvedSegment,
    ) -> ProjectionResult {
        let s1 = &line.points()[segment.start];
        let s2 = &line.points()[segment.end];

        let mut point_on_line = if segment.undershoot {
            MeasurePoint { m: None, ..*s1 }
        } else {
            self.locate_on(s1, s2)
        };

        let distance_to_line_2d = self.point.distance(&point_on_line, true);
        let distance_to_line_3d = (self.point.has_z() && point_on_line.has_z())
            .then(|| self.point.distance(&point_on_line, false));

        let distance_along_line = if segment.undershoot {
            line.start_measure()
        } else {
            line.measure_at(segment.start) + s1.distance(&point_on_line, false)
        };
        point_on_line.m = Some(distance_along_line);

        let azimuth_value = self.azimuth.unwrap_or_else(|| azimuth(s1, s2));
        let side = side_of_line(
            &self.point.xy(),
            azimuth_value,
            (s1, s2),
            self.params.side_margin,
            self.params.side_probe_length,
            self.params.end_nudge,
        );

        ProjectionResult {
            point: self.point,
            point_on_line,
            azimuth: azimuth_value,
            functional_direction: self.functional_direction(s1, s2, &point_on_line),
            side_of_line: side,
            distance_to_line_2d,
            distance_to_line_3d,
            distance_along_line,
        }
    }

    /// Projects onto `s1 → s2`, snapping to the nearer end vertex when the
    /// projection falls outside the segment.
    ///
    /// A projection behind the segment start yields `s1`, one past its end
    /// yields `s2`.
    fn locate_on(&self, s1: &MeasurePoint, s2: &MeasurePoint) -> MeasurePoint {
        let xy = project_point_on_segment(s1, s2, &self.point, false);
        if !is_between(s1, s2, &xy) {
            let behind_start = (xy - s1.xy()).dot(&(s2.xy() - s1.xy())) < 0.0;
            let end = if behind_start { s1 } else { s2 };
            return MeasurePoint { m: None, ..*end };
        }
        let z = match (s1.xyz(), s2.xyz()) {
            (Some(a), Some(b)) => Some(elevation_at(&a, &b, &xy)),
            _ => None,
        };
        MeasurePoint {
            x: xy.x,
            y: xy.y,
            z,
            m: None,
        }
    }

    fn functional_direction(
        &self,
        s1: &MeasurePoint,
        s2: &MeasurePoint,
        point_on_line: &MeasurePoint,
    ) -> FunctionalDirection {
        let Some(heading) = self.azimuth else {
            return FunctionalDirection::Unknown;
        };
        let probe = point_on_azimuth(point_on_line, heading, self.params.direction_probe_length);
        let direction = s2.xy() - s1.xy();
        let advance = (probe - point_on_line.xy()).dot(&direction) / direction.norm();
        if advance.abs() < BETWEEN_TOLERANCE {
            return FunctionalDirection::Unknown;
        }
        match advance.partial_cmp(&0.0) {
            Some(Ordering::Greater) => FunctionalDirection::Downstream,
            Some(Ordering::Less) => FunctionalDirection::Upstream,
            _ => FunctionalDirection::Unknown,
        }
    }

    fn draw(&self, result: &ProjectionResult) {
        self.debug.draw_point(&result.point);
        self.debug.draw_text(&result.side_of_line.to_string(), &result.point);
        self.debug.draw_point(&result.point_on_line);
        self.debug.draw_line(&[result.point_on_line, result.point]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::debug::tests::RecordingDraw;
    use crate::error::MeasureLineError;
    use crate::math::Point3;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn simple_2d() -> MeasuredPolyline {
        MeasuredPolyline::from_coordinates(
            &[[3.0, 0.0], [3.0, 10.0], [3.0, 20.0], [3.0, 30.0]],
            false,
        )
        .unwrap()
    }

    fn flat_3d() -> MeasuredPolyline {
        MeasuredPolyline::from_coordinates(
            &[[3.0, 0.0, 0.0], [3.0, 10.0, 0.0], [3.0, 20.0, 0.0], [3.0, 30.0, 0.0]],
            false,
        )
        .unwrap()
    }

    fn rising_3d() -> MeasuredPolyline {
        MeasuredPolyline::from_coordinates(
            &[[3.0, 0.0, 0.0], [3.0, 10.0, 20.0], [3.0, 20.0, 40.0], [3.0, 30.0, 80.0]],
            false,
        )
        .unwrap()
    }

    #[test]
    fn projects_onto_segment_middles_2d() {
        let line = simple_2d();
        for y in [5.0, 15.0, 25.0] {
            let r = line.project(&[0.0, y]).unwrap();
            assert_eq!(r.point_on_line.x, 3.0);
            assert_eq!(r.point_on_line.y, y);
            assert_eq!(r.point_on_line.z, None);
            assert_eq!(r.point_on_line.m, Some(y));
            assert_eq!(r.distance_to_line_2d, 3.0);
            assert_eq!(r.distance_to_line_3d, None);
            assert_eq!(r.distance_along_line, y);
        }
    }

    #[test]
    fn projects_onto_segment_middles_3d() {
        let line = rising_3d();
        let expected = [
            (11.180339887498949, 10.44030650891055),
            (33.54101966249685, 30.14962686336267),
            (65.3368876780841, 60.07495318350236),
        ];
        for (y, (along, to_line_3d)) in [5.0, 15.0, 25.0].into_iter().zip(expected) {
            let r = line.project(&[0.0, y, 0.0]).unwrap();
            assert!(r.point_on_line.z.is_some());
            assert_relative_eq!(r.distance_along_line, along, max_relative = 1e-12);
            assert_relative_eq!(r.point_on_line.m.unwrap(), along, max_relative = 1e-12);
            assert_abs_diff_eq!(r.distance_to_line_2d, 3.0, epsilon = 1e-12);
            assert_relative_eq!(r.distance_to_line_3d.unwrap(), to_line_3d, max_relative = 1e-12);
            assert_eq!(r.point_on_line.x, 3.0);
            assert_eq!(r.point_on_line.y, y);
        }
    }

    #[test]
    fn planar_query_on_elevated_line_gets_elevation() {
        let r = rising_3d().project(&[0.0, 5.0]).unwrap();
        assert_abs_diff_eq!(r.point_on_line.z.unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(r.distance_to_line_3d, None);
        assert_relative_eq!(r.distance_along_line, 125.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn undershoot_clamps_to_start() {
        let line = simple_2d();
        for x in [-100.0, -7.0, 0.0, 3.0, 12.5, 100.0] {
            for y in [-0.5, -1.0, -40.0] {
                let r = line.project(&[x, y]).unwrap();
                assert_eq!(r.distance_along_line, 0.0, "({x}, {y})");
                assert_eq!(r.point_on_line.x, 3.0);
                assert_eq!(r.point_on_line.y, 0.0);
            }
        }
    }

    #[test]
    fn overshoot_clamps_to_end() {
        let line = simple_2d();
        for x in [-100.0, -7.0, 0.0, 3.0, 12.5, 100.0] {
            for y in [30.5, 31.0, 80.0] {
                let r = line.project(&[x, y]).unwrap();
                assert_eq!(r.distance_along_line, 30.0, "({x}, {y})");
                assert_eq!(r.point_on_line.y, 30.0);
            }
        }
    }

    #[test]
    fn overshoot_3d_reaches_full_length() {
        let line = flat_3d();
        for z in [-1000.0, 0.0, 9000.0] {
            let r = line.project(&[42.0, 31.0, z]).unwrap();
            assert_eq!(Some(r.distance_along_line), line.length_3d());
            let r = line.project(&[-42.0, -1.0, z]).unwrap();
            assert_eq!(r.distance_along_line, 0.0);
        }
    }

    #[test]
    fn on_vertices_measure_equals_y() {
        let line = flat_3d();
        for y in [0.0, 10.0, 20.0, 30.0] {
            let r = line.project(&[0.0, y, 0.0]).unwrap();
            assert_eq!(r.distance_along_line, y);
        }
    }

    #[test]
    fn first_and_last_parts() {
        let line = flat_3d();
        for y in 1..=9 {
            let r = line.project(&[-60.0, f64::from(y), 500.0]).unwrap();
            assert!(r.distance_along_line < 10.0);
        }
        for y in 21..=29 {
            let r = line.project(&[77.0, f64::from(y), -500.0]).unwrap();
            assert!(r.distance_along_line > 20.0);
        }
    }

    #[test]
    fn interior_vertex_prefers_outgoing_segment() {
        // Corner at (10, 0): the query sits beyond both segments' ends.
        let line =
            MeasuredPolyline::from_coordinates(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]], false)
                .unwrap();
        let r = line.project(&[12.0, -2.0]).unwrap();
        assert_eq!(r.distance_along_line, 10.0);
        assert_eq!(r.azimuth, 0.0);
    }

    #[test]
    fn duplicate_vertex_ties_onto_zero_length_segment() {
        // The two coincident vertices are always equidistant.
        let line =
            MeasuredPolyline::from_coordinates(&[[0.0, 0.0], [0.0, 0.0], [0.0, 10.0]], false)
                .unwrap();
        let r = line.project(&[1.0, 4.0]).unwrap();
        assert_eq!(r.distance_along_line, 0.0);
        assert_eq!((r.point_on_line.x, r.point_on_line.y), (0.0, 0.0));
        assert_abs_diff_eq!(r.distance_to_line_2d, 17.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(r.side_of_line, SideOfLine::On);
    }

    #[test]
    fn interior_vertex_uses_incoming_segment_when_only_it_contains_projection() {
        let line =
            MeasuredPolyline::from_coordinates(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]], false)
                .unwrap();
        let r = line.project(&[8.0, -1.0]).unwrap();
        assert_abs_diff_eq!(r.distance_along_line, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.azimuth, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_given_measures() {
        let line = MeasuredPolyline::from_coordinates(
            &[[3.0, 0.0, 0.0], [3.0, 10.0, 100.0]],
            true,
        )
        .unwrap();
        let err = line.project(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            MeasureLineError::Operation(OperationError::Unsupported(_))
        ));
    }

    #[test]
    fn side_of_line_along_rising_line() {
        let line = MeasuredPolyline::from_coordinates(
            &[[3.0, 0.0, 0.0], [3.0, 10.0, 10.0], [3.0, 20.0, 20.0], [3.0, 30.0, 30.0]],
            false,
        )
        .unwrap();
        for y in [0.0, 4.0, 10.0, 17.0, 29.0, 30.0] {
            let right = line.project(&Point3::new(6.0, y, -3.0)).unwrap();
            assert_eq!(right.side_of_line, SideOfLine::Right, "y = {y}");
            let left = line.project(&Point3::new(0.0, y, 7.0)).unwrap();
            assert_eq!(left.side_of_line, SideOfLine::Left, "y = {y}");
        }
        let on = line.project(&[3.1, 12.0]).unwrap();
        assert_eq!(on.side_of_line, SideOfLine::On);
    }

    #[test]
    fn side_margin_is_configurable() {
        let params = ProjectionParams {
            side_margin: 5.0,
            ..ProjectionParams::default()
        };
        let r = Project::new(&[6.0, 5.0])
            .with_params(params)
            .execute(&simple_2d())
            .unwrap();
        assert_eq!(r.side_of_line, SideOfLine::On);
    }

    #[test]
    fn caller_azimuth_sets_direction_and_side() {
        let line = simple_2d();

        let r = line.project(&[6.0, 5.0]).unwrap();
        assert_eq!(r.functional_direction, FunctionalDirection::Unknown);
        assert_eq!(r.azimuth, 0.0);

        let r = Project::new(&[6.0, 5.0]).with_azimuth(10.0).execute(&line).unwrap();
        assert_eq!(r.functional_direction, FunctionalDirection::Downstream);
        assert_eq!(r.azimuth, 10.0);
        assert_eq!(r.side_of_line, SideOfLine::Right);

        let r = Project::new(&[6.0, 5.0]).with_azimuth(180.0).execute(&line).unwrap();
        assert_eq!(r.functional_direction, FunctionalDirection::Upstream);
        assert_eq!(r.side_of_line, SideOfLine::Left);

        let r = Project::new(&[6.0, 5.0]).with_azimuth(90.0).execute(&line).unwrap();
        assert_eq!(r.functional_direction, FunctionalDirection::Unknown);
    }

    #[test]
    fn debug_collaborator_receives_drawing() {
        let draw = RecordingDraw::default();
        let r = Project::new(&[0.0, 5.0])
            .with_debug(&draw)
            .execute(&simple_2d())
            .unwrap();
        assert_eq!(r.distance_along_line, 5.0);
        assert_eq!(
            *draw.calls.borrow(),
            vec!["point 0 5", "text Left", "point 3 5", "line 2"]
        );
    }

    // ── real-world track geometry ──

    fn rail_connection() -> MeasuredPolyline {
        let data = "161734.348,383768.896,18.761 161744.087,383771.054,18.761 \
                    161756.813,383773.874,18.761 161940.82,383814.894,18.336 \
                    161964.502,383820.223,18.289 161984.591,383824.984,18.262 \
                    162002.608,383829.097,18.23 162007.296,383830.153,18.226 \
                    162051.151,383840.028,18.189 162351.515,383906.741,17.875 \
                    162361.406,383908.6,17.885 162378.35,383912.147,17.856 \
                    162404.107,383915.76,17.668 162429.966,383917.815,17.668 \
                    162440.463,383918.65,17.668";
        let coordinates: Vec<Vec<f64>> = data
            .split_whitespace()
            .map(|c| c.split(',').map(|v| v.parse().unwrap()).collect())
            .collect();
        MeasuredPolyline::from_coordinates(&coordinates, false).unwrap()
    }

    #[test]
    fn rail_connection_length() {
        let line = rail_connection();
        assert_abs_diff_eq!(line.length_3d().unwrap(), 722.233, epsilon = 1e-3);
    }

    #[test]
    fn rail_connection_measures() {
        let line = rail_connection();
        let cases = [
            ([162_370.486, 383_907.947, 17.868], 651.194),
            ([161_782.364, 383_782.131, 18.701], 49.745),
            ([162_369.462, 383_912.841, 17.868], 651.195),
            ([161_776.607, 383_775.725, 18.701], 42.732),
            ([162_378.350, 383_912.147, 17.870], 659.752),
            ([161_773.130, 383_777.512, 18.761], 39.728),
        ];
        for (point, expected) in cases {
            let r = line.project(&point).unwrap();
            assert_abs_diff_eq!(r.distance_along_line, expected, epsilon = 1e-3);
        }
    }
}
