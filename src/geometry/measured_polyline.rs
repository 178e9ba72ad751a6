use tracing::trace;

use super::{MeasurePoint, PointLike};
use crate::error::{InputError, Result};
use crate::operations::{Cut, CutProfile, CutResult, ProfileResult, Project, ProjectionResult};

/// An open polyline whose vertices carry a non-decreasing measure.
///
/// Measures are either accumulated from geometry (3D distance when every
/// vertex is elevated, planar otherwise) or supplied by the caller
/// (`m_given`). The polyline is immutable; cutting produces new instances
/// that own their own vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredPolyline {
    points: Vec<MeasurePoint>,
    m_given: bool,
    length_2d: f64,
    length_3d: Option<f64>,
    start_measure: f64,
    end_measure: f64,
}

impl MeasuredPolyline {
    /// Builds a polyline from coordinate tuples of uniform arity.
    ///
    /// Without `m_given`, tuples are `[x, y]` or `[x, y, z]`. With `m_given`
    /// the trailing component is the measure: `[x, y, m]` or `[x, y, z, m]`,
    /// where a NaN `z` marks a planar vertex.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for fewer than 2 coordinates, an arity that does
    /// not fit `m_given`, mixed arities, or decreasing given measures.
    pub fn from_coordinates<C: AsRef<[f64]>>(coordinates: &[C], m_given: bool) -> Result<Self> {
        if coordinates.len() < 2 {
            return Err(InputError::TooFewPoints {
                count: coordinates.len(),
            }
            .into());
        }

        let expected = coordinates[0].as_ref().len();
        let arity_ok = if m_given {
            matches!(expected, 3 | 4)
        } else {
            matches!(expected, 2 | 3)
        };
        if !arity_ok {
            return Err(InputError::InvalidArity {
                index: 0,
                arity: expected,
                m_given,
            }
            .into());
        }

        let mut points = Vec::with_capacity(coordinates.len());
        for (index, coordinate) in coordinates.iter().enumerate() {
            let c = coordinate.as_ref();
            if c.len() != expected {
                return Err(InputError::InconsistentArity {
                    index,
                    expected,
                    found: c.len(),
                }
                .into());
            }
            let point = match (m_given, c) {
                (false, [x, y]) => MeasurePoint::new(*x, *y),
                (false, [x, y, z]) => MeasurePoint::new_3d(*x, *y, *z),
                (true, [x, y, m]) => MeasurePoint::new(*x, *y).with_m(*m),
                (true, [x, y, z, m]) if z.is_nan() => MeasurePoint::new(*x, *y).with_m(*m),
                (true, [x, y, z, m]) => MeasurePoint::new_3d(*x, *y, *z).with_m(*m),
                _ => {
                    return Err(InputError::InvalidArity {
                        index,
                        arity: c.len(),
                        m_given,
                    }
                    .into())
                }
            };
            points.push(point);
        }

        Self::from_points(points, m_given)
    }

    /// Builds a polyline from points.
    ///
    /// Without `m_given` any measure on the input is replaced by the
    /// accumulated distance from the first point.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for fewer than 2 points, or, with `m_given`, a
    /// point without measure or a measure lower than its predecessor's.
    pub fn from_points(mut points: Vec<MeasurePoint>, m_given: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(InputError::TooFewPoints {
                count: points.len(),
            }
            .into());
        }

        if m_given {
            let mut previous = f64::NEG_INFINITY;
            for (index, point) in points.iter().enumerate() {
                let current = point.m.ok_or(InputError::MissingMeasure { index })?;
                if current < previous {
                    return Err(InputError::DecreasingMeasure {
                        index,
                        previous,
                        current,
                    }
                    .into());
                }
                previous = current;
            }
        } else {
            let mut measure = 0.0;
            points[0].m = Some(measure);
            for i in 1..points.len() {
                measure += points[i].distance(&points[i - 1], false);
                points[i].m = Some(measure);
            }
        }

        Ok(Self::from_measured(points, m_given))
    }

    /// Wraps points whose measures are already final.
    ///
    /// Callers guarantee at least 2 points, each with a measure.
    pub(crate) fn from_measured(points: Vec<MeasurePoint>, m_given: bool) -> Self {
        debug_assert!(points.len() >= 2, "measured polyline needs 2 points");

        let length_2d = points
            .windows(2)
            .map(|pair| pair[1].distance(&pair[0], true))
            .sum::<f64>();
        let length_3d = points.iter().all(MeasurePoint::has_z).then(|| {
            points
                .windows(2)
                .map(|pair| pair[1].distance(&pair[0], false))
                .sum::<f64>()
        });
        let start_measure = points.first().and_then(|p| p.m).unwrap_or_default();
        let end_measure = points.last().and_then(|p| p.m).unwrap_or_default();

        trace!(
            vertices = points.len(),
            m_given,
            length_2d,
            ?length_3d,
            start_measure,
            end_measure,
            "measured polyline built"
        );

        Self {
            points,
            m_given,
            length_2d,
            length_3d,
            start_measure,
            end_measure,
        }
    }

    /// The vertices, in order, each carrying its measure.
    #[must_use]
    pub fn points(&self) -> &[MeasurePoint] {
        &self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a measured polyline has at least 2 vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Per-vertex `[x, y]` or `[x, y, z]` lists, without measures.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(MeasurePoint::coordinate_list).collect()
    }

    /// Whether measures were supplied by the caller rather than derived.
    #[must_use]
    pub fn m_given(&self) -> bool {
        self.m_given
    }

    /// Whether every vertex carries an elevation.
    #[must_use]
    pub fn has_z(&self) -> bool {
        self.length_3d.is_some()
    }

    /// Cumulative planar length.
    #[must_use]
    pub fn length_2d(&self) -> f64 {
        self.length_2d
    }

    /// Cumulative 3D length, present only if every vertex is elevated.
    #[must_use]
    pub fn length_3d(&self) -> Option<f64> {
        self.length_3d
    }

    /// Measure of the first vertex.
    #[must_use]
    pub fn start_measure(&self) -> f64 {
        self.start_measure
    }

    /// Measure of the last vertex.
    #[must_use]
    pub fn end_measure(&self) -> f64 {
        self.end_measure
    }

    /// Span of measures covered by the polyline.
    #[must_use]
    pub fn measure_length(&self) -> f64 {
        self.end_measure - self.start_measure
    }

    /// Measure of vertex `index`.
    pub(crate) fn measure_at(&self, index: usize) -> f64 {
        self.points[index].m.unwrap_or_default()
    }

    /// Projects `point` onto the polyline with default parameters.
    ///
    /// # Errors
    ///
    /// Fails with an unsupported operation error if measures were given.
    pub fn project(&self, point: &impl PointLike) -> Result<ProjectionResult> {
        Project::new(point).execute(self)
    }

    /// Splits the polyline at `measure`.
    #[must_use]
    pub fn cut(&self, measure: f64) -> CutResult {
        Cut::new(measure).execute(self)
    }

    /// Extracts the part between `from_measure` and `to_measure`.
    #[must_use]
    pub fn cut_profile(&self, from_measure: f64, to_measure: f64) -> ProfileResult {
        CutProfile::new(from_measure, to_measure).execute(self)
    }
}
