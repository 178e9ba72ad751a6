use std::fmt;

use tracing::{debug, trace};

use crate::debug::{DebugDraw, NOOP_DRAW};
use crate::geometry::{MeasurePoint, MeasuredPolyline};
use crate::math::segment_2d::{elevation_at, point_at_fraction};

/// Where a cut measure falls relative to the polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutStatus {
    Valid,
    /// At or before the start measure.
    Undershoot,
    /// At or after the end measure.
    Overshoot,
}

impl fmt::Display for CutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Valid => "Valid",
            Self::Undershoot => "Undershoot",
            Self::Overshoot => "Overshoot",
        };
        f.write_str(label)
    }
}

/// The two parts of a cut polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct CutResult {
    pub status: CutStatus,
    /// Part before the cut measure; the whole line on overshoot, `None` on undershoot.
    pub result: Option<MeasuredPolyline>,
    /// Part after the cut measure; the whole line on undershoot, `None` on overshoot.
    pub post_cut: Option<MeasuredPolyline>,
}

/// Splits a measured polyline at a measure.
///
/// Inside the measure range the split happens at the vertex carrying the
/// measure, or at a boundary vertex interpolated on the enclosing segment.
/// Both parts keep the measures of the cut line, so they are built with given
/// measures.
pub struct Cut<'a> {
    measure: f64,
    debug: &'a dyn DebugDraw,
}

impl<'a> Cut<'a> {
    /// Creates a new `Cut` at `measure`.
    #[must_use]
    pub fn new(measure: f64) -> Self {
        Self {
            measure,
            debug: &NOOP_DRAW,
        }
    }

    /// Draws the resulting parts through `debug`.
    #[must_use]
    pub fn with_debug(mut self, debug: &'a dyn DebugDraw) -> Self {
        self.debug = debug;
        self
    }

    /// Executes the cut. The receiver is never modified.
    #[must_use]
    pub fn execute(&self, line: &MeasuredPolyline) -> CutResult {
        let result = self.split(line);
        debug!(measure = self.measure, status = %result.status, "cut polyline");
        self.draw(&result);
        result
    }

    fn split(&self, line: &MeasuredPolyline) -> CutResult {
        if self.measure <= line.start_measure() {
            return undershoot(line);
        }
        if self.measure >= line.end_measure() {
            return overshoot(line);
        }

        let points = line.points();
        // The first vertex reaching the measure; never the first vertex itself.
        let Some(i) = points
            .iter()
            .position(|p| p.m.is_some_and(|m| m >= self.measure))
        else {
            return overshoot(line);
        };

        if line.measure_at(i) > self.measure {
            let boundary = self.boundary_vertex(line, i);
            trace!(segment = i - 1, x = boundary.x, y = boundary.y, "cut inside segment");

            let mut before = points[..i].to_vec();
            before.push(boundary);
            let mut after = Vec::with_capacity(points.len() - i + 1);
            after.push(boundary);
            after.extend_from_slice(&points[i..]);
            return valid(before, after);
        }

        trace!(vertex = i, "cut on vertex");
        valid(points[..=i].to_vec(), points[i..].to_vec())
    }

    /// Interpolates the vertex carrying the cut measure on segment `i - 1 → i`.
    fn boundary_vertex(&self, line: &MeasuredPolyline, i: usize) -> MeasurePoint {
        let a = &line.points()[i - 1];
        let b = &line.points()[i];
        let (m_a, m_b) = (line.measure_at(i - 1), line.measure_at(i));

        let percentage = (self.measure - m_a) / (m_b - m_a);
        let xy = point_at_fraction(a, b, percentage);
        let z = match (a.xyz(), b.xyz()) {
            (Some(a3), Some(b3)) => Some(elevation_at(&a3, &b3, &xy)),
            _ => None,
        };

        MeasurePoint {
            x: xy.x,
            y: xy.y,
            z,
            m: Some(self.measure),
        }
    }

    fn draw(&self, result: &CutResult) {
        for part in [&result.result, &result.post_cut].into_iter().flatten() {
            self.debug.draw_line(part.points());
        }
        if let Some(boundary) = result.post_cut.as_ref().and_then(|p| p.points().first()) {
            self.debug.draw_text(&result.status.to_string(), boundary);
        }
    }
}

fn undershoot(line: &MeasuredPolyline) -> CutResult {
    CutResult {
        status: CutStatus::Undershoot,
        result: None,
        post_cut: Some(line.clone()),
    }
}

fn overshoot(line: &MeasuredPolyline) -> CutResult {
    CutResult {
        status: CutStatus::Overshoot,
        result: Some(line.clone()),
        post_cut: None,
    }
}

fn valid(before: Vec<MeasurePoint>, after: Vec<MeasurePoint>) -> CutResult {
    CutResult {
        status: CutStatus::Valid,
        result: Some(MeasuredPolyline::from_measured(before, true)),
        post_cut: Some(MeasuredPolyline::from_measured(after, true)),
    }
}
