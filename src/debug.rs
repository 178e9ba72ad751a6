use tracing::debug;

use crate::geometry::MeasurePoint;

/// Optional drawing collaborator used to visualise operations while debugging.
///
/// Operations only call into it; results never depend on it.
pub trait DebugDraw {
    fn draw_point(&self, point: &MeasurePoint);

    /// Draws an open line through `points`.
    fn draw_line(&self, points: &[MeasurePoint]);

    fn draw_text(&self, label: &str, anchor: &MeasurePoint);
}

/// Draws nothing. The default collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDraw;

impl DebugDraw for NoopDraw {
    fn draw_point(&self, _point: &MeasurePoint) {}

    fn draw_line(&self, _points: &[MeasurePoint]) {}

    fn draw_text(&self, _label: &str, _anchor: &MeasurePoint) {}
}

pub(crate) static NOOP_DRAW: NoopDraw = NoopDraw;

/// Emits every drawing call as a `tracing` event on the `measureline::draw` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDraw;

impl DebugDraw for TracingDraw {
    fn draw_point(&self, point: &MeasurePoint) {
        debug!(
            target: "measureline::draw",
            x = point.x,
            y = point.y,
            z = ?point.z,
            m = ?point.m,
            "point"
        );
    }

    fn draw_line(&self, points: &[MeasurePoint]) {
        let coordinates: Vec<Vec<f64>> = points.iter().map(MeasurePoint::coordinate_list).collect();
        debug!(target: "measureline::draw", ?coordinates, "line");
    }

    fn draw_text(&self, label: &str, anchor: &MeasurePoint) {
        debug!(
            target: "measureline::draw",
            label,
            x = anchor.x,
            y = anchor.y,
            "text"
        );
    }
}
