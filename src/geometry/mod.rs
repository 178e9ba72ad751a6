mod measure_point;
mod measured_polyline;

pub use measure_point::{MeasurePoint, PointLike};
pub use measured_polyline::MeasuredPolyline;
