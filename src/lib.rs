pub mod debug;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{MeasureLineError, Result};
pub use geometry::{MeasurePoint, MeasuredPolyline, PointLike};
pub use math::azimuth::SideOfLine;
