use std::fmt;

use tracing::debug;

use super::Cut;
use crate::geometry::MeasuredPolyline;

/// How a measure range relates to the polyline's measure range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileStatus {
    Valid,
    /// Empty or reversed range.
    Invalid,
    /// Only the lower bound lies outside the line's measure range.
    Undershoot,
    /// Only the upper bound lies outside the line's measure range.
    Overshoot,
    /// Both bounds lie outside the line's measure range.
    UndershootAndOvershoot,
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Undershoot => "Undershoot",
            Self::Overshoot => "Overshoot",
            Self::UndershootAndOvershoot => "UndershootAndOvershoot",
        };
        f.write_str(label)
    }
}

/// A profile extracted from a polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileResult {
    pub status: ProfileStatus,
    /// The extracted part, clamped to the line; `None` when `Invalid` or when
    /// the range does not overlap the line.
    pub result: Option<MeasuredPolyline>,
}

/// Extracts the part of a polyline between two measures.
pub struct CutProfile {
    from_measure: f64,
    to_measure: f64,
}

impl CutProfile {
    /// Creates a new `CutProfile` for the range `from_measure..to_measure`.
    #[must_use]
    pub fn new(from_measure: f64, to_measure: f64) -> Self {
        Self {
            from_measure,
            to_measure,
        }
    }

    /// Executes the extraction.
    ///
    /// Out-of-range bounds are clamped to the line ends and reported through
    /// the status. Only an empty or reversed range is `Invalid`.
    #[must_use]
    pub fn execute(&self, line: &MeasuredPolyline) -> ProfileResult {
        let status = self.status(line);
        debug!(
            from = self.from_measure,
            to = self.to_measure,
            %status,
            "cut profile"
        );

        if status == ProfileStatus::Invalid {
            return ProfileResult {
                status,
                result: None,
            };
        }

        let result = Cut::new(self.from_measure)
            .execute(line)
            .post_cut
            .and_then(|pre| Cut::new(self.to_measure).execute(&pre).result);

        ProfileResult { status, result }
    }

    fn status(&self, line: &MeasuredPolyline) -> ProfileStatus {
        let (from, to) = (self.from_measure, self.to_measure);
        let (start, end) = (line.start_measure(), line.end_measure());

        if from >= to {
            return ProfileStatus::Invalid;
        }

        let outside = |measure: f64| measure < start || measure > end;
        match (outside(from), outside(to)) {
            (true, true) => ProfileStatus::UndershootAndOvershoot,
            (true, false) => ProfileStatus::Undershoot,
            (false, true) => ProfileStatus::Overshoot,
            (false, false) => ProfileStatus::Valid,
        }
    }
}
