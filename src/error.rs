use thiserror::Error;

/// Top-level error type for measured polyline operations.
#[derive(Debug, Error)]
pub enum MeasureLineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while constructing a measured polyline.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("a measured polyline needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("coordinate {index} has {arity} components, which is invalid with m_given = {m_given}")]
    InvalidArity {
        index: usize,
        arity: usize,
        m_given: bool,
    },

    #[error("coordinate {index} has {found} components, expected {expected}")]
    InconsistentArity {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("point {index} carries no measure while measures are given")]
    MissingMeasure { index: usize },

    #[error("measure decreases at point {index}: {current} < {previous}")]
    DecreasingMeasure {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// Errors related to operations on an existing polyline.
#[derive(Debug, Error, PartialEq)]
pub enum OperationError {
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Convenience type alias for results using [`MeasureLineError`].
pub type Result<T> = std::result::Result<T, MeasureLineError>;
