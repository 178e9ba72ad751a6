pub mod modification;
pub mod query;

pub use modification::{Cut, CutProfile, CutResult, CutStatus, ProfileResult, ProfileStatus};
pub use query::{FunctionalDirection, Project, ProjectionParams, ProjectionResult};
