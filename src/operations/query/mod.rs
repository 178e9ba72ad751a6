mod project;

pub use project::{FunctionalDirection, Project, ProjectionParams, ProjectionResult};
