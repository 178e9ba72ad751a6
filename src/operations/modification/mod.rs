mod cut;
mod cut_profile;

pub use cut::{Cut, CutResult, CutStatus};
pub use cut_profile::{CutProfile, ProfileResult, ProfileStatus};
