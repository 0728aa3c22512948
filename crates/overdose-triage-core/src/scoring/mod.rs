//! Drug and context scoring.

mod context;
mod drug;
mod profile;

pub use context::*;
pub use drug::*;
pub use profile::*;
