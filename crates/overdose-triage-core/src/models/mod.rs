//! Domain models for the overdose triage engine.

mod catalog;
mod combo;
mod context;
mod triage;

pub use catalog::*;
pub use combo::*;
pub use context::*;
pub use triage::*;
