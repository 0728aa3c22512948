//! Substance extraction from free text.
//!
//! Pipeline: Tokenize → Longest-phrase match → Unknown spans → Suggestions

mod matcher;
mod normalizer;
mod suggestion;

pub use matcher::*;
pub use normalizer::*;
pub use suggestion::*;
