//! Game drivers built on the engine.

pub mod classic;

pub use classic::{ClassicMatch, ClassicMatchBuilder, MatchConfig, MatchResult};
