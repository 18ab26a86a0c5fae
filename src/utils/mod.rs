//! Utility modules

pub mod fuzzy;

pub use fuzzy::{FuzzyMatch, FuzzyMatcher, MatchConfig, MatchKey};
