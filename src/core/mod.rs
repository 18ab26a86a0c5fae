//! Core processing modules
//!
//! Query normalization shared by the request parser and the processor.

pub mod text_normalizer;

pub use text_normalizer::TextNormalizer;
