//! Dataset loading and cleaning.
//!
//! The loader reads a delimited file into a [`Dataset`](crate::models::Dataset);
//! the normalizer then canonicalizes the fat-content labels.

pub mod loader;
pub mod normalizer;

pub use loader::*;
pub use normalizer::*;
