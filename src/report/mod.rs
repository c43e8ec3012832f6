//! Report assembly and output.

pub mod generator;
pub mod insights;
pub mod presenter;

pub use generator::*;
pub use presenter::*;
