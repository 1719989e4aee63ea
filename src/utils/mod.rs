// Utility functions

pub mod logger;
pub mod mask;

pub use logger::*;
pub use mask::*;
