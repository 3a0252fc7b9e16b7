//! Utility types and functions

pub mod logger;
pub mod options;
pub mod span;
