//! XuanJi Hardware Description Language
//!
//! Module-local type inference for a statically typed HDL built around
//! sized integers, booleans, tuples, and fixed-size arrays.
//!
//! # Example
//!
//! ```xuanji
//! const WIDTH: u32 = 4;
//!
//! fn add(x: u32, y: u32) -> u32 {
//!     x + y
//! }
//!
//! const SUM: u32 = add(WIDTH, 5);
//! ```
//!
//! Modules are built programmatically through [`frontend::ast::Module`]
//! builders and checked with [`frontend::Analyzer`]; the result maps
//! every typed node to one concrete type, or reports the first error.
//!
//! # Crate Features
//!
//! - `debug`: Enable extra inference tracing

#![doc(html_root_url = "https://docs.rs/xuanji")]
#![warn(rust_2018_idioms)]
#![allow(dead_code)]

// Public modules
pub mod frontend;

// Utility modules
pub mod util;

// Re-exports
pub use frontend::typecheck::{check_module, check_module_with_options, TypeError, TypeInfo};
pub use frontend::Analyzer;
pub use thiserror::Error;

/// Language version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language name
pub const NAME: &str = "XuanJi (璇玑)";
