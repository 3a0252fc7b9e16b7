//! Engine options
//!
//! Knobs for the type-checking entry points. Embedders (driver, language
//! server, tests) construct these directly or deserialize them from a
//! project manifest; the engine itself never reads files.

use serde::{Deserialize, Serialize};

/// Options for a type-checking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Emit naming-convention warnings (constants SCREAMING_SNAKE_CASE,
    /// functions snake_case)
    #[serde(default = "default_true")]
    pub warn_naming: bool,
    /// Dump the populated inference table at TRACE level before resolution
    #[serde(default)]
    pub trace_table: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            warn_naming: true,
            trace_table: false,
        }
    }
}
