//! Frontend analysis pipeline
//!
//! This module contains the AST arena, the type annotation model, and
//! the type inference engine. The frontend takes a constructed module
//! and produces an immutable map from AST nodes to concrete types, or
//! the first type error encountered.

use tracing::debug;

use crate::frontend::ast::Module;
use crate::frontend::typecheck::{ErrorFormatter, TypeError, TypeInfo};
use crate::util::options::CheckOptions;
use crate::util::span::{FileId, FileTable};

pub mod ast;
pub mod type_system;
pub mod typecheck;

/// Analysis context
///
/// Owns the file table shared by every module checked through it, so
/// spans from different modules render against one set of paths.
#[derive(Debug, Default)]
pub struct Analyzer {
    /// Interned file paths
    files: FileTable,
}

impl Analyzer {
    /// Create a new analyzer
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a file path for span bookkeeping
    pub fn add_file(&mut self, path: &str) -> FileId {
        self.files.intern(path)
    }

    /// The file table backing this analyzer
    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Run type inference over a module
    pub fn check(
        &self,
        module: &mut Module,
    ) -> Result<TypeInfo, TypeError> {
        self.check_with_options(module, &CheckOptions::default())
    }

    /// Run type inference over a module with explicit options
    pub fn check_with_options(
        &self,
        module: &mut Module,
        options: &CheckOptions,
    ) -> Result<TypeInfo, TypeError> {
        debug!(
            "Analyzing module `{}` ({} nodes)",
            module.name(),
            module.node_count()
        );
        let info = typecheck::check_module_with_options(module, &self.files, options)?;
        debug!("Analysis successful: {} typed nodes", info.len());
        Ok(info)
    }

    /// Render an error with source locations resolved
    pub fn format_error(
        &self,
        error: &TypeError,
    ) -> String {
        ErrorFormatter::new(&self.files, true).format_error(error)
    }
}
