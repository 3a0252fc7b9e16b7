//! Source location tracking

use std::fmt;

/// Interned source file handle
///
/// `FileId(0)` is reserved for synthesized locations (builder-made nodes,
/// internally generated count literals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u32);

impl FileId {
    /// The synthetic "no file" id
    pub const NONE: FileId = FileId(0);
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Maps `FileId`s to file paths for diagnostic rendering
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    paths: Vec<String>,
}

impl FileTable {
    /// Create a table with the reserved synthetic entry
    pub fn new() -> Self {
        Self {
            paths: vec!["<no-file>".to_string()],
        }
    }

    /// Intern a path, reusing the id if already present
    pub fn intern(&mut self, path: &str) -> FileId {
        if let Some(idx) = self.paths.iter().position(|p| p == path) {
            return FileId(idx as u32);
        }
        self.paths.push(path.to_string());
        FileId((self.paths.len() - 1) as u32)
    }

    /// Get the path for an id
    pub fn path(&self, id: FileId) -> &str {
        self.paths
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("<unknown-file>")
    }
}

/// Source position (line, column, and byte offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start of file
    pub offset: usize,
}

impl Position {
    /// Create a new position
    #[inline]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, offset: 0 }
    }

    /// Create a new position with offset
    #[inline]
    pub fn with_offset(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Create a dummy position
    #[inline]
    pub fn dummy() -> Self {
        Self { line: 0, column: 0, offset: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source span (start position to end position, within one file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Owning file
    pub file: FileId,
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    #[inline]
    pub fn new(file: FileId, start: Position, end: Position) -> Self {
        Self { file, start, end }
    }

    /// Create a dummy span
    #[inline]
    pub fn dummy() -> Self {
        Self {
            file: FileId::NONE,
            start: Position::dummy(),
            end: Position::dummy(),
        }
    }

    /// Check if this is a dummy span
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.start.line == 0
    }

    /// Get the source text length
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Check if span is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Render as `path:line:col-line:col` using the file table
    pub fn display_with(&self, files: &FileTable) -> String {
        format!("{}:{}-{}", files.path(self.file), self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}
