//! Source location tracking for diagnostics.
//!
//! Every AST node carries a [`Span`]: a compact byte range into one of
//! the files registered in a [`SourceMap`]. Line and column numbers are
//! recovered on demand by binary search over precomputed line starts,
//! so spans stay cheap to copy while diagnostics stay precise.

use std::fmt;
use std::path::{Path, PathBuf};

/// Compact byte range in a registered source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Index into [`SourceMap`] files.
    pub file_id: u16,
    /// Byte offset of the start position.
    pub start: u32,
    /// Byte offset of the end position (exclusive).
    pub end: u32,
}

impl Span {
    pub fn new(file_id: u16, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    /// Zero-length span at the start of a file.
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0)
    }

    /// Span covering both `self` and `other`.
    ///
    /// Panics if the spans come from different files.
    pub fn merge(&self, other: &Span) -> Span {
        assert_eq!(
            self.file_id, other.file_id,
            "cannot merge spans from different files"
        );
        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Resolved source position, ready for display.
///
/// Renders as `file:line:column`, the form all pipeline errors use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// All source files of one compilation, addressable by span.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// A single source file with a line-start index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Logical name of the file (the import path, not a filesystem path).
    pub name: PathBuf,
    /// Full source text.
    pub source: String,
    /// Byte offsets of line starts; always begins with 0 and ends with
    /// an EOF sentinel.
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Register a source file and return its id.
    pub fn add_file(&mut self, name: PathBuf, source: String) -> u16 {
        let file_id = self.files.len();
        assert!(file_id < u16::MAX as usize, "too many source files");
        self.files.push(SourceFile::new(name, source));
        file_id as u16
    }

    pub fn file(&self, span: &Span) -> &SourceFile {
        &self.files[span.file_id as usize]
    }

    pub fn file_name(&self, span: &Span) -> &Path {
        &self.files[span.file_id as usize].name
    }

    /// Source text covered by a span.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = self.file(span);
        &file.source[span.start as usize..span.end as usize]
    }

    /// Resolve a span's start into a displayable location.
    pub fn locate(&self, span: &Span) -> Location {
        let file = self.file(span);
        let (line, column) = file.line_col(span.start);
        Location::new(file.name.display().to_string(), line, column)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceFile {
    pub fn new(name: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            name,
            source,
            line_starts,
        }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.max(1) - 1,
        };
        let line = (line_idx + 1) as u32;
        let column = offset - self.line_starts[line_idx] + 1;
        (line, column)
    }
}

fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut line_starts = vec![0];
    for (idx, ch) in source.char_indices() {
        if ch == '\n' {
            line_starts.push((idx + 1) as u32);
        }
    }
    if line_starts.last() != Some(&(source.len() as u32)) {
        line_starts.push(source.len() as u32);
    }
    line_starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let file = SourceFile::new(PathBuf::from("a.proto"), "syntax\n= \"proto3\";\n".into());
        assert_eq!(file.line_col(0), (1, 1));
        assert_eq!(file.line_col(6), (1, 7));
        assert_eq!(file.line_col(7), (2, 1));
        assert_eq!(file.line_col(9), (2, 3));
    }

    #[test]
    fn test_locate_and_snippet() {
        let mut map = SourceMap::new();
        let id = map.add_file(PathBuf::from("m.proto"), "message M {}".into());
        let span = Span::new(id, 8, 9);
        assert_eq!(map.snippet(&span), "M");
        let loc = map.locate(&span);
        assert_eq!(loc.to_string(), "m.proto:1:9");
    }

    #[test]
    fn test_merge() {
        let a = Span::new(0, 4, 7);
        let b = Span::new(0, 10, 12);
        assert_eq!(a.merge(&b), Span::new(0, 4, 12));
    }

    #[test]
    #[should_panic(expected = "different files")]
    fn test_merge_rejects_cross_file() {
        let _ = Span::new(0, 0, 1).merge(&Span::new(1, 0, 1));
    }
}
