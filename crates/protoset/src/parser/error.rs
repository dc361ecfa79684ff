//! Parse failure carrying a raw span.
//!
//! The parser works in byte offsets; the public API resolves the span
//! into a `file:line:column` location once a `SourceMap` is in scope.

use crate::foundation::Span;

/// Grammar mismatch at a specific position. Fail-fast: the first
/// unrecoverable mismatch aborts the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParseError {
    pub span: Span,
    /// What the grammar wanted here.
    pub expected: String,
    /// What the token stream held instead.
    pub found: String,
}

impl RawParseError {
    pub fn new(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
