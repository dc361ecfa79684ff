//! Error taxonomy for the whole pipeline.
//!
//! One enum per stage, a transparent top-level wrapper, and a shared
//! `file:line:column: message` rendering for everything that has a
//! source position. Lowering errors carry names instead of positions:
//! the lowering API takes bare ASTs with no source map in reach, so
//! context strings like `"test.proto: message M"` do the locating.

use std::path::PathBuf;

use thiserror::Error;

use crate::foundation::Location;
use crate::lexer::LexErrorKind;

/// Top-level error type for the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{location}: {kind}: '{snippet}'")]
pub struct LexError {
    pub location: Location,
    pub kind: LexErrorKind,
    /// The offending source slice.
    pub snippet: String,
}

/// Grammar mismatch at a specific position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{location}: expected {expected}, found {found}")]
pub struct ParseError {
    pub location: Location,
    pub expected: String,
    pub found: String,
}

/// Import resolution failures.
///
/// `NotFound` is non-fatal at the resolver level: it is reported to
/// the diagnostic sink and the traversal continues. It is still a
/// value here so the file loader has something to return.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot find {path:?} on import paths {roots_tried:?}")]
    NotFound {
        path: String,
        roots_tried: Vec<PathBuf>,
    },

    #[error("import path {path:?} must not contain '..' segments")]
    InvalidPath { path: String },

    #[error("i/o error reading {path:?}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Fatal lowering failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LowerError {
    #[error("{file}: found second {what} entry")]
    DuplicateDeclaration { file: String, what: &'static str },

    #[error("{context}: invalid tag {tag}: {reason}")]
    InvalidTag {
        context: String,
        tag: i64,
        reason: String,
    },

    #[error("{context}: map key type '{key}' is not allowed")]
    InvalidMapKey {
        context: String,
        key: &'static str,
    },

    #[error("not implemented: {context}")]
    UnsupportedConstruct { context: String },
}
