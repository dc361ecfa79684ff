//! Shared primitives used by every pipeline stage.

pub mod name;
pub mod span;

pub use name::FullName;
pub use span::{Location, SourceFile, SourceMap, Span};
