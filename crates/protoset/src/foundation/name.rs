//! Dotted identifiers: packages and type references.
//!
//! Protobuf names out of the grammar come in two shapes: a plain dotted
//! identifier (`pkg.sub`) and a reference that may carry a leading dot
//! marking it as rooted at the global scope (`.pkg.Msg`). [`FullName`]
//! stores the segments; the leading-dot flag lives on the AST reference
//! node, because it is a property of how the source spelled the name,
//! not of the name itself.

use std::fmt;

/// A dotted identifier split into its segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullName {
    segments: Vec<String>,
}

impl FullName {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse from a dot-separated string. A leading dot is not
    /// tolerated here; strip it and record the flag separately.
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Leaf segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// New name with one more segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FullName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = FullName::parse("pkg.sub.Msg");
        assert_eq!(name.segments(), &["pkg", "sub", "Msg"]);
        assert_eq!(name.to_string(), "pkg.sub.Msg");
        assert_eq!(name.last(), Some("Msg"));
    }

    #[test]
    fn test_child() {
        let name = FullName::parse("pkg").child("Msg");
        assert_eq!(name.to_string(), "pkg.Msg");
    }
}
