//! File-level AST nodes.

use crate::foundation::{FullName, Span};

use super::message::{EnumDecl, Extend, Message, Service};
use super::value::OptionDecl;

/// One parsed `.proto` source file.
///
/// Items are kept in source order, including `syntax` and `package`
/// declarations: the grammar permits repeating them and the lowerer is
/// the stage that rejects duplicates, so the tree must not collapse
/// them early. The accessor methods expose the at-most-one view for
/// callers that only need the happy path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoFile {
    /// Logical name, as the file was imported (advisory for parsing,
    /// load-bearing for descriptor output).
    pub name: String,
    pub items: Vec<FileItem>,
}

impl ProtoFile {
    /// First `syntax` declaration, if any.
    pub fn syntax(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            FileItem::Syntax(s) => Some(s.value.as_str()),
            _ => None,
        })
    }

    /// First `package` declaration, if any.
    pub fn package(&self) -> Option<&FullName> {
        self.items.iter().find_map(|item| match item {
            FileItem::Package(p) => Some(&p.name),
            _ => None,
        })
    }

    /// All imports, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.items.iter().filter_map(|item| match item {
            FileItem::Import(i) => Some(i),
            _ => None,
        })
    }
}

/// One top-level item of a file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileItem {
    Syntax(SyntaxDecl),
    Package(PackageDecl),
    Import(Import),
    Option(OptionDecl),
    Message(Message),
    Enum(EnumDecl),
    Service(Service),
    Extend(Extend),
    /// A stray `;`.
    Empty(Span),
}

/// `syntax = "proto3";`
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxDecl {
    pub value: String,
    pub span: Span,
}

/// `package foo.bar;`
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub name: FullName,
    pub span: Span,
}

/// `import [public|weak] "path";`
///
/// The path is stored verbatim; resolution happens elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub public: bool,
    pub weak: bool,
    pub span: Span,
}
