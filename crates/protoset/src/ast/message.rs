//! Message, enum and service AST nodes.

use std::fmt;

use crate::foundation::{FullName, Span};

use super::value::OptionDecl;

/// `message Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub entries: Vec<MessageEntry>,
    pub span: Span,
}

/// One entry in a message body.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageEntry {
    Field(Field),
    Map(MapField),
    Group(Group),
    Message(Message),
    Enum(EnumDecl),
    Oneof(Oneof),
    Extend(Extend),
    Reserved(Reserved),
    Extensions(Extensions),
    Option(OptionDecl),
    Empty(Span),
}

/// Field cardinality. `Implicit` is the proto3 "no label" form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Implicit,
    Optional,
    Required,
    Repeated,
}

/// `[cardinality] type name = tag [options];`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub cardinality: Cardinality,
    pub ty: TypeRef,
    pub name: String,
    /// Raw tag as written; range checks happen during lowering.
    pub tag: u64,
    pub options: Vec<OptionDecl>,
    pub span: Span,
}

/// `map<key, value> name = tag [options];`
#[derive(Debug, Clone, PartialEq)]
pub struct MapField {
    pub key: Scalar,
    pub value: TypeRef,
    pub name: String,
    pub tag: u64,
    pub options: Vec<OptionDecl>,
    pub span: Span,
}

/// `[cardinality] group Name = tag { ... }` (proto2)
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub cardinality: Cardinality,
    pub name: String,
    pub tag: u64,
    pub options: Vec<OptionDecl>,
    pub entries: Vec<MessageEntry>,
    pub span: Span,
}

/// A field type: scalar or named reference. Maps are a separate field
/// shape, not a type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Scalar(Scalar),
    Named(Reference),
}

/// A possibly fully-qualified name as written in source.
///
/// `leading_dot` records whether the source spelled a leading `.`,
/// anchoring resolution at the root scope. The distinction is visible
/// in emitted descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub leading_dot: bool,
    pub name: FullName,
    pub span: Span,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_dot {
            write!(f, ".")?;
        }
        write!(f, "{}", self.name)
    }
}

/// The fifteen scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl Scalar {
    /// Map an identifier to a scalar kind, if it names one.
    pub fn from_ident(ident: &str) -> Option<Scalar> {
        Some(match ident {
            "double" => Scalar::Double,
            "float" => Scalar::Float,
            "int32" => Scalar::Int32,
            "int64" => Scalar::Int64,
            "uint32" => Scalar::Uint32,
            "uint64" => Scalar::Uint64,
            "sint32" => Scalar::Sint32,
            "sint64" => Scalar::Sint64,
            "fixed32" => Scalar::Fixed32,
            "fixed64" => Scalar::Fixed64,
            "sfixed32" => Scalar::Sfixed32,
            "sfixed64" => Scalar::Sfixed64,
            "bool" => Scalar::Bool,
            "string" => Scalar::String,
            "bytes" => Scalar::Bytes,
            _ => return None,
        })
    }

    /// Source spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Scalar::Double => "double",
            Scalar::Float => "float",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::Uint32 => "uint32",
            Scalar::Uint64 => "uint64",
            Scalar::Sint32 => "sint32",
            Scalar::Sint64 => "sint64",
            Scalar::Fixed32 => "fixed32",
            Scalar::Fixed64 => "fixed64",
            Scalar::Sfixed32 => "sfixed32",
            Scalar::Sfixed64 => "sfixed64",
            Scalar::Bool => "bool",
            Scalar::String => "string",
            Scalar::Bytes => "bytes",
        }
    }

    /// Map keys must be an integral or string kind.
    pub fn valid_map_key(self) -> bool {
        !matches!(self, Scalar::Double | Scalar::Float | Scalar::Bytes)
    }
}

/// `oneof name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Oneof {
    pub name: String,
    pub entries: Vec<OneofEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OneofEntry {
    /// Member field; carries no cardinality by construction.
    Field(Field),
    Option(OptionDecl),
    Empty(Span),
}

/// `enum Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub entries: Vec<EnumEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumEntry {
    Value(EnumValue),
    Reserved(Reserved),
    Option(OptionDecl),
    Empty(Span),
}

/// `NAME = number [options];`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    /// Sign already applied; the 32-bit check happens during lowering.
    pub number: i64,
    pub options: Vec<OptionDecl>,
    pub span: Span,
}

/// `reserved ranges;` or `reserved "names";`
#[derive(Debug, Clone, PartialEq)]
pub struct Reserved {
    pub list: ReservedList,
    pub span: Span,
}

/// The two mutually exclusive reserved shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservedList {
    Ranges(Vec<TagRange>),
    Names(Vec<String>),
}

/// `start [to end|max]`
#[derive(Debug, Clone, PartialEq)]
pub struct TagRange {
    pub start: u64,
    pub end: Option<u64>,
    pub max: bool,
    pub span: Span,
}

/// `extensions ranges [options];`
#[derive(Debug, Clone, PartialEq)]
pub struct Extensions {
    pub ranges: Vec<TagRange>,
    pub options: Vec<OptionDecl>,
    pub span: Span,
}

/// `extend Extendee { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Extend {
    pub extendee: Reference,
    pub entries: Vec<ExtendEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtendEntry {
    Field(Field),
    Group(Group),
    Empty(Span),
}

/// `service Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub entries: Vec<ServiceEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEntry {
    Method(Method),
    Option(OptionDecl),
    Empty(Span),
}

/// `rpc Name (request) returns (response) { options } | ;`
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub request: Reference,
    pub response: Reference,
    pub streaming_request: bool,
    pub streaming_response: bool,
    pub options: Vec<OptionDecl>,
    pub span: Span,
}
