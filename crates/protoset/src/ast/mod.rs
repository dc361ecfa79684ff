//! Abstract syntax tree for parsed protobuf schema files.
//!
//! Nodes are plain data: the parser builds them, the lowerer walks them
//! read-only. Every node carries a [`Span`](crate::foundation::Span)
//! back into the source for diagnostics. Variant-heavy shapes (file
//! items, message entries, option values) are enums so lowering gets
//! exhaustive case analysis.

mod file;
mod message;
mod value;

pub use file::{FileItem, Import, PackageDecl, ProtoFile, SyntaxDecl};
pub use message::{
    Cardinality, EnumDecl, EnumEntry, EnumValue, Extend, ExtendEntry, Extensions, Field, Group,
    MapField, Message, MessageEntry, Method, Oneof, OneofEntry, Reference, Reserved, ReservedList,
    Scalar, Service, ServiceEntry, TagRange, TypeRef,
};
pub use value::{OptionDecl, OptionNamePart, TextField, TextFieldName, TextMessage, Value, ValueKind};
