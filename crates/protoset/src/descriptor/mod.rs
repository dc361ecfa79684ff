//! Canonical descriptor model.
//!
//! These types mirror the subset of `descriptor.proto` the lowerer
//! produces: `FileDescriptorSet` down through fields, enums, services
//! and uninterpreted options. Two projections exist:
//!
//! - binary: [`FileDescriptorSet::encode`] writes the exact
//!   `descriptor.proto` wire format (see `wire`/`encode`);
//! - JSON: serde serialisation follows protojson conventions —
//!   lowerCamel keys, enum value names, 64-bit integers as strings,
//!   bytes as base64, unset fields omitted.
//!
//! Option semantics are deliberately deferred: every option a schema
//! declares is captured structurally as an [`UninterpretedOption`].

mod encode;
pub mod wire;

use serde::{Deserialize, Serialize};

/// A set of lowered files; the root of both projections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDescriptorSet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file: Vec<FileDescriptorProto>,
}

/// One lowered `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependency: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub public_dependency: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weak_dependency: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_type: Vec<DescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<ServiceDescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<FieldDescriptorProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FileOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
}

/// A message type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field: Vec<FieldDescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested_type: Vec<DescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension_range: Vec<ExtensionRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<FieldDescriptorProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MessageOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved_range: Vec<ReservedRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved_name: Vec<String>,
}

/// `extensions N to M` on a message; `end` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ExtensionRangeOptions>,
}

/// `reserved N to M` on a message; `end` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservedRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

/// A single field, extension or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<FieldLabel>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extendee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oneof_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proto3_optional: Option<bool>,
}

/// Field cardinality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLabel {
    #[serde(rename = "LABEL_OPTIONAL")]
    Optional,
    #[serde(rename = "LABEL_REQUIRED")]
    Required,
    #[serde(rename = "LABEL_REPEATED")]
    Repeated,
}

impl FieldLabel {
    /// Wire enum number.
    pub fn number(self) -> u64 {
        match self {
            FieldLabel::Optional => 1,
            FieldLabel::Required => 2,
            FieldLabel::Repeated => 3,
        }
    }
}

/// Field wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "TYPE_DOUBLE")]
    Double,
    #[serde(rename = "TYPE_FLOAT")]
    Float,
    #[serde(rename = "TYPE_INT64")]
    Int64,
    #[serde(rename = "TYPE_UINT64")]
    Uint64,
    #[serde(rename = "TYPE_INT32")]
    Int32,
    #[serde(rename = "TYPE_FIXED64")]
    Fixed64,
    #[serde(rename = "TYPE_FIXED32")]
    Fixed32,
    #[serde(rename = "TYPE_BOOL")]
    Bool,
    #[serde(rename = "TYPE_STRING")]
    String,
    #[serde(rename = "TYPE_GROUP")]
    Group,
    #[serde(rename = "TYPE_MESSAGE")]
    Message,
    #[serde(rename = "TYPE_BYTES")]
    Bytes,
    #[serde(rename = "TYPE_UINT32")]
    Uint32,
    #[serde(rename = "TYPE_ENUM")]
    Enum,
    #[serde(rename = "TYPE_SFIXED32")]
    Sfixed32,
    #[serde(rename = "TYPE_SFIXED64")]
    Sfixed64,
    #[serde(rename = "TYPE_SINT32")]
    Sint32,
    #[serde(rename = "TYPE_SINT64")]
    Sint64,
}

impl FieldType {
    /// Wire enum number, as declared in descriptor.proto.
    pub fn number(self) -> u64 {
        match self {
            FieldType::Double => 1,
            FieldType::Float => 2,
            FieldType::Int64 => 3,
            FieldType::Uint64 => 4,
            FieldType::Int32 => 5,
            FieldType::Fixed64 => 6,
            FieldType::Fixed32 => 7,
            FieldType::Bool => 8,
            FieldType::String => 9,
            FieldType::Group => 10,
            FieldType::Message => 11,
            FieldType::Bytes => 12,
            FieldType::Uint32 => 13,
            FieldType::Enum => 14,
            FieldType::Sfixed32 => 15,
            FieldType::Sfixed64 => 16,
            FieldType::Sint32 => 17,
            FieldType::Sint64 => 18,
        }
    }
}

/// One member of a `oneof`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneofDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OneofOptions>,
}

/// An enum type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<EnumValueDescriptorProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<EnumOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved_range: Vec<EnumReservedRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved_name: Vec<String>,
}

/// `reserved N to M` on an enum; bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumReservedRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

/// One enum value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumValueDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<EnumValueOptions>,
}

/// A service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method: Vec<MethodDescriptorProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ServiceOptions>,
}

/// One rpc method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MethodDescriptorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MethodOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_streaming: Option<bool>,
}

macro_rules! options_message {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            #[serde(skip_serializing_if = "Vec::is_empty")]
            pub uninterpreted_option: Vec<UninterpretedOption>,
        }

        impl $name {
            /// None when there is nothing to carry, so empty options
            /// messages never appear in the output.
            pub fn from_uninterpreted(
                uninterpreted_option: Vec<UninterpretedOption>,
            ) -> Option<Self> {
                if uninterpreted_option.is_empty() {
                    None
                } else {
                    Some(Self {
                        uninterpreted_option,
                    })
                }
            }
        }
    };
}

options_message!(
    /// Options on a file.
    FileOptions
);
options_message!(
    /// Options on a field.
    FieldOptions
);
options_message!(
    /// Options on a oneof.
    OneofOptions
);
options_message!(
    /// Options on an enum.
    EnumOptions
);
options_message!(
    /// Options on an enum value.
    EnumValueOptions
);
options_message!(
    /// Options on a service.
    ServiceOptions
);
options_message!(
    /// Options on a method.
    MethodOptions
);
options_message!(
    /// Options on an extension range.
    ExtensionRangeOptions
);

/// Options on a message; `map_entry` marks synthesized map entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_entry: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uninterpreted_option: Vec<UninterpretedOption>,
}

impl MessageOptions {
    pub fn from_uninterpreted(uninterpreted_option: Vec<UninterpretedOption>) -> Option<Self> {
        if uninterpreted_option.is_empty() {
            None
        } else {
            Some(Self {
                map_entry: None,
                uninterpreted_option,
            })
        }
    }
}

/// An option captured structurally, semantics deferred to consumers.
///
/// Exactly one of the value fields is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UninterpretedOption {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<NamePart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_value: Option<String>,
    #[serde(
        with = "string_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub positive_int_value: Option<u64>,
    #[serde(
        with = "string_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub negative_int_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(
        with = "base64_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub string_value: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_value: Option<String>,
}

/// One dotted segment of an option name; `is_extension` marks the
/// parenthesised form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamePart {
    pub name_part: String,
    pub is_extension: bool,
}

impl NamePart {
    pub fn new(name_part: impl Into<String>, is_extension: bool) -> Self {
        Self {
            name_part: name_part.into(),
            is_extension,
        }
    }
}

impl FileDescriptorSet {
    /// JSON projection, protojson conventions, multiline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// protojson renders 64-bit integers as JSON strings.
mod string_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => ser.serialize_str(&n.to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
        let text: Option<String> = Option::deserialize(de)?;
        match text {
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

mod string_i64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<i64>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => ser.serialize_str(&n.to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        let text: Option<String> = Option::deserialize(de)?;
        match text {
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// protojson renders bytes fields as standard base64.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => {
                ser.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(de)?;
        match text {
            Some(s) => base64::engine::general_purpose::STANDARD
                .decode(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_omits_unset_fields() {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("a.proto".into()),
                ..Default::default()
            }],
        };
        let json = set.to_json().unwrap();
        assert!(json.contains("\"a.proto\""));
        assert!(!json.contains("package"));
        assert!(!json.contains("dependency"));
    }

    #[test]
    fn test_json_enum_names() {
        let field = FieldDescriptorProto {
            label: Some(FieldLabel::Optional),
            r#type: Some(FieldType::String),
            ..Default::default()
        };
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains("\"LABEL_OPTIONAL\""));
        assert!(json.contains("\"type\":\"TYPE_STRING\""));
    }

    #[test]
    fn test_json_int64_as_string_and_bytes_as_base64() {
        let opt = UninterpretedOption {
            positive_int_value: Some(u64::MAX),
            string_value: Some(b"ab".to_vec()),
            ..Default::default()
        };
        let json = serde_json::to_string(&opt).unwrap();
        assert!(json.contains("\"18446744073709551615\""));
        assert!(json.contains("\"YWI=\""));
    }

    #[test]
    fn test_json_roundtrip() {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("r.proto".into()),
                syntax: Some("proto3".into()),
                message_type: vec![DescriptorProto {
                    name: Some("M".into()),
                    field: vec![FieldDescriptorProto {
                        name: Some("f".into()),
                        number: Some(1),
                        label: Some(FieldLabel::Optional),
                        r#type: Some(FieldType::String),
                        json_name: Some("f".into()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        let json = set.to_json().unwrap();
        let back: FileDescriptorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }
}
