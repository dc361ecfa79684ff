//! Binary encoding of the descriptor model.
//!
//! Fields are written in ascending field-number order within each
//! message, matching the reference serialisation, so output is
//! byte-stable and comparable against other conforming encoders.
//! The field numbers are those of `descriptor.proto`.

use super::wire::*;
use super::*;

impl FileDescriptorSet {
    /// Serialise to `descriptor.proto` wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for file in &self.file {
            put_message_field(&mut buf, 1, &file.encode());
        }
        buf
    }
}

impl FileDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        if let Some(package) = &self.package {
            put_string_field(&mut buf, 2, package);
        }
        for dependency in &self.dependency {
            put_string_field(&mut buf, 3, dependency);
        }
        for message_type in &self.message_type {
            put_message_field(&mut buf, 4, &message_type.encode());
        }
        for enum_type in &self.enum_type {
            put_message_field(&mut buf, 5, &enum_type.encode());
        }
        for service in &self.service {
            put_message_field(&mut buf, 6, &service.encode());
        }
        for extension in &self.extension {
            put_message_field(&mut buf, 7, &extension.encode());
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 8, &options.encode());
        }
        for index in &self.public_dependency {
            put_int_field(&mut buf, 10, *index as i64);
        }
        for index in &self.weak_dependency {
            put_int_field(&mut buf, 11, *index as i64);
        }
        if let Some(syntax) = &self.syntax {
            put_string_field(&mut buf, 12, syntax);
        }
        buf
    }
}

impl DescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        for field in &self.field {
            put_message_field(&mut buf, 2, &field.encode());
        }
        for nested_type in &self.nested_type {
            put_message_field(&mut buf, 3, &nested_type.encode());
        }
        for enum_type in &self.enum_type {
            put_message_field(&mut buf, 4, &enum_type.encode());
        }
        for range in &self.extension_range {
            put_message_field(&mut buf, 5, &range.encode());
        }
        for extension in &self.extension {
            put_message_field(&mut buf, 6, &extension.encode());
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 7, &options.encode());
        }
        for oneof in &self.oneof_decl {
            put_message_field(&mut buf, 8, &oneof.encode());
        }
        for range in &self.reserved_range {
            put_message_field(&mut buf, 9, &range.encode());
        }
        for name in &self.reserved_name {
            put_string_field(&mut buf, 10, name);
        }
        buf
    }
}

impl ExtensionRange {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(start) = self.start {
            put_int_field(&mut buf, 1, start as i64);
        }
        if let Some(end) = self.end {
            put_int_field(&mut buf, 2, end as i64);
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 3, &options.encode());
        }
        buf
    }
}

impl ReservedRange {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(start) = self.start {
            put_int_field(&mut buf, 1, start as i64);
        }
        if let Some(end) = self.end {
            put_int_field(&mut buf, 2, end as i64);
        }
        buf
    }
}

impl FieldDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        if let Some(extendee) = &self.extendee {
            put_string_field(&mut buf, 2, extendee);
        }
        if let Some(number) = self.number {
            put_int_field(&mut buf, 3, number as i64);
        }
        if let Some(label) = self.label {
            put_varint_field(&mut buf, 4, label.number());
        }
        if let Some(ty) = self.r#type {
            put_varint_field(&mut buf, 5, ty.number());
        }
        if let Some(type_name) = &self.type_name {
            put_string_field(&mut buf, 6, type_name);
        }
        if let Some(default_value) = &self.default_value {
            put_string_field(&mut buf, 7, default_value);
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 8, &options.encode());
        }
        if let Some(oneof_index) = self.oneof_index {
            put_int_field(&mut buf, 9, oneof_index as i64);
        }
        if let Some(json_name) = &self.json_name {
            put_string_field(&mut buf, 10, json_name);
        }
        if let Some(proto3_optional) = self.proto3_optional {
            put_bool_field(&mut buf, 17, proto3_optional);
        }
        buf
    }
}

impl OneofDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 2, &options.encode());
        }
        buf
    }
}

impl EnumDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        for value in &self.value {
            put_message_field(&mut buf, 2, &value.encode());
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 3, &options.encode());
        }
        for range in &self.reserved_range {
            put_message_field(&mut buf, 4, &range.encode());
        }
        for name in &self.reserved_name {
            put_string_field(&mut buf, 5, name);
        }
        buf
    }
}

impl EnumReservedRange {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(start) = self.start {
            put_int_field(&mut buf, 1, start as i64);
        }
        if let Some(end) = self.end {
            put_int_field(&mut buf, 2, end as i64);
        }
        buf
    }
}

impl EnumValueDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        if let Some(number) = self.number {
            put_int_field(&mut buf, 2, number as i64);
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 3, &options.encode());
        }
        buf
    }
}

impl ServiceDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        for method in &self.method {
            put_message_field(&mut buf, 2, &method.encode());
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 3, &options.encode());
        }
        buf
    }
}

impl MethodDescriptorProto {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(name) = &self.name {
            put_string_field(&mut buf, 1, name);
        }
        if let Some(input_type) = &self.input_type {
            put_string_field(&mut buf, 2, input_type);
        }
        if let Some(output_type) = &self.output_type {
            put_string_field(&mut buf, 3, output_type);
        }
        if let Some(options) = &self.options {
            put_message_field(&mut buf, 4, &options.encode());
        }
        if let Some(client_streaming) = self.client_streaming {
            put_bool_field(&mut buf, 5, client_streaming);
        }
        if let Some(server_streaming) = self.server_streaming {
            put_bool_field(&mut buf, 6, server_streaming);
        }
        buf
    }
}

impl MessageOptions {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(map_entry) = self.map_entry {
            put_bool_field(&mut buf, 7, map_entry);
        }
        for option in &self.uninterpreted_option {
            put_message_field(&mut buf, 999, &option.encode());
        }
        buf
    }
}

macro_rules! encode_options_message {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                fn encode(&self) -> Vec<u8> {
                    let mut buf = Vec::new();
                    for option in &self.uninterpreted_option {
                        put_message_field(&mut buf, 999, &option.encode());
                    }
                    buf
                }
            }
        )*
    };
}

encode_options_message!(
    FileOptions,
    FieldOptions,
    OneofOptions,
    EnumOptions,
    EnumValueOptions,
    ServiceOptions,
    MethodOptions,
    ExtensionRangeOptions,
);

impl UninterpretedOption {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for part in &self.name {
            put_message_field(&mut buf, 2, &part.encode());
        }
        if let Some(identifier_value) = &self.identifier_value {
            put_string_field(&mut buf, 3, identifier_value);
        }
        if let Some(positive_int_value) = self.positive_int_value {
            put_varint_field(&mut buf, 4, positive_int_value);
        }
        if let Some(negative_int_value) = self.negative_int_value {
            put_int_field(&mut buf, 5, negative_int_value);
        }
        if let Some(double_value) = self.double_value {
            put_double_field(&mut buf, 6, double_value);
        }
        if let Some(string_value) = &self.string_value {
            put_bytes_field(&mut buf, 7, string_value);
        }
        if let Some(aggregate_value) = &self.aggregate_value {
            put_string_field(&mut buf, 8, aggregate_value);
        }
        buf
    }
}

impl NamePart {
    fn encode(&self) -> Vec<u8> {
        // Both fields are `required` in descriptor.proto; always
        // written, even when is_extension is false.
        let mut buf = Vec::new();
        put_string_field(&mut buf, 1, &self.name_part);
        put_bool_field(&mut buf, 2, self.is_extension);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_deterministic() {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("d.proto".into()),
                syntax: Some("proto3".into()),
                ..Default::default()
            }],
        };
        assert_eq!(set.encode(), set.encode());
    }

    #[test]
    fn test_encode_minimal_file() {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("a".into()),
                ..Default::default()
            }],
        };
        // field 1 (file), length 3: field 1 (name), length 1, 'a'
        assert_eq!(set.encode(), vec![0x0a, 0x03, 0x0a, 0x01, b'a']);
    }

    #[test]
    fn test_encode_field_order_is_field_number_order() {
        let field = FieldDescriptorProto {
            name: Some("f".into()),
            number: Some(1),
            json_name: Some("f".into()),
            ..Default::default()
        };
        let bytes = field.encode();
        // name tag (1<<3|2), then number tag (3<<3|0), then json_name
        // tag (10<<3|2).
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(bytes[3], 0x18);
        assert_eq!(bytes[5], 0x52);
    }

    #[test]
    fn test_name_part_always_writes_required_fields() {
        let part = NamePart::new("bar", false);
        let bytes = part.encode();
        assert_eq!(bytes, vec![0x0a, 0x03, b'b', b'a', b'r', 0x10, 0x00]);
    }
}
