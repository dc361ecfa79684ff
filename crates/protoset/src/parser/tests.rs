use crate::ast::*;
use crate::lexer;

use super::parse_file;

fn parse(source: &str) -> ProtoFile {
    let tokens = lexer::lex(source, 0).expect("lexing failed");
    parse_file(&tokens, 0, "test.proto").expect("parsing failed")
}

fn parse_err(source: &str) -> super::RawParseError {
    let tokens = lexer::lex(source, 0).expect("lexing failed");
    parse_file(&tokens, 0, "test.proto").expect_err("parsing unexpectedly succeeded")
}

/// Single message entry of the only top-level message.
fn only_entry(file: &ProtoFile) -> &MessageEntry {
    let message = file
        .items
        .iter()
        .find_map(|item| match item {
            FileItem::Message(m) => Some(m),
            _ => None,
        })
        .expect("no message");
    assert_eq!(message.entries.len(), 1);
    &message.entries[0]
}

#[test]
fn test_syntax_package_import() {
    let file = parse("syntax = \"proto3\";\npackage foo.bar;\nimport \"dep.proto\";");
    assert_eq!(file.syntax(), Some("proto3"));
    assert_eq!(file.package().unwrap().to_string(), "foo.bar");
    let imports: Vec<_> = file.imports().collect();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].path, "dep.proto");
    assert!(!imports[0].public);
    assert!(!imports[0].weak);
}

#[test]
fn test_import_modifiers() {
    let file = parse("import public \"a.proto\"; import weak 'b.proto';");
    let imports: Vec<_> = file.imports().collect();
    assert!(imports[0].public);
    assert!(imports[1].weak);
}

#[test]
fn test_import_of_file_named_public() {
    // `public` without a following string stays an import path.
    let err = parse_err("import public;");
    assert_eq!(err.expected, "string literal");
    let file = parse("import \"public\";");
    assert_eq!(file.imports().next().unwrap().path, "public");
}

#[test]
fn test_field_cardinalities() {
    let file = parse(
        "message M {\n  optional int32 a = 1;\n  required int64 b = 2;\n  repeated string c = 3;\n  bool d = 4;\n}",
    );
    let message = match &file.items[0] {
        FileItem::Message(m) => m,
        other => panic!("unexpected item: {:?}", other),
    };
    let cards: Vec<_> = message
        .entries
        .iter()
        .map(|e| match e {
            MessageEntry::Field(f) => f.cardinality,
            other => panic!("unexpected entry: {:?}", other),
        })
        .collect();
    assert_eq!(
        cards,
        [
            Cardinality::Optional,
            Cardinality::Required,
            Cardinality::Repeated,
            Cardinality::Implicit,
        ]
    );
}

#[test]
fn test_field_with_named_type_and_leading_dot() {
    let file = parse("message M { .pkg.Other f = 1; }");
    match only_entry(&file) {
        MessageEntry::Field(f) => match &f.ty {
            TypeRef::Named(reference) => {
                assert!(reference.leading_dot);
                assert_eq!(reference.name.to_string(), "pkg.Other");
            }
            other => panic!("unexpected type: {:?}", other),
        },
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_option_entry_wins_over_field_typed_option() {
    let file = parse("message M { option deprecated = true; }");
    assert!(matches!(only_entry(&file), MessageEntry::Option(_)));
}

#[test]
fn test_field_typed_map_without_angle_bracket() {
    // A named type spelled `map` is a field, not a map field.
    let file = parse("message M { map f = 1; }");
    match only_entry(&file) {
        MessageEntry::Field(f) => match &f.ty {
            TypeRef::Named(reference) => assert_eq!(reference.name.to_string(), "map"),
            other => panic!("unexpected type: {:?}", other),
        },
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_map_field() {
    let file = parse("message M { map<string, int32> m = 7; }");
    match only_entry(&file) {
        MessageEntry::Map(m) => {
            assert_eq!(m.key, Scalar::String);
            assert!(matches!(m.value, TypeRef::Scalar(Scalar::Int32)));
            assert_eq!(m.name, "m");
            assert_eq!(m.tag, 7);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_group() {
    let file = parse("message M { optional group Sub = 1 { int32 x = 2; } }");
    match only_entry(&file) {
        MessageEntry::Group(g) => {
            assert_eq!(g.cardinality, Cardinality::Optional);
            assert_eq!(g.name, "Sub");
            assert_eq!(g.tag, 1);
            assert_eq!(g.entries.len(), 1);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_oneof() {
    let file = parse("message M { oneof choice { string a = 1; int32 b = 2; option x = y; } }");
    match only_entry(&file) {
        MessageEntry::Oneof(oneof) => {
            assert_eq!(oneof.name, "choice");
            let fields = oneof
                .entries
                .iter()
                .filter(|e| matches!(e, OneofEntry::Field(_)))
                .count();
            assert_eq!(fields, 2);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_reserved_ranges_and_names() {
    let file = parse("message M { reserved 2, 15, 9 to 11, 40 to max; reserved \"foo\", \"bar\"; }");
    let message = match &file.items[0] {
        FileItem::Message(m) => m,
        other => panic!("unexpected item: {:?}", other),
    };
    match &message.entries[0] {
        MessageEntry::Reserved(Reserved {
            list: ReservedList::Ranges(ranges),
            ..
        }) => {
            assert_eq!(ranges.len(), 4);
            assert_eq!((ranges[0].start, ranges[0].end, ranges[0].max), (2, None, false));
            assert_eq!((ranges[2].start, ranges[2].end), (9, Some(11)));
            assert!(ranges[3].max);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
    match &message.entries[1] {
        MessageEntry::Reserved(Reserved {
            list: ReservedList::Names(names),
            ..
        }) => assert_eq!(names, &["foo", "bar"]),
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_extensions_with_options() {
    let file = parse("message M { extensions 100 to 199 [declaration = \"x\"]; }");
    match only_entry(&file) {
        MessageEntry::Extensions(ext) => {
            assert_eq!(ext.ranges.len(), 1);
            assert_eq!(ext.options.len(), 1);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_enum_with_negative_value() {
    let file = parse("enum E { UNKNOWN = 0; NEGATIVE = -5; }");
    let decl = match &file.items[0] {
        FileItem::Enum(e) => e,
        other => panic!("unexpected item: {:?}", other),
    };
    match &decl.entries[1] {
        EnumEntry::Value(value) => {
            assert_eq!(value.name, "NEGATIVE");
            assert_eq!(value.number, -5);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_extend_block() {
    let file = parse("extend google.protobuf.FieldOptions { optional string tag = 50000; }");
    match &file.items[0] {
        FileItem::Extend(extend) => {
            assert_eq!(extend.extendee.to_string(), "google.protobuf.FieldOptions");
            assert_eq!(extend.entries.len(), 1);
        }
        other => panic!("unexpected item: {:?}", other),
    }
}

#[test]
fn test_service_with_streaming() {
    let file = parse(
        "service S { rpc A (Req) returns (stream Resp); rpc B (stream Req) returns (Resp) { option x = 1; } }",
    );
    let service = match &file.items[0] {
        FileItem::Service(s) => s,
        other => panic!("unexpected item: {:?}", other),
    };
    let methods: Vec<_> = service
        .entries
        .iter()
        .filter_map(|e| match e {
            ServiceEntry::Method(m) => Some(m),
            _ => None,
        })
        .collect();
    assert!(!methods[0].streaming_request);
    assert!(methods[0].streaming_response);
    assert!(methods[1].streaming_request);
    assert!(!methods[1].streaming_response);
    assert_eq!(methods[1].options.len(), 1);
}

#[test]
fn test_rpc_type_named_stream() {
    let file = parse("service S { rpc A (stream) returns (stream stream); }");
    let method = match &file.items[0] {
        FileItem::Service(s) => match &s.entries[0] {
            ServiceEntry::Method(m) => m.clone(),
            other => panic!("unexpected entry: {:?}", other),
        },
        other => panic!("unexpected item: {:?}", other),
    };
    assert!(!method.streaming_request);
    assert_eq!(method.request.to_string(), "stream");
    assert!(method.streaming_response);
    assert_eq!(method.response.to_string(), "stream");
}

#[test]
fn test_option_name_paths() {
    // The shape protoc's own unittest files exercise.
    let file = parse(
        "message V { option (complex_opt2).bar.(protobuf_unittest.corge).qux = 2008;\n  option (.Complex.complex_opt4).waldo = 1971; }",
    );
    let message = match &file.items[0] {
        FileItem::Message(m) => m,
        other => panic!("unexpected item: {:?}", other),
    };
    let first = match &message.entries[0] {
        MessageEntry::Option(o) => o,
        other => panic!("unexpected entry: {:?}", other),
    };
    assert_eq!(first.name.len(), 4);
    assert!(matches!(
        &first.name[0],
        OptionNamePart::Extension(r) if r.to_string() == "complex_opt2"
    ));
    assert!(matches!(&first.name[1], OptionNamePart::Plain(p) if p == "bar"));
    assert!(matches!(
        &first.name[2],
        OptionNamePart::Extension(r) if r.to_string() == "protobuf_unittest.corge"
    ));
    assert!(matches!(&first.name[3], OptionNamePart::Plain(p) if p == "qux"));

    let second = match &message.entries[1] {
        MessageEntry::Option(o) => o,
        other => panic!("unexpected entry: {:?}", other),
    };
    assert!(matches!(
        &second.name[0],
        OptionNamePart::Extension(r) if r.leading_dot && r.to_string() == ".Complex.complex_opt4"
    ));
}

#[test]
fn test_string_value_concatenation() {
    let file = parse("option (strings) = \"1\" \"2\";");
    let decl = match &file.items[0] {
        FileItem::Option(o) => o,
        other => panic!("unexpected item: {:?}", other),
    };
    assert_eq!(decl.value.kind, ValueKind::Str(b"12".to_vec()));
}

#[test]
fn test_number_values_keep_sign_and_magnitude() {
    let file = parse("option big = 18446744073709551615; option small = -9223372036854775808;");
    let values: Vec<_> = file
        .items
        .iter()
        .filter_map(|item| match item {
            FileItem::Option(o) => Some(&o.value.kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        values[0],
        &ValueKind::Int {
            negative: false,
            magnitude: u64::MAX
        }
    );
    assert_eq!(
        values[1],
        &ValueKind::Int {
            negative: true,
            magnitude: 9_223_372_036_854_775_808
        }
    );
}

#[test]
fn test_text_message_option_value() {
    let file = parse(
        "option (http) = { get: \"/v1/things\" additional_bindings { post: \"/v1/things\" body: \"*\" } };",
    );
    let decl = match &file.items[0] {
        FileItem::Option(o) => o,
        other => panic!("unexpected item: {:?}", other),
    };
    let message = match &decl.value.kind {
        ValueKind::Message(m) => m,
        other => panic!("unexpected value: {:?}", other),
    };
    assert_eq!(message.fields.len(), 2);
    assert_eq!(message.fields[0].name.to_string(), "get");
    match &message.fields[1].value.kind {
        ValueKind::Message(nested) => assert_eq!(nested.fields.len(), 2),
        other => panic!("unexpected nested value: {:?}", other),
    }
}

#[test]
fn test_text_message_bracketed_name() {
    let file = parse("option (any) = { [type.googleapis.com/pkg.Msg] { x: 1 } };");
    let decl = match &file.items[0] {
        FileItem::Option(o) => o,
        other => panic!("unexpected item: {:?}", other),
    };
    let message = match &decl.value.kind {
        ValueKind::Message(m) => m,
        other => panic!("unexpected value: {:?}", other),
    };
    assert_eq!(
        message.fields[0].name,
        TextFieldName::Extension("type.googleapis.com/pkg.Msg".to_string())
    );
}

#[test]
fn test_array_value() {
    let file = parse("option (list) = [1, 2 3];");
    let decl = match &file.items[0] {
        FileItem::Option(o) => o,
        other => panic!("unexpected item: {:?}", other),
    };
    match &decl.value.kind {
        ValueKind::Array(elements) => assert_eq!(elements.len(), 3),
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn test_field_options() {
    let file = parse("message M { int32 f = 1 [deprecated = true, (custom) = \"x\"]; }");
    match only_entry(&file) {
        MessageEntry::Field(f) => assert_eq!(f.options.len(), 2),
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn test_empty_statements_everywhere() {
    let file = parse(";; message M { ; int32 f = 1; ; } ;");
    assert!(file.items.iter().any(|i| matches!(i, FileItem::Empty(_))));
}

#[test]
fn test_keywords_as_field_names() {
    let file = parse("message M { int32 max = 1; string to = 2; bool stream = 3; }");
    let message = match &file.items[0] {
        FileItem::Message(m) => m,
        other => panic!("unexpected item: {:?}", other),
    };
    let names: Vec<_> = message
        .entries
        .iter()
        .map(|e| match e {
            MessageEntry::Field(f) => f.name.as_str(),
            other => panic!("unexpected entry: {:?}", other),
        })
        .collect();
    assert_eq!(names, ["max", "to", "stream"]);
}

#[test]
fn test_error_position_and_expectation() {
    let err = parse_err("message M { int32 = 1; }");
    assert_eq!(err.expected, "identifier");
    assert_eq!(err.found, "'='");
}

#[test]
fn test_error_on_unclosed_message() {
    let err = parse_err("message M { int32 f = 1;");
    assert!(err.found.contains("end of file"));
}
