//! End-to-end pipeline scenarios: source text in, descriptor set out.

use protoset::descriptor::{FieldLabel, FieldType, NamePart};
use protoset::{compile, parse, to_descriptor_set, SearchPath};

fn compile_single(source: &str) -> protoset::FileDescriptorSet {
    let search = SearchPath::new(Vec::new());
    compile(&search, "test.proto", source, &mut |line| {
        panic!("unexpected diagnostic: {}", line)
    })
    .expect("compile failed")
}

#[test]
fn smoke_single_message() {
    let set = compile_single("syntax = \"proto3\"; message M { string f = 1; }");
    assert_eq!(set.file.len(), 1);
    let fd = &set.file[0];
    assert_eq!(fd.name.as_deref(), Some("test.proto"));
    let message = &fd.message_type[0];
    assert_eq!(message.name.as_deref(), Some("M"));
    let field = &message.field[0];
    assert_eq!(field.name.as_deref(), Some("f"));
    assert_eq!(field.number, Some(1));
    assert_eq!(field.r#type, Some(FieldType::String));
    assert_eq!(field.json_name.as_deref(), Some("f"));
    assert_eq!(field.label, Some(FieldLabel::Optional));
}

#[test]
fn map_field_lowers_to_entry_message() {
    let set = compile_single("message M { map<string, int32> m = 7; }");
    let message = &set.file[0].message_type[0];
    let entry = &message.nested_type[0];
    assert_eq!(entry.name.as_deref(), Some("MEntry"));
    assert_eq!(entry.options.as_ref().unwrap().map_entry, Some(true));
    assert_eq!(entry.field[0].number, Some(1));
    assert_eq!(entry.field[0].r#type, Some(FieldType::String));
    assert_eq!(entry.field[1].number, Some(2));
    assert_eq!(entry.field[1].r#type, Some(FieldType::Int32));
    let field = &message.field[0];
    assert_eq!(field.number, Some(7));
    assert_eq!(field.label, Some(FieldLabel::Repeated));
    assert_eq!(field.r#type, Some(FieldType::Message));
    assert_eq!(field.type_name.as_deref(), Some(".M.MEntry"));
}

#[test]
fn enum_reserved_to_max_hits_i32_ceiling() {
    let set = compile_single("enum E { X = 0; reserved 2 to max; }");
    let decl = &set.file[0].enum_type[0];
    assert_eq!(decl.value.len(), 1);
    assert_eq!(decl.reserved_range[0].start, Some(2));
    assert_eq!(decl.reserved_range[0].end, Some(2_147_483_647));
}

#[test]
fn option_path_with_string_concatenation() {
    let set =
        compile_single("message V { option (complex).bar.(pkg.corge).qux = \"a\" \"b\"; }");
    let options = set.file[0].message_type[0].options.as_ref().unwrap();
    assert_eq!(options.uninterpreted_option.len(), 1);
    let option = &options.uninterpreted_option[0];
    assert_eq!(
        option.name,
        vec![
            NamePart::new("complex", true),
            NamePart::new("bar", false),
            NamePart::new("pkg.corge", true),
            NamePart::new("qux", false),
        ]
    );
    assert_eq!(option.string_value.as_deref(), Some(&b"ab"[..]));
}

#[test]
fn descriptor_bytes_are_deterministic() {
    let source = "syntax = \"proto3\";\npackage demo;\nmessage A { string s = 1; map<int32, A> rec = 2; }\nenum E { Z = 0; }\nservice S { rpc Get (A) returns (A); }";
    let first = compile_single(source).encode();
    let second = compile_single(source).encode();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn parse_twice_is_structurally_identical() {
    let source = "syntax = \"proto3\"; message M { oneof o { string a = 1; } }";
    let first = parse("m.proto", source).unwrap();
    let second = parse("m.proto", source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn lowering_consumes_ast_read_only() {
    let file = parse("m.proto", "message M { int32 a = 1; }").unwrap();
    let before = file.clone();
    let _ = to_descriptor_set(std::slice::from_ref(&file)).unwrap();
    assert_eq!(file, before);
}

#[test]
fn json_projection_uses_protojson_shapes() {
    let set = compile_single(
        "syntax = \"proto3\"; message M { repeated int64 xs = 1; } enum E { Z = 0; }",
    );
    let json = set.to_json().unwrap();
    assert!(json.contains("\"messageType\""));
    assert!(json.contains("\"enumType\""));
    assert!(json.contains("\"jsonName\""));
    assert!(json.contains("\"LABEL_REPEATED\""));
    assert!(json.contains("\"TYPE_INT64\""));
    // Unset fields stay out of the projection entirely.
    assert!(!json.contains("extensionRange"));
    assert!(!json.contains("reservedRange"));
}

#[test]
fn binary_smoke_bytes() {
    // One file, name only: check the exact nesting by hand.
    let set = compile_single("");
    let bytes = set.encode();
    let name = b"test.proto";
    let mut expected = vec![0x0a, (name.len() + 2) as u8, 0x0a, name.len() as u8];
    expected.extend_from_slice(name);
    assert_eq!(bytes, expected);
}

#[test]
fn streaming_flags_reach_the_descriptor() {
    let set = compile_single(
        "package p; service S { rpc A (X) returns (stream Y); rpc B (stream X) returns (Y); }",
    );
    let methods = &set.file[0].service[0].method;
    assert_eq!(methods[0].server_streaming, Some(true));
    assert_eq!(methods[0].client_streaming, None);
    assert_eq!(methods[1].client_streaming, Some(true));
    assert_eq!(methods[0].input_type.as_deref(), Some(".p.X"));
}
