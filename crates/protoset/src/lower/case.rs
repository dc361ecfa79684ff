//! Name case conversions used by lowering.

/// Derive a field's `json_name`: split on `_`, lowercase the first
/// segment, capitalise the first letter of later segments and
/// lowercase their rest. Deliberately ASCII-simple; it is a pure
/// function of the source name.
pub fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('_').enumerate() {
        if i == 0 {
            out.push_str(&segment.to_lowercase());
        } else {
            out.push_str(&title(&segment.to_lowercase()));
        }
    }
    out
}

/// Map-entry message name for a field: PascalCase of the field name
/// plus `Entry` (`string_map` becomes `StringMapEntry`).
pub fn map_entry_name(field_name: &str) -> String {
    let mut out = String::with_capacity(field_name.len() + 5);
    for segment in field_name.split('_') {
        out.push_str(&title(segment));
    }
    out.push_str("Entry");
    out
}

/// Uppercase the first character, leave the rest alone.
fn title(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
