//! Structural capture of options as `UninterpretedOption` entries.
//!
//! Option semantics are a consumer concern; lowering records the name
//! path (with extension markers and leading dots preserved) and
//! exactly one typed value. Message-literal values are re-rendered to
//! protobuf text and stored as `aggregate_value`.

use crate::ast::{OptionDecl, OptionNamePart, TextMessage, Value, ValueKind};
use crate::descriptor::{NamePart, UninterpretedOption};
use crate::error::LowerError;

/// Lower a batch of option declarations.
pub(super) fn lower_options(
    context: &str,
    decls: &[OptionDecl],
) -> Result<Vec<UninterpretedOption>, LowerError> {
    decls
        .iter()
        .map(|decl| lower_option(context, decl))
        .collect()
}

/// Lower one option declaration.
pub(super) fn lower_option(
    context: &str,
    decl: &OptionDecl,
) -> Result<UninterpretedOption, LowerError> {
    let name = decl
        .name
        .iter()
        .map(|part| match part {
            OptionNamePart::Plain(name) => NamePart::new(name.clone(), false),
            // The leading dot of a rooted extension is observable in
            // the descriptor; Display preserves it.
            OptionNamePart::Extension(reference) => {
                NamePart::new(reference.to_string(), true)
            }
        })
        .collect();

    let mut option = UninterpretedOption {
        name,
        ..Default::default()
    };

    match &decl.value.kind {
        ValueKind::Str(bytes) => option.string_value = Some(bytes.clone()),
        ValueKind::Int {
            negative: false,
            magnitude,
        } => option.positive_int_value = Some(*magnitude),
        ValueKind::Int {
            negative: true,
            magnitude,
        } => {
            if *magnitude > i64::MAX as u64 + 1 {
                return Err(LowerError::UnsupportedConstruct {
                    context: format!(
                        "{}: negative option value -{} exceeds the 64-bit range",
                        context, magnitude
                    ),
                });
            }
            option.negative_int_value = Some((*magnitude as i128).wrapping_neg() as i64);
        }
        ValueKind::Float(value) => option.double_value = Some(*value),
        ValueKind::Bool(value) => {
            option.identifier_value = Some(if *value { "true" } else { "false" }.to_string())
        }
        ValueKind::Ident(reference) => option.identifier_value = Some(reference.to_string()),
        ValueKind::Message(message) => {
            let mut text = String::new();
            write_text_message(&mut text, message);
            option.aggregate_value = Some(text);
        }
        ValueKind::Array(_) => {
            return Err(LowerError::UnsupportedConstruct {
                context: format!("{}: array as a top-level option value", context),
            });
        }
    }
    Ok(option)
}

/// Render a text literal back to protobuf text format.
fn write_text_message(out: &mut String, message: &TextMessage) {
    for (i, field) in message.fields.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&field.name.to_string());
        match &field.value.kind {
            ValueKind::Message(nested) => {
                out.push_str(" { ");
                write_text_message(out, nested);
                out.push_str(" }");
            }
            _ => {
                out.push_str(": ");
                write_text_value(out, &field.value);
            }
        }
    }
}

fn write_text_value(out: &mut String, value: &Value) {
    match &value.kind {
        ValueKind::Str(bytes) => {
            out.push('"');
            for &b in bytes {
                match b {
                    b'"' => out.push_str("\\\""),
                    b'\\' => out.push_str("\\\\"),
                    b'\n' => out.push_str("\\n"),
                    b'\r' => out.push_str("\\r"),
                    b'\t' => out.push_str("\\t"),
                    0x20..=0x7e => out.push(b as char),
                    _ => out.push_str(&format!("\\{:03o}", b)),
                }
            }
            out.push('"');
        }
        ValueKind::Int {
            negative,
            magnitude,
        } => {
            if *negative {
                out.push('-');
            }
            out.push_str(&magnitude.to_string());
        }
        ValueKind::Float(x) => out.push_str(&x.to_string()),
        ValueKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ValueKind::Ident(reference) => out.push_str(&reference.to_string()),
        ValueKind::Message(nested) => {
            out.push_str("{ ");
            write_text_message(out, nested);
            out.push_str(" }");
        }
        ValueKind::Array(elements) => {
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_text_value(out, element);
            }
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{FullName, Span};

    fn value(kind: ValueKind) -> Value {
        Value {
            kind,
            span: Span::zero(0),
        }
    }

    fn plain_option(name: &str, kind: ValueKind) -> OptionDecl {
        OptionDecl {
            name: vec![OptionNamePart::Plain(name.to_string())],
            value: value(kind),
            span: Span::zero(0),
        }
    }

    #[test]
    fn test_string_value() {
        let opt = lower_option("t", &plain_option("java_package", ValueKind::Str(b"x.y".to_vec())))
            .unwrap();
        assert_eq!(opt.string_value.as_deref(), Some(&b"x.y"[..]));
        assert_eq!(opt.name, vec![NamePart::new("java_package", false)]);
    }

    #[test]
    fn test_bool_becomes_identifier() {
        let opt = lower_option("t", &plain_option("deprecated", ValueKind::Bool(true))).unwrap();
        assert_eq!(opt.identifier_value.as_deref(), Some("true"));
    }

    #[test]
    fn test_negative_int() {
        let opt = lower_option(
            "t",
            &plain_option(
                "x",
                ValueKind::Int {
                    negative: true,
                    magnitude: 7,
                },
            ),
        )
        .unwrap();
        assert_eq!(opt.negative_int_value, Some(-7));
        assert_eq!(opt.positive_int_value, None);
    }

    #[test]
    fn test_large_positive_int_survives() {
        let opt = lower_option(
            "t",
            &plain_option(
                "x",
                ValueKind::Int {
                    negative: false,
                    magnitude: u64::MAX,
                },
            ),
        )
        .unwrap();
        assert_eq!(opt.positive_int_value, Some(u64::MAX));
    }

    #[test]
    fn test_extension_name_keeps_leading_dot() {
        let decl = OptionDecl {
            name: vec![OptionNamePart::Extension(crate::ast::Reference {
                leading_dot: true,
                name: FullName::parse("pkg.ext"),
                span: Span::zero(0),
            })],
            value: value(ValueKind::Bool(false)),
            span: Span::zero(0),
        };
        let opt = lower_option("t", &decl).unwrap();
        assert_eq!(opt.name, vec![NamePart::new(".pkg.ext", true)]);
    }
}
