//! Field lowering.

use crate::ast::{Cardinality, Field, Reference, Scalar, TypeRef};
use crate::descriptor::{FieldDescriptorProto, FieldLabel, FieldOptions, FieldType};
use crate::error::LowerError;

use super::case;
use super::options::lower_options;
use super::Context;

/// Highest legal field number (2^29 - 1).
pub(super) const MAX_FIELD_NUMBER: u64 = 536_870_911;
/// Range reserved for the protobuf implementation itself.
pub(super) const IMPL_RESERVED: std::ops::RangeInclusive<u64> = 19_000..=19_999;

/// Lower one direct field.
///
/// `oneof_index` is set for fields declared inside a `oneof`;
/// `extendee` for fields inside an `extend` block.
pub(super) fn lower_field(
    ctx: &Context,
    context: &str,
    field: &Field,
    oneof_index: Option<i32>,
    extendee: Option<&Reference>,
) -> Result<FieldDescriptorProto, LowerError> {
    let number = check_tag(context, field.tag)?;

    let label = match field.cardinality {
        Cardinality::Required => FieldLabel::Required,
        Cardinality::Repeated => FieldLabel::Repeated,
        Cardinality::Optional | Cardinality::Implicit => FieldLabel::Optional,
    };

    // Explicit `optional` under proto3 is tracked; implicit presence
    // is not.
    let proto3_optional = (ctx.proto3 && field.cardinality == Cardinality::Optional).then_some(true);

    let (r#type, type_name) = lower_type(&field.ty);

    Ok(FieldDescriptorProto {
        name: Some(field.name.clone()),
        number: Some(number),
        label: Some(label),
        r#type: Some(r#type),
        type_name,
        extendee: extendee.map(|reference| reference.to_string()),
        oneof_index,
        json_name: Some(case::json_name(&field.name)),
        options: FieldOptions::from_uninterpreted(lower_options(context, &field.options)?),
        proto3_optional,
        ..Default::default()
    })
}

/// Scalar kinds map one-to-one; a named reference becomes
/// `TYPE_MESSAGE` (resolution downstream decides whether it was really
/// an enum) with the reference text, leading dot included when the
/// source wrote one.
pub(super) fn lower_type(ty: &TypeRef) -> (FieldType, Option<String>) {
    match ty {
        TypeRef::Scalar(scalar) => (scalar_type(*scalar), None),
        TypeRef::Named(reference) => (FieldType::Message, Some(reference.to_string())),
    }
}

pub(super) fn scalar_type(scalar: Scalar) -> FieldType {
    match scalar {
        Scalar::Double => FieldType::Double,
        Scalar::Float => FieldType::Float,
        Scalar::Int32 => FieldType::Int32,
        Scalar::Int64 => FieldType::Int64,
        Scalar::Uint32 => FieldType::Uint32,
        Scalar::Uint64 => FieldType::Uint64,
        Scalar::Sint32 => FieldType::Sint32,
        Scalar::Sint64 => FieldType::Sint64,
        Scalar::Fixed32 => FieldType::Fixed32,
        Scalar::Fixed64 => FieldType::Fixed64,
        Scalar::Sfixed32 => FieldType::Sfixed32,
        Scalar::Sfixed64 => FieldType::Sfixed64,
        Scalar::Bool => FieldType::Bool,
        Scalar::String => FieldType::String,
        Scalar::Bytes => FieldType::Bytes,
    }
}

/// Validate a tag against the absolute limits: positive, within the
/// 29-bit field number space, outside the implementation-reserved
/// band. Reserved-range and uniqueness checks need message context and
/// live with the message lowering.
pub(super) fn check_tag(context: &str, tag: u64) -> Result<i32, LowerError> {
    if tag == 0 || tag > MAX_FIELD_NUMBER {
        return Err(LowerError::InvalidTag {
            context: context.to_string(),
            tag: tag as i64,
            reason: format!("must be between 1 and {}", MAX_FIELD_NUMBER),
        });
    }
    if IMPL_RESERVED.contains(&tag) {
        return Err(LowerError::InvalidTag {
            context: context.to_string(),
            tag: tag as i64,
            reason: "19000 to 19999 are reserved for the protobuf implementation".to_string(),
        });
    }
    Ok(tag as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{FullName, Span};

    fn ctx() -> Context<'static> {
        Context {
            file: "t.proto",
            proto3: true,
            package: None,
        }
    }

    fn field(cardinality: Cardinality, ty: TypeRef, tag: u64) -> Field {
        Field {
            cardinality,
            ty,
            name: "some_field".to_string(),
            tag,
            options: Vec::new(),
            span: Span::zero(0),
        }
    }

    #[test]
    fn test_scalar_field() {
        let f = field(Cardinality::Implicit, TypeRef::Scalar(Scalar::String), 1);
        let fd = lower_field(&ctx(), "t", &f, None, None).unwrap();
        assert_eq!(fd.number, Some(1));
        assert_eq!(fd.label, Some(FieldLabel::Optional));
        assert_eq!(fd.r#type, Some(FieldType::String));
        assert_eq!(fd.type_name, None);
        assert_eq!(fd.json_name.as_deref(), Some("someField"));
        assert_eq!(fd.proto3_optional, None);
    }

    #[test]
    fn test_explicit_optional_under_proto3() {
        let f = field(Cardinality::Optional, TypeRef::Scalar(Scalar::Int32), 2);
        let fd = lower_field(&ctx(), "t", &f, None, None).unwrap();
        assert_eq!(fd.proto3_optional, Some(true));
    }

    #[test]
    fn test_named_reference_keeps_leading_dot() {
        let reference = Reference {
            leading_dot: true,
            name: FullName::parse("pkg.Other"),
            span: Span::zero(0),
        };
        let f = field(Cardinality::Implicit, TypeRef::Named(reference), 3);
        let fd = lower_field(&ctx(), "t", &f, None, None).unwrap();
        assert_eq!(fd.r#type, Some(FieldType::Message));
        assert_eq!(fd.type_name.as_deref(), Some(".pkg.Other"));
    }

    #[test]
    fn test_tag_limits() {
        assert!(check_tag("t", 1).is_ok());
        assert!(check_tag("t", MAX_FIELD_NUMBER).is_ok());
        assert!(check_tag("t", 0).is_err());
        assert!(check_tag("t", MAX_FIELD_NUMBER + 1).is_err());
        assert!(check_tag("t", 19_000).is_err());
        assert!(check_tag("t", 19_999).is_err());
    }
}
