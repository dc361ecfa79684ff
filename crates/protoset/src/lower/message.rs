//! Message and enum lowering.
//!
//! Messages collect their entries in source order; map fields
//! additionally synthesize a nested `*Entry` message. Tag validation
//! runs after the walk so `reserved` declarations textually below a
//! field still apply to it.

use std::collections::HashMap;

use tracing::warn;

use crate::ast::{
    EnumDecl, EnumEntry, ExtendEntry, MapField, Message, MessageEntry, OneofEntry, OptionDecl,
    OptionNamePart, Reserved, ReservedList, TagRange, ValueKind,
};
use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumOptions, EnumReservedRange, EnumValueDescriptorProto,
    EnumValueOptions, ExtensionRange, ExtensionRangeOptions, FieldDescriptorProto, FieldLabel,
    FieldType, MessageOptions, OneofDescriptorProto, OneofOptions, ReservedRange,
};
use crate::error::LowerError;

use super::field::{check_tag, lower_field, lower_type, scalar_type};
use super::options::{lower_option, lower_options};
use super::{case, Context};

/// Upper bound written for `reserved ... to max`; i32::MAX for both
/// enum and message scope, saturating rather than overflowing when the
/// message form converts to an exclusive end.
pub(super) const RESERVED_MAX: i32 = 2_147_483_647;
/// Exclusive ceiling for `extensions N to max` (2^29).
const EXTENSION_MAX_EXCLUSIVE: i32 = 536_870_912;

pub(super) fn lower_message(
    ctx: &Context,
    scope: &str,
    message: &Message,
) -> Result<DescriptorProto, LowerError> {
    let context = format!("{}: message {}", ctx.file, scope);
    let mut out = DescriptorProto {
        name: Some(message.name.clone()),
        ..Default::default()
    };
    let mut uninterpreted = Vec::new();
    // (tag, effective inclusive end) pairs for post-walk validation.
    let mut reserved_spans: Vec<(u64, u64)> = Vec::new();
    let mut declared_tags: Vec<u64> = Vec::new();

    for entry in &message.entries {
        match entry {
            MessageEntry::Field(field) => {
                out.field
                    .push(lower_field(ctx, &context, field, None, None)?);
                declared_tags.push(field.tag);
            }
            MessageEntry::Map(map) => {
                let (entry_message, map_field) = lower_map_field(ctx, &context, scope, map)?;
                out.nested_type.push(entry_message);
                out.field.push(map_field);
                declared_tags.push(map.tag);
            }
            MessageEntry::Group(group) => {
                // Groups parse but have no wire descriptor here.
                warn!(
                    group = group.name.as_str(),
                    context = context.as_str(),
                    "skipping group field; groups are not lowered"
                );
            }
            MessageEntry::Message(nested) => {
                let nested_scope = format!("{}.{}", scope, nested.name);
                out.nested_type
                    .push(lower_message(ctx, &nested_scope, nested)?);
            }
            MessageEntry::Enum(decl) => {
                out.enum_type.push(lower_enum(ctx, decl)?);
            }
            MessageEntry::Oneof(oneof) => {
                let index = out.oneof_decl.len() as i32;
                let mut oneof_options = Vec::new();
                for member in &oneof.entries {
                    match member {
                        OneofEntry::Field(field) => {
                            out.field
                                .push(lower_field(ctx, &context, field, Some(index), None)?);
                            declared_tags.push(field.tag);
                        }
                        OneofEntry::Option(decl) => {
                            oneof_options.push(lower_option(&context, decl)?);
                        }
                        OneofEntry::Empty(_) => {}
                    }
                }
                out.oneof_decl.push(OneofDescriptorProto {
                    name: Some(oneof.name.clone()),
                    options: OneofOptions::from_uninterpreted(oneof_options),
                });
            }
            MessageEntry::Extend(extend) => {
                for member in &extend.entries {
                    match member {
                        ExtendEntry::Field(field) => {
                            out.extension.push(lower_field(
                                ctx,
                                &context,
                                field,
                                None,
                                Some(&extend.extendee),
                            )?);
                        }
                        ExtendEntry::Group(group) => {
                            warn!(
                                group = group.name.as_str(),
                                context = context.as_str(),
                                "skipping group extension; groups are not lowered"
                            );
                        }
                        ExtendEntry::Empty(_) => {}
                    }
                }
            }
            MessageEntry::Reserved(reserved) => {
                lower_message_reserved(&context, reserved, &mut out, &mut reserved_spans)?;
            }
            MessageEntry::Extensions(extensions) => {
                let options =
                    ExtensionRangeOptions::from_uninterpreted(lower_options(
                        &context,
                        &extensions.options,
                    )?);
                for range in &extensions.ranges {
                    out.extension_range.push(lower_extension_range(
                        &context,
                        range,
                        options.clone(),
                    )?);
                }
            }
            MessageEntry::Option(decl) => {
                uninterpreted.push(lower_option(&context, decl)?);
            }
            MessageEntry::Empty(_) => {}
        }
    }

    if !uninterpreted.is_empty() {
        out.options = Some(MessageOptions {
            map_entry: None,
            uninterpreted_option: uninterpreted,
        });
    }

    validate_tags(&context, &declared_tags, &reserved_spans)?;
    Ok(out)
}

/// Synthesize the `NameEntry` nested message and the repeated field
/// that references it.
fn lower_map_field(
    ctx: &Context,
    context: &str,
    scope: &str,
    map: &MapField,
) -> Result<(DescriptorProto, FieldDescriptorProto), LowerError> {
    if !map.key.valid_map_key() {
        return Err(LowerError::InvalidMapKey {
            context: format!("{}: field {}", context, map.name),
            key: map.key.name(),
        });
    }

    let entry_name = case::map_entry_name(&map.name);
    let (value_type, value_type_name) = lower_type(&map.value);

    let entry_message = DescriptorProto {
        name: Some(entry_name.clone()),
        field: vec![
            FieldDescriptorProto {
                name: Some("key".to_string()),
                number: Some(1),
                label: Some(FieldLabel::Optional),
                r#type: Some(scalar_type(map.key)),
                json_name: Some("key".to_string()),
                ..Default::default()
            },
            FieldDescriptorProto {
                name: Some("value".to_string()),
                number: Some(2),
                label: Some(FieldLabel::Optional),
                r#type: Some(value_type),
                type_name: value_type_name,
                json_name: Some("value".to_string()),
                ..Default::default()
            },
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
            uninterpreted_option: Vec::new(),
        }),
        ..Default::default()
    };

    let map_field = FieldDescriptorProto {
        name: Some(map.name.clone()),
        number: Some(check_tag(context, map.tag)?),
        label: Some(FieldLabel::Repeated),
        r#type: Some(FieldType::Message),
        type_name: Some(format!(".{}.{}", scope, entry_name)),
        json_name: Some(case::json_name(&map.name)),
        options: crate::descriptor::FieldOptions::from_uninterpreted(lower_options(
            context,
            &map.options,
        )?),
        ..Default::default()
    };

    Ok((entry_message, map_field))
}

/// `reserved` inside a message: ranges convert to the exclusive-end
/// descriptor form; names pass through.
fn lower_message_reserved(
    context: &str,
    reserved: &Reserved,
    out: &mut DescriptorProto,
    reserved_spans: &mut Vec<(u64, u64)>,
) -> Result<(), LowerError> {
    match &reserved.list {
        ReservedList::Ranges(ranges) => {
            for range in ranges {
                let start = range_bound(context, range.start)?;
                let end = if range.max {
                    reserved_spans.push((range.start, u64::MAX));
                    RESERVED_MAX
                } else {
                    let inclusive_end = range.end.unwrap_or(range.start);
                    reserved_spans.push((range.start, inclusive_end));
                    range_bound(context, inclusive_end)?.saturating_add(1)
                };
                out.reserved_range.push(ReservedRange {
                    start: Some(start),
                    end: Some(end),
                });
            }
        }
        ReservedList::Names(names) => {
            out.reserved_name.extend(names.iter().cloned());
        }
    }
    Ok(())
}

fn lower_extension_range(
    context: &str,
    range: &TagRange,
    options: Option<ExtensionRangeOptions>,
) -> Result<ExtensionRange, LowerError> {
    let start = range_bound(context, range.start)?;
    let end = if range.max {
        EXTENSION_MAX_EXCLUSIVE
    } else {
        range_bound(context, range.end.unwrap_or(range.start))?.saturating_add(1)
    };
    Ok(ExtensionRange {
        start: Some(start),
        end: Some(end),
        options,
    })
}

fn range_bound(context: &str, bound: u64) -> Result<i32, LowerError> {
    i32::try_from(bound).map_err(|_| LowerError::InvalidTag {
        context: context.to_string(),
        tag: bound as i64,
        reason: "range bound does not fit in 32 bits".to_string(),
    })
}

/// Uniqueness plus declared-reserved checks for all direct field tags.
fn validate_tags(
    context: &str,
    declared_tags: &[u64],
    reserved_spans: &[(u64, u64)],
) -> Result<(), LowerError> {
    let mut seen: HashMap<u64, ()> = HashMap::new();
    for &tag in declared_tags {
        if seen.insert(tag, ()).is_some() {
            return Err(LowerError::InvalidTag {
                context: context.to_string(),
                tag: tag as i64,
                reason: "tag is used by another field".to_string(),
            });
        }
        for &(start, end) in reserved_spans {
            if tag >= start && tag <= end {
                return Err(LowerError::InvalidTag {
                    context: context.to_string(),
                    tag: tag as i64,
                    reason: format!("tag is in reserved range {} to {}", start, end),
                });
            }
        }
    }
    Ok(())
}

pub(super) fn lower_enum(ctx: &Context, decl: &EnumDecl) -> Result<EnumDescriptorProto, LowerError> {
    let context = format!("{}: enum {}", ctx.file, decl.name);
    let allow_alias = has_allow_alias(&decl.entries);

    let mut out = EnumDescriptorProto {
        name: Some(decl.name.clone()),
        ..Default::default()
    };
    let mut uninterpreted = Vec::new();
    let mut seen_numbers: HashMap<i32, ()> = HashMap::new();

    for entry in &decl.entries {
        match entry {
            EnumEntry::Value(value) => {
                let number = i32::try_from(value.number).map_err(|_| LowerError::InvalidTag {
                    context: format!("{}: value {}", context, value.name),
                    tag: value.number,
                    reason: "enum number does not fit in 32 bits".to_string(),
                })?;
                if seen_numbers.insert(number, ()).is_some() && !allow_alias {
                    return Err(LowerError::InvalidTag {
                        context: format!("{}: value {}", context, value.name),
                        tag: value.number,
                        reason: "number is used by another value and allow_alias is not set"
                            .to_string(),
                    });
                }
                out.value.push(EnumValueDescriptorProto {
                    name: Some(value.name.clone()),
                    number: Some(number),
                    options: EnumValueOptions::from_uninterpreted(lower_options(
                        &context,
                        &value.options,
                    )?),
                });
            }
            EnumEntry::Reserved(reserved) => lower_enum_reserved(&context, reserved, &mut out)?,
            EnumEntry::Option(decl) => uninterpreted.push(lower_option(&context, decl)?),
            EnumEntry::Empty(_) => {}
        }
    }

    out.options = EnumOptions::from_uninterpreted(uninterpreted);
    Ok(out)
}

/// Enum reserved ranges stay inclusive; a single number reserves
/// itself, `max` (and only `max`) widens the end to 2^31-1.
fn lower_enum_reserved(
    context: &str,
    reserved: &Reserved,
    out: &mut EnumDescriptorProto,
) -> Result<(), LowerError> {
    match &reserved.list {
        ReservedList::Ranges(ranges) => {
            for range in ranges {
                let start = range_bound(context, range.start)?;
                let end = if range.max {
                    RESERVED_MAX
                } else {
                    range_bound(context, range.end.unwrap_or(range.start))?
                };
                out.reserved_range.push(EnumReservedRange {
                    start: Some(start),
                    end: Some(end),
                });
            }
        }
        ReservedList::Names(names) => {
            out.reserved_name.extend(names.iter().cloned());
        }
    }
    Ok(())
}

/// `option allow_alias = true;` anywhere in the enum body.
fn has_allow_alias(entries: &[EnumEntry]) -> bool {
    entries.iter().any(|entry| match entry {
        EnumEntry::Option(OptionDecl { name, value, .. }) => {
            matches!(name.as_slice(), [OptionNamePart::Plain(part)] if part == "allow_alias")
                && matches!(value.kind, ValueKind::Bool(true))
        }
        _ => false,
    })
}
