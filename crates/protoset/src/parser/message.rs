//! Message, enum and extend grammar.
//!
//! Entry dispatch inside a message body follows the original grammar
//! order: `option` is tried before fields, so `option foo = 1;` is an
//! option entry even though a field whose type is named `option` would
//! look identical. `map` introduces a map field only when `<` follows;
//! `group` introduces a group only when an identifier follows.

use crate::ast::{
    Cardinality, EnumDecl, EnumEntry, EnumValue, Extend, ExtendEntry, Extensions, Field, Group,
    MapField, Message, MessageEntry, Oneof, OneofEntry, Reserved, ReservedList, Scalar, TagRange,
    TypeRef,
};
use crate::lexer::Token;

use super::error::RawParseError;
use super::stream::TokenStream;
use super::{option, parse_reference};

/// `message Name { entries }`
pub(super) fn parse_message(stream: &mut TokenStream) -> Result<Message, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("message")?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        entries.push(parse_message_entry(stream)?);
    }
    stream.expect(Token::RBrace)?;
    Ok(Message {
        name,
        entries,
        span: stream.span_from(start),
    })
}

fn parse_message_entry(stream: &mut TokenStream) -> Result<MessageEntry, RawParseError> {
    if stream.check(&Token::Semicolon) {
        let span = stream.current_span();
        stream.advance();
        return Ok(MessageEntry::Empty(span));
    }
    match stream.peek() {
        Some(Token::Ident(kw)) => match kw.as_str() {
            "message" => Ok(MessageEntry::Message(parse_message(stream)?)),
            "enum" => Ok(MessageEntry::Enum(parse_enum(stream)?)),
            "oneof" => Ok(MessageEntry::Oneof(parse_oneof(stream)?)),
            "extend" => Ok(MessageEntry::Extend(parse_extend(stream)?)),
            "reserved" => Ok(MessageEntry::Reserved(parse_reserved(stream)?)),
            "extensions" => Ok(MessageEntry::Extensions(parse_extensions(stream)?)),
            "option" => {
                stream.advance();
                let decl = option::parse_option_body(stream)?;
                stream.expect(Token::Semicolon)?;
                Ok(MessageEntry::Option(decl))
            }
            "map" if stream.check2(&Token::Lt) => Ok(MessageEntry::Map(parse_map_field(stream)?)),
            _ => parse_field_entry(stream),
        },
        Some(Token::Dot) => parse_field_entry(stream),
        _ => Err(stream.expected("message entry")),
    }
}

/// A field-shaped entry: optional cardinality, then group or direct.
fn parse_field_entry(stream: &mut TokenStream) -> Result<MessageEntry, RawParseError> {
    let cardinality = parse_cardinality(stream);
    if at_group(stream) {
        Ok(MessageEntry::Group(parse_group(stream, cardinality)?))
    } else {
        Ok(MessageEntry::Field(parse_direct_field(stream, cardinality)?))
    }
}

/// Consume a cardinality keyword when present.
fn parse_cardinality(stream: &mut TokenStream) -> Cardinality {
    if stream.eat_keyword("optional") {
        Cardinality::Optional
    } else if stream.eat_keyword("required") {
        Cardinality::Required
    } else if stream.eat_keyword("repeated") {
        Cardinality::Repeated
    } else {
        Cardinality::Implicit
    }
}

/// `group` opens a group only when an identifier (the group name)
/// follows; otherwise it is a type named `group`.
fn at_group(stream: &mut TokenStream) -> bool {
    stream.at_keyword("group") && matches!(stream.peek2(), Some(Token::Ident(_)))
}

/// `type name = tag [options];`
pub(super) fn parse_direct_field(
    stream: &mut TokenStream,
    cardinality: Cardinality,
) -> Result<Field, RawParseError> {
    let start = stream.pos();
    let ty = parse_type(stream)?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::Eq)?;
    let (tag, _) = stream.expect_int()?;
    let options = option::parse_field_options(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok(Field {
        cardinality,
        ty,
        name,
        tag,
        options,
        span: stream.span_from(start),
    })
}

/// Scalar kind or named reference. Scalar names win unconditionally,
/// as in the original grammar.
fn parse_type(stream: &mut TokenStream) -> Result<TypeRef, RawParseError> {
    if let Some(Token::Ident(name)) = stream.peek() {
        if let Some(scalar) = Scalar::from_ident(name) {
            stream.advance();
            return Ok(TypeRef::Scalar(scalar));
        }
    }
    if matches!(stream.peek(), Some(Token::Ident(_)) | Some(Token::Dot)) {
        return Ok(TypeRef::Named(parse_reference(stream)?));
    }
    Err(stream.expected("field type"))
}

/// `map<key, value> name = tag [options];`
fn parse_map_field(stream: &mut TokenStream) -> Result<MapField, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("map")?;
    stream.expect(Token::Lt)?;
    let key = parse_map_key(stream)?;
    stream.expect(Token::Comma)?;
    let value = parse_type(stream)?;
    stream.expect(Token::Gt)?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::Eq)?;
    let (tag, _) = stream.expect_int()?;
    let options = option::parse_field_options(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok(MapField {
        key,
        value,
        name,
        tag,
        options,
        span: stream.span_from(start),
    })
}

/// The map key position takes any scalar name; whether the kind is a
/// legal key is checked during lowering.
fn parse_map_key(stream: &mut TokenStream) -> Result<Scalar, RawParseError> {
    match stream.peek() {
        Some(Token::Ident(name)) => match Scalar::from_ident(name) {
            Some(scalar) => {
                stream.advance();
                Ok(scalar)
            }
            None => Err(stream.expected("scalar map key type")),
        },
        _ => Err(stream.expected("scalar map key type")),
    }
}

/// `group Name = tag [options] { entries }`
fn parse_group(
    stream: &mut TokenStream,
    cardinality: Cardinality,
) -> Result<Group, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("group")?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::Eq)?;
    let (tag, _) = stream.expect_int()?;
    let options = option::parse_field_options(stream)?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        entries.push(parse_message_entry(stream)?);
    }
    stream.expect(Token::RBrace)?;
    Ok(Group {
        cardinality,
        name,
        tag,
        options,
        entries,
        span: stream.span_from(start),
    })
}

/// `oneof name { fields and options }` — member fields carry no
/// cardinality.
fn parse_oneof(stream: &mut TokenStream) -> Result<Oneof, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("oneof")?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        if stream.check(&Token::Semicolon) {
            let span = stream.current_span();
            stream.advance();
            entries.push(OneofEntry::Empty(span));
        } else if stream.at_keyword("option") {
            stream.advance();
            let decl = option::parse_option_body(stream)?;
            stream.expect(Token::Semicolon)?;
            entries.push(OneofEntry::Option(decl));
        } else {
            entries.push(OneofEntry::Field(parse_direct_field(
                stream,
                Cardinality::Implicit,
            )?));
        }
    }
    stream.expect(Token::RBrace)?;
    Ok(Oneof {
        name,
        entries,
        span: stream.span_from(start),
    })
}

/// `enum Name { values, reserved, options }`
pub(super) fn parse_enum(stream: &mut TokenStream) -> Result<EnumDecl, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("enum")?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        entries.push(parse_enum_entry(stream)?);
    }
    stream.expect(Token::RBrace)?;
    Ok(EnumDecl {
        name,
        entries,
        span: stream.span_from(start),
    })
}

fn parse_enum_entry(stream: &mut TokenStream) -> Result<EnumEntry, RawParseError> {
    if stream.check(&Token::Semicolon) {
        let span = stream.current_span();
        stream.advance();
        return Ok(EnumEntry::Empty(span));
    }
    if stream.at_keyword("option") {
        stream.advance();
        let decl = option::parse_option_body(stream)?;
        stream.expect(Token::Semicolon)?;
        return Ok(EnumEntry::Option(decl));
    }
    if stream.at_keyword("reserved") {
        return Ok(EnumEntry::Reserved(parse_reserved(stream)?));
    }
    parse_enum_value(stream).map(EnumEntry::Value)
}

/// `NAME = [-] number [options];`
fn parse_enum_value(stream: &mut TokenStream) -> Result<EnumValue, RawParseError> {
    let start = stream.pos();
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::Eq)?;
    let negative = stream.eat(&Token::Minus);
    let (magnitude, span) = stream.expect_int()?;
    let number = apply_sign(negative, magnitude, span)?;
    let options = option::parse_field_options(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok(EnumValue {
        name,
        number,
        options,
        span: stream.span_from(start),
    })
}

fn apply_sign(
    negative: bool,
    magnitude: u64,
    span: crate::foundation::Span,
) -> Result<i64, RawParseError> {
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(RawParseError::new(
                span,
                "enum value number in range",
                "number too small",
            ));
        }
        Ok((magnitude as i128).wrapping_neg() as i64)
    } else {
        if magnitude > i64::MAX as u64 {
            return Err(RawParseError::new(
                span,
                "enum value number in range",
                "number too large",
            ));
        }
        Ok(magnitude as i64)
    }
}

/// `reserved ranges;` or `reserved "name", "names";`
fn parse_reserved(stream: &mut TokenStream) -> Result<Reserved, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("reserved")?;
    let list = match stream.peek() {
        Some(Token::Int(_)) => ReservedList::Ranges(parse_ranges(stream)?),
        Some(Token::Str(_)) => {
            let mut names = Vec::new();
            let (first, _) = stream.expect_utf8_string()?;
            names.push(first);
            while stream.eat(&Token::Comma) {
                let (name, _) = stream.expect_utf8_string()?;
                names.push(name);
            }
            ReservedList::Names(names)
        }
        _ => return Err(stream.expected("field number range or quoted field name")),
    };
    stream.expect(Token::Semicolon)?;
    Ok(Reserved {
        list,
        span: stream.span_from(start),
    })
}

fn parse_ranges(stream: &mut TokenStream) -> Result<Vec<TagRange>, RawParseError> {
    let mut ranges = vec![parse_range(stream)?];
    while stream.eat(&Token::Comma) {
        ranges.push(parse_range(stream)?);
    }
    Ok(ranges)
}

/// `start [to (end | max)]`
fn parse_range(stream: &mut TokenStream) -> Result<TagRange, RawParseError> {
    let start_pos = stream.pos();
    let (start, _) = stream.expect_int()?;
    let mut end = None;
    let mut max = false;
    if stream.eat_keyword("to") {
        if stream.at_keyword("max") {
            stream.advance();
            max = true;
        } else {
            let (n, _) = stream.expect_int()?;
            end = Some(n);
        }
    }
    Ok(TagRange {
        start,
        end,
        max,
        span: stream.span_from(start_pos),
    })
}

/// `extensions ranges [options];`
fn parse_extensions(stream: &mut TokenStream) -> Result<Extensions, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("extensions")?;
    let ranges = parse_ranges(stream)?;
    let options = option::parse_field_options(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok(Extensions {
        ranges,
        options,
        span: stream.span_from(start),
    })
}

/// `extend Extendee { fields }`
pub(super) fn parse_extend(stream: &mut TokenStream) -> Result<Extend, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("extend")?;
    let extendee = parse_reference(stream)?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        if stream.check(&Token::Semicolon) {
            let span = stream.current_span();
            stream.advance();
            entries.push(ExtendEntry::Empty(span));
            continue;
        }
        let cardinality = parse_cardinality(stream);
        if at_group(stream) {
            entries.push(ExtendEntry::Group(parse_group(stream, cardinality)?));
        } else {
            entries.push(ExtendEntry::Field(parse_direct_field(stream, cardinality)?));
        }
    }
    stream.expect(Token::RBrace)?;
    Ok(Extend {
        extendee,
        entries,
        span: stream.span_from(start),
    })
}
