//! Option bodies, option values, and protobuf-text literals.
//!
//! A value that begins with a string literal eagerly absorbs every
//! immediately following string literal; the AST carries the
//! concatenated bytes. Numbers keep sign and magnitude separate so a
//! full-range unsigned 64-bit constant survives the trip.

use crate::ast::{
    OptionDecl, OptionNamePart, TextField, TextFieldName, TextMessage, Value, ValueKind,
};
use crate::lexer::Token;

use super::error::RawParseError;
use super::stream::TokenStream;
use super::{parse_full_ident, parse_reference};

/// `name ("." name)* = value` — the caller consumes the `option`
/// keyword and the trailing `;`/`]`.
pub(super) fn parse_option_body(stream: &mut TokenStream) -> Result<OptionDecl, RawParseError> {
    let start = stream.pos();
    let mut name = vec![parse_option_name_part(stream)?];
    while stream.eat(&Token::Dot) {
        name.push(parse_option_name_part(stream)?);
    }
    stream.expect(Token::Eq)?;
    let value = parse_value(stream)?;
    Ok(OptionDecl {
        name,
        value,
        span: stream.span_from(start),
    })
}

/// Plain identifier, or `(` `.`? full-ident `)` for an extension part.
fn parse_option_name_part(stream: &mut TokenStream) -> Result<OptionNamePart, RawParseError> {
    if stream.check(&Token::LParen) {
        let start_span = stream.current_span();
        stream.advance();
        let leading_dot = stream.eat(&Token::Dot);
        let (name, _) = parse_full_ident(stream)?;
        let close = stream.expect(Token::RParen)?;
        Ok(OptionNamePart::Extension(crate::ast::Reference {
            leading_dot,
            name,
            span: start_span.merge(&close),
        }))
    } else {
        let (name, _) = stream.expect_ident()?;
        Ok(OptionNamePart::Plain(name))
    }
}

/// `[ option, option, ... ]` after a field tag, or nothing.
pub(super) fn parse_field_options(
    stream: &mut TokenStream,
) -> Result<Vec<OptionDecl>, RawParseError> {
    if !stream.eat(&Token::LBracket) {
        return Ok(Vec::new());
    }
    let mut options = vec![parse_option_body(stream)?];
    while stream.eat(&Token::Comma) {
        options.push(parse_option_body(stream)?);
    }
    stream.expect(Token::RBracket)?;
    Ok(options)
}

pub(super) fn parse_value(stream: &mut TokenStream) -> Result<Value, RawParseError> {
    let start = stream.pos();
    let kind = match stream.peek() {
        Some(Token::Str(_)) => {
            let (mut bytes, _) = stream.expect_string()?;
            while let Some(Token::Str(next)) = stream.peek() {
                bytes.extend_from_slice(next);
                stream.advance();
            }
            ValueKind::Str(bytes)
        }
        Some(Token::Minus) | Some(Token::Plus) => {
            let negative = stream.check(&Token::Minus);
            stream.advance();
            match stream.peek() {
                Some(Token::Int(n)) => {
                    let magnitude = *n;
                    stream.advance();
                    ValueKind::Int {
                        negative,
                        magnitude,
                    }
                }
                Some(Token::Float(x)) => {
                    let value = if negative { -*x } else { *x };
                    stream.advance();
                    ValueKind::Float(value)
                }
                _ => return Err(stream.expected("numeric literal")),
            }
        }
        Some(Token::Int(n)) => {
            let magnitude = *n;
            stream.advance();
            ValueKind::Int {
                negative: false,
                magnitude,
            }
        }
        Some(Token::Float(x)) => {
            let value = *x;
            stream.advance();
            ValueKind::Float(value)
        }
        Some(Token::Ident(s)) if s == "true" => {
            stream.advance();
            ValueKind::Bool(true)
        }
        Some(Token::Ident(s)) if s == "false" => {
            stream.advance();
            ValueKind::Bool(false)
        }
        Some(Token::Ident(_)) | Some(Token::Dot) => ValueKind::Ident(parse_reference(stream)?),
        Some(Token::LBrace) => {
            stream.advance();
            let message = parse_text_message(stream)?;
            stream.expect(Token::RBrace)?;
            ValueKind::Message(message)
        }
        Some(Token::LBracket) => {
            stream.advance();
            let mut elements = Vec::new();
            if !stream.check(&Token::RBracket) {
                elements.push(parse_value(stream)?);
                loop {
                    // Commas between array elements are optional, as in
                    // protobuf text format.
                    stream.eat(&Token::Comma);
                    if stream.check(&Token::RBracket) {
                        break;
                    }
                    elements.push(parse_value(stream)?);
                }
            }
            stream.expect(Token::RBracket)?;
            ValueKind::Array(elements)
        }
        _ => return Err(stream.expected("option value")),
    };
    Ok(Value {
        kind,
        span: stream.span_from(start),
    })
}

/// Fields of a `{ ... }` text literal; the caller owns the braces.
fn parse_text_message(stream: &mut TokenStream) -> Result<TextMessage, RawParseError> {
    let start = stream.pos();
    let mut fields = Vec::new();
    while !stream.check(&Token::RBrace) {
        fields.push(parse_text_field(stream)?);
    }
    Ok(TextMessage {
        fields,
        span: stream.span_from(start),
    })
}

/// `name [:] value [,|;]` — the colon is optional before nested
/// literals, and a `[bracketed]` name form covers extensions and
/// `type.url/Name` Any entries.
fn parse_text_field(stream: &mut TokenStream) -> Result<TextField, RawParseError> {
    let start = stream.pos();
    let name = if stream.check(&Token::LBracket) {
        stream.advance();
        let mut text = String::new();
        if stream.eat(&Token::Dot) {
            text.push('.');
        }
        let (first, _) = stream.expect_ident()?;
        text.push_str(&first);
        loop {
            if stream.eat(&Token::Dot) {
                text.push('.');
            } else if stream.eat(&Token::Slash) {
                text.push('/');
            } else {
                break;
            }
            let (segment, _) = stream.expect_ident()?;
            text.push_str(&segment);
        }
        stream.expect(Token::RBracket)?;
        TextFieldName::Extension(text)
    } else {
        let (name, _) = stream.expect_ident()?;
        TextFieldName::Ident(name)
    };

    stream.eat(&Token::Colon);
    let value = parse_value(stream)?;
    if !stream.eat(&Token::Comma) {
        stream.eat(&Token::Semicolon);
    }
    Ok(TextField {
        name,
        value,
        span: stream.span_from(start),
    })
}
