//! Service and rpc method grammar.
//!
//! `stream` inside the parameter parentheses is the streaming keyword
//! unless the very next token is `)`, in which case it is a request or
//! response type named `stream`.

use crate::ast::{Method, Service, ServiceEntry};
use crate::lexer::Token;

use super::error::RawParseError;
use super::stream::TokenStream;
use super::{option, parse_reference};

/// `service Name { rpcs and options }`
pub(super) fn parse_service(stream: &mut TokenStream) -> Result<Service, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("service")?;
    let (name, _) = stream.expect_ident()?;
    stream.expect(Token::LBrace)?;
    let mut entries = Vec::new();
    while !stream.check(&Token::RBrace) {
        if stream.check(&Token::Semicolon) {
            let span = stream.current_span();
            stream.advance();
            entries.push(ServiceEntry::Empty(span));
        } else if stream.at_keyword("option") {
            stream.advance();
            let decl = option::parse_option_body(stream)?;
            stream.expect(Token::Semicolon)?;
            entries.push(ServiceEntry::Option(decl));
        } else if stream.at_keyword("rpc") {
            entries.push(ServiceEntry::Method(parse_method(stream)?));
        } else {
            return Err(stream.expected("'rpc', 'option' or '}'"));
        }
    }
    stream.expect(Token::RBrace)?;
    Ok(Service {
        name,
        entries,
        span: stream.span_from(start),
    })
}

/// `rpc Name (req) returns (resp) { options } | ;`
fn parse_method(stream: &mut TokenStream) -> Result<Method, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("rpc")?;
    let (name, _) = stream.expect_ident()?;

    stream.expect(Token::LParen)?;
    let streaming_request = eat_stream_keyword(stream);
    let request = parse_reference(stream)?;
    stream.expect(Token::RParen)?;

    stream.expect_keyword("returns")?;
    stream.expect(Token::LParen)?;
    let streaming_response = eat_stream_keyword(stream);
    let response = parse_reference(stream)?;
    stream.expect(Token::RParen)?;

    let mut options = Vec::new();
    if stream.eat(&Token::LBrace) {
        while !stream.check(&Token::RBrace) {
            if stream.eat(&Token::Semicolon) {
                continue;
            }
            stream.expect_keyword("option")?;
            options.push(option::parse_option_body(stream)?);
            stream.expect(Token::Semicolon)?;
        }
        stream.expect(Token::RBrace)?;
    } else {
        stream.expect(Token::Semicolon)?;
    }

    Ok(Method {
        name,
        request,
        response,
        streaming_request,
        streaming_response,
        options,
        span: stream.span_from(start),
    })
}

fn eat_stream_keyword(stream: &mut TokenStream) -> bool {
    if stream.at_keyword("stream") && !stream.check2(&Token::RParen) && !stream.check2(&Token::Dot)
    {
        stream.advance();
        true
    } else {
        false
    }
}
