//! File-level grammar: syntax, package, imports, top-level entries.

use crate::ast::{FileItem, Import, PackageDecl, SyntaxDecl};
use crate::lexer::Token;

use super::error::RawParseError;
use super::stream::TokenStream;
use super::{message, option, parse_full_ident, service};

/// One top-level item. Everything at file scope opens with a keyword,
/// so plain dispatch suffices; duplicate `syntax`/`package` items are
/// parsed here and rejected during lowering.
pub(super) fn parse_item(stream: &mut TokenStream) -> Result<FileItem, RawParseError> {
    if stream.check(&Token::Semicolon) {
        let span = stream.current_span();
        stream.advance();
        return Ok(FileItem::Empty(span));
    }
    match stream.peek() {
        Some(Token::Ident(kw)) => match kw.as_str() {
            "syntax" => parse_syntax(stream),
            "package" => parse_package(stream),
            "import" => parse_import(stream),
            "option" => {
                stream.advance();
                let decl = option::parse_option_body(stream)?;
                stream.expect(Token::Semicolon)?;
                Ok(FileItem::Option(decl))
            }
            "message" => Ok(FileItem::Message(message::parse_message(stream)?)),
            "enum" => Ok(FileItem::Enum(message::parse_enum(stream)?)),
            "service" => Ok(FileItem::Service(service::parse_service(stream)?)),
            "extend" => Ok(FileItem::Extend(message::parse_extend(stream)?)),
            _ => Err(stream.expected("top-level declaration")),
        },
        _ => Err(stream.expected("top-level declaration")),
    }
}

/// `syntax = "proto2"|"proto3";`
fn parse_syntax(stream: &mut TokenStream) -> Result<FileItem, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("syntax")?;
    stream.expect(Token::Eq)?;
    let (value, _) = stream.expect_utf8_string()?;
    stream.expect(Token::Semicolon)?;
    Ok(FileItem::Syntax(SyntaxDecl {
        value,
        span: stream.span_from(start),
    }))
}

/// `package foo.bar;`
fn parse_package(stream: &mut TokenStream) -> Result<FileItem, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("package")?;
    let (name, _) = parse_full_ident(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok(FileItem::Package(PackageDecl {
        name,
        span: stream.span_from(start),
    }))
}

/// `import [public|weak] "path";`
///
/// `public` and `weak` are modifiers only when a string literal
/// follows; `import "public.proto"` stays a plain import.
fn parse_import(stream: &mut TokenStream) -> Result<FileItem, RawParseError> {
    let start = stream.pos();
    stream.expect_keyword("import")?;
    let mut public = false;
    let mut weak = false;
    if stream.at_keyword("public") && matches!(stream.peek2(), Some(Token::Str(_))) {
        stream.advance();
        public = true;
    } else if stream.at_keyword("weak") && matches!(stream.peek2(), Some(Token::Str(_))) {
        stream.advance();
        weak = true;
    }
    let (path, _) = stream.expect_utf8_string()?;
    stream.expect(Token::Semicolon)?;
    Ok(FileItem::Import(Import {
        path,
        public,
        weak,
        span: stream.span_from(start),
    }))
}
