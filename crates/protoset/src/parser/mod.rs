//! Hand-written recursive descent parser for the protobuf grammar.
//!
//! Productions are keyword-dispatched off identifier text; two tokens
//! of lookahead settle the classification ambiguities (documented in
//! the per-module comments). The parser is fail-fast: the first
//! mismatch aborts the file with a [`RawParseError`].
//!
//! Module split:
//! - `stream`: token cursor with two-token lookahead
//! - `error`: raw (span-based) parse error
//! - `file`: file-level items
//! - `message`: messages, fields, enums, extends
//! - `service`: services and rpc methods
//! - `option`: option names, values, protobuf-text literals

mod error;
mod file;
mod message;
mod option;
mod service;
mod stream;

pub use error::RawParseError;
use stream::TokenStream;

use crate::ast::{ProtoFile, Reference};
use crate::foundation::{FullName, Span};
use crate::lexer::{Spanned, Token};

/// Parse a full token stream into a [`ProtoFile`].
///
/// `name` is the logical file name; it lands in the AST verbatim and
/// later becomes the descriptor's `name` field.
pub fn parse_file(tokens: &[Spanned], file_id: u16, name: &str) -> Result<ProtoFile, RawParseError> {
    let mut stream = TokenStream::new(tokens, file_id);
    let mut items = Vec::new();
    while !stream.at_end() {
        items.push(file::parse_item(&mut stream)?);
    }
    Ok(ProtoFile {
        name: name.to_string(),
        items,
    })
}

/// `Ident ("." Ident)*` without a leading dot.
fn parse_full_ident(stream: &mut TokenStream) -> Result<(FullName, Span), RawParseError> {
    let (first, first_span) = stream.expect_ident()?;
    let mut segments = vec![first];
    let mut span = first_span;
    while stream.check(&Token::Dot) {
        stream.advance();
        let (segment, seg_span) = stream.expect_ident()?;
        segments.push(segment);
        span = span.merge(&seg_span);
    }
    Ok((FullName::new(segments), span))
}

/// `["."] Ident ("." Ident)*` — a type or extension reference.
fn parse_reference(stream: &mut TokenStream) -> Result<Reference, RawParseError> {
    let start_span = stream.current_span();
    let leading_dot = stream.eat(&Token::Dot);
    let (name, name_span) = parse_full_ident(stream)?;
    Ok(Reference {
        leading_dot,
        name,
        span: start_span.merge(&name_span),
    })
}

#[cfg(test)]
mod tests;
