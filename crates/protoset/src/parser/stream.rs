//! Token stream with two-token lookahead.
//!
//! The grammar needs exactly two tokens of lookahead: one to pick the
//! production, a second to settle the handful of keyword/identifier
//! ambiguities (`map` vs a field typed `map`, `stream` vs a type named
//! `stream`, and friends).

use crate::foundation::Span;
use crate::lexer::{Spanned, Token};

use super::error::RawParseError;

pub struct TokenStream<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    file_id: u16,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Spanned], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Current token without consuming it.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    /// Second token of lookahead.
    pub fn peek2(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1).map(|s| &s.token)
    }

    /// Consume and return the current token.
    pub fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Span of the current token, or a zero-length span at EOF.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(s) => s.span,
            None => self
                .tokens
                .last()
                .map(|s| Span::new(self.file_id, s.span.end, s.span.end))
                .unwrap_or_else(|| Span::zero(self.file_id)),
        }
    }

    /// Span covering everything from token index `start` to the last
    /// consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        let first = match self.tokens.get(start) {
            Some(s) => s.span,
            None => return self.current_span(),
        };
        let last = self.tokens[start..self.pos.min(self.tokens.len())]
            .last()
            .map(|s| s.span)
            .unwrap_or(first);
        first.merge(&last)
    }

    /// Description of the current token for error messages.
    pub fn describe_current(&self) -> String {
        match self.peek() {
            Some(token) => token.describe(),
            None => "end of file".to_string(),
        }
    }

    /// Build an "expected X, found <current>" error at the cursor.
    pub fn expected(&self, what: impl Into<String>) -> RawParseError {
        RawParseError::new(self.current_span(), what, self.describe_current())
    }

    /// True if the current token is this exact punctuation token.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume the given punctuation token or fail.
    pub fn expect(&mut self, expected: Token) -> Result<Span, RawParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.expected(expected.describe()))
        }
    }

    /// Consume the token if it matches; report whether it did.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True if the second lookahead token is this exact punctuation
    /// token.
    pub fn check2(&self, expected: &Token) -> bool {
        matches!(self.peek2(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// True if the current token is the identifier `kw`.
    pub fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(s)) if s == kw)
    }

    /// Consume the identifier `kw` or fail.
    pub fn expect_keyword(&mut self, kw: &str) -> Result<Span, RawParseError> {
        if self.at_keyword(kw) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.expected(format!("'{}'", kw)))
        }
    }

    /// Consume the identifier `kw` if present.
    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume any identifier (keywords included; classification is
    /// positional).
    pub fn expect_ident(&mut self) -> Result<(String, Span), RawParseError> {
        match self.peek() {
            Some(Token::Ident(s)) => {
                let span = self.current_span();
                let text = s.clone();
                self.advance();
                Ok((text, span))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    /// Consume an integer literal.
    pub fn expect_int(&mut self) -> Result<(u64, Span), RawParseError> {
        match self.peek() {
            Some(Token::Int(n)) => {
                let span = self.current_span();
                let value = *n;
                self.advance();
                Ok((value, span))
            }
            _ => Err(self.expected("integer literal")),
        }
    }

    /// Consume a single string literal. Adjacent-literal concatenation
    /// is an option-value rule and lives in the value parser.
    pub fn expect_string(&mut self) -> Result<(Vec<u8>, Span), RawParseError> {
        match self.peek() {
            Some(Token::Str(b)) => {
                let span = self.current_span();
                let bytes = b.clone();
                self.advance();
                Ok((bytes, span))
            }
            _ => Err(self.expected("string literal")),
        }
    }

    /// Like [`expect_string`](Self::expect_string), but the grammar
    /// position requires text (import paths, reserved names, the
    /// syntax string).
    pub fn expect_utf8_string(&mut self) -> Result<(String, Span), RawParseError> {
        let (bytes, span) = self.expect_string()?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok((text, span)),
            Err(_) => Err(RawParseError::new(
                span,
                "valid UTF-8 string",
                "string with non-UTF-8 bytes",
            )),
        }
    }
}
