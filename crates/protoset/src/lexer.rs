//! Lexical analysis for protobuf schema source.
//!
//! Tokenization uses logos. Three points are worth calling out:
//!
//! - Keywords are lexed as plain identifiers. Protobuf keyword
//!   classification is positional (`max`, `to`, `stream`, the scalar
//!   type names and friends are valid identifiers outside their
//!   grammar slots), so the parser matches identifier text instead of
//!   dedicated keyword tokens.
//! - String literals decode their escapes in the token callback and
//!   carry raw bytes: `\x`/octal escapes may produce data that is not
//!   UTF-8, and option values must preserve it. Grammar positions that
//!   require text re-validate UTF-8 at parse time.
//! - Comments and whitespace are skipped during lexing; unterminated
//!   strings and block comments surface as dedicated error kinds.

use logos::Logos;

use crate::foundation::Span;

/// Reason a token failed to lex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexErrorKind {
    /// No token pattern matched at this offset.
    #[default]
    UnexpectedCharacter,
    /// Integer or float literal with invalid digits or out of range.
    MalformedNumber,
    /// String literal without a closing quote on the same line.
    UnterminatedString,
    /// Block comment without a closing `*/`.
    UnterminatedComment,
    /// Backslash escape the string grammar does not define.
    InvalidEscape,
}

impl LexErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            LexErrorKind::UnexpectedCharacter => "unexpected character",
            LexErrorKind::MalformedNumber => "malformed numeric literal",
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
            LexErrorKind::InvalidEscape => "invalid escape sequence",
        }
    }
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// One protobuf schema token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Token {
    /// Identifier or keyword; classification is up to the parser.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Integer literal: decimal, hex (`0x`), or octal (leading `0`).
    #[regex(r"[1-9][0-9]*", |lex| lex.slice().parse::<u64>().map_err(|_| LexErrorKind::MalformedNumber))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| u64::from_str_radix(&lex.slice()[2..], 16).map_err(|_| LexErrorKind::MalformedNumber))]
    #[regex(r"0[0-9]*", parse_octal)]
    Int(u64),

    /// Floating point literal, with or without fraction/exponent.
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Float(f64),

    /// String literal with escapes decoded; bytes, not text.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, unescape)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#, unescape)]
    Str(Vec<u8>),

    // Patterns that exist only to classify common failures. The
    // callbacks always return an error, so the variant itself is never
    // produced.
    #[regex(r"0[xX]", bad_hex_prefix)]
    #[regex(r#""([^"\\\n]|\\[^\n])*"#, unterminated_string)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*"#, unterminated_string)]
    #[regex(r"/\*([^*]|\*+[^*/])*\**", unterminated_comment)]
    Invalid,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    /// Only legal inside `[type.url/Name]` text-format names; comment
    /// openers win by longest match.
    #[token("/")]
    Slash,
}

impl Token {
    /// Identifier text, when this token is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("'{}'", s),
            Token::Int(n) => format!("integer {}", n),
            Token::Float(x) => format!("float {}", x),
            Token::Str(_) => "string literal".to_string(),
            Token::Invalid => "invalid token".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Slash => "'/'".to_string(),
        }
    }
}

fn bad_hex_prefix(_lex: &mut logos::Lexer<Token>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::MalformedNumber)
}

fn unterminated_string(_lex: &mut logos::Lexer<Token>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

fn unterminated_comment(_lex: &mut logos::Lexer<Token>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedComment)
}

fn parse_octal(lex: &mut logos::Lexer<Token>) -> Result<u64, LexErrorKind> {
    let digits = lex.slice();
    if digits.bytes().any(|b| b > b'7') {
        return Err(LexErrorKind::MalformedNumber);
    }
    u64::from_str_radix(digits, 8).map_err(|_| LexErrorKind::MalformedNumber)
}

fn parse_float(lex: &mut logos::Lexer<Token>) -> Result<f64, LexErrorKind> {
    lex.slice()
        .parse::<f64>()
        .map_err(|_| LexErrorKind::MalformedNumber)
}

/// Decode a quoted literal, stripping the quotes and resolving escapes.
fn unescape(lex: &mut logos::Lexer<Token>) -> Result<Vec<u8>, LexErrorKind> {
    let slice = lex.slice().as_bytes();
    let inner = &slice[1..slice.len() - 1];
    let mut out = Vec::with_capacity(inner.len());
    let mut bytes = inner.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let esc = bytes.next().ok_or(LexErrorKind::InvalidEscape)?;
        match esc {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b'"' => out.push(b'"'),
            b'?' => out.push(b'?'),
            b'x' | b'X' => {
                // One or two hex digits.
                let mut value: u32 = 0;
                let mut seen = 0;
                while seen < 2 {
                    match bytes.peek().copied().and_then(hex_digit) {
                        Some(d) => {
                            bytes.next();
                            value = value * 16 + d;
                            seen += 1;
                        }
                        None => break,
                    }
                }
                if seen == 0 {
                    return Err(LexErrorKind::InvalidEscape);
                }
                out.push(value as u8);
            }
            b'0'..=b'7' => {
                // Up to three octal digits, first already consumed.
                let mut value: u32 = (esc - b'0') as u32;
                let mut seen = 1;
                while seen < 3 {
                    match bytes.peek().copied() {
                        Some(d @ b'0'..=b'7') => {
                            bytes.next();
                            value = value * 8 + (d - b'0') as u32;
                            seen += 1;
                        }
                        _ => break,
                    }
                }
                if value > 0xff {
                    return Err(LexErrorKind::InvalidEscape);
                }
                out.push(value as u8);
            }
            b'u' => {
                let cp = read_hex(&mut bytes, 4)?;
                push_char(&mut out, cp)?;
            }
            b'U' => {
                let cp = read_hex(&mut bytes, 8)?;
                push_char(&mut out, cp)?;
            }
            _ => return Err(LexErrorKind::InvalidEscape),
        }
    }
    Ok(out)
}

fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        _ => None,
    }
}

fn read_hex(
    bytes: &mut std::iter::Peekable<impl Iterator<Item = u8>>,
    count: usize,
) -> Result<u32, LexErrorKind> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let d = bytes
            .next()
            .and_then(hex_digit)
            .ok_or(LexErrorKind::InvalidEscape)?;
        value = value.wrapping_mul(16).wrapping_add(d);
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, cp: u32) -> Result<(), LexErrorKind> {
    let ch = char::from_u32(cp).ok_or(LexErrorKind::InvalidEscape)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    Ok(())
}

/// A token plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

/// Raw lex failure; the caller resolves the span into a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a full source file.
///
/// Stops at the first failure, per the fail-fast contract of the
/// pipeline.
pub fn lex(source: &str, file_id: u16) -> Result<Vec<Spanned>, RawLexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(file_id, range.start as u32, range.end as u32);
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(kind) => return Err(RawLexError { kind, span }),
        }
    }
    Ok(tokens)
}
