//! Token model: every token kind the tokenizer can produce.
//!
//! A [`Token`] pairs a [`TokenKind`] with the exact source text it was
//! scanned from. Kinds that carry meaning beyond their spelling (identifiers,
//! strings, numbers, dimensions, ...) also carry the decoded value, with
//! escape sequences already resolved.

use std::fmt;

/// The classification of a token, with its decoded payload where relevant.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// End of input. Returned repeatedly once the input is exhausted.
    Eof,

    // ── CSS3 Syntax ──────────────────────────────────────────────────
    /// Identifier, escapes decoded.
    Ident(String),
    /// `@name`, payload without the `@`.
    AtKeyword(String),
    /// Quoted string, payload without the quotes and escapes decoded.
    String(String),
    /// `#name`, payload without the `#`.
    Hash(String),
    /// Bare number.
    Number(f64),
    /// Number followed by `%`.
    Percentage(f64),
    /// Number followed by an identifier unit.
    Dimension { value: f64, unit: String },
    /// `url(...)`, payload is the address with quotes removed.
    Uri(String),
    /// `U+xxxx`, `U+xx??`, `U+xxxx-yyyy`. `valid` is false when `?` is not a
    /// contiguous suffix of the first part.
    UnicodeRange { low: u32, high: u32, valid: bool },
    /// `/* ... */`, possibly unterminated.
    Comment,
    /// Identifier immediately followed by `(`; payload is the name only.
    Function(String),
    /// A run of whitespace, collapsed to a single token.
    Whitespace,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,

    // ── Punctuation singletons ───────────────────────────────────────
    Plus,
    Greater,
    Comma,
    Tilde,
    Asterisk,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Colon,
    Semicolon,
    Period,
    Equals,

    // ── Selectors ────────────────────────────────────────────────────
    /// `:not(` (case-insensitive).
    Not,

    // ── Template keywords ────────────────────────────────────────────
    Auto,
    MinContent,
    MaxContent,
    MinMax,
    FitContent,
    Same,

    /// Any other single character.
    Delim(char),
}

impl TokenKind {
    /// Returns `true` for the tokens that may join two simple selector
    /// sequences: `+`, `>`, `~` and whitespace.
    pub fn is_combinator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Greater | TokenKind::Tilde | TokenKind::Whitespace
        )
    }

    /// Returns `true` for the attribute match operators, `=` included.
    pub fn is_match_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::Includes
                | TokenKind::DashMatch
                | TokenKind::PrefixMatch
                | TokenKind::SuffixMatch
                | TokenKind::SubstringMatch
        )
    }

    /// The punctuation singleton for `c`, if `c` is one of the characters
    /// that get a dedicated kind.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        let kind = match c {
            '+' => TokenKind::Plus,
            '>' => TokenKind::Greater,
            ',' => TokenKind::Comma,
            '~' => TokenKind::Tilde,
            '*' => TokenKind::Asterisk,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Period,
            '=' => TokenKind::Equals,
            _ => return None,
        };
        Some(kind)
    }

    /// The template keyword spelled by `ident`, compared case-insensitively.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident.to_ascii_lowercase().as_str() {
            "auto" => TokenKind::Auto,
            "min-content" => TokenKind::MinContent,
            "max-content" => TokenKind::MaxContent,
            "minmax" => TokenKind::MinMax,
            "fit-content" => TokenKind::FitContent,
            "same" => TokenKind::Same,
            _ => return None,
        };
        Some(kind)
    }
}

/// A scanned token: its kind and the exact text it was matched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// Char offset of the first character of `lexeme` in the input.
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, position: usize) -> Self {
        Self {
            kind,
            lexeme,
            position,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// The identifier name, if this is an identifier token. Template
    /// keywords are identifiers too outside template values, so they
    /// answer with their spelling.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            TokenKind::Auto
            | TokenKind::MinContent
            | TokenKind::MaxContent
            | TokenKind::MinMax
            | TokenKind::FitContent
            | TokenKind::Same => Some(self.lexeme),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{:?} '{}'", self.kind, self.lexeme),
        }
    }
}
