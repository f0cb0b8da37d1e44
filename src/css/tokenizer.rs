//! Hand-written CSS3 tokenizer with template-module keywords.
//!
//! Recognition order (first match wins):
//! 1. end of input
//! 2. `U+` unicode ranges (backs off to an identifier when no hex digit or
//!    `?` follows the `+`)
//! 3. identifiers, which become URIs, functions or template keywords
//! 4. `@` at-keywords
//! 5. numbers, percentages and dimensions
//! 6. `#` hashes
//! 7. quoted strings
//! 8. whitespace runs
//! 9. comments
//! 10. `<!--` / `-->`
//! 11. `~=` `|=` `^=` `$=` `*=`
//! 12. `:not(`, punctuation singletons and single-character delimiters
//!
//! Multi-character prefixes are matched by consuming characters and pushing
//! them back when the full sequence turns out not to match. The cursor is an
//! index into the decoded input, so pushing back is a subtraction.

use log::{debug, warn};

use crate::css::chars::{is_hex_digit, is_ident_char, is_ident_start, is_url_char, is_whitespace};
use crate::css::token::{Token, TokenKind};

/// Unrecoverable error at the character-stream level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexicalError {
    #[error("missing closing parenthesis in url token starting at {position}")]
    UnterminatedUri { position: usize },
}

const REPLACEMENT: char = '\u{FFFD}';

/// A lazy tokenizer over a borrowed input string.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<char>,
    /// Byte offset of each char, plus one trailing entry for `input.len()`.
    offsets: Vec<usize>,
    pos: usize,
    token_start: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut tokenizer = Self {
            input: "",
            chars: Vec::new(),
            offsets: Vec::new(),
            pos: 0,
            token_start: 0,
        };
        tokenizer.reset(input);
        tokenizer
    }

    /// Restart scanning at the beginning of `input`.
    pub fn reset(&mut self, input: &'a str) {
        self.input = input;
        self.chars.clear();
        self.offsets.clear();
        for (offset, c) in input.char_indices() {
            self.offsets.push(offset);
            self.chars.push(c);
        }
        self.offsets.push(input.len());
        self.pos = 0;
        self.token_start = 0;
    }

    /// Current char offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    // ── Cursor ───────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Undo the last `n` consumed characters of the current token.
    fn push_back(&mut self, n: usize) {
        debug_assert!(
            self.pos >= self.token_start + n,
            "cannot push back past the start of the current token"
        );
        self.pos -= n;
    }

    fn token(&self, kind: TokenKind) -> Token<'a> {
        let lexeme = &self.input[self.offsets[self.token_start]..self.offsets[self.pos]];
        Token::new(kind, lexeme, self.token_start)
    }

    // ── Lookahead predicates ─────────────────────────────────────────

    /// A backslash at `offset` that begins an escape (not a line continuation
    /// and not the last character of the input).
    fn is_escape_at(&self, offset: usize) -> bool {
        self.peek_at(offset) == Some('\\')
            && self
                .peek_at(offset + 1)
                .is_some_and(|c| !matches!(c, '\n' | '\r' | '\u{c}'))
    }

    fn is_name_start_at(&self, offset: usize) -> bool {
        match self.peek_at(offset) {
            Some('\\') => self.is_escape_at(offset),
            Some(c) => is_ident_start(c),
            None => false,
        }
    }

    /// `ident ::= '-'? nmstart nmchar*`
    fn at_ident_start(&self) -> bool {
        match self.peek() {
            Some('-') => self.is_name_start_at(1),
            Some(_) => self.is_name_start_at(0),
            None => false,
        }
    }

    fn at_name_char(&self) -> bool {
        match self.peek() {
            Some('\\') => self.is_escape_at(0),
            Some(c) => is_ident_char(c),
            None => false,
        }
    }

    fn at_number_start(&self) -> bool {
        let digit_at = |offset: usize| self.peek_at(offset).is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => digit_at(1),
            Some('+' | '-') => digit_at(1) || (self.peek_at(1) == Some('.') && digit_at(2)),
            _ => false,
        }
    }

    // ── Entry point ──────────────────────────────────────────────────

    /// Scan the next token. Once the input is exhausted every call returns
    /// an [`TokenKind::Eof`] token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexicalError> {
        self.token_start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.token(TokenKind::Eof));
        };

        if matches!(c, 'u' | 'U') {
            self.bump();
            if self.peek() == Some('+') {
                self.bump();
                if self.peek().is_some_and(|n| is_hex_digit(n) || n == '?') {
                    return Ok(self.scan_unicode_range());
                }
                self.push_back(1);
            }
            self.push_back(1);
        }

        if self.at_ident_start() {
            return self.scan_identifier();
        }

        if c == '@' {
            self.bump();
            if self.at_ident_start() {
                let name = self.gather_ident();
                return Ok(self.token(TokenKind::AtKeyword(name)));
            }
            self.push_back(1);
        }

        if self.at_number_start() {
            return Ok(self.scan_number());
        }

        if c == '#' {
            self.bump();
            if self.at_name_char() {
                let name = self.gather_name();
                return Ok(self.token(TokenKind::Hash(name)));
            }
            self.push_back(1);
        }

        if c == '"' || c == '\'' {
            let value = self.gather_string();
            return Ok(self.token(TokenKind::String(value)));
        }

        if is_whitespace(c) {
            while self.peek().is_some_and(is_whitespace) {
                self.bump();
            }
            return Ok(self.token(TokenKind::Whitespace));
        }

        if c == '/' {
            self.bump();
            if self.peek() == Some('*') {
                self.bump();
                return Ok(self.scan_comment());
            }
            self.push_back(1);
        }

        if c == '<' {
            let mut consumed = 0;
            for expected in ['<', '!', '-', '-'] {
                if self.peek() != Some(expected) {
                    break;
                }
                self.bump();
                consumed += 1;
            }
            if consumed == 4 {
                return Ok(self.token(TokenKind::Cdo));
            }
            self.push_back(consumed);
        }

        if c == '-' && self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>') {
            self.pos += 3;
            return Ok(self.token(TokenKind::Cdc));
        }

        if matches!(c, '~' | '|' | '^' | '$' | '*') {
            self.bump();
            if self.peek() == Some('=') {
                self.bump();
                let kind = match c {
                    '~' => TokenKind::Includes,
                    '|' => TokenKind::DashMatch,
                    '^' => TokenKind::PrefixMatch,
                    '$' => TokenKind::SuffixMatch,
                    _ => TokenKind::SubstringMatch,
                };
                return Ok(self.token(kind));
            }
            self.push_back(1);
        }

        if c == ':' {
            self.bump();
            let mut matched = 0;
            for expected in ['n', 'o', 't', '('] {
                match self.peek() {
                    Some(actual) if actual.eq_ignore_ascii_case(&expected) => {
                        self.bump();
                        matched += 1;
                    }
                    _ => break,
                }
            }
            if matched == 4 {
                return Ok(self.token(TokenKind::Not));
            }
            self.push_back(matched + 1);
        }

        self.bump();
        let kind = TokenKind::punctuation(c).unwrap_or(TokenKind::Delim(c));
        Ok(self.token(kind))
    }

    // ── Escapes, identifiers and names ───────────────────────────────

    /// Decode a backslash escape. The cursor must be on the backslash and
    /// [`Self::is_escape_at`] must hold.
    ///
    /// `\` + 1-6 hex digits decodes to that code point and swallows one
    /// following whitespace character (a CR also swallows the LF or FF right
    /// after it). `\` + any other character yields that character.
    fn consume_escape(&mut self) -> char {
        self.bump();
        let mut code: u32 = 0;
        let mut digits = 0;
        while digits < 6 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(value) => {
                    code = code * 16 + value;
                    self.bump();
                    digits += 1;
                }
                None => break,
            }
        }

        if digits == 0 {
            return self.bump().unwrap_or(REPLACEMENT);
        }

        if let Some(ws) = self.peek().filter(|&c| is_whitespace(c)) {
            self.bump();
            if ws == '\r' && matches!(self.peek(), Some('\n' | '\u{c}')) {
                self.bump();
            }
        }

        match code {
            0 => REPLACEMENT,
            _ => char::from_u32(code).unwrap_or(REPLACEMENT),
        }
    }

    fn gather_name_chars(&mut self, out: &mut String) {
        while let Some(c) = self.peek() {
            if c == '\\' {
                if !self.is_escape_at(0) {
                    break;
                }
                out.push(self.consume_escape());
            } else if is_ident_char(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Gather an identifier. [`Self::at_ident_start`] must hold.
    fn gather_ident(&mut self) -> String {
        let mut ident = String::new();
        if self.peek() == Some('-') {
            ident.push('-');
            self.bump();
        }
        self.gather_name_chars(&mut ident);
        ident
    }

    /// Gather a name (`nmchar+`), which unlike an identifier may start with
    /// a digit or a dash.
    fn gather_name(&mut self) -> String {
        let mut name = String::new();
        self.gather_name_chars(&mut name);
        name
    }

    fn scan_identifier(&mut self) -> Result<Token<'a>, LexicalError> {
        let ident = self.gather_ident();

        if self.peek() == Some('(') {
            if ident.eq_ignore_ascii_case("url") {
                return self.scan_uri();
            }
            self.bump();
            return Ok(self.token(TokenKind::Function(ident)));
        }

        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Ident(ident));
        Ok(self.token(kind))
    }

    // ── Numbers ──────────────────────────────────────────────────────

    fn scan_number(&mut self) -> Token<'a> {
        let number_start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }

        let text = &self.input[self.offsets[number_start]..self.offsets[self.pos]];
        let value: f64 = text.parse().unwrap_or_default();

        if self.at_ident_start() {
            let unit = self.gather_ident();
            return self.token(TokenKind::Dimension { value, unit });
        }
        if self.peek() == Some('%') {
            self.bump();
            return self.token(TokenKind::Percentage(value));
        }
        self.token(TokenKind::Number(value))
    }

    // ── Unicode ranges ───────────────────────────────────────────────

    /// Scan the digits of a unicode range; `u+` has been consumed and a hex
    /// digit or `?` follows.
    fn scan_unicode_range(&mut self) -> Token<'a> {
        let mut low: u32 = 0;
        let mut high: u32 = 0;
        let mut valid = true;
        let mut question_marks = false;
        let mut count = 0;

        while count < 6 {
            match self.peek() {
                Some('?') => {
                    question_marks = true;
                    low *= 16;
                    high = high * 16 + 0xF;
                }
                Some(c) if is_hex_digit(c) => {
                    if question_marks {
                        valid = false;
                    }
                    let digit = c.to_digit(16).unwrap_or(0);
                    low = low * 16 + digit;
                    high = high * 16 + digit;
                }
                _ => break,
            }
            self.bump();
            count += 1;
        }

        if self.peek() == Some('-') && self.peek_at(1).is_some_and(is_hex_digit) {
            if question_marks {
                valid = false;
            }
            self.bump();
            high = 0;
            let mut count = 0;
            while count < 6 {
                match self.peek().filter(|&c| is_hex_digit(c)).and_then(|c| c.to_digit(16)) {
                    Some(digit) => {
                        high = high * 16 + digit;
                        self.bump();
                        count += 1;
                    }
                    None => break,
                }
            }
        }

        if !valid {
            debug!("question marks must be a suffix of a unicode range");
        }
        self.token(TokenKind::UnicodeRange { low, high, valid })
    }

    // ── Strings, URIs and comments ───────────────────────────────────

    /// Gather a quoted string; the cursor is on the opening quote. An
    /// unterminated string yields whatever was read.
    fn gather_string(&mut self) -> String {
        let quote = self.bump().unwrap_or('"');
        let other_quote = if quote == '"' { '\'' } else { '"' };
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return value;
                }
                Some('\\') => match self.peek_at(1) {
                    Some('\n' | '\u{c}') => self.pos += 2,
                    Some('\r') => {
                        self.pos += 2;
                        if self.peek() == Some('\n') {
                            self.bump();
                        }
                    }
                    Some(_) => value.push(self.consume_escape()),
                    None => {
                        self.bump();
                    }
                },
                Some(c) if c == ' ' || c == other_quote || is_url_char(c) => {
                    value.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        warn!("unterminated string at {}: {value:?}", self.token_start);
        value
    }

    /// Scan `url(...)`; `url` has been consumed and the cursor is on `(`.
    fn scan_uri(&mut self) -> Result<Token<'a>, LexicalError> {
        self.bump();
        self.skip_whitespace();

        let mut uri = String::new();
        match self.peek() {
            Some('"' | '\'') => uri = self.gather_string(),
            _ => loop {
                match self.peek() {
                    Some('\\') if self.is_escape_at(0) => uri.push(self.consume_escape()),
                    Some(c) if is_url_char(c) && c != ')' => {
                        uri.push(c);
                        self.bump();
                    }
                    _ => break,
                }
            },
        }

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(self.token(TokenKind::Uri(uri)));
        }
        Err(LexicalError::UnterminatedUri {
            position: self.token_start,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
    }

    /// Scan to the closing `*/`; `/*` has been consumed.
    fn scan_comment(&mut self) -> Token<'a> {
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return self.token(TokenKind::Comment);
                }
                Some(_) => {}
                None => {
                    warn!("unterminated comment at {}", self.token_start);
                    return self.token(TokenKind::Comment);
                }
            }
        }
    }
}

/// Tokenize all of `input`, excluding the trailing end-of-input token.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexicalError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        if token.is_eof() {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: tokenize and return just the token kinds.
    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap_or_else(|e| panic!("tokenize failed: {e}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn single(input: &str) -> Token<'_> {
        let tokens = tokenize(input).unwrap_or_else(|e| panic!("tokenize failed: {e}"));
        assert_eq!(tokens.len(), 1, "expected one token for {input:?}: {tokens:?}");
        tokens.into_iter().next().unwrap()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.into())
    }

    // ── Eof ──────────────────────────────────────────────────────────

    #[test]
    fn eof_repeats() {
        let mut tokenizer = Tokenizer::new("a");
        assert_eq!(tokenizer.next_token().unwrap().kind, ident("a"));
        for _ in 0..3 {
            assert!(tokenizer.next_token().unwrap().is_eof());
        }
    }

    #[test]
    fn reset_restarts() {
        let mut tokenizer = Tokenizer::new("a b");
        tokenizer.next_token().unwrap();
        tokenizer.reset("c");
        assert_eq!(tokenizer.next_token().unwrap().kind, ident("c"));
    }

    // ── Punctuation ──────────────────────────────────────────────────

    #[test]
    fn punctuation_singletons() {
        assert_eq!(
            kinds("+>,~*{}():;.="),
            vec![
                TokenKind::Plus,
                TokenKind::Greater,
                TokenKind::Comma,
                TokenKind::Tilde,
                TokenKind::Asterisk,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Period,
                TokenKind::Equals,
            ]
        );
    }

    #[test]
    fn other_characters_are_delims() {
        assert_eq!(
            kinds("[/]!"),
            vec![
                TokenKind::Delim('['),
                TokenKind::Delim('/'),
                TokenKind::Delim(']'),
                TokenKind::Delim('!'),
            ]
        );
    }

    #[test]
    fn match_operators() {
        assert_eq!(
            kinds("~=|=^=$=*="),
            vec![
                TokenKind::Includes,
                TokenKind::DashMatch,
                TokenKind::PrefixMatch,
                TokenKind::SuffixMatch,
                TokenKind::SubstringMatch,
            ]
        );
    }

    #[test]
    fn match_operator_prefix_backs_off() {
        assert_eq!(kinds("~a"), vec![TokenKind::Tilde, ident("a")]);
        assert_eq!(kinds("|"), vec![TokenKind::Delim('|')]);
        assert_eq!(kinds("* "), vec![TokenKind::Asterisk, TokenKind::Whitespace]);
    }

    // ── Identifiers and keywords ─────────────────────────────────────

    #[test]
    fn identifiers() {
        assert_eq!(
            kinds("color -moz-box _x a1"),
            vec![
                ident("color"),
                TokenKind::Whitespace,
                ident("-moz-box"),
                TokenKind::Whitespace,
                ident("_x"),
                TokenKind::Whitespace,
                ident("a1"),
            ]
        );
    }

    #[test]
    fn template_keywords() {
        assert_eq!(
            kinds("auto min-content MAX-CONTENT minmax fit-content same"),
            vec![
                TokenKind::Auto,
                TokenKind::Whitespace,
                TokenKind::MinContent,
                TokenKind::Whitespace,
                TokenKind::MaxContent,
                TokenKind::Whitespace,
                TokenKind::MinMax,
                TokenKind::Whitespace,
                TokenKind::FitContent,
                TokenKind::Whitespace,
                TokenKind::Same,
            ]
        );
    }

    #[test]
    fn functions() {
        let token = single("rgb(");
        assert_eq!(token.kind, TokenKind::Function("rgb".into()));
        assert_eq!(token.lexeme, "rgb(");
        assert_eq!(
            kinds("minmax(10px"),
            vec![
                TokenKind::Function("minmax".into()),
                TokenKind::Dimension {
                    value: 10.0,
                    unit: "px".into()
                },
            ]
        );
    }

    #[test]
    fn dash_without_ident_start_is_not_an_identifier() {
        assert_eq!(kinds("- a"), vec![TokenKind::Delim('-'), TokenKind::Whitespace, ident("a")]);
    }

    #[test]
    fn non_ascii_identifiers() {
        assert_eq!(kinds("café 日本"), vec![ident("café"), TokenKind::Whitespace, ident("日本")]);
    }

    // ── Escapes ──────────────────────────────────────────────────────

    #[test]
    fn hex_escapes_decode() {
        assert_eq!(single(r"\48\65\6C\6C\6F").kind, ident("Hello"));
    }

    #[test]
    fn hex_escape_swallows_one_whitespace() {
        let tokens = tokenize("\\41 B").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, ident("AB"));

        // Only one whitespace character is swallowed.
        assert_eq!(kinds("\\41  B"), vec![ident("A"), TokenKind::Whitespace, ident("B")]);
    }

    #[test]
    fn hex_escape_swallows_crlf_pair() {
        assert_eq!(kinds("\\41\r\nB"), vec![ident("AB")]);
    }

    #[test]
    fn non_hex_escape_keeps_the_character() {
        assert_eq!(single(r"di\v").kind, ident("div"));
        assert_eq!(single(r"\t\o\p").kind, ident("top"));
    }

    #[test]
    fn escape_may_start_an_identifier() {
        assert_eq!(single(r"\32 x").kind, ident("2x"));
    }

    // ── At-keywords and hashes ───────────────────────────────────────

    #[test]
    fn at_keyword() {
        assert_eq!(single("@media").kind, TokenKind::AtKeyword("media".into()));
        assert_eq!(kinds("@ "), vec![TokenKind::Delim('@'), TokenKind::Whitespace]);
    }

    #[test]
    fn hash() {
        assert_eq!(single("#main").kind, TokenKind::Hash("main".into()));
        assert_eq!(single("#1a").kind, TokenKind::Hash("1a".into()));
        assert_eq!(kinds("# "), vec![TokenKind::Delim('#'), TokenKind::Whitespace]);
    }

    // ── Numbers ──────────────────────────────────────────────────────

    #[test]
    fn numbers() {
        assert_eq!(single("42").kind, TokenKind::Number(42.0));
        assert_eq!(single("-3.5").kind, TokenKind::Number(-3.5));
        assert_eq!(single(".5").kind, TokenKind::Number(0.5));
        assert_eq!(single("+.5").kind, TokenKind::Number(0.5));
    }

    #[test]
    fn only_one_fraction_dot() {
        assert_eq!(
            kinds("1.2.3"),
            vec![TokenKind::Number(1.2), TokenKind::Number(0.3)]
        );
    }

    #[test]
    fn percentages_and_dimensions() {
        assert_eq!(single("50%").kind, TokenKind::Percentage(50.0));
        let token = single("12.5em");
        assert_eq!(
            token.kind,
            TokenKind::Dimension {
                value: 12.5,
                unit: "em".into()
            }
        );
        assert_eq!(token.lexeme, "12.5em");
    }

    #[test]
    fn sign_without_digit_is_punctuation() {
        assert_eq!(kinds("+ ."), vec![TokenKind::Plus, TokenKind::Whitespace, TokenKind::Period]);
    }

    // ── Strings ──────────────────────────────────────────────────────

    #[test]
    fn strings() {
        let token = single(r#""aa bb""#);
        assert_eq!(token.kind, TokenKind::String("aa bb".into()));
        assert_eq!(token.lexeme, r#""aa bb""#);
        assert_eq!(single(r#"'it"s'"#).kind, TokenKind::String("it\"s".into()));
    }

    #[test]
    fn string_line_continuation_is_elided() {
        assert_eq!(single("\"ab\\\ncd\"").kind, TokenKind::String("abcd".into()));
    }

    #[test]
    fn string_escape_is_decoded() {
        assert_eq!(single(r#""\41 b""#).kind, TokenKind::String("Ab".into()));
    }

    #[test]
    fn unterminated_string_is_tolerated() {
        assert_eq!(single("\"abc").kind, TokenKind::String("abc".into()));
    }

    // ── URIs ─────────────────────────────────────────────────────────

    #[test]
    fn uris() {
        assert_eq!(single("url(a.png)").kind, TokenKind::Uri("a.png".into()));
        assert_eq!(single("URL( \"b c.png\" )").kind, TokenKind::Uri("b c.png".into()));
    }

    #[test]
    fn unterminated_uri_is_a_lexical_error() {
        let mut tokenizer = Tokenizer::new("url(a.png");
        assert_eq!(
            tokenizer.next_token(),
            Err(LexicalError::UnterminatedUri { position: 0 })
        );
    }

    // ── Unicode ranges ───────────────────────────────────────────────

    #[test]
    fn unicode_ranges() {
        assert_eq!(
            single("U+416").kind,
            TokenKind::UnicodeRange {
                low: 0x416,
                high: 0x416,
                valid: true
            }
        );
        assert_eq!(
            single("u+4??").kind,
            TokenKind::UnicodeRange {
                low: 0x400,
                high: 0x4FF,
                valid: true
            }
        );
        assert_eq!(
            single("U+400-4ff").kind,
            TokenKind::UnicodeRange {
                low: 0x400,
                high: 0x4FF,
                valid: true
            }
        );
    }

    #[test]
    fn unicode_range_with_inner_question_mark_is_flagged() {
        assert_eq!(
            single("U+4?4").kind,
            TokenKind::UnicodeRange {
                low: 0x404,
                high: 0x4F4,
                valid: false
            }
        );
    }

    #[test]
    fn u_plus_without_digits_backs_off_to_identifier() {
        assert_eq!(kinds("u+x"), vec![ident("u"), TokenKind::Plus, ident("x")]);
    }

    // ── Whitespace, comments, CDO/CDC ────────────────────────────────

    #[test]
    fn whitespace_runs_collapse() {
        let tokens = tokenize("a \t\r\n\u{c} b").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].lexeme, " \t\r\n\u{c} ");
    }

    #[test]
    fn comments() {
        let token = single("/* x */");
        assert_eq!(token.kind, TokenKind::Comment);
        assert_eq!(token.lexeme, "/* x */");
        assert_eq!(single("/* open").kind, TokenKind::Comment);
        assert_eq!(kinds("/a"), vec![TokenKind::Delim('/'), ident("a")]);
    }

    #[test]
    fn cdo_and_cdc() {
        assert_eq!(kinds("<!---->"), vec![TokenKind::Cdo, TokenKind::Cdc]);
        assert_eq!(
            kinds("<!-a"),
            vec![TokenKind::Delim('<'), TokenKind::Delim('!'), ident("-a")]
        );
        assert_eq!(kinds("<"), vec![TokenKind::Delim('<')]);
    }

    // ── Negation ─────────────────────────────────────────────────────

    #[test]
    fn not_token() {
        assert_eq!(kinds(":NOT("), vec![TokenKind::Not]);
        assert_eq!(kinds(":nth"), vec![TokenKind::Colon, ident("nth")]);
        assert_eq!(kinds(":not"), vec![TokenKind::Colon, ident("not")]);
    }

    // ── Round trip ───────────────────────────────────────────────────

    #[test]
    fn lexemes_reassemble_the_input() {
        let input = "div#g.x > p[href^='a'] { display: \"aa\" \"bc\" / 10px * min-content; \
                     font: 12px/1.5 \\66oo; background: url( x.png ) } <!-- u+0-7F -->";
        let tokens = tokenize(input).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.lexeme).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn positions_are_char_offsets() {
        let tokens = tokenize("é a").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn token_stream_snapshot() {
        let rendered: Vec<String> = tokenize("a>b{x:1px}")
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r###"
        Ident("a") 'a'
        Greater '>'
        Ident("b") 'b'
        LeftBrace '{'
        Ident("x") 'x'
        Colon ':'
        Dimension { value: 1.0, unit: "px" } '1px'
        RightBrace '}'
        "###);
    }
}
