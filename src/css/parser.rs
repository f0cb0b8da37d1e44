//! Recursive descent CSS parser with Template Layout extensions.
//!
//! Parses style sheet text into a [`StyleSheet`]. Selectors follow the CSS3
//! Selectors grammar and are kept as normalized text; declaration values are
//! re-serialized from their tokens, except for two properties:
//!
//! - `display` whose value starts with a string is a template definition.
//!   The template is built and registered with the [`LayoutSession`], and
//!   the declaration is linked to it.
//! - `position` whose value is a single one-character identifier binds the
//!   rule's selector to that slot.
//!
//! A malformed rule is logged, recorded as a [`Diagnostic`] and skipped; a
//! malformed template definition only drops its own declaration.

use log::{debug, error, warn};

use crate::css::model::{Declaration, Diagnostic, Rule, StyleSheet};
use crate::css::token::{Token, TokenKind};
use crate::css::tokenizer::{LexicalError, Tokenizer};
use crate::session::LayoutSession;
use crate::template::{create_template, Height, Length, PositionedElement, Row, TemplateError, Width};

/// `position` values that are ordinary CSS keywords rather than slot names.
const POSITION_KEYWORDS: &[&str] = &[
    "static", "relative", "absolute", "fixed", "sticky", "inherit", "initial", "unset",
];

/// Errors from CSS parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Parse a style sheet, registering its templates and positioned elements
/// with `session`.
pub fn parse(input: &str, session: &mut LayoutSession) -> StyleSheet {
    let mut parser = Parser::new(input, session);
    parser.parse_stylesheet();
    StyleSheet {
        rules: parser.rules,
        diagnostics: parser.diagnostics,
    }
}

/// Recursive descent parser state.
struct Parser<'a, 's> {
    tokenizer: Tokenizer<'a>,
    current: Token<'a>,
    session: &'s mut LayoutSession,
    /// Selector text of the rule being parsed, built as it is read.
    selector_text: String,
    /// Open braces of the rule being parsed.
    depth: usize,
    /// Collects the lexemes of consumed tokens while a value is read.
    recording: Option<String>,
    rules: Vec<Rule>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, 's> Parser<'a, 's> {
    fn new(input: &'a str, session: &'s mut LayoutSession) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            // Placeholder; the first whitespace skip loads the real token.
            current: Token::new(TokenKind::Whitespace, "", 0),
            session,
            selector_text: String::new(),
            depth: 0,
            recording: None,
            rules: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // ── Token cursor ─────────────────────────────────────────────────

    /// Consume the current token and load the next one, skipping comments.
    fn advance(&mut self) -> Result<(), ParseError> {
        if let Some(recording) = &mut self.recording {
            match self.current.kind {
                TokenKind::Whitespace => recording.push(' '),
                _ => recording.push_str(self.current.lexeme),
            }
        }
        loop {
            match self.tokenizer.next_token() {
                Ok(token) if token.kind == TokenKind::Comment => continue,
                Ok(token) => {
                    self.current = token;
                    return Ok(());
                }
                Err(e) => {
                    self.current = Token::new(TokenKind::Whitespace, "", self.tokenizer.position());
                    return Err(e.into());
                }
            }
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    /// Skip whitespace, reporting whether there was any.
    fn skip_whitespace(&mut self) -> Result<bool, ParseError> {
        let mut skipped = false;
        while self.at(&TokenKind::Whitespace) {
            self.advance()?;
            skipped = true;
        }
        Ok(skipped)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.current.kind != kind {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        let name = self
            .current
            .ident()
            .map(str::to_owned)
            .ok_or_else(|| self.unexpected(expected))?;
        self.advance()?;
        Ok(name)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current.kind {
            TokenKind::Eof => ParseError::UnexpectedEof(format!("expected {expected}")),
            _ => ParseError::UnexpectedToken {
                position: self.current.position,
                message: format!("expected {expected}, got {}", self.current),
            },
        }
    }

    fn start_recording(&mut self) {
        self.recording = Some(String::new());
    }

    fn finish_recording(&mut self) -> String {
        let text = self.recording.take().unwrap_or_default();
        text.trim().to_owned()
    }

    // ── Error recovery ───────────────────────────────────────────────

    fn report(&mut self, e: &ParseError) {
        error!("dropping rule '{}': {e}", self.selector_text);
        self.diagnostics.push(Diagnostic {
            selector_text: self.selector_text.clone(),
            message: e.to_string(),
        });
    }

    /// Skip to the end of the current rule: past the `}` that closes its
    /// block, or to end of input.
    fn recover(&mut self) {
        self.recording = None;
        let mut depth = self.depth;
        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace if depth <= 1 => {
                    if let Err(e) = self.advance() {
                        debug!("error while skipping rule: {e}");
                    }
                    break;
                }
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            if let Err(e) = self.advance() {
                debug!("error while skipping rule: {e}");
            }
        }
        self.depth = 0;
    }

    /// Skip to the end of the current declaration, leaving a closing `}`
    /// for the rule.
    fn recover_declaration(&mut self) {
        self.recording = None;
        while !matches!(
            self.current.kind,
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        ) {
            if let Err(e) = self.advance() {
                debug!("error while skipping declaration: {e}");
            }
        }
    }

    // ── Style sheet ──────────────────────────────────────────────────

    fn parse_stylesheet(&mut self) {
        loop {
            self.selector_text.clear();
            self.depth = 0;

            if let Err(e) = self.skip_top_level_noise() {
                self.report(&e);
                self.recover();
                continue;
            }

            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::AtKeyword(name) => {
                    warn!("skipping unsupported at-rule @{name}");
                    self.skip_at_rule();
                    continue;
                }
                _ => {}
            }

            match self.parse_rule() {
                Ok(rule) => {
                    debug!("parsed rule '{}' ({} declarations)", rule.selector_text, rule.declarations.len());
                    self.rules.push(rule);
                }
                Err(e) => {
                    self.report(&e);
                    self.recover();
                }
            }
        }
    }

    fn skip_top_level_noise(&mut self) -> Result<(), ParseError> {
        while matches!(
            self.current.kind,
            TokenKind::Whitespace | TokenKind::Cdo | TokenKind::Cdc
        ) {
            self.advance()?;
        }
        Ok(())
    }

    fn skip_at_rule(&mut self) {
        let mut depth = 0usize;
        loop {
            let done = match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => depth == 0,
                TokenKind::LeftBrace => {
                    depth += 1;
                    false
                }
                TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    depth == 0
                }
                _ => false,
            };
            if let Err(e) = self.advance() {
                debug!("error while skipping at-rule: {e}");
            }
            if done {
                break;
            }
        }
    }

    /// `ruleset := selectors_group '{' S* declaration? (';' S* declaration?)* '}'`
    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        self.parse_selectors_group()?;
        self.expect(TokenKind::LeftBrace, "'{'")?;
        self.depth = 1;

        let mut rule = Rule::new(self.selector_text.clone());
        loop {
            self.skip_whitespace()?;
            match &self.current.kind {
                TokenKind::RightBrace => {
                    self.advance()?;
                    self.depth = 0;
                    return Ok(rule);
                }
                TokenKind::Semicolon => self.advance()?,
                TokenKind::Eof => {
                    warn!("unclosed block for '{}' at end of input", rule.selector_text);
                    return Ok(rule);
                }
                _ => self.parse_declaration(&mut rule)?,
            }
        }
    }

    // ── Selectors ────────────────────────────────────────────────────

    /// `selectors_group := selector (',' S* selector)*`
    fn parse_selectors_group(&mut self) -> Result<(), ParseError> {
        self.parse_selector()?;
        while self.at(&TokenKind::Comma) {
            self.advance()?;
            self.skip_whitespace()?;
            self.selector_text.push_str(", ");
            self.parse_selector()?;
        }
        Ok(())
    }

    /// `selector := simple_selector_sequence (combinator simple_selector_sequence)*`
    ///
    /// Whitespace is a descendant combinator only when another sequence
    /// follows it; before `{` or `,` it is insignificant.
    fn parse_selector(&mut self) -> Result<(), ParseError> {
        self.parse_simple_selector_sequence()?;
        loop {
            let spaced = self.skip_whitespace()?;
            match self.current.kind {
                // Whitespace was just skipped, so this is `+`, `>` or `~`.
                ref kind if kind.is_combinator() => {
                    let combinator = self.current.lexeme;
                    self.selector_text.push(' ');
                    self.selector_text.push_str(combinator);
                    self.selector_text.push(' ');
                    self.advance()?;
                    self.skip_whitespace()?;
                    self.parse_simple_selector_sequence()?;
                }
                _ if spaced && self.at_sequence_start() => {
                    self.selector_text.push(' ');
                    self.parse_simple_selector_sequence()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn at_sequence_start(&self) -> bool {
        self.current.ident().is_some()
            || matches!(
                self.current.kind,
                TokenKind::Asterisk
                    | TokenKind::Hash(_)
                    | TokenKind::Period
                    | TokenKind::Delim('[')
                    | TokenKind::Colon
                    | TokenKind::Not
            )
    }

    /// `simple_selector_sequence := (type | '*')? (HASH | class | attrib | pseudo | negation)*`,
    /// at least one component.
    fn parse_simple_selector_sequence(&mut self) -> Result<(), ParseError> {
        let mut matched = self.parse_type_or_universal()?;
        loop {
            let found = match self.current.kind {
                TokenKind::Not => {
                    self.parse_negation()?;
                    true
                }
                _ => self.parse_qualifier()?,
            };
            if !found {
                break;
            }
            matched = true;
        }
        if !matched {
            return Err(self.unexpected("selector"));
        }
        Ok(())
    }

    fn parse_type_or_universal(&mut self) -> Result<bool, ParseError> {
        if let Some(name) = self.current.ident().map(str::to_owned) {
            self.selector_text.push_str(&name);
            self.advance()?;
            return Ok(true);
        }
        if self.at(&TokenKind::Asterisk) {
            self.selector_text.push('*');
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// One of HASH, class, attrib or pseudo. Returns `false` when none
    /// starts here.
    fn parse_qualifier(&mut self) -> Result<bool, ParseError> {
        match &self.current.kind {
            TokenKind::Hash(name) => {
                self.selector_text.push('#');
                self.selector_text.push_str(name);
                self.advance()?;
            }
            TokenKind::Period => {
                self.advance()?;
                let class = self.expect_ident("class name")?;
                self.selector_text.push('.');
                self.selector_text.push_str(&class);
            }
            TokenKind::Delim('[') => self.parse_attrib()?,
            TokenKind::Colon => self.parse_pseudo()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// `attrib := '[' S* IDENT S* (match_operator S* (IDENT | STRING) S*)? ']'`
    fn parse_attrib(&mut self) -> Result<(), ParseError> {
        self.advance()?;
        self.selector_text.push('[');
        self.skip_whitespace()?;
        let name = self.expect_ident("attribute name")?;
        self.selector_text.push_str(&name);
        self.skip_whitespace()?;

        if self.current.kind.is_match_operator() {
            self.selector_text.push_str(self.current.lexeme);
            self.advance()?;
            self.skip_whitespace()?;
            match &self.current.kind {
                TokenKind::String(value) => {
                    self.selector_text.push('"');
                    self.selector_text.push_str(value);
                    self.selector_text.push('"');
                    self.advance()?;
                }
                _ => {
                    let value = self.expect_ident("attribute value")?;
                    self.selector_text.push_str(&value);
                }
            }
            self.skip_whitespace()?;
        }

        self.expect(TokenKind::Delim(']'), "']'")?;
        self.selector_text.push(']');
        Ok(())
    }

    /// `pseudo := ':' ':'? (IDENT | FUNCTION S* expression ')')`
    fn parse_pseudo(&mut self) -> Result<(), ParseError> {
        self.advance()?;
        self.selector_text.push(':');
        if self.at(&TokenKind::Colon) {
            self.advance()?;
            self.selector_text.push(':');
        }

        if let TokenKind::Function(name) = &self.current.kind {
            self.selector_text.push_str(name);
            self.selector_text.push('(');
            self.advance()?;
            self.skip_whitespace()?;
            self.parse_expression()?;
            self.expect(TokenKind::RightParen, "')'")?;
            self.selector_text.push(')');
            return Ok(());
        }

        let name = self.expect_ident("pseudo-class name")?;
        self.selector_text.push_str(&name);
        Ok(())
    }

    /// `expression := (('+' | '-' | DIMENSION | NUMBER | STRING | IDENT) S*)+`
    fn parse_expression(&mut self) -> Result<(), ParseError> {
        let mut terms = 0;
        loop {
            let term = match &self.current.kind {
                TokenKind::Plus
                | TokenKind::Delim('-')
                | TokenKind::Dimension { .. }
                | TokenKind::Number(_)
                | TokenKind::String(_) => true,
                _ => self.current.ident().is_some(),
            };
            if !term {
                break;
            }
            self.selector_text.push_str(self.current.lexeme);
            self.advance()?;
            self.skip_whitespace()?;
            terms += 1;
        }
        if terms == 0 {
            return Err(self.unexpected("expression"));
        }
        Ok(())
    }

    /// `negation := NOT S* negation_arg S* ')'` where `negation_arg` is a
    /// type, universal, HASH, class, attrib or pseudo selector.
    fn parse_negation(&mut self) -> Result<(), ParseError> {
        self.advance()?;
        self.selector_text.push_str(":not(");
        self.skip_whitespace()?;
        if !self.parse_type_or_universal()? && !self.parse_qualifier()? {
            return Err(self.unexpected("negation argument"));
        }
        self.skip_whitespace()?;
        self.expect(TokenKind::RightParen, "')'")?;
        self.selector_text.push(')');
        Ok(())
    }

    // ── Declarations ─────────────────────────────────────────────────

    /// `declaration := IDENT S* ':' S* value`
    fn parse_declaration(&mut self, rule: &mut Rule) -> Result<(), ParseError> {
        let property = self.expect_ident("property name")?.to_ascii_lowercase();
        self.skip_whitespace()?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_whitespace()?;

        if property == "display" && matches!(self.current.kind, TokenKind::String(_)) {
            self.parse_template_declaration(rule);
            return Ok(());
        }

        self.start_recording();
        let mut tokens = Vec::new();
        while !self.at_declaration_end() {
            if self.at(&TokenKind::LeftBrace) {
                self.recording = None;
                return Err(self.unexpected("declaration value"));
            }
            if !self.at(&TokenKind::Whitespace) {
                tokens.push(self.current.clone());
            }
            self.advance()?;
        }
        let value = self.finish_recording();

        if property == "position" {
            if let [token] = tokens.as_slice() {
                self.register_position(rule, token);
            }
        }

        rule.declarations.add(Declaration::new(property, value));
        Ok(())
    }

    fn at_declaration_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        )
    }

    fn register_position(&mut self, rule: &Rule, token: &Token<'a>) {
        let Some(name) = token.ident() else { return };
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(slot), None) => {
                debug!("'{}' is positioned into slot '{slot}'", rule.selector_text);
                self.session.register_positioned(PositionedElement {
                    selector_text: rule.selector_text.clone(),
                    slot,
                });
            }
            _ if POSITION_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(name)) => {}
            _ => warn!(
                "'{}' has position '{name}', which can never name a slot; ignored",
                rule.selector_text
            ),
        }
    }

    // ── Template definitions ─────────────────────────────────────────

    /// Parse a `display` template value. Failure drops this declaration
    /// only.
    fn parse_template_declaration(&mut self, rule: &mut Rule) {
        self.start_recording();
        let result = self.parse_template_definition();
        match result {
            Ok((rows, widths)) => {
                let css_text = self.finish_recording();
                match create_template(rows, widths, rule.selector_text.clone(), css_text.clone()) {
                    Ok(template) => {
                        let index = self.session.register_template(template);
                        rule.declarations
                            .add(Declaration::new("display", css_text).with_template(index));
                    }
                    Err(e) => self.drop_template(rule, e.into()),
                }
            }
            Err(e) => {
                self.drop_template(rule, e);
                self.recover_declaration();
            }
        }
    }

    fn drop_template(&mut self, rule: &Rule, e: ParseError) {
        error!("dropping template of '{}': {e}", rule.selector_text);
        self.recording = None;
        self.diagnostics.push(Diagnostic {
            selector_text: rule.selector_text.clone(),
            message: e.to_string(),
        });
    }

    /// `template := (STRING S* ('/' S* row_height S*)?)+ (column_width S*)*`
    fn parse_template_definition(&mut self) -> Result<(Vec<Row>, Vec<Width>), ParseError> {
        let mut rows = Vec::new();
        while let TokenKind::String(columns) = &self.current.kind {
            let columns = columns.clone();
            self.advance()?;
            self.skip_whitespace()?;

            let mut height = Height::DEFAULT;
            if self.at(&TokenKind::Delim('/')) {
                self.advance()?;
                self.skip_whitespace()?;
                height = self.parse_row_height()?;
                self.skip_whitespace()?;
            }
            rows.push(Row::new(&columns, height));
        }

        let mut widths = Vec::new();
        while !self.at_declaration_end() {
            widths.push(self.parse_column_width()?);
            self.skip_whitespace()?;
        }
        Ok((rows, widths))
    }

    fn parse_row_height(&mut self) -> Result<Height, ParseError> {
        let height = match self.current.kind {
            TokenKind::Auto => Height::Auto,
            TokenKind::Asterisk => Height::Equal,
            _ => return Ok(Height::Length(self.parse_length("row height")?)),
        };
        self.advance()?;
        Ok(height)
    }

    fn parse_column_width(&mut self) -> Result<Width, ParseError> {
        let width = match &self.current.kind {
            TokenKind::Asterisk => Width::Equal,
            TokenKind::MinContent => Width::MinContent,
            TokenKind::MaxContent => Width::MaxContent,
            TokenKind::FitContent => Width::FitContent,
            TokenKind::Function(name) if name.eq_ignore_ascii_case("minmax") => {
                self.advance()?;
                return self.parse_minmax_arguments();
            }
            TokenKind::MinMax => {
                self.advance()?;
                self.skip_whitespace()?;
                self.expect(TokenKind::LeftParen, "'('")?;
                return self.parse_minmax_arguments();
            }
            _ => return Ok(Width::Length(self.parse_length("column width")?)),
        };
        self.advance()?;
        Ok(width)
    }

    /// `S* length S* ',' S* length S* ')'`, after the opening parenthesis.
    fn parse_minmax_arguments(&mut self) -> Result<Width, ParseError> {
        self.skip_whitespace()?;
        let low = self.parse_length("minimum width")?;
        self.skip_whitespace()?;
        self.expect(TokenKind::Comma, "','")?;
        self.skip_whitespace()?;
        let high = self.parse_length("maximum width")?;
        self.skip_whitespace()?;
        self.expect(TokenKind::RightParen, "')'")?;
        Ok(Width::MinMax(low, high))
    }

    /// A dimension, a percentage or a unitless zero.
    fn parse_length(&mut self, expected: &str) -> Result<Length, ParseError> {
        let length = match &self.current.kind {
            TokenKind::Dimension { value, unit } => Length::parse(*value, unit)?,
            TokenKind::Percentage(value) => Length::parse(*value, "%")?,
            TokenKind::Number(value) if *value == 0.0 => Length::ZERO,
            TokenKind::Number(value) if *value < 0.0 => {
                return Err(TemplateError::NegativeLength { value: *value }.into())
            }
            _ => return Err(self.unexpected(expected)),
        };
        self.advance()?;
        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::template::LengthUnit;
    use pretty_assertions::assert_eq;

    fn parse_with_session(input: &str) -> (StyleSheet, LayoutSession) {
        let mut session = LayoutSession::new(LayoutConfig::default());
        let sheet = parse(input, &mut session);
        (sheet, session)
    }

    fn parse_sheet(input: &str) -> StyleSheet {
        parse_with_session(input).0
    }

    fn selectors(input: &str) -> Vec<String> {
        parse_sheet(input)
            .rules
            .into_iter()
            .map(|r| r.selector_text)
            .collect()
    }

    // ── Rules and declarations ───────────────────────────────────────

    #[test]
    fn parse_simple_rule() {
        let sheet = parse_sheet("div { color: red; margin: 0 auto }");
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selector_text, "div");
        assert_eq!(rule.declarations.value("color"), Some("red"));
        assert_eq!(rule.declarations.value("margin"), Some("0 auto"));
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn parse_multiple_rules() {
        let sheet = parse_sheet("a { x: 1 } /* note */ b { y: 2; } <!-- c { z: 3 } -->");
        assert_eq!(selectors_of(&sheet), vec!["a", "b", "c"]);
    }

    fn selectors_of(sheet: &StyleSheet) -> Vec<&str> {
        sheet.rules.iter().map(|r| r.selector_text.as_str()).collect()
    }

    #[test]
    fn empty_input() {
        let sheet = parse_sheet("  \n ");
        assert!(sheet.is_empty());
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn values_are_reserialized() {
        let sheet = parse_sheet("p{font : 12px/1.5  \"Open Sans\" , serif !important;}");
        assert_eq!(
            sheet.rules[0].declarations.value("font"),
            Some("12px/1.5 \"Open Sans\" , serif !important")
        );
    }

    #[test]
    fn property_names_are_lowercased() {
        let sheet = parse_sheet("p { COLOR: Red }");
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("Red"));
    }

    #[test]
    fn duplicate_declaration_keeps_last_value() {
        let sheet = parse_sheet("p { color: red; color: blue }");
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("blue"));
    }

    #[test]
    fn unclosed_block_at_end_of_input_is_kept() {
        let sheet = parse_sheet("p { color: red");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("red"));
    }

    #[test]
    fn at_rules_are_skipped() {
        let sheet = parse_sheet("@import url(a.css); @media print { p { x: 1 } } q { y: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
    }

    // ── Selectors ────────────────────────────────────────────────────

    #[test]
    fn selector_combinators_are_normalized() {
        assert_eq!(
            selectors("a>b{} a  b {} a+b{} a ~ b{}"),
            vec!["a > b", "a b", "a + b", "a ~ b"]
        );
    }

    #[test]
    fn trailing_whitespace_is_not_a_combinator() {
        assert_eq!(selectors("div#main   {}"), vec!["div#main"]);
    }

    #[test]
    fn selector_groups() {
        assert_eq!(selectors("h1,h2 ,  h3{}"), vec!["h1, h2, h3"]);
    }

    #[test]
    fn compound_selectors() {
        assert_eq!(
            selectors("*.note{} ul li.item:first-child{} a::before{} #g.x.y{}"),
            vec!["*.note", "ul li.item:first-child", "a::before", "#g.x.y"]
        );
    }

    #[test]
    fn attribute_selectors() {
        assert_eq!(
            selectors("a[href]{} a[ href ^= 'http' ]{} p[lang|=en]{}"),
            vec!["a[href]", "a[href^=\"http\"]", "p[lang|=en]"]
        );
    }

    #[test]
    fn functional_pseudo_classes() {
        assert_eq!(
            selectors("li:nth-child(2n+1){} p:lang(fr){}"),
            vec!["li:nth-child(2n+1)", "p:lang(fr)"]
        );
    }

    #[test]
    fn negation() {
        assert_eq!(
            selectors("p:not(.a){} :NOT( #x ){} a:not([href]){}"),
            vec!["p:not(.a)", ":not(#x)", "a:not([href])"]
        );
    }

    #[test]
    fn keywords_are_names_in_selectors() {
        assert_eq!(selectors(".auto same{}"), vec![".auto same"]);
    }

    // ── Error recovery ───────────────────────────────────────────────

    #[test]
    fn unterminated_attribute_drops_only_that_rule() {
        let sheet = parse_sheet("a[href { color: red } b { color: blue }");
        assert_eq!(selectors_of(&sheet), vec!["b"]);
        assert_eq!(sheet.diagnostics.len(), 1);
        assert_eq!(sheet.diagnostics[0].selector_text, "a[href");
    }

    #[test]
    fn malformed_negation_is_dropped() {
        let sheet = parse_sheet("p:not(a b) { x: 1 } q { y: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
    }

    #[test]
    fn missing_colon_drops_rule() {
        let sheet = parse_sheet("p { color red } q { y: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
        assert!(sheet.diagnostics[0].message.contains("expected ':'"));
    }

    #[test]
    fn nested_braces_are_skipped_together() {
        let sheet = parse_sheet("p { x: { y: 1 } } q { z: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
    }

    #[test]
    fn stray_closing_brace() {
        let sheet = parse_sheet("} q { z: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
    }

    #[test]
    fn lexical_error_drops_rule() {
        let sheet = parse_sheet("p { background: url(a.png } q { z: 2 }");
        assert_eq!(selectors_of(&sheet), vec!["q"]);
        assert!(sheet
            .diagnostics
            .iter()
            .any(|d| d.message.contains("missing closing parenthesis")));
    }

    #[test]
    fn error_at_end_of_input() {
        let sheet = parse_sheet("p, ");
        assert!(sheet.rules.is_empty());
        assert!(sheet.diagnostics[0].message.contains("end of input"));
    }

    // ── Positioning ──────────────────────────────────────────────────

    #[test]
    fn position_with_slot_name_is_registered() {
        let (sheet, session) = parse_with_session("#nav { position: a } p { position: absolute }");
        assert_eq!(
            session.positioned(),
            &[PositionedElement {
                selector_text: "#nav".into(),
                slot: 'a'
            }]
        );
        assert_eq!(sheet.rules[0].declarations.value("position"), Some("a"));
        assert_eq!(sheet.rules[1].declarations.value("position"), Some("absolute"));
    }

    #[test]
    fn multi_character_position_names_no_slot() {
        let (sheet, session) = parse_with_session("#nav { position: ab } p { position: Static }");
        assert!(session.positioned().is_empty());
        assert!(sheet.diagnostics.is_empty());
        assert_eq!(sheet.rules[0].declarations.value("position"), Some("ab"));
    }

    // ── Templates ────────────────────────────────────────────────────

    #[test]
    fn template_definition() {
        let (sheet, session) = parse_with_session(
            "div#g { color: red; display: \"aab\" / 10px \"ccb\" / * 100px min-content max-content }",
        );
        assert_eq!(session.templates().len(), 1);
        let template = &session.templates()[0];
        assert_eq!(template.selector_text, "div#g");
        assert_eq!(template.number_of_rows(), 2);
        assert_eq!(template.rows[0].height, Height::Length(Length::px(10.0)));
        assert_eq!(template.rows[1].height, Height::Equal);
        assert_eq!(
            template.column_widths,
            vec![
                Width::Length(Length::px(100.0)),
                Width::MinContent,
                Width::MaxContent
            ]
        );
        assert_eq!(template.id, "tpl1");

        let display = sheet.rules[0].declarations.get("display").unwrap();
        assert_eq!(display.template, Some(0));
        assert_eq!(
            display.value,
            "\"aab\" / 10px \"ccb\" / * 100px min-content max-content"
        );
        assert_eq!(template.css_text, display.value);
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("red"));
    }

    #[test]
    fn template_widths_minmax_and_fit_content() {
        let (_, session) = parse_with_session(
            "t { display: \"abc\" minmax(10px, 20%) fit-content minmax (0 ,5em) }",
        );
        assert_eq!(
            session.templates()[0].column_widths,
            vec![
                Width::MinMax(Length::px(10.0), Length::new(20.0, LengthUnit::Percent)),
                Width::FitContent,
                Width::MinMax(Length::ZERO, Length::new(5.0, LengthUnit::Em)),
            ]
        );
    }

    #[test]
    fn row_heights() {
        let (_, session) = parse_with_session("t { display: \"a\" / auto \"b\" / 0 \"c\" / 2em }");
        let heights: Vec<Height> = session.templates()[0].rows.iter().map(|r| r.height).collect();
        assert_eq!(
            heights,
            vec![
                Height::Auto,
                Height::Length(Length::ZERO),
                Height::Length(Length::new(2.0, LengthUnit::Em))
            ]
        );
    }

    #[test]
    fn non_template_display_is_opaque() {
        let (sheet, session) = parse_with_session("p { display: block }");
        assert!(session.templates().is_empty());
        assert_eq!(sheet.rules[0].declarations.value("display"), Some("block"));
    }

    #[test]
    fn invalid_template_drops_only_the_declaration() {
        let (sheet, session) =
            parse_with_session("#g { display: \"aaaa\" \"bbcb\" \"dddd\"; color: red } p { x: 1 }");
        assert!(session.templates().is_empty());
        assert_eq!(selectors_of(&sheet), vec!["#g", "p"]);
        assert!(sheet.rules[0].declarations.get("display").is_none());
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("red"));
        assert_eq!(sheet.diagnostics.len(), 1);
        assert!(sheet.diagnostics[0].message.contains("'b'"));
    }

    #[test]
    fn negative_length_drops_the_declaration() {
        let (sheet, session) = parse_with_session("#g { display: \"ab\" -10px; color: red }");
        assert!(session.templates().is_empty());
        assert_eq!(sheet.rules[0].declarations.value("color"), Some("red"));
        assert!(sheet.diagnostics[0].message.contains("negative length"));
    }

    #[test]
    fn unknown_unit_and_bad_token_drop_the_declaration() {
        let (sheet, session) =
            parse_with_session("#g { display: \"ab\" 1fr *; x: 1 } #h { display: \"a\" / red; y: 2 }");
        assert!(session.templates().is_empty());
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].declarations.value("x"), Some("1"));
        assert_eq!(sheet.rules[1].declarations.value("y"), Some("2"));
        assert_eq!(sheet.diagnostics.len(), 2);
    }

    #[test]
    fn templates_are_numbered_in_order() {
        let (_, session) =
            parse_with_session("#a { display: \"x\" } #b { display: \"y\" } #c { display: \"zz\" }");
        let ids: Vec<&str> = session.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tpl1", "tpl2", "tpl3"]);
        assert_eq!(
            session.templates()[2].slot('z').map(|s| s.id.as_str()),
            Some("tpl3_slot_z")
        );
    }
}
