//! MIB lexer.
//!
//! Tokenizes SMIv1/SMIv2 module text. The lexer never fails: malformed
//! input degrades to a best-effort token plus a [`Diagnostic`], and the end
//! of input is always an [`TokenKind::Eof`] token.

// Source text is limited to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

mod keyword;
mod token;

pub use keyword::lookup_keyword;
pub use token::{Span, Token, TokenKind};

use std::fmt;

/// Byte offset into source text.
pub type ByteOffset = u32;

/// Longest quoted string kept; longer strings are truncated.
pub const MAX_QUOTED_LEN: usize = 4096;

/// Longest identifier recognised as a keyword.
pub const MAX_TOKEN_LEN: usize = 128;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The statement could not be understood; the module load fails.
    Error,
    /// Questionable input that was accepted.
    Warning,
    /// Informational, e.g. a skipped MACRO body.
    Note,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

/// A diagnostic from the lexer, parser or linker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    /// 1-based source line, 0 when unknown.
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, span: Span, line: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            span,
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(span: Span, line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, span, line, message)
    }

    #[must_use]
    pub fn warning(span: Span, line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, span, line, message)
    }

    #[must_use]
    pub fn note(span: Span, line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, span, line, message)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity.as_str(), self.message)
    }
}

/// How a `--` comment ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentMode {
    /// Only the end of the line ends a comment. Tolerates `-----` rulers.
    #[default]
    EndOfLine,
    /// A second `--` on the same line also ends it (ASN.1 rule).
    Strict,
}

/// Lexer state for skip modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerState {
    Normal,
    /// Inside a MACRO definition; skip until END.
    InMacro,
    /// Inside an EXPORTS clause; skip until semicolon.
    InExports,
    /// Inside a CHOICE definition; skip until closing brace.
    InChoice,
}

/// MIB lexer.
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    line: u32,
    state: LexerState,
    comment_mode: CommentMode,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src [u8]) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            state: LexerState::Normal,
            comment_mode: CommentMode::default(),
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comment_mode(mut self, mode: CommentMode) -> Self {
        self.comment_mode = mode;
        self
    }

    /// Current 1-based line.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Tokenize the whole source. The last token is always `Eof`.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        match self.state {
            LexerState::Normal => self.next_normal_token(),
            LexerState::InMacro => self.skip_macro_body(),
            LexerState::InExports => self.skip_until(b';', TokenKind::Semicolon),
            LexerState::InChoice => self.skip_until(b'}', TokenKind::RBrace),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as ByteOffset, self.pos as ByteOffset)
    }

    fn token(&self, kind: TokenKind, start: usize, line: u32) -> Token {
        Token::new(kind, self.span_from(start), line)
    }

    fn push(&mut self, severity: Severity, span: Span, line: u32, message: String) {
        self.diagnostics
            .push(Diagnostic::new(severity, span, line, message));
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0c) => {
                    self.advance();
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    self.skip_dash_comment();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    self.skip_to_eol();
                }
                _ => break,
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.advance();
        }
    }

    /// Body of a `--` comment; the opening dashes are already consumed.
    fn skip_dash_comment(&mut self) {
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => break,
                Some(b'-')
                    if self.comment_mode == CommentMode::Strict
                        && self.peek_at(1) == Some(b'-') =>
                {
                    self.pos += 2;
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn next_normal_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;
        let line = self.line;

        let Some(b) = self.peek() else {
            return self.token(TokenKind::Eof, start, line);
        };

        let single = match b {
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b';' => Some(TokenKind::Semicolon),
            b',' => Some(TokenKind::Comma),
            b'|' => Some(TokenKind::Pipe),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return self.token(kind, start, line);
        }

        match b {
            b'.' => {
                self.advance();
                if self.peek() == Some(b'.') {
                    self.advance();
                    return self.token(TokenKind::DotDot, start, line);
                }
                self.token(TokenKind::Dot, start, line)
            }
            b':' => {
                self.advance();
                if self.peek() == Some(b':') && self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    return self.token(TokenKind::ColonColonEqual, start, line);
                }
                self.token(TokenKind::Colon, start, line)
            }
            b'-' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.advance();
                self.scan_digits(start, line, TokenKind::NegativeNumber)
            }
            b'-' => {
                self.advance();
                self.token(TokenKind::Minus, start, line)
            }
            b'0'..=b'9' => self.scan_digits(start, line, TokenKind::Number),
            b'"' => self.scan_quoted_string(),
            b'\'' => self.scan_hex_or_bin_string(),
            _ if b.is_ascii_alphabetic() => self.scan_identifier_or_keyword(),
            _ => {
                // Degrade to a label so the parser reports it in context
                self.advance();
                while self
                    .peek()
                    .is_some_and(|c| !c.is_ascii_whitespace() && !c.is_ascii_alphanumeric())
                {
                    self.advance();
                }
                let span = self.span_from(start);
                self.push(
                    Severity::Warning,
                    span,
                    line,
                    format!("unexpected character {:?}", b as char),
                );
                self.token(TokenKind::LowercaseIdent, start, line)
            }
        }
    }

    /// Skip a MACRO body and return the closing END.
    fn skip_macro_body(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let line = self.line;

            let Some(b) = self.peek() else {
                self.state = LexerState::Normal;
                return self.token(TokenKind::Eof, start, line);
            };

            if b == b'"' {
                self.skip_quoted();
                continue;
            }

            if b.is_ascii_alphabetic() {
                let word_start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
                {
                    self.advance();
                }
                if &self.source[word_start..self.pos] == b"END" {
                    self.state = LexerState::Normal;
                    return self.token(TokenKind::KwEnd, start, line);
                }
                continue;
            }

            self.advance();
        }
    }

    fn skip_quoted(&mut self) {
        self.advance();
        while let Some(b) = self.advance() {
            if b == b'"' {
                break;
            }
        }
    }

    /// Skip to `stop`, returning it as a token of `kind`.
    fn skip_until(&mut self, stop: u8, kind: TokenKind) -> Token {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let line = self.line;
            match self.peek() {
                None => {
                    self.state = LexerState::Normal;
                    return self.token(TokenKind::Eof, start, line);
                }
                Some(b) if b == stop => {
                    self.advance();
                    self.state = LexerState::Normal;
                    return self.token(kind, start, line);
                }
                Some(b'"') => self.skip_quoted(),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        let line = self.line;
        let is_uppercase = self.peek().is_some_and(|b| b.is_ascii_uppercase());

        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            // `--` starts a comment even directly after an identifier
            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                break;
            }
            self.advance();
        }

        let span = self.span_from(start);
        let text = &self.source[start..self.pos];
        let text_str = std::str::from_utf8(text).unwrap_or("");

        if text.last() == Some(&b'-') {
            self.push(
                Severity::Warning,
                span,
                line,
                format!("identifier ends in hyphen: {text_str}"),
            );
        }

        if text.len() > MAX_TOKEN_LEN {
            self.push(
                Severity::Warning,
                span,
                line,
                format!("identifier longer than {MAX_TOKEN_LEN} characters"),
            );
        } else if let Some(kind) = lookup_keyword(text_str) {
            match kind {
                TokenKind::KwMacro => self.state = LexerState::InMacro,
                TokenKind::KwExports => self.state = LexerState::InExports,
                TokenKind::KwChoice => self.state = LexerState::InChoice,
                _ => {}
            }
            return self.token(kind, start, line);
        }

        let kind = if is_uppercase {
            TokenKind::UppercaseIdent
        } else {
            TokenKind::LowercaseIdent
        };
        self.token(kind, start, line)
    }

    /// Digits of a number; a leading `-` is already consumed.
    fn scan_digits(&mut self, start: usize, line: u32, kind: TokenKind) -> Token {
        let digits_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        if self.pos - digits_start > 1 && self.source[digits_start] == b'0' {
            let span = self.span_from(start);
            self.push(Severity::Warning, span, line, "leading zeros in number".into());
        }
        self.token(kind, start, line)
    }

    fn scan_quoted_string(&mut self) -> Token {
        let start = self.pos;
        let line = self.line;
        self.advance();

        loop {
            match self.advance() {
                None => {
                    let span = self.span_from(start);
                    self.push(Severity::Error, span, line, "unterminated string literal".into());
                    break;
                }
                Some(b'"') => break,
                Some(_) => {}
            }
        }

        let token = self.token(TokenKind::QuotedString, start, line);
        if (token.span.len() as usize).saturating_sub(2) > MAX_QUOTED_LEN {
            self.push(
                Severity::Warning,
                token.span,
                line,
                format!("quoted string truncated to {MAX_QUOTED_LEN} bytes"),
            );
        }
        token
    }

    fn scan_hex_or_bin_string(&mut self) -> Token {
        let start = self.pos;
        let line = self.line;
        self.advance();

        let digit_start = self.pos;
        while self.peek().is_some_and(|b| b != b'\'') {
            self.advance();
        }
        let digit_end = self.pos;

        if self.advance() != Some(b'\'') {
            let span = self.span_from(start);
            self.push(Severity::Error, span, line, "unterminated hex/binary string".into());
            return self.token(TokenKind::HexString, start, line);
        }

        let digits = &self.source[digit_start..digit_end];
        let kind = match self.peek() {
            Some(b'H' | b'h') => {
                self.advance();
                if !digits
                    .iter()
                    .all(|b| b.is_ascii_hexdigit() || b.is_ascii_whitespace())
                {
                    let span = self.span_from(start);
                    self.push(Severity::Error, span, line, "invalid character in hex string".into());
                }
                TokenKind::HexString
            }
            Some(b'B' | b'b') => {
                self.advance();
                if !digits
                    .iter()
                    .all(|&b| b == b'0' || b == b'1' || b.is_ascii_whitespace())
                {
                    let span = self.span_from(start);
                    self.push(
                        Severity::Error,
                        span,
                        line,
                        "invalid character in binary string".into(),
                    );
                }
                TokenKind::BinString
            }
            _ => {
                let span = self.span_from(start);
                self.push(
                    Severity::Error,
                    span,
                    line,
                    "expected 'H' or 'B' suffix for hex/binary string".into(),
                );
                TokenKind::HexString
            }
        };

        self.token(kind, start, line)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

/// Numeric value of a `Number`, `'..'H` or `'..'B` literal.
///
/// Hex and binary literals wider than 64 bits do not fit and yield `None`.
#[must_use]
pub fn number_value(kind: TokenKind, text: &str) -> Option<u64> {
    match kind {
        TokenKind::Number => text.parse().ok(),
        TokenKind::HexString | TokenKind::BinString => {
            let radix = if kind == TokenKind::HexString { 16 } else { 2 };
            let body: String = text
                .trim_start_matches('\'')
                .trim_end_matches(['H', 'h', 'B', 'b'])
                .trim_end_matches('\'')
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if body.is_empty() {
                return Some(0);
            }
            u64::from_str_radix(&body, radix).ok()
        }
        _ => None,
    }
}

/// Names of every module defined in `source`, in order of appearance.
///
/// Matches the `Name DEFINITIONS ::=` header pattern, which is how
/// directory scans map module names to files.
#[must_use]
pub fn module_names(source: &[u8]) -> Vec<String> {
    let (tokens, _) = Lexer::new(source).tokenize();
    tokens
        .windows(3)
        .filter(|w| {
            w[0].kind == TokenKind::UppercaseIdent
                && w[1].kind == TokenKind::KwDefinitions
                && w[2].kind == TokenKind::ColonColonEqual
        })
        .map(|w| {
            String::from_utf8_lossy(&source[w[0].span.start as usize..w[0].span.end as usize])
                .into_owned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source.as_bytes()).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn strict_kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source.as_bytes())
            .with_comment_mode(CommentMode::Strict)
            .tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn token_texts(source: &str) -> Vec<&str> {
        let (tokens, _) = Lexer::new(source.as_bytes()).tokenize();
        tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| &source[t.span.start as usize..t.span.end as usize])
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("   \t\n\r\n  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            token_kinds("[ ] { } ( ) ; , . | .. ::= : -"),
            vec![
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Pipe,
                TokenKind::DotDot,
                TokenKind::ColonColonEqual,
                TokenKind::Colon,
                TokenKind::Minus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(token_texts("0 42 -1 -42"), vec!["0", "42", "-1", "-42"]);
        assert_eq!(
            token_kinds("42 -42"),
            vec![TokenKind::Number, TokenKind::NegativeNumber, TokenKind::Eof]
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            token_kinds("ifIndex IF-MIB DEFINITIONS OBJECT-TYPE Integer32 read-only"),
            vec![
                TokenKind::LowercaseIdent,
                TokenKind::UppercaseIdent,
                TokenKind::KwDefinitions,
                TokenKind::KwObjectType,
                TokenKind::KwInteger32,
                TokenKind::KwReadOnly,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_string_multiline() {
        let source = "\"line1\nline2\" next";
        let (tokens, _) = Lexer::new(source.as_bytes()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::QuotedString);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_long_quoted_string_warns() {
        let source = format!("\"{}\"", "x".repeat(MAX_QUOTED_LEN + 10));
        let (tokens, diagnostics) = Lexer::new(source.as_bytes()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::QuotedString);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(diagnostics[0].message.contains("truncated"));
    }

    #[test]
    fn test_hex_and_bin_strings() {
        assert_eq!(
            token_kinds("'0A1B'H '01010101'B"),
            vec![TokenKind::HexString, TokenKind::BinString, TokenKind::Eof]
        );
        assert_eq!(number_value(TokenKind::HexString, "'0A1B'H"), Some(0x0a1b));
        assert_eq!(number_value(TokenKind::BinString, "'00000101'B"), Some(5));
        assert_eq!(number_value(TokenKind::HexString, "''H"), Some(0));
        assert_eq!(number_value(TokenKind::Number, "17"), Some(17));
    }

    #[test]
    fn test_comment_end_of_line_mode() {
        // The second -- does not end the comment
        assert_eq!(
            token_kinds("OBJECT -- comment -- TYPE\nBEGIN"),
            vec![TokenKind::KwObject, TokenKind::KwBegin, TokenKind::Eof]
        );
        assert_eq!(
            token_kinds("-------------------\nEND"),
            vec![TokenKind::KwEnd, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comment_strict_mode() {
        assert_eq!(
            strict_kinds("OBJECT -- comment -- TYPE"),
            vec![
                TokenKind::KwObject,
                TokenKind::UppercaseIdent,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_slash_comments() {
        assert_eq!(
            token_kinds("BEGIN // trailing { text\nEND"),
            vec![TokenKind::KwBegin, TokenKind::KwEnd, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comment_directly_after_identifier() {
        assert_eq!(token_texts("ifIndex--note\nfoo"), vec!["ifIndex", "foo"]);
    }

    #[test]
    fn test_macro_skip() {
        let source = r#"
            OBJECT-TYPE MACRO ::=
            BEGIN
                TYPE NOTATION ::= "SYNTAX" type(TYPE ObjectSyntax)
                VALUE NOTATION ::= value(VALUE ObjectName)
                -- APPEND and SEND do not end the body
                APPEND SEND "END"
            END

            ifIndex OBJECT-TYPE
        "#;
        assert_eq!(
            token_kinds(source),
            vec![
                TokenKind::KwObjectType,
                TokenKind::KwMacro,
                TokenKind::KwEnd,
                TokenKind::LowercaseIdent,
                TokenKind::KwObjectType,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_exports_and_choice_skip() {
        assert_eq!(
            token_kinds("EXPORTS foo, bar;OBJECT-TYPE"),
            vec![
                TokenKind::KwExports,
                TokenKind::Semicolon,
                TokenKind::KwObjectType,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            token_kinds("NetworkAddress ::= CHOICE { internet IpAddress }Counter"),
            vec![
                TokenKind::KwNetworkAddress,
                TokenKind::ColonColonEqual,
                TokenKind::KwChoice,
                TokenKind::RBrace,
                TokenKind::KwCounter,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unknown_character_degrades_to_label() {
        let (tokens, diagnostics) = Lexer::new(b"foo @ bar").tokenize();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LowercaseIdent,
                TokenKind::LowercaseIdent,
                TokenKind::LowercaseIdent,
                TokenKind::Eof
            ]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_overlong_identifier_is_label() {
        let name = format!("OBJECT{}", "X".repeat(MAX_TOKEN_LEN));
        let (tokens, diagnostics) = Lexer::new(name.as_bytes()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::UppercaseIdent);
        assert!(diagnostics[0].message.contains("longer than"));
    }

    #[test]
    fn test_trailing_hyphen_and_leading_zero_warn() {
        let (tokens, diagnostics) = Lexer::new(b"bad- 007").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::LowercaseIdent);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("hyphen"));
        assert!(diagnostics[1].message.contains("leading zeros"));
    }

    #[test]
    fn test_span_and_line_tracking() {
        let (tokens, _) = Lexer::new(b"BEGIN\n\nEND").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 5));
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].span, Span::new(7, 10));
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_module_names() {
        let source = b"-- header\nFIRST-MIB DEFINITIONS ::= BEGIN END\nSECOND-MIB DEFINITIONS ::= BEGIN END";
        assert_eq!(module_names(source), vec!["FIRST-MIB", "SECOND-MIB"]);
        assert!(module_names(b"not a module").is_empty());
    }
}
