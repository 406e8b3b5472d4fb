use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ast::{ComparisonOperator, Connective, Token, TokenKind};

/// ISO-8601 date with optional month, day and full time-with-offset.
pub static RE_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)",
        r"(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])",
        r"(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?",
        r"(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
    ))
    .expect("date pattern is valid")
});

pub static RE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?(\s|$|\))")
        .expect("number pattern is valid")
});

pub static RE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_a-zA-Z$][_\-0-9a-zA-Z$]*$").expect("identifier pattern is valid")
});

/// Number immediately followed by a unit. Group 1 is the number, group 2 the unit.
pub static RE_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)([a-z]+)$")
        .expect("quantity pattern is valid")
});

const LITERAL_TOKENS: [&str; 3] = ["true", "false", "null"];
const KEYWORDS: [&str; 4] = ["true", "false", "null", "not"];

type Rule = (TokenKind, fn(&str) -> bool);

fn is_literal_token(s: &str) -> bool {
    LITERAL_TOKENS.contains(&s)
}

fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

fn is_connective(s: &str) -> bool {
    Connective::from_word(s).is_some()
}

fn is_comparison(s: &str) -> bool {
    ComparisonOperator::from_code(s).is_some()
}

fn is_identifier(s: &str) -> bool {
    RE_IDENTIFIER.is_match(s)
}

fn is_number(s: &str) -> bool {
    RE_NUMBER.is_match(s)
}

fn is_date(s: &str) -> bool {
    RE_DATE_TIME.is_match(s)
}

fn is_quantity(s: &str) -> bool {
    RE_QUANTITY.is_match(s)
}

// Order matters: `true`/`false`/`null` would otherwise classify as keywords or
// identifiers, and a bare year would otherwise be a date.
static RULES: [Rule; 8] = [
    (TokenKind::Token, is_literal_token),
    (TokenKind::Keyword, is_keyword),
    (TokenKind::Operator, is_connective),
    (TokenKind::Operator, is_comparison),
    (TokenKind::Identifier, is_identifier),
    (TokenKind::Number, is_number),
    (TokenKind::Date, is_date),
    (TokenKind::Quantity, is_quantity),
];

/// Classifies a closed buffer. Falls back to a bare token.
pub fn classify(buffer: &str) -> TokenKind {
    RULES
        .iter()
        .find(|(_, matches)| matches(buffer))
        .map(|(kind, _)| *kind)
        .unwrap_or(TokenKind::Token)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string literal (opened at position {position})")]
    UnterminatedString { position: usize },
}

/// Single-pass scanner turning filter text into tokens.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    buffer: String,
    start: usize,
    in_string: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            buffer: String::new(),
            start: 0,
            in_string: false,
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn push_char(&mut self, ch: char) {
        if self.buffer.is_empty() {
            self.start = self.position;
        }
        self.buffer.push(ch);
    }

    /// Closes the pending buffer (if any) into a classified token ending at `end`.
    fn close(&mut self, end: usize) {
        if self.buffer.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.buffer);
        let kind = classify(&content);
        self.tokens.push(Token::new(kind, self.start, end, content));
    }

    fn punctuator(&mut self, ch: char) {
        self.close(self.position);
        self.tokens.push(Token::new(
            TokenKind::Punctuator,
            self.position,
            self.position + 1,
            ch.to_string(),
        ));
    }

    fn open_string(&mut self) {
        self.close(self.position);
        self.in_string = true;
        self.start = self.position;
        self.buffer.push('"');
    }

    fn close_string(&mut self) {
        self.buffer.push('"');
        let content = std::mem::take(&mut self.buffer);
        self.tokens.push(Token::new(
            TokenKind::String,
            self.start,
            self.position + 1,
            content,
        ));
        self.in_string = false;
    }

    /// Consumes the whole input and returns the token sequence.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.current_char() {
            match ch {
                '"' if self.in_string => self.close_string(),
                '"' => self.open_string(),
                '\\' if self.in_string && self.peek_char(1) == Some('"') => {
                    // Escaped quote stays verbatim; decoding happens at evaluation.
                    self.buffer.push_str("\\\"");
                    self.advance();
                }
                ch if self.in_string => self.buffer.push(ch),
                ' ' | '\t' | '\r' => self.close(self.position),
                '(' | ')' | '[' | ']' => self.punctuator(ch),
                '.' if self.buffer.ends_with(|c: char| c.is_ascii_digit()) => self.push_char(ch),
                '.' => self.punctuator(ch),
                ch => self.push_char(ch),
            }
            self.advance();
        }

        if self.in_string {
            return Err(LexError::UnterminatedString {
                position: self.start,
            });
        }

        self.close(self.position);
        Ok(self.tokens)
    }
}

/// Tokenizes filter text.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

#[test]
fn test_classification_order() {
    assert_eq!(classify("true"), TokenKind::Token);
    assert_eq!(classify("null"), TokenKind::Token);
    assert_eq!(classify("not"), TokenKind::Keyword);
    assert_eq!(classify("and"), TokenKind::Operator);
    assert_eq!(classify("re"), TokenKind::Operator);
    assert_eq!(classify("2020"), TokenKind::Number);
    assert_eq!(classify("2020-01"), TokenKind::Date);
    assert_eq!(classify("1e3mg"), TokenKind::Quantity);
}

#[test]
fn test_path_with_filter() {
    let tokens = tokenize("a[b eq 6].c").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.content.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (TokenKind::Identifier, "a"),
            (TokenKind::Punctuator, "["),
            (TokenKind::Identifier, "b"),
            (TokenKind::Operator, "eq"),
            (TokenKind::Number, "6"),
            (TokenKind::Punctuator, "]"),
            (TokenKind::Punctuator, "."),
            (TokenKind::Identifier, "c"),
        ]
    );
}

#[test]
fn test_decimal_point() {
    let tokens = tokenize("x.y eq 5.3mg").unwrap();
    let contents: Vec<_> = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["x", ".", "y", "eq", "5.3mg"]);
    assert_eq!(tokens[4].kind, TokenKind::Quantity);

    // Any buffer ending in a digit takes the dot.
    let tokens = tokenize("a1.b eq 5").unwrap();
    assert_eq!(tokens[0].content, "a1.b");
    assert_eq!(tokens[0].kind, TokenKind::Token);

    let tokens = tokenize("2020-01-01T10:00:00.5Z").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Date);
}
