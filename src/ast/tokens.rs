use std::fmt;

/// Classification assigned to a closed lexer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Comparison operator or logical connective
    ///
    /// # Examples
    /// ```text
    /// eq
    /// ge
    /// and
    /// ```
    Operator,

    /// Field name used in a path
    ///
    /// Must start with a letter, `_` or `$`, followed by letters, digits,
    /// `_`, `-` or `$`.
    ///
    /// # Examples
    /// ```text
    /// name
    /// _internal
    /// birth-date
    /// ```
    Identifier,

    /// String literal, quotes included in the token content
    ///
    /// # Examples
    /// ```text
    /// "patient 1"
    /// "say \"hi\""
    /// ```
    String,

    /// Signed integer or decimal, optional exponent
    ///
    /// # Examples
    /// ```text
    /// 4
    /// -3.6
    /// 1e10
    /// ```
    Number,

    /// ISO-8601 partial date or full timestamp
    ///
    /// # Examples
    /// ```text
    /// 2020
    /// 2020-01
    /// 2020-01-05T12:50:00Z
    /// ```
    Date,

    /// One of `(`, `)`, `[`, `]`, `.`
    Punctuator,

    /// The `not` keyword
    Keyword,

    /// Anything that matched no other class, including `true`, `false` and `null`
    ///
    /// # Examples
    /// ```text
    /// null
    /// 12xy34
    /// ```
    Token,

    /// Number directly followed by a unit
    ///
    /// # Examples
    /// ```text
    /// 100mg
    /// -10kg
    /// ```
    Quantity,
}

impl TokenKind {
    /// Kinds accepted as the right-hand side of a comparison.
    pub fn is_comp_value(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::Date
                | TokenKind::Token
                | TokenKind::Quantity
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Operator => "operator",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Date => "date",
            TokenKind::Punctuator => "punctuator",
            TokenKind::Keyword => "keyword",
            TokenKind::Token => "token",
            TokenKind::Quantity => "quantity",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character range of a token in the filter text, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// A classified lexical unit. Immutable once produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Raw source text; string tokens keep their quotes.
    pub content: String,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize, content: impl Into<String>) -> Self {
        Token {
            kind,
            span: Span::new(start, end),
            content: content.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn has_content(&self, content: &str) -> bool {
        self.content == content
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
