use thiserror::Error;

use crate::{
    ast::{
        CompValue, ComparisonOperator, Connective, Filter, LogicalExpression, ParamExpression,
        Path, PathSegment, Token, TokenKind,
    },
    grammar,
    lexer::LexError,
};

/// Deepest bracket/parenthesis nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// No production matches at a point where a filter is required
    #[error("Expected valid filter expression at position {position}")]
    ExpectedFilter { position: usize },

    /// A filter parsed but tokens remain after it
    #[error("Failed to parse filter expression: unexpected input at position {position}")]
    Incomplete { position: usize },

    #[error("Filter expression is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Recursive-descent parser over an immutable token slice.
///
/// Productions are chosen with the lookahead matchers in [`grammar`]; the
/// parser only advances its cursor over tokens a matcher already accepted.
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    fn window(&self, end: usize) -> &'t [Token] {
        &self.tokens[self.position.min(end)..end]
    }

    /// Character offset used in error messages.
    fn source_position(&self) -> usize {
        match self.current() {
            Some(token) => token.span.start,
            None => self.tokens.last().map(|t| t.span.end).unwrap_or(0),
        }
    }

    fn expected_filter(&self) -> ParseError {
        ParseError::ExpectedFilter {
            position: self.source_position(),
        }
    }

    /// Parses a complete filter; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Filter, ParseError> {
        let filter = self.parse_filter()?;
        if !self.is_at_end() {
            return Err(ParseError::Incomplete {
                position: self.source_position(),
            });
        }
        Ok(filter)
    }

    /// Parses one filter from the cursor, leaving any trailing tokens unconsumed.
    pub fn parse_filter(&mut self) -> Result<Filter, ParseError> {
        check_nesting(self.window(self.tokens.len()))?;
        self.filter(self.tokens.len(), true)
    }

    fn filter(&mut self, end: usize, allow_logical: bool) -> Result<Filter, ParseError> {
        let window = self.window(end);

        if allow_logical && grammar::is_log_exp(window) > 0 {
            return self.logical(end).map(Filter::Logical);
        }

        if grammar::is_param_exp(window, false) > 0 {
            return self.param_exp(end).map(Filter::Param);
        }

        let len = grammar::is_block(window);
        if len > 0 {
            let inner = self.group(len)?;
            return Ok(Filter::Block(Box::new(inner)));
        }

        let len = grammar::is_negation(window);
        if len > 0 {
            self.advance(); // not
            let inner = self.group(len - 1)?;
            return Ok(Filter::Negation(Box::new(inner)));
        }

        Err(self.expected_filter())
    }

    /// Parses `open filter close` where `len` covers both delimiters.
    fn group(&mut self, len: usize) -> Result<Filter, ParseError> {
        let close = self.position + len - 1;
        self.advance(); // opening delimiter
        let inner = self.filter(close, true)?;
        if self.position != close {
            return Err(self.expected_filter());
        }
        self.advance(); // closing delimiter
        Ok(inner)
    }

    fn logical(&mut self, end: usize) -> Result<LogicalExpression, ParseError> {
        let first = self.filter(end, false)?;
        let mut rest = Vec::new();

        while self.position < end {
            let Some(connective) = self.current().and_then(|t| Connective::from_word(&t.content))
            else {
                break;
            };
            self.advance();
            rest.push((connective, self.filter(end, false)?));
        }

        Ok(LogicalExpression {
            first: Box::new(first),
            rest,
        })
    }

    fn param_exp(&mut self, end: usize) -> Result<ParamExpression, ParseError> {
        let path = self.path(end)?;

        let operator = self
            .current()
            .filter(|t| t.is(TokenKind::Operator))
            .and_then(|t| ComparisonOperator::from_code(&t.content))
            .ok_or_else(|| self.expected_filter())?;
        self.advance();

        let value = self.comp_value()?;

        Ok(ParamExpression {
            path,
            operator,
            value,
        })
    }

    fn path(&mut self, end: usize) -> Result<Path, ParseError> {
        let mut segments = Vec::new();

        loop {
            let field = self
                .current()
                .filter(|t| t.is(TokenKind::Identifier))
                .ok_or_else(|| self.expected_filter())?;
            segments.push(PathSegment::Field(field.clone()));
            self.advance();

            let len = grammar::is_sub_filter(self.window(end));
            if len > 0 {
                let filter = self.group(len)?;
                segments.push(PathSegment::Filter(filter));
            }

            let window = self.window(end);
            let continues = window
                .first()
                .is_some_and(|t| t.is(TokenKind::Punctuator) && t.has_content("."))
                && grammar::is_param_path(&window[1..]) > 0;
            if !continues {
                break;
            }
            self.advance(); // .
        }

        Ok(Path { segments })
    }

    fn comp_value(&mut self) -> Result<CompValue, ParseError> {
        let token = self
            .current()
            .filter(|t| t.kind.is_comp_value())
            .ok_or_else(|| self.expected_filter())?;
        self.advance();
        Ok(CompValue {
            token: token.clone(),
        })
    }
}

/// Rejects token sequences whose grouping depth exceeds [`MAX_NESTING_DEPTH`].
pub fn check_nesting(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for token in tokens.iter().filter(|t| t.is(TokenKind::Punctuator)) {
        match token.content.as_str() {
            "(" | "[" => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            }
            ")" | "]" => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Tokenizes and parses filter text in one step.
pub fn parse(input: &str) -> Result<Filter, ParseError> {
    let tokens = crate::lexer::tokenize(input)?;
    Parser::new(&tokens).parse()
}
