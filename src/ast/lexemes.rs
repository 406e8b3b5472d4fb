use std::fmt;

use crate::ast::{ComparisonOperator, Connective, Token};

/// Parsed filter node.
///
/// A filter is built once per compile and is never mutated afterwards, so a
/// single tree can be evaluated against any number of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Single comparison
    ///
    /// # Example
    /// ```text
    /// name eq "John"
    /// ```
    Param(ParamExpression),

    /// Filters joined by `and` / `or`; only the first connective is evaluated
    ///
    /// # Example
    /// ```text
    /// age gt 30 and name sw "J"
    /// ```
    Logical(LogicalExpression),

    /// Parenthesized group
    ///
    /// # Example
    /// ```text
    /// (age gt 30)
    /// ```
    Block(Box<Filter>),

    /// Negated group
    ///
    /// # Example
    /// ```text
    /// not(age gt 30)
    /// ```
    Negation(Box<Filter>),
}

/// `path operator value`
#[derive(Debug, Clone, PartialEq)]
pub struct ParamExpression {
    pub path: Path,
    pub operator: ComparisonOperator,
    pub value: CompValue,
}

/// Odd-length chain `filter (connective filter)+`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub first: Box<Filter>,
    pub rest: Vec<(Connective, Filter)>,
}

/// Dotted field path, optionally interleaved with sub-filters.
///
/// # Examples
/// ```text
/// practitioner.reference
/// name[use eq "official"].family
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Identifier token naming a field
    Field(Token),
    /// Bracketed predicate applied to the value reached so far
    Filter(Filter),
}

/// Literal on the right-hand side of a comparison.
///
/// The token kind is one of string, number, date, token or quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompValue {
    pub token: Token,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Param(expr) => write!(f, "{}", expr),
            Filter::Logical(expr) => write!(f, "{}", expr),
            Filter::Block(inner) => write!(f, "({})", inner),
            Filter::Negation(inner) => write!(f, "not({})", inner),
        }
    }
}

impl fmt::Display for ParamExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.operator, self.value)
    }
}

impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (connective, filter) in &self.rest {
            write!(f, " {} {}", connective, filter)?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(token) if i == 0 => write!(f, "{}", token)?,
                PathSegment::Field(token) => write!(f, ".{}", token)?,
                PathSegment::Filter(filter) => write!(f, "[{}]", filter)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for CompValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}
