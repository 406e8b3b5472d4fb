//! Compile-once, evaluate-many entry points.

use std::{fmt, str::FromStr};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::Filter,
    evaluator::{EvalError, Evaluator},
    lexer::{LexError, tokenize},
    parser::{ParseError, Parser},
};

/// Any failure surfaced by [`compile`] or [`filter_array`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation failed on the record at `index`
    #[error("Error applying filter to item {index}: {source}")]
    Eval { index: usize, source: EvalError },
}

/// A parsed filter, ready to test records.
///
/// Compiled filters are immutable; clone them or share them across threads
/// freely.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    filter: Filter,
}

impl CompiledFilter {
    pub fn ast(&self) -> &Filter {
        &self.filter
    }

    /// Tests a single record. A record that is not an object has no fields.
    pub fn matches(&self, record: &Value) -> Result<bool, EvalError> {
        Evaluator::new()
            .eval_filter(&self.filter, record)
            .map(|matched| matched.is_some())
    }

    /// Like [`matches`](Self::matches), tagging errors with the record's index.
    pub fn matches_at(&self, record: &Value, index: usize) -> Result<bool, FilterError> {
        self.matches(record)
            .map_err(|source| FilterError::Eval { index, source })
    }

    /// Keeps the records that match, in input order. Stops at the first error.
    pub fn apply<'a>(&self, records: &'a [Value]) -> Result<Vec<&'a Value>, FilterError> {
        let mut kept = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if self.matches_at(record, index)? {
                kept.push(record);
            }
        }
        debug!(target: "fhir_filter", total = records.len(), kept = kept.len(), "applied filter");
        Ok(kept)
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)
    }
}

impl FromStr for CompiledFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

/// Tokenizes and parses filter text.
///
/// # Examples
///
/// ```
/// use fhir_filter::compile;
/// use serde_json::json;
///
/// let filter = compile(r#"name co "smith" and birthDate ge 1980"#).unwrap();
/// assert!(filter.matches(&json!({"name": "Jo Smith", "birthDate": "1984-05-02"})).unwrap());
/// assert!(!filter.matches(&json!({"name": "Jo Smith"})).unwrap());
/// ```
pub fn compile(text: &str) -> Result<CompiledFilter, FilterError> {
    let tokens = tokenize(text)?;
    let filter = Parser::new(&tokens).parse()?;
    debug!(target: "fhir_filter", input = text, tokens = tokens.len(), ast = %filter, "compiled filter");
    Ok(CompiledFilter { filter })
}

/// Compiles `text` and keeps the matching records.
///
/// # Errors
///
/// Returns the compile error, or the first evaluation error wrapped with the
/// index of the record that raised it.
pub fn filter_array<'a>(records: &'a [Value], text: &str) -> Result<Vec<&'a Value>, FilterError> {
    compile(text)?.apply(records)
}
