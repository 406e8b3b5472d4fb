//! # FHIR Filter Language - Abstract Syntax Tree
//!
//! This module defines the tokens and parsed nodes of the filter language, a
//! small predicate syntax modeled on the FHIR `_filter` search parameter.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Classified lexical units produced by the lexer
//! - **[operators]** - Comparison operators and logical connectives
//! - **[lexemes]** - Parsed nodes (filters, paths, comparison values)
//!
//! ## Quick Start
//!
//! ```text
//! name eq "John" and birthDate ge 1980-01
//! ```
//!
//! ## Grammar
//!
//! ```text
//! filter    = paramExp | logExp | "(" filter ")" | "not" "(" filter ")"
//! logExp    = filter ( ("and"|"or") filter )+
//! paramExp  = paramPath operator compValue
//! paramPath = identifier ( "[" filter "]" )? ( "." paramPath )?
//! compValue = string | number | date | token | quantity
//! ```
//!
//! A logical expression keeps every operand of an unparenthesized chain, but
//! only the first two are evaluated: `a eq 1 or b eq 2 and c eq 3` matches
//! like `a eq 1 or b eq 2`. Use parentheses to group.
pub mod lexemes;
pub mod operators;
pub mod tokens;

pub use lexemes::{CompValue, Filter, LogicalExpression, ParamExpression, Path, PathSegment};
pub use operators::{ComparisonOperator, Connective};
pub use tokens::{Span, Token, TokenKind};
