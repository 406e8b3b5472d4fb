//! Typed comparison values.
//!
//! A [`Variable`] is built fresh for every comparison, either from a literal in
//! the filter or from a field of the record being tested. The left-hand
//! variable decides which operators exist and how the right-hand side is
//! coerced:
//!
//! | kind     | operators                          | right-hand coercion              |
//! |----------|------------------------------------|----------------------------------|
//! | string   | eq ne lt le gt ge co sw ew         | text form                        |
//! | number   | eq ne lt le gt ge                  | numeric parse of text form       |
//! | date     | eq ne lt le gt ge co po            | date parse of text form          |
//! | token    | eq ne (ss sb in not implemented)   | text form                        |
//! | quantity | eq ne lt le gt ge                  | quantity parse, same unit        |
//!
//! String ordering lowercases both sides and compares code points; it is not
//! locale collation, so accented letters sort after `z`.
//!
//! # Examples
//!
//! ```
//! use fhir_filter::value::Variable;
//! use fhir_filter::ComparisonOperator;
//!
//! let name = Variable::String("Patient 1".to_string());
//! let literal = Variable::String("patient".to_string());
//! assert!(name.op(ComparisonOperator::Sw, &literal).unwrap());
//! ```
pub mod date;
pub mod quantity;

use std::{cmp::Ordering, fmt};

pub use date::{DateVariable, Precision};
pub use quantity::Quantity;

use crate::{ast::ComparisonOperator, evaluator::EvalError};

/// Kind tag used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    String,
    Number,
    Date,
    Token,
    Quantity,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VariableKind::String => "string",
            VariableKind::Number => "number",
            VariableKind::Date => "date",
            VariableKind::Token => "token",
            VariableKind::Quantity => "quantity",
        })
    }
}

/// Runtime comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// Free text, compared case-insensitively
    String(String),

    /// Numeric value
    Number(f64),

    /// Calendar value with the precision it was written in
    Date(DateVariable),

    /// Bare literal such as `true`, `null` or a code
    Token(String),

    /// Number with a unit
    Quantity(Quantity),
}

impl Variable {
    pub fn kind(&self) -> VariableKind {
        match self {
            Variable::String(_) => VariableKind::String,
            Variable::Number(_) => VariableKind::Number,
            Variable::Date(_) => VariableKind::Date,
            Variable::Token(_) => VariableKind::Token,
            Variable::Quantity(_) => VariableKind::Quantity,
        }
    }

    /// Numeric view of this value; text that is not a number yields NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            Variable::Number(n) => *n,
            other => to_number(&other.to_string()),
        }
    }

    /// Applies `operator` with `self` on the left.
    pub fn op(&self, operator: ComparisonOperator, right: &Variable) -> Result<bool, EvalError> {
        match self {
            Variable::String(value) => string_op(value, operator, &right.to_string()),
            Variable::Number(value) => number_op(*value, operator, right.as_number()),
            Variable::Date(date) => date.op(operator, right),
            Variable::Token(value) => token_op(value, operator, &right.to_string()),
            Variable::Quantity(quantity) => quantity.op(operator, right),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::String(s) | Variable::Token(s) => f.write_str(s),
            Variable::Number(n) => f.write_str(&format_number(*n)),
            Variable::Date(date) => write!(f, "{}", date),
            Variable::Quantity(quantity) => write!(f, "{}", quantity),
        }
    }
}

/// Parses text the way a numeric coercion of a JSON-ish value does: surrounding
/// whitespace is ignored, empty text is zero and anything else that is not a
/// number is NaN.
pub fn to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Shortest text form of a number, as JavaScript's `String(n)` writes it.
///
/// Magnitudes below `1e-6` or from `1e21` up use exponent notation with an
/// explicit exponent sign (`1e-7`, `1.5e+21`); integers have no trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() < 1e-6 || n.abs() >= 1e21 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

fn unsupported(operator: ComparisonOperator, kind: VariableKind) -> EvalError {
    EvalError::UnsupportedOperator { operator, kind }
}

fn string_op(left: &str, operator: ComparisonOperator, right: &str) -> Result<bool, EvalError> {
    use ComparisonOperator::*;

    let left = left.to_lowercase();
    let right = right.to_lowercase();
    // Code point order, not locale collation.
    let ordering = || left.cmp(&right);

    Ok(match operator {
        Eq => left == right,
        Ne => left != right,
        Lt => ordering() == Ordering::Less,
        Le => ordering() != Ordering::Greater,
        Gt => ordering() == Ordering::Greater,
        Ge => ordering() != Ordering::Less,
        Co => left.contains(&right),
        Sw => left.starts_with(&right),
        Ew => left.ends_with(&right),
        _ => return Err(unsupported(operator, VariableKind::String)),
    })
}

fn number_op(left: f64, operator: ComparisonOperator, right: f64) -> Result<bool, EvalError> {
    use ComparisonOperator::*;

    Ok(match operator {
        Eq => left == right,
        Ne => left != right,
        Gt => left > right,
        Ge => left >= right,
        Lt => left < right,
        Le => left <= right,
        _ => return Err(unsupported(operator, VariableKind::Number)),
    })
}

fn token_op(left: &str, operator: ComparisonOperator, right: &str) -> Result<bool, EvalError> {
    use ComparisonOperator::*;

    let same = || left.to_lowercase() == right.to_lowercase();

    match operator {
        Eq => Ok(same()),
        Ne => Ok(!same()),
        Ss | Sb | In => Err(EvalError::NotImplemented { operator }),
        _ => Err(unsupported(operator, VariableKind::Token)),
    }
}
