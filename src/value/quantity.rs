use std::fmt;

use super::{Variable, VariableKind, format_number};
use crate::{ast::ComparisonOperator, evaluator::EvalError, lexer::RE_QUANTITY};

/// A number with a unit such as `5.4mg` or `100g`.
///
/// Units keep their case but compare case-insensitively; no conversion is
/// attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    /// Returns `None` when `text` is not a number directly followed by letters.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = RE_QUANTITY.captures(text)?;
        let value = captures.get(1)?.as_str().parse().ok()?;
        let unit = captures.get(2)?.as_str().to_string();
        Some(Quantity { value, unit })
    }

    pub fn op(&self, operator: ComparisonOperator, right: &Variable) -> Result<bool, EvalError> {
        use ComparisonOperator::*;

        let coerced;
        let target = match right {
            Variable::Quantity(quantity) => quantity,
            other => {
                coerced = Quantity::parse(&other.to_string()).ok_or(
                    EvalError::IncomparableQuantity {
                        kind: other.kind(),
                    },
                )?;
                &coerced
            }
        };

        if !self.unit.eq_ignore_ascii_case(&target.unit) {
            return Err(EvalError::UnitMismatch);
        }

        let (left, right) = (self.value, target.value);
        Ok(match operator {
            Eq => left == right,
            Ne => left != right,
            Gt => left > right,
            Ge => left >= right,
            Lt => left < right,
            Le => left <= right,
            _ => {
                return Err(EvalError::UnsupportedOperator {
                    operator,
                    kind: VariableKind::Quantity,
                });
            }
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit)
    }
}
