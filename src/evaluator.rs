use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{
        CompValue, ComparisonOperator, Connective, Filter, LogicalExpression, ParamExpression,
        Path, PathSegment, TokenKind,
    },
    lexer::RE_DATE_TIME,
    value::{DateVariable, Quantity, Variable, VariableKind, to_number},
};

/// Errors raised while testing a record against a filter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The left-hand variable kind has no such operator
    #[error("Operator \"{operator}\" not supported for {kind} variables")]
    UnsupportedOperator {
        operator: ComparisonOperator,
        kind: VariableKind,
    },

    /// Reserved token operators (`ss`, `sb`, `in`)
    #[error("Operator \"{operator}\" not implemented for tokens")]
    NotImplemented { operator: ComparisonOperator },

    #[error("Cannot compare quantities with different units")]
    UnitMismatch,

    /// Right-hand side of a quantity comparison does not read as a quantity
    #[error("Cannot compare a quantity with a {kind} value")]
    IncomparableQuantity { kind: VariableKind },

    #[error("The \"re\" operator can only be used on objects")]
    ReferenceOnNonObject,

    /// Path resolved to an object or array but the operator is not `re`
    #[error("Operator \"{operator}\" cannot be applied to an object")]
    ObjectOperand { operator: ComparisonOperator },

    /// Literal text that cannot be turned into a value of its kind
    #[error("Invalid {kind} literal: {text}")]
    InvalidLiteral { kind: &'static str, text: String },
}

/// Result of resolving a path against a record.
#[derive(Debug, Clone, PartialEq)]
pub enum PathValue<'a> {
    /// Leaf value typed for comparison
    Scalar(Variable),

    /// Object or array reached through the path
    Nested(&'a Value),

    /// Some segment did not exist
    Absent,
}

/// Tests JSON records against parsed filters.
///
/// The evaluator is stateless; one instance can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Tests `context` against `filter`.
    ///
    /// Returns the context itself on a match, `None` otherwise.
    pub fn eval_filter<'a>(
        &self,
        filter: &Filter,
        context: &'a Value,
    ) -> Result<Option<&'a Value>, EvalError> {
        let matched = match filter {
            Filter::Param(expr) => self.eval_param_exp(expr, context)?,
            Filter::Logical(expr) => self.eval_logical(expr, context)?,
            Filter::Block(inner) => self.eval_filter(inner, context)?.is_some(),
            Filter::Negation(inner) => self.eval_filter(inner, context)?.is_none(),
        };
        trace!(target: "fhir_filter", filter = %filter, matched, "evaluated filter");
        Ok(matched.then_some(context))
    }

    /// Combines the first operand with the second through the first
    /// connective, short-circuiting.
    ///
    /// Operands after the second are kept in the tree but never evaluated, so
    /// `a eq 1 or b eq 1 and c eq 1` behaves like `a eq 1 or b eq 1`. Chains
    /// that need every operand must be parenthesized.
    pub fn eval_logical(
        &self,
        expr: &LogicalExpression,
        context: &Value,
    ) -> Result<bool, EvalError> {
        let first = self.eval_filter(&expr.first, context)?.is_some();

        let result = match expr.rest.first() {
            Some((Connective::And, second)) => first && self.eval_filter(second, context)?.is_some(),
            Some((Connective::Or, second)) => first || self.eval_filter(second, context)?.is_some(),
            None => first,
        };

        trace!(
            target: "fhir_filter",
            operands = expr.rest.len() + 1,
            ignored = expr.rest.len().saturating_sub(1),
            result,
            "evaluated logical expression"
        );
        Ok(result)
    }

    /// `path operator value`; a missing path never matches.
    pub fn eval_param_exp(&self, expr: &ParamExpression, context: &Value) -> Result<bool, EvalError> {
        let left = self.eval_path(&expr.path, context)?;
        if left == PathValue::Absent {
            return Ok(false);
        }

        let right = self.eval_comp_value(&expr.value)?;
        let operator = expr.operator;

        match (left, operator) {
            (PathValue::Nested(object), ComparisonOperator::Re) => {
                let target = right.to_string();
                Ok(object
                    .get("reference")
                    .and_then(Value::as_str)
                    .is_some_and(|reference| reference == target))
            }
            (PathValue::Scalar(_), ComparisonOperator::Re) => Err(EvalError::ReferenceOnNonObject),
            (PathValue::Nested(_), operator) => Err(EvalError::ObjectOperand { operator }),
            (PathValue::Scalar(variable), operator) => {
                let result = variable.op(operator, &right)?;
                trace!(
                    target: "fhir_filter",
                    left = %variable,
                    %operator,
                    right = %right,
                    result,
                    "compared"
                );
                Ok(result)
            }
            (PathValue::Absent, _) => Ok(false),
        }
    }

    /// Walks `path` from `context`.
    ///
    /// A sub-filter on an array selects the first element that matches; on an
    /// object it keeps the object only if it matches. Fields are looked up on
    /// objects only.
    pub fn eval_path<'a>(&self, path: &Path, context: &'a Value) -> Result<PathValue<'a>, EvalError> {
        let mut current = PathValue::Nested(context);

        for segment in &path.segments {
            let PathValue::Nested(value) = current else {
                return Ok(PathValue::Absent);
            };

            current = match segment {
                PathSegment::Field(token) => self.resolve_identifier(value, &token.content),
                PathSegment::Filter(filter) => self.select(value, filter)?,
            };
        }

        trace!(target: "fhir_filter", path = %path, value = ?current, "resolved path");
        Ok(current)
    }

    fn select<'a>(&self, value: &'a Value, filter: &Filter) -> Result<PathValue<'a>, EvalError> {
        let selected = match value {
            Value::Array(items) => {
                let mut found = None;
                for item in items {
                    if let Some(item) = self.eval_filter(filter, item)? {
                        found = Some(item);
                        break;
                    }
                }
                found
            }
            other => self.eval_filter(filter, other)?,
        };

        Ok(selected.map_or(PathValue::Absent, PathValue::Nested))
    }

    /// Looks up one field of `context` and types its value.
    ///
    /// Numbers become numbers, strings that read as dates become dates, other
    /// strings stay strings, booleans and null become tokens.
    pub fn resolve_identifier<'a>(&self, context: &'a Value, name: &str) -> PathValue<'a> {
        let Some(value) = context.as_object().and_then(|object| object.get(name)) else {
            return PathValue::Absent;
        };

        let variable = match value {
            Value::Object(_) | Value::Array(_) => return PathValue::Nested(value),
            Value::Number(n) => Variable::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) if RE_DATE_TIME.is_match(s) => DateVariable::parse(s)
                .map(Variable::Date)
                .unwrap_or_else(|_| Variable::String(s.clone())),
            Value::String(s) => Variable::String(s.clone()),
            Value::Bool(b) => Variable::Token(b.to_string()),
            Value::Null => Variable::Token("null".to_string()),
        };

        PathValue::Scalar(variable)
    }

    /// Turns a literal into its typed value.
    pub fn eval_comp_value(&self, value: &CompValue) -> Result<Variable, EvalError> {
        let text = value.token.content.as_str();
        let invalid = |kind| EvalError::InvalidLiteral {
            kind,
            text: text.to_string(),
        };

        let variable = match value.token.kind {
            // String literals keep their quotes and escapes until now.
            TokenKind::String => serde_json::from_str::<String>(text)
                .map(Variable::String)
                .map_err(|_| invalid("string"))?,
            TokenKind::Number => Variable::Number(to_number(text)),
            TokenKind::Date => DateVariable::parse(text).map(Variable::Date)?,
            TokenKind::Quantity => Quantity::parse(text)
                .map(Variable::Quantity)
                .ok_or_else(|| invalid("quantity"))?,
            TokenKind::Token => Variable::Token(text.to_string()),
            other => return Err(invalid(other.name())),
        };

        trace!(target: "fhir_filter", literal = text, kind = %variable.kind(), "typed literal");
        Ok(variable)
    }
}
