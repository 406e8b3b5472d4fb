//! Run a filter against JSON input

use serde_json::Value;
use tracing::debug;

use super::CliError;
use crate::compile;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression
    pub filter: String,
    /// JSON input: an array of records or a single record
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Filter compiled; holds its canonical form
    SyntaxValid(String),
    /// Records that matched, as a JSON array
    Success(Value),
}

/// Compile the filter and, unless only checking syntax, apply it to the input.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let filter = compile(&options.filter)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(filter.to_string()));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let input: Value = serde_json::from_str(json_str)?;

    let records = match input {
        Value::Array(records) => records,
        record => vec![record],
    };
    debug!(target: "fhir_filter", records = records.len(), "checking input");

    let kept = filter.apply(&records)?;
    Ok(CheckResult::Success(Value::Array(
        kept.into_iter().cloned().collect(),
    )))
}
