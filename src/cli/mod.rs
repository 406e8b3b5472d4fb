//! CLI support for fhir-filter
//!
//! Provides programmatic access to the `fhir-filter` command so other tools can
//! embed the same check behavior.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::FilterError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Compile or evaluation error
    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'fhir-filter docs' to see available categories.")]
    UnknownCategory(String),
}
