//! Documentation content for the fhir-filter CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Types,
}

impl DocCategory {
    /// Parse category name, accepting a few short aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "types" | "type" | "values" => Some(Self::Types),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"FHIR FILTER DOCUMENTATION

A filter is a predicate over JSON records, modeled on the FHIR _filter search
parameter. Records that satisfy the predicate are kept; the rest are dropped.

DOCUMENTATION CATEGORIES

  syntax            Paths, sub-filters, grouping, negation, and/or chains
  operators         Comparison operators and which value kinds support them
  types             How literals and record fields are typed and coerced

QUICK REFERENCE

  name eq "John"                  Comparison
  name[use eq "official"].family  Sub-filter inside a path
  (a eq 1 or b eq 2) and c eq 3   Grouping
  not(active eq true)             Negation

Run 'fhir-filter doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::parse(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Filter Grammar

COMPARISON
  path operator value
    Compare the value found at a path with a literal.

    Example:
      Input:  [{"name": "Patient 1"}, {"name": "Other"}]
      Filter: name sw "patient"
      Output: [{"name": "Patient 1"}]

PATHS
  a.b.c
    Walk nested objects field by field.

  a[filter].b
    Apply a sub-filter to the value at a. On an array the first element
    that matches is selected; on an object the object is kept only if it
    matches.

    Example:
      Input:  [{"name": [{"use": "official", "family": "Doe"}]}]
      Filter: name[use eq "official"].family eq "Doe"
      Output: [{"name": [{"use": "official", "family": "Doe"}]}]

    Constraints:
      - A missing field never matches, whatever the operator
      - Field names are case-sensitive

LOGICAL CHAINS
  f1 and f2 or f3
    Only the first connective is evaluated: the example matches exactly
    when f1 and f2 does, and f3 is never tested. Parenthesize longer
    chains, e.g. (f1 and f2) or f3. Evaluation stops as soon as the
    result is known.

GROUPING AND NEGATION
  (filter)
  not(filter)
    Parentheses group a chain. not() inverts the match of its group.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparison Operators

SUPPORTED
  eq ne       Equal, not equal             all kinds
  gt ge       Greater (or equal)           string, number, date, quantity
  lt le       Less (or equal)              string, number, date, quantity
  co          Contains                     string (substring), date (same period)
  sw ew       Starts with, ends with       string
  po          Overlaps                     date
  re          References                   objects with a "reference" field

RECOGNIZED BUT NOT EVALUATED
  ap sa eb pr ni
    Accepted by the parser; evaluating them is an error for every kind.

  ss sb in
    Reserved for tokens; evaluating them reports "not implemented".

  Constraints:
    - The kind of the record's value decides which operators exist
    - String comparisons ignore case; ordering compares Unicode code
      points, so accented letters sort after z
    - Quantities only compare with the same unit
"#;

const TYPES_DOC: &str = r#"TYPES - Values and Coercion

LITERALS
  "text"                 string (JSON escapes allowed)
  42  -3.6  1e10         number
  2020  2020-01  2020-01-05  2020-01-05T10:00:00Z
                         date (a bare year lexes as a number)
  100mg  -5kg            quantity
  true  false  null      token

RECORD FIELDS
  number                 number
  string that is a date  date
  other string           string
  true/false/null        token
  object or array        nested (use a path, a sub-filter, or re)

DATES
  Dates carry the precision they were written with. Comparisons round both
  sides to the precision of the right-hand value; co checks that the right
  value falls in the same period as the left; po checks that the two
  periods overlap. All times are compared in UTC.

COERCION
  The right-hand literal is converted to the kind of the left-hand value.
  A date compared with text that is not a date is only "ne". A quantity
  compared with something that is not a quantity is an error.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_resolve_with_aliases() {
        assert_eq!(DocCategory::parse("OPS"), Some(DocCategory::Operators));
        assert!(get_doc_category("types").unwrap().starts_with("TYPES"));
        assert!(matches!(
            get_doc_category("methods"),
            Err(CliError::UnknownCategory(_))
        ));
    }
}
