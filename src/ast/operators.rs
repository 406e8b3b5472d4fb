use std::{fmt, str::FromStr};

/// Two-letter comparison operators.
///
/// All codes are recognized by the lexer; which ones evaluate depends on the
/// kind of the left-hand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equal (`eq`)
    Eq,
    /// Not equal (`ne`)
    Ne,
    /// Contains (`co`)
    Co,
    /// Starts with (`sw`)
    Sw,
    /// Ends with (`ew`)
    Ew,
    /// Greater than (`gt`)
    Gt,
    /// Less than (`lt`)
    Lt,
    /// Greater than or equal (`ge`)
    Ge,
    /// Less than or equal (`le`)
    Le,
    /// Approximately (`ap`)
    Ap,
    /// Starts after (`sa`)
    Sa,
    /// Ends before (`eb`)
    Eb,
    /// Present (`pr`)
    Pr,
    /// Overlaps (`po`)
    Po,
    /// Subsumes (`ss`)
    Ss,
    /// Subsumed by (`sb`)
    Sb,
    /// In value set (`in`)
    In,
    /// Not in value set (`ni`)
    Ni,
    /// References (`re`)
    Re,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 19] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Ne,
        ComparisonOperator::Co,
        ComparisonOperator::Sw,
        ComparisonOperator::Ew,
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
        ComparisonOperator::Ge,
        ComparisonOperator::Le,
        ComparisonOperator::Ap,
        ComparisonOperator::Sa,
        ComparisonOperator::Eb,
        ComparisonOperator::Pr,
        ComparisonOperator::Po,
        ComparisonOperator::Ss,
        ComparisonOperator::Sb,
        ComparisonOperator::In,
        ComparisonOperator::Ni,
        ComparisonOperator::Re,
    ];

    pub fn as_str(self) -> &'static str {
        use ComparisonOperator::*;
        match self {
            Eq => "eq",
            Ne => "ne",
            Co => "co",
            Sw => "sw",
            Ew => "ew",
            Gt => "gt",
            Lt => "lt",
            Ge => "ge",
            Le => "le",
            Ap => "ap",
            Sa => "sa",
            Eb => "eb",
            Pr => "pr",
            Po => "po",
            Ss => "ss",
            Sb => "sb",
            In => "in",
            Ni => "ni",
            Re => "re",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == code)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown comparison operator '{}'", s))
    }
}

/// Logical connectives joining filters in a logical expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Connective::And),
            "or" => Some(Connective::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
