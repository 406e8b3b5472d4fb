use std::{cmp::Ordering, fmt};

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, SubsecRound, Utc,
};

use super::{Variable, VariableKind};
use crate::{ast::ComparisonOperator, evaluator::EvalError, lexer::RE_DATE_TIME};

/// Granularity a date was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Year,
    Month,
    Day,
    Millisecond,
}

/// A point in time plus the precision of its source text.
///
/// `2020` is the whole year 2020, `2020-03` the whole of March. Partial dates
/// start at midnight UTC on the first day of their period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateVariable {
    instant: DateTime<Utc>,
    precision: Precision,
    text: String,
}

impl DateVariable {
    /// Parses `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or a full RFC 3339 date-time.
    pub fn parse(text: &str) -> Result<Self, EvalError> {
        let invalid = || EvalError::InvalidLiteral {
            kind: "date",
            text: text.to_string(),
        };

        let part = |range: std::ops::Range<usize>| -> Result<u32, EvalError> {
            text.get(range)
                .and_then(|digits| digits.parse().ok())
                .ok_or_else(invalid)
        };

        let (instant, precision) = match text.len() {
            4 => (midnight(part(0..4)?, 1, 1), Precision::Year),
            7 => (midnight(part(0..4)?, part(5..7)?, 1), Precision::Month),
            10 => (
                midnight(part(0..4)?, part(5..7)?, part(8..10)?),
                Precision::Day,
            ),
            _ => (
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3)),
                Precision::Millisecond,
            ),
        };

        Ok(DateVariable {
            instant: instant.ok_or_else(invalid)?,
            precision,
            text: text.to_string(),
        })
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Orders two dates at the precision of `target`.
    pub fn compare(&self, target: &DateVariable) -> Ordering {
        let precision = target.precision;
        truncate(self.instant, precision).cmp(&truncate(target.instant, precision))
    }

    /// Whether `needle` falls in the same period as `self`, at `self`'s precision.
    pub fn contains(&self, needle: &DateVariable) -> bool {
        truncate(needle.instant, self.precision) == truncate(self.instant, self.precision)
    }

    /// Inclusive bounds of the period this date denotes.
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = truncate(self.instant, self.precision);
        let next = match self.precision {
            Precision::Year => start.checked_add_months(Months::new(12)),
            Precision::Month => start.checked_add_months(Months::new(1)),
            Precision::Day => start.checked_add_days(Days::new(1)),
            Precision::Millisecond => return (start, start),
        };
        let end = next.map_or(start, |next| next - Duration::milliseconds(1));
        (start, end)
    }

    /// Whether the periods of two dates share at least one instant.
    pub fn overlaps(&self, other: &DateVariable) -> bool {
        let (start, end) = self.window();
        let (other_start, other_end) = other.window();
        start <= other_end && other_start <= end
    }

    pub fn op(&self, operator: ComparisonOperator, right: &Variable) -> Result<bool, EvalError> {
        use ComparisonOperator::*;

        if !matches!(operator, Eq | Ne | Gt | Ge | Lt | Le | Co | Po) {
            return Err(EvalError::UnsupportedOperator {
                operator,
                kind: VariableKind::Date,
            });
        }

        let coerced;
        let target = match right {
            Variable::Date(date) => date,
            other => {
                let text = other.to_string();
                if !RE_DATE_TIME.is_match(&text) {
                    // Not a date at all: only "ne" holds.
                    return Ok(operator == Ne);
                }
                coerced = DateVariable::parse(&text)?;
                &coerced
            }
        };

        let ordering = self.compare(target);
        Ok(match operator {
            Eq => ordering == Ordering::Equal,
            Ne => ordering != Ordering::Equal,
            Gt => ordering == Ordering::Greater,
            Ge => ordering != Ordering::Less,
            Lt => ordering == Ordering::Less,
            Le => ordering != Ordering::Greater,
            Co => self.contains(target),
            _ => self.overlaps(target),
        })
    }
}

impl fmt::Display for DateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn midnight(year: u32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn truncate(instant: DateTime<Utc>, precision: Precision) -> DateTime<Utc> {
    let date = instant.date_naive();
    let first = match precision {
        Precision::Year => date.with_ordinal(1),
        Precision::Month => date.with_day(1),
        Precision::Day => Some(date),
        Precision::Millisecond => return instant,
    };
    first.unwrap_or(date).and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> DateVariable {
        DateVariable::parse(text).unwrap()
    }

    #[test]
    fn precision_follows_length() {
        assert_eq!(date("2020").precision(), Precision::Year);
        assert_eq!(date("2020-02").precision(), Precision::Month);
        assert_eq!(date("2020-02-03").precision(), Precision::Day);
        assert_eq!(date("2020-02-03T10:00:00Z").precision(), Precision::Millisecond);
    }

    #[test]
    fn offsets_normalise_to_utc() {
        let a = date("2020-01-01T10:00:00+02:00");
        let b = date("2020-01-01T08:00:00Z");
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn month_window_ends_on_last_day() {
        let (start, end) = date("2020-02").window();
        assert_eq!(start.to_rfc3339(), "2020-02-01T00:00:00+00:00");
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        assert!(matches!(
            DateVariable::parse("2021-02-30"),
            Err(EvalError::InvalidLiteral { kind: "date", .. })
        ));
    }
}
