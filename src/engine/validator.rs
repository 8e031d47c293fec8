/// Query window validation
use crate::domain::QueryWindow;
use chrono::NaiveDate;

/// Widest allowed NEO query window, in whole days
pub const MAX_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please provide the input of the dates which is in {max} days range (got {days} days)")]
pub struct RangeTooLarge {
    pub days: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}', expected YYYY-MM-DD")]
pub struct DateParseError {
    pub input: String,
}

/// Check a start/end pair against the seven-day window.
///
/// `end < start` gives a negative day count and is accepted.
pub fn validate(start: NaiveDate, end: NaiveDate) -> Result<QueryWindow, RangeTooLarge> {
    let days = (end - start).num_days();
    if days > MAX_WINDOW_DAYS {
        return Err(RangeTooLarge {
            days,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(QueryWindow::new(start, end))
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| DateParseError {
        input: input.to_string(),
    })
}
