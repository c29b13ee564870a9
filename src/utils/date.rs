// Calendar day helpers for the dashboard

use chrono::{Duration, Local, NaiveDate};
use anyhow::Result;

const FULL_YEAR: i64 = 365;
const HALF_YEAR: i64 = FULL_YEAR / 2;

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a day expression relative to `today`
///
/// Supports `YYYY-MM-DD`, `today`, `yesterday` and `tomorrow`.
pub fn parse_date_arg(expr: &str, today: NaiveDate) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Ok(date);
    }
    match expr.to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        _ => anyhow::bail!(
            "Unsupported date expression: '{}'. Use YYYY-MM-DD, today, yesterday or tomorrow.",
            expr
        ),
    }
}

/// One-year window balanced around `incl_date`, never reaching past `today`.
///
/// Without `incl_date` the window ends today.
pub fn year_range(incl_date: Option<NaiveDate>, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = match incl_date {
        Some(date) => (date + Duration::days(HALF_YEAR)).min(today),
        None => today,
    };
    (end - Duration::days(FULL_YEAR), end)
}

/// Every day from `start` to `end` inclusive, newest first when `desc`
pub fn date_range(start: NaiveDate, end: NaiveDate, desc: bool) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    if desc {
        days.reverse();
    }
    days
}
