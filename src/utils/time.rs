use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

use crate::error::{Error, Result};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar day in the server's local timezone; deadlines are day-granular.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_loose_date(s: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    Ok(from_rfc3339(trimmed)?.date_naive())
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    let last = next
        .pred_opt()
        .ok_or_else(|| Error::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    Ok((first, last))
}

pub fn current_month() -> (i32, u32) {
    let today = today();
    (today.year(), today.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_handle_year_end_and_leap_years() {
        let (first, last) = month_bounds(2026, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        let (_, feb) = month_bounds(2028, 2).unwrap();
        assert_eq!(feb.day(), 29);

        assert!(month_bounds(2026, 13).is_err());
    }

    #[test]
    fn loose_dates_accept_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(parse_loose_date("2026-03-09").unwrap(), expected);
        assert_eq!(parse_loose_date("2026-03-09T10:15:00Z").unwrap(), expected);
        assert!(parse_loose_date("next tuesday").is_err());
    }
}
