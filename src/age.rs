use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Earliest accepted birth year
pub const MIN_YEAR: i32 = 1900;

/// Why a date-of-birth input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("please enter a valid date")]
    InvalidDate,
    #[error("birth date cannot be in the future")]
    FutureDate,
    #[error("birth date cannot be before 1900")]
    TooEarly,
}

/// Elapsed time between two calendar dates, decomposed as years/months/days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeResult {
    pub years: u32,
    /// Always in 0..=11
    pub months: u32,
    pub days: u32,
    /// Whole days between the two dates, computed independently of the
    /// y/m/d decomposition
    pub total_days: i64,
}

/// Proleptic Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month, or 0 for an invalid month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Validate a day/month/year triple as a birth date relative to `today`
pub fn validate_date(day: u32, month: u32, year: i32, today: NaiveDate) -> Result<NaiveDate, DateError> {
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return Err(DateError::InvalidDate);
    }
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::InvalidDate)?;
    if date > today {
        return Err(DateError::FutureDate);
    }
    // A valid date earlier than 1900-01-01 must have year < 1900
    if year < MIN_YEAR {
        return Err(DateError::TooEarly);
    }
    Ok(date)
}

/// Calendar-accurate difference between `birth` and `today` (birth <= today)
pub fn diff(birth: NaiveDate, today: NaiveDate) -> AgeResult {
    let mut years = today.year() - birth.year();
    let mut months = today.month() as i32 - birth.month() as i32;
    let mut days = today.day() as i32 - birth.day() as i32;

    // Borrow days from the month preceding today's month, in today's year
    if days < 0 {
        months -= 1;
        let (prev_year, prev_month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        days += days_in_month(prev_year, prev_month) as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    let total_days = (today - birth).num_days();

    AgeResult {
        years: years as u32,
        months: months as u32,
        days: days as u32,
        total_days,
    }
}
