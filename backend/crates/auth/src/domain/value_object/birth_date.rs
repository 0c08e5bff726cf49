//! Birth Date Value Object
//!
//! Age checks use calendar arithmetic: someone born on D is an adult from
//! the day whose date, shifted back 18 years, is on or after D.

use chrono::{Months, NaiveDate};
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

pub const ADULT_AGE_YEARS: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Parse an ISO `YYYY-MM-DD` date
    pub fn parse(raw: &str) -> AppResult<Self> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| {
                AppError::bad_request("Birth date must be a valid YYYY-MM-DD date")
                    .with_field("birth_date")
            })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    pub fn is_adult_on(&self, today: NaiveDate) -> bool {
        today
            .checked_sub_months(Months::new(ADULT_AGE_YEARS * 12))
            .is_some_and(|limit| self.0 <= limit)
    }

    pub fn ensure_adult_on(&self, today: NaiveDate) -> AppResult<()> {
        if self.is_adult_on(today) {
            Ok(())
        } else {
            Err(AppError::bad_request(format!(
                "You must be at least {} years old",
                ADULT_AGE_YEARS
            ))
            .with_field("birth_date"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_adult_by_calendar_year() {
        let born = BirthDate::parse("2010-01-01").unwrap();
        assert!(!born.is_adult_on(date(2024, 6, 1)));
        assert!(born.is_adult_on(date(2028, 6, 1)));
    }

    #[test]
    fn test_exact_birthday_boundary() {
        let born = BirthDate::parse("2010-01-01").unwrap();
        assert!(!born.is_adult_on(date(2027, 12, 31)));
        assert!(born.is_adult_on(date(2028, 1, 1)));
    }

    #[test]
    fn test_leap_day_birth() {
        // 18 years back from 2022-02-28 is 2004-02-28, before the birthday
        let born = BirthDate::parse("2004-02-29").unwrap();
        assert!(!born.is_adult_on(date(2022, 2, 28)));
        assert!(born.is_adult_on(date(2022, 3, 1)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = BirthDate::parse("01/02/2000").unwrap_err();
        assert_eq!(err.field(), Some("birth_date"));
        assert!(BirthDate::parse("2001-02-30").is_err());
    }
}
