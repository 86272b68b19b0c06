//! Structured `(year, month)` keys for the budget mapping and their canonical
//! `"YYYY-MM"` text form used in the data file.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::errors::LedgerError;

/// A budget period identified by calendar year and month (1-12).
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if year < 1 {
            return Err(LedgerError::InvalidInput(format!(
                "year must be positive (got {year})"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidInput(format!(
                "month must be between 1 and 12 (got {month})"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month a calendar date falls in. Fails for dates before year 1.
    pub fn from_date(date: NaiveDate) -> Result<Self, LedgerError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Human readable label such as `March 2024`.
    pub fn label(self) -> String {
        match self.first_day() {
            Some(day) => day.format("%B %Y").to_string(),
            None => self.encode(),
        }
    }

    /// Canonical storage form, e.g. `2024-03`.
    pub fn encode(self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Parses the storage form back into a key.
    ///
    /// The text must split on `-` into exactly two integer segments and the month
    /// must fall within 1-12.
    pub fn decode(raw: &str) -> Result<Self, LedgerError> {
        let malformed = || LedgerError::MalformedKey(raw.to_string());
        let mut parts = raw.split('-');
        let (Some(year), Some(month), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).map_err(|_| malformed())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn encodes_with_zero_padded_month() {
        assert_eq!(key(2024, 3).encode(), "2024-03");
        assert_eq!(key(2024, 12).to_string(), "2024-12");
    }

    #[test]
    fn decode_inverts_encode_for_every_month() {
        for year in [1, 1999, 2024, 10_000] {
            for month in 1..=12 {
                let original = key(year, month);
                assert_eq!(MonthKey::decode(&original.encode()).unwrap(), original);
            }
        }
    }

    #[test]
    fn accepts_unpadded_month() {
        assert_eq!(MonthKey::decode("2024-3").unwrap(), key(2024, 3));
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["abc", "2024", "2024-03-01", "2024-13", "2024-00", "x-03", "2024-", "", "-2024-03", "0-05"] {
            let err = MonthKey::decode(raw).expect_err(raw);
            match err {
                LedgerError::MalformedKey(text) => assert_eq!(text, raw),
                other => panic!("expected malformed key for `{raw}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn new_validates_month_range() {
        assert!(MonthKey::new(2024, 0).is_err());
        assert!(MonthKey::new(2024, 13).is_err());
        assert!(MonthKey::new(0, 1).is_err());
    }

    #[test]
    fn orders_chronologically() {
        let mut keys = vec![key(2024, 2), key(2023, 12), key(2024, 1)];
        keys.sort();
        assert_eq!(keys, vec![key(2023, 12), key(2024, 1), key(2024, 2)]);
    }

    #[test]
    fn succ_rolls_over_year_end() {
        assert_eq!(key(2023, 12).succ(), key(2024, 1));
        assert_eq!(key(2024, 3).succ(), key(2024, 4));
    }

    #[test]
    fn label_uses_full_month_name() {
        assert_eq!(key(2024, 3).label(), "March 2024");
    }

    #[test]
    fn from_date_extracts_year_and_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(MonthKey::from_date(date).unwrap(), key(2024, 3));
    }

    #[test]
    fn from_date_rejects_year_zero() {
        let date = NaiveDate::from_ymd_opt(0, 3, 15).unwrap();
        assert!(MonthKey::from_date(date).is_err());
    }
}
