use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{category::Category, month_key::MonthKey};
use crate::errors::LedgerError;

/// Date layout used in the data file (`03-15-2024`).
pub const DATE_FORMAT: &str = "%m-%d-%Y";

/// A single recorded expense. Its identity is its position in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub category: Category,
}

impl Expense {
    /// Builds an expense, rejecting negative amounts and dates before year 1.
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: Category,
    ) -> Result<Self, LedgerError> {
        let expense = Self {
            description: description.into(),
            amount,
            date,
            category,
        };
        expense.validate()?;
        Ok(expense)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(LedgerError::InvalidAmount(self.amount));
        }
        if self.date.year() < 1 {
            return Err(LedgerError::InvalidInput(format!(
                "expense date {} is before year 1",
                self.date
            )));
        }
        Ok(())
    }

    /// The budget month this expense is reported under.
    pub fn month(&self) -> Result<MonthKey, LedgerError> {
        MonthKey::from_date(self.date)
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|err| D::Error::custom(format!("invalid date `{raw}`: {err}")))
    }
}
