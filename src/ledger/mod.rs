//! Ledger domain models, persistence-friendly types, and helpers.

pub mod category;
pub mod expense;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod money;
pub mod month_key;

pub use category::Category;
pub use expense::{Expense, DATE_FORMAT};
pub use ledger::{Ledger, UserInfo};
pub use month_key::MonthKey;
