use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{expense::Expense, month_key::MonthKey};
use crate::errors::LedgerError;

/// Display name and savings balance of the session's user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    pub savings_account: Decimal,
}

/// In-memory ledger state: ordered expenses, monthly budgets, and user info.
///
/// Performs no I/O; persistence is handled by a [`crate::storage::StorageBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<Expense>,
    budgets: BTreeMap<MonthKey, Decimal>,
    user: UserInfo,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a ledger from already validated parts.
    pub(crate) fn from_parts(
        expenses: Vec<Expense>,
        budgets: BTreeMap<MonthKey, Decimal>,
        user: UserInfo,
    ) -> Self {
        Self {
            expenses,
            budgets,
            user,
        }
    }

    /// Appends an expense and returns its 1-based position.
    pub fn add_expense(&mut self, expense: Expense) -> Result<usize, LedgerError> {
        expense.validate()?;
        self.expenses.push(expense);
        Ok(self.expenses.len())
    }

    /// Removes the expense at 1-based `index`. Later expenses shift down by one.
    pub fn delete_expense(&mut self, index: usize) -> Result<Expense, LedgerError> {
        let len = self.expenses.len();
        if index == 0 || index > len {
            return Err(LedgerError::OutOfRange { index, len });
        }
        Ok(self.expenses.remove(index - 1))
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Expense at 1-based `index`, if any.
    pub fn expense(&self, index: usize) -> Option<&Expense> {
        index.checked_sub(1).and_then(|idx| self.expenses.get(idx))
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Inserts or replaces the budget for `month`, returning the previous amount.
    pub fn set_budget(
        &mut self,
        month: MonthKey,
        amount: Decimal,
    ) -> Result<Option<Decimal>, LedgerError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        Ok(self.budgets.insert(month, amount))
    }

    /// Budget for `month`, zero when none has been set.
    pub fn budget(&self, month: MonthKey) -> Decimal {
        self.budgets.get(&month).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn has_budget(&self, month: MonthKey) -> bool {
        self.budgets.contains_key(&month)
    }

    pub fn has_any_budget(&self) -> bool {
        !self.budgets.is_empty()
    }

    /// All budgets in ascending month order.
    pub fn budgets(&self) -> &BTreeMap<MonthKey, Decimal> {
        &self.budgets
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    pub fn user_name(&self) -> &str {
        &self.user.name
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user.name = name.into();
    }

    pub fn savings_account(&self) -> Decimal {
        self.user.savings_account
    }

    pub fn set_savings_account(&mut self, amount: Decimal) {
        self.user.savings_account = amount;
    }

    /// Clears every expense, budget, and user field.
    pub fn reset(&mut self) {
        self.expenses.clear();
        self.budgets.clear();
        self.user = UserInfo::default();
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.budgets.is_empty()
    }
}
