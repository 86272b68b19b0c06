//! Business logic helpers for managing expenses.

use tracing::debug;

use crate::core::services::ServiceResult;
use crate::ledger::{Expense, Ledger};

/// Provides validated add/remove/list helpers for ledger expenses.
pub struct ExpenseService;

impl ExpenseService {
    /// Adds a new expense and returns its 1-based position.
    pub fn add(ledger: &mut Ledger, expense: Expense) -> ServiceResult<usize> {
        let position = ledger.add_expense(expense)?;
        debug!("added expense #{}", position);
        Ok(position)
    }

    /// Removes the expense at 1-based `index`, returning the removed record.
    pub fn remove(ledger: &mut Ledger, index: usize) -> ServiceResult<Expense> {
        let removed = ledger.delete_expense(index)?;
        debug!("removed expense #{} ({})", index, removed.description);
        Ok(removed)
    }

    /// Expenses paired with the 1-based positions `remove` accepts.
    pub fn list(ledger: &Ledger) -> Vec<(usize, &Expense)> {
        ledger
            .expenses()
            .iter()
            .enumerate()
            .map(|(idx, expense)| (idx + 1, expense))
            .collect()
    }
}
