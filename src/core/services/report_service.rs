//! Monthly spending report: expenses grouped by month and category, compared
//! against each month's budget.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::{Category, Ledger, MonthKey};

/// Whether a month's spending stayed within its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    WithinBudget,
    OverBudget,
}

impl BudgetStatus {
    /// Display name for presentation layers, e.g. `Over Budget`.
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::WithinBudget => "Within Budget",
            BudgetStatus::OverBudget => "Over Budget",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// One month of the report. Amounts are kept at full precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReport {
    pub month: MonthKey,
    /// Category sums in the order each category first appears in that month.
    pub categories: Vec<CategoryTotal>,
    pub total: Decimal,
    pub budget: Decimal,
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

impl MonthReport {
    pub fn is_over_budget(&self) -> bool {
        self.status == BudgetStatus::OverBudget
    }

    /// Amount spent beyond the budget, if any.
    pub fn overage(&self) -> Option<Decimal> {
        self.is_over_budget().then(|| -self.remaining)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The ledger holds no expenses.
    NoData,
    /// Months in strictly ascending order.
    Monthly(Vec<MonthReport>),
}

impl Report {
    pub fn months(&self) -> &[MonthReport] {
        match self {
            Report::NoData => &[],
            Report::Monthly(months) => months,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Report::NoData)
    }
}

pub struct ReportService;

impl ReportService {
    pub fn generate(ledger: &Ledger) -> Report {
        if ledger.expenses().is_empty() {
            return Report::NoData;
        }

        let mut grouped: BTreeMap<MonthKey, Vec<CategoryTotal>> = BTreeMap::new();
        for expense in ledger.expenses() {
            // The ledger only admits validated expenses, so this never skips.
            let Ok(month) = expense.month() else {
                continue;
            };
            let totals = grouped.entry(month).or_default();
            match totals.iter_mut().find(|entry| entry.category == expense.category) {
                Some(entry) => entry.total += expense.amount,
                None => totals.push(CategoryTotal {
                    category: expense.category,
                    total: expense.amount,
                }),
            }
        }

        let months = grouped
            .into_iter()
            .map(|(month, categories)| {
                let total: Decimal = categories.iter().map(|entry| entry.total).sum();
                let budget = ledger.budget(month);
                let remaining = budget - total;
                let status = if remaining < Decimal::ZERO {
                    BudgetStatus::OverBudget
                } else {
                    BudgetStatus::WithinBudget
                };
                MonthReport {
                    month,
                    categories,
                    total,
                    budget,
                    remaining,
                    status,
                }
            })
            .collect();
        Report::Monthly(months)
    }

    /// Report entry for a single month, if it has any expenses.
    pub fn for_month(ledger: &Ledger, month: MonthKey) -> Option<MonthReport> {
        Self::generate(ledger)
            .months()
            .iter()
            .find(|entry| entry.month == month)
            .cloned()
    }
}
