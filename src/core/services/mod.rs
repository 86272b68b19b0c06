pub mod budget_service;
pub mod expense_service;
pub mod report_service;

pub use budget_service::BudgetService;
pub use expense_service::ExpenseService;
pub use report_service::{BudgetStatus, CategoryTotal, MonthReport, Report, ReportService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
