use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::services::{
    BudgetService, ExpenseService, Report, ReportService, ServiceResult,
};
use crate::core::time::Clock;
use crate::errors::LedgerError;
use crate::ledger::{Expense, Ledger, MonthKey};
use crate::storage::{JsonStorage, LoadOrigin, StorageBackend};

/// Result of flushing the ledger after a mutation.
///
/// A failed save is not fatal: the in-memory ledger keeps the change and the next
/// mutation rewrites the whole document again.
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    Failed(LedgerError),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }

    pub fn error(&self) -> Option<&LedgerError> {
        match self {
            SaveStatus::Saved => None,
            SaveStatus::Failed(err) => Some(err),
        }
    }
}

/// A mutation that was applied in memory, together with how its save went.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub save: SaveStatus,
}

impl<T> Committed<T> {
    pub fn is_saved(&self) -> bool {
        self.save.is_saved()
    }
}

/// Facade that owns the ledger for one user session and persists it after every change.
pub struct Session {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    origin: LoadOrigin,
    load_warnings: Vec<String>,
}

impl Session {
    /// Loads the ledger from `storage`. Absent and corrupted documents both start
    /// an empty session; see [`Session::origin`] for which one occurred.
    pub fn open(
        storage: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let report = storage.load()?;
        match &report.origin {
            LoadOrigin::Existing => info!("session opened from {}", storage.location().display()),
            LoadOrigin::Fresh => info!("no saved data found; starting fresh"),
            LoadOrigin::Corrupted { reason } => {
                warn!("saved data corrupted ({}); starting fresh", reason)
            }
        }
        Ok(Self {
            ledger: report.ledger,
            storage,
            clock,
            origin: report.origin,
            load_warnings: report.warnings,
        })
    }

    /// Opens the session stored at the configured data file.
    pub fn open_with_config(config: &Config, clock: Box<dyn Clock>) -> Result<Self, LedgerError> {
        let storage = JsonStorage::new(config.resolve_data_file());
        let mut session = Self::open(Box::new(storage), clock)?;
        if let Some(name) = config.user_name.as_deref() {
            if session.ledger.user_name().is_empty() {
                session.ledger.set_user_name(name);
            }
        }
        Ok(session)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    /// Entries skipped while loading (undecodable budget keys, invalid expenses).
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn current_month(&self) -> Result<MonthKey, LedgerError> {
        self.clock.current_month()
    }

    /// True when the current month has no budget yet; the caller decides whether
    /// to prompt for one.
    pub fn needs_initial_budget(&self) -> Result<bool, LedgerError> {
        Ok(!self.ledger.has_budget(self.current_month()?))
    }

    pub fn has_any_budget(&self) -> bool {
        BudgetService::has_any(&self.ledger)
    }

    pub fn budget(&self, month: MonthKey) -> Decimal {
        BudgetService::get(&self.ledger, month)
    }

    pub fn expenses(&self) -> Vec<(usize, &Expense)> {
        ExpenseService::list(&self.ledger)
    }

    pub fn report(&self) -> Report {
        ReportService::generate(&self.ledger)
    }

    pub fn add_expense(&mut self, expense: Expense) -> ServiceResult<Committed<usize>> {
        let position = ExpenseService::add(&mut self.ledger, expense)?;
        Ok(self.commit(position))
    }

    /// Deletes the expense at 1-based `index`. Nothing is saved when the index is invalid.
    pub fn delete_expense(&mut self, index: usize) -> ServiceResult<Committed<Expense>> {
        let removed = ExpenseService::remove(&mut self.ledger, index)?;
        Ok(self.commit(removed))
    }

    /// Sets the budget for the clock's current month when none exists yet.
    pub fn set_initial_budget(&mut self, amount: Decimal) -> ServiceResult<Committed<MonthKey>> {
        let month = self.current_month()?;
        BudgetService::set_initial(&mut self.ledger, month, amount)?;
        Ok(self.commit(month))
    }

    pub fn modify_budget(
        &mut self,
        month: MonthKey,
        amount: Decimal,
    ) -> ServiceResult<Committed<Option<Decimal>>> {
        let previous = BudgetService::modify(&mut self.ledger, month, amount)?;
        Ok(self.commit(previous))
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) -> SaveStatus {
        self.ledger.set_user_name(name);
        self.save()
    }

    pub fn set_savings_account(&mut self, amount: Decimal) -> SaveStatus {
        self.ledger.set_savings_account(amount);
        self.save()
    }

    /// Discards all expenses, budgets, and user info. Irreversible once saved.
    pub fn reset(&mut self) -> SaveStatus {
        self.ledger.reset();
        info!("all data has been reset");
        self.save()
    }

    /// Writes the full ledger to storage.
    pub fn save(&self) -> SaveStatus {
        match self.storage.save(&self.ledger) {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(
                    "failed to save data to {}: {}",
                    self.storage.location().display(),
                    err
                );
                SaveStatus::Failed(err)
            }
        }
    }

    fn commit<T>(&self, value: T) -> Committed<T> {
        Committed {
            value,
            save: self.save(),
        }
    }
}
